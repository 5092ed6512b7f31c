use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Role, User};
use crate::routes::AppState;

/// Operator attached to the request extensions by [`jwt_middleware`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Claims expected inside an operator's session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the operator's user id.
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    /// Company whose invoices the operator manages
    #[serde(default)]
    pub company_phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Claims {
    /// Builds the session user, using `default_company_phone` when the
    /// token names no company.
    pub fn into_user(self, default_company_phone: &str) -> User {
        User {
            id: self.sub,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            company_name: self.company_name.unwrap_or_default(),
            company_phone: self
                .company_phone
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| default_company_phone.to_string()),
            role: self.role.unwrap_or(Role::User),
        }
    }
}

/// Middleware to validate a Bearer JWT in the `Authorization` header.
///
/// On success the request is forwarded with a [`CurrentUser`] extension and
/// the [`Workspace`](crate::workspace::Workspace) of the operator's company;
/// on failure a `401` is returned.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
    let claims = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map_err(|e| {
            warn!("Rejected session token: {}", e);
            StatusCode::UNAUTHORIZED
        })?
        .claims;

    if claims.sub.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = claims.into_user(&state.config.default_company_phone);
    debug!("Authenticated operator {} ({})", user.id, user.company_phone);
    let workspace = state.workspaces.get(&user.company_phone).await;
    req.extensions_mut().insert(workspace);
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
