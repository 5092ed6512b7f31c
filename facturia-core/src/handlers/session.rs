use axum::{http::StatusCode, response::Json, Extension};
use tracing::info;

use crate::auth::CurrentUser;
use crate::models::User;
use crate::store::{AppAction, DashboardState};
use crate::workspace::Workspace;

/// Returns the signed-in operator and records them in the company store.
pub async fn current(
    Extension(ws): Extension<Workspace>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<User> {
    ws.store.dispatch(AppAction::SetUser(Some(user.clone()))).await;
    Json(user)
}

/// Clears the cached dashboard state of the operator's company.
pub async fn logout(
    Extension(ws): Extension<Workspace>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> StatusCode {
    info!("Operator {} logged out of {}", user.id, ws.company_phone);
    ws.store.dispatch(AppAction::Logout).await;
    StatusCode::NO_CONTENT
}

/// Company store snapshot: cached collections, filters, loading flags and errors.
pub async fn state(Extension(ws): Extension<Workspace>) -> Json<DashboardState> {
    Json(ws.store.snapshot().await)
}
