use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::BackendApi;
use crate::auth;
use crate::config::DashboardConfig;
use crate::handlers::{analytics, health, invoices, notifications, session, suppliers, workflow};
use crate::workspace::Workspaces;

/// Application state shared by every route handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    /// Remote invoice backend
    pub api: Arc<dyn BackendApi>,
    /// Per-company stores and status workflows
    pub workspaces: Workspaces,
}

impl AppState {
    /// Wires the per-company workspaces around `api`.
    pub fn new<A>(config: DashboardConfig, api: Arc<A>) -> Self
    where
        A: BackendApi + 'static,
    {
        let workspaces = Workspaces::new(
            api.clone(),
            config.notification_ttl,
            config.notification_sweep_interval,
        );
        Self {
            config: Arc::new(config),
            api,
            workspaces,
        }
    }
}

/// Creates the dashboard router.
///
/// Sets up the public health routes and the operator API with its
/// middleware.
///
/// # Arguments
///
/// * `state` - Application state holding the config, the backend client
///   and the per-company workspaces
///
/// # Returns
///
/// Returns a configured Axum Router. Everything under `/api` needs an
/// operator session token and works on the caller's company workspace.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/session", get(session::current).delete(session::logout))
        .route("/state", get(session::state))
        // Invoices
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route("/invoices/visible", get(invoices::visible))
        .route(
            "/invoices/filters",
            put(invoices::set_filters).delete(invoices::reset_filters),
        )
        .route("/invoices/bulk-delete", post(invoices::delete_many))
        .route(
            "/invoices/:id",
            get(invoices::get_one)
                .put(invoices::update)
                .delete(invoices::delete_one),
        )
        // Status workflow
        .route(
            "/invoices/:id/workflow",
            get(workflow::overview).delete(workflow::dismiss),
        )
        .route("/invoices/:id/workflow/request", post(workflow::request))
        .route("/invoices/:id/workflow/picker", post(workflow::open_picker))
        .route("/invoices/:id/workflow/selection", put(workflow::select))
        .route("/invoices/:id/workflow/confirm", post(workflow::confirm))
        // Suppliers
        .route("/suppliers", get(suppliers::list))
        .route("/suppliers/top", get(suppliers::top))
        .route(
            "/suppliers/filters",
            put(suppliers::set_filters).delete(suppliers::reset_filters),
        )
        // Analytics
        .route("/dashboard", get(analytics::dashboard))
        .route("/analytics/monthly", get(analytics::monthly))
        .route("/analytics/trends", get(analytics::trends))
        .route("/analytics/predictions", get(analytics::predictions))
        .route("/analytics/cashflow", get(analytics::cashflow))
        // Notifications
        .route(
            "/notifications",
            get(notifications::list).delete(notifications::clear),
        )
        .route("/notifications/:id", delete(notifications::remove))
        .route("/notifications/:id/read", put(notifications::mark_read))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_middleware,
        ));

    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        .route("/health/backend", get(health::backend_health_check))
        .route("/health/metrics", get(health::backend_metrics))
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
