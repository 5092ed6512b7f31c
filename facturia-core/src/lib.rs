//! Invoice dashboard core: backend client, dashboard store, invoice status
//! workflow and the HTTP server that exposes them to operators.

pub mod api;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod workflow;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use config::DashboardConfig;
pub use routes::{create_router, AppState};
