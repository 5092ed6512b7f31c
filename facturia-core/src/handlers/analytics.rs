use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::api::{AnalyticsApi, ApiError, DashboardQuery};
use crate::handlers::api_status;
use crate::models::DashboardData;
use crate::routes::AppState;
use crate::store::loaders;
use crate::workspace::Workspace;

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    pub period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CashflowParams {
    pub months: Option<u32>,
}

fn failed(what: &str, e: ApiError) -> StatusCode {
    error!("Analytics {} failed: {}", what, e);
    api_status(&e)
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(mut query): Query<DashboardQuery>,
) -> Result<Json<DashboardData>, StatusCode> {
    query.company_phone = ws.company_phone.clone();

    loaders::load_dashboard(&ws.store, state.api.as_ref(), &query)
        .await
        .map(Json)
        .map_err(|e| failed("dashboard", e))
}

pub async fn monthly(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(params): Query<MonthlyParams>,
) -> Result<Json<Value>, StatusCode> {
    state
        .api
        .monthly_summary(&ws.company_phone, params.year, params.month)
        .await
        .map(Json)
        .map_err(|e| failed("monthly summary", e))
}

pub async fn trends(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(params): Query<TrendParams>,
) -> Result<Json<Value>, StatusCode> {
    state
        .api
        .trends(&ws.company_phone, params.period.as_deref())
        .await
        .map(Json)
        .map_err(|e| failed("trends", e))
}

pub async fn predictions(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
) -> Result<Json<Value>, StatusCode> {
    state
        .api
        .predictions(&ws.company_phone)
        .await
        .map(Json)
        .map_err(|e| failed("predictions", e))
}

pub async fn cashflow(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(params): Query<CashflowParams>,
) -> Result<Json<Value>, StatusCode> {
    state
        .api
        .cashflow(&ws.company_phone, params.months)
        .await
        .map(Json)
        .map_err(|e| failed("cashflow", e))
}
