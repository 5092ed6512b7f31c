//! Client side of the remote invoice backend.
//!
//! The backend is split into capability traits so collaborators only depend
//! on what they call: the status workflow needs [`InvoiceApi`], the loaders
//! and the server take a full [`BackendApi`].

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{DashboardData, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, Supplier};

pub use client::HttpApiClient;
pub use error::ApiError;
pub use types::*;

/// Invoice CRUD and status endpoints.
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Page<Invoice>, ApiError>;

    async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError>;

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, ApiError>;

    async fn update_invoice(&self, id: i64, changes: &InvoiceChanges) -> Result<Invoice, ApiError>;

    /// `PATCH /invoices/{id}/status`
    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice, ApiError>;

    async fn delete_invoice(&self, id: i64) -> Result<i64, ApiError>;
}

#[async_trait]
pub trait SupplierApi: Send + Sync {
    async fn list_suppliers(&self, query: &SupplierQuery) -> Result<Page<Supplier>, ApiError>;

    async fn top_suppliers(&self, query: &TopSuppliersQuery) -> Result<Value, ApiError>;
}

/// Analytics endpoints. Only the dashboard has a fixed shape; the others
/// are passed through as JSON.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn dashboard(&self, query: &DashboardQuery) -> Result<DashboardData, ApiError>;

    async fn monthly_summary(
        &self,
        company_phone: &str,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Value, ApiError>;

    async fn trends(&self, company_phone: &str, period: Option<&str>) -> Result<Value, ApiError>;

    async fn predictions(&self, company_phone: &str) -> Result<Value, ApiError>;

    async fn cashflow(&self, company_phone: &str, months: Option<u32>) -> Result<Value, ApiError>;
}

#[async_trait]
pub trait HealthApi: Send + Sync {
    async fn health(&self) -> Result<Value, ApiError>;

    async fn system_metrics(&self) -> Result<Value, ApiError>;
}

/// Everything the dashboard calls on the backend.
pub trait BackendApi: InvoiceApi + SupplierApi + AnalyticsApi + HealthApi {}

impl<T> BackendApi for T where T: InvoiceApi + SupplierApi + AnalyticsApi + HealthApi + ?Sized {}
