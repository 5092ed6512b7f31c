//! In-process fake of the invoice backend for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{
    AnalyticsApi, ApiError, DashboardQuery, HealthApi, InvoiceApi, InvoiceQuery, Page, SupplierApi,
    SupplierQuery, TopSuppliersQuery,
};
use crate::models::{DashboardData, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, Supplier};

pub struct FakeBackend {
    invoices: Mutex<Vec<Invoice>>,
    fail: bool,
    delay: Duration,
    status_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices: Mutex::new(invoices),
            fail: false,
            delay: Duration::ZERO,
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with a 503.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_invoices(Vec::new())
        }
    }

    /// Status updates wait `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The backend's own copy of invoice `id`.
    pub fn stored(&self, id: i64) -> Option<Invoice> {
        self.find(id).ok()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            Err(ApiError::Status {
                status: 503,
                message: "Service unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn find(&self, id: i64) -> Result<Invoice, ApiError> {
        self.invoices
            .lock()
            .unwrap()
            .iter()
            .find(|inv| inv.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Invoice not found".to_string(),
            })
    }
}

#[async_trait]
impl InvoiceApi for FakeBackend {
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Page<Invoice>, ApiError> {
        self.check()?;
        let items: Vec<Invoice> = self
            .invoices
            .lock()
            .unwrap()
            .iter()
            .filter(|inv| query.company_phone.is_empty() || inv.company_phone == query.company_phone)
            .filter(|inv| query.status.map_or(true, |s| inv.status == s))
            .cloned()
            .collect();
        Ok(Page {
            items,
            pagination: None,
        })
    }

    async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError> {
        self.check()?;
        self.find(id)
    }

    async fn create_invoice(&self, _invoice: &NewInvoice) -> Result<Invoice, ApiError> {
        self.check()?;
        Err(ApiError::Rejected("not supported by fake".to_string()))
    }

    async fn update_invoice(&self, id: i64, changes: &InvoiceChanges) -> Result<Invoice, ApiError> {
        self.check()?;
        let mut invoices = self.invoices.lock().unwrap();
        let invoice = invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or_else(|| ApiError::Rejected("Invoice not found".to_string()))?;
        invoice.apply(changes);
        Ok(invoice.clone())
    }

    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.check()?;
        let mut invoices = self.invoices.lock().unwrap();
        let invoice = invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Invoice not found".to_string(),
            })?;
        invoice.status = status;
        invoice.updated_at = Utc::now();
        Ok(invoice.clone())
    }

    async fn delete_invoice(&self, id: i64) -> Result<i64, ApiError> {
        self.check()?;
        self.invoices.lock().unwrap().retain(|inv| inv.id != id);
        Ok(id)
    }
}

#[async_trait]
impl SupplierApi for FakeBackend {
    async fn list_suppliers(&self, _query: &SupplierQuery) -> Result<Page<Supplier>, ApiError> {
        self.check()?;
        Ok(Page {
            items: Vec::new(),
            pagination: None,
        })
    }

    async fn top_suppliers(&self, _query: &TopSuppliersQuery) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!([]))
    }
}

#[async_trait]
impl AnalyticsApi for FakeBackend {
    async fn dashboard(&self, _query: &DashboardQuery) -> Result<DashboardData, ApiError> {
        self.check()?;
        Err(ApiError::Rejected("no analytics in fake".to_string()))
    }

    async fn monthly_summary(&self, _: &str, _: Option<i32>, _: Option<u32>) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!({}))
    }

    async fn trends(&self, _: &str, _: Option<&str>) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!({}))
    }

    async fn predictions(&self, _: &str) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!({}))
    }

    async fn cashflow(&self, _: &str, _: Option<u32>) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!({}))
    }
}

#[async_trait]
impl HealthApi for FakeBackend {
    async fn health(&self) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!({ "status": "ok" }))
    }

    async fn system_metrics(&self) -> Result<Value, ApiError> {
        self.check()?;
        Ok(json!({}))
    }
}
