use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures for the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_invoices: i64,
    pub total_amount: Decimal,
    pub avg_amount: Decimal,
    pub unique_suppliers: i64,
    pub pending_invoices: i64,
    pub confirmed_invoices: i64,
    pub paid_invoices: i64,
    pub overdue_invoices: i64,
    /// Change against the previous period, in percent
    pub amount_change_percent: f64,
    pub invoices_change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryData {
    pub category: String,
    pub invoice_count: i64,
    pub total_amount: Decimal,
    pub avg_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierData {
    pub supplier_name: String,
    pub invoice_count: i64,
    pub total_amount: Decimal,
    pub avg_amount: Decimal,
    pub last_invoice_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// Month in `YYYY-MM` form
    pub month: String,
    pub invoice_count: i64,
    pub total_amount: Decimal,
    pub avg_amount: Decimal,
}

/// Payload of `GET /analytics/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub period: String,
    pub metrics: DashboardMetrics,
    pub top_categories: Vec<CategoryData>,
    pub top_suppliers: Vec<SupplierData>,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub generated_at: DateTime<Utc>,
}
