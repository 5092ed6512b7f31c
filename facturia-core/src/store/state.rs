use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::SortOrder;
use crate::models::{DashboardData, Invoice, InvoiceStatus, QueuedNotification, Supplier, User};

/// Remote collections that have their own loading flag and error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Invoices,
    Suppliers,
    Dashboard,
}

/// One value per [`Resource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerResource<T> {
    pub invoices: T,
    pub suppliers: T,
    pub dashboard: T,
}

impl<T> PerResource<T> {
    pub fn get(&self, resource: Resource) -> &T {
        match resource {
            Resource::Invoices => &self.invoices,
            Resource::Suppliers => &self.suppliers,
            Resource::Dashboard => &self.dashboard,
        }
    }

    pub fn set(&mut self, resource: Resource, value: T) {
        match resource {
            Resource::Invoices => self.invoices = value,
            Resource::Suppliers => self.suppliers = value,
            Resource::Dashboard => self.dashboard = value,
        }
    }
}

/// Status filter of the invoice list; `all` disables it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Confirmed,
    Paid,
}

impl StatusFilter {
    pub fn as_status(&self) -> Option<InvoiceStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(InvoiceStatus::Pending),
            StatusFilter::Confirmed => Some(InvoiceStatus::Confirmed),
            StatusFilter::Paid => Some(InvoiceStatus::Paid),
        }
    }

    pub fn matches(&self, status: InvoiceStatus) -> bool {
        self.as_status().map_or(true, |s| s == status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFilters {
    pub status: StatusFilter,
    pub supplier: String,
    pub category: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search_term: String,
}

/// Partial update of [`InvoiceFilters`]; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFilterPatch {
    #[serde(default)]
    pub status: Option<StatusFilter>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl InvoiceFilters {
    pub fn merge(&mut self, patch: InvoiceFilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(date_from) = patch.date_from {
            self.date_from = Some(date_from);
        }
        if let Some(date_to) = patch.date_to {
            self.date_to = Some(date_to);
        }
        if let Some(search_term) = patch.search_term {
            self.search_term = search_term;
        }
    }

    /// Whether `invoice` passes every active filter.
    ///
    /// The search term matches supplier name, description or category,
    /// ignoring case.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if !self.status.matches(invoice.status) {
            return false;
        }
        if !self.supplier.is_empty() && !contains_ci(&invoice.supplier_name, &self.supplier) {
            return false;
        }
        if !self.category.is_empty()
            && !invoice
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(&self.category))
        {
            return false;
        }
        if self.date_from.is_some_and(|from| invoice.invoice_date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| invoice.invoice_date > to) {
            return false;
        }
        if self.search_term.is_empty() {
            return true;
        }
        contains_ci(&invoice.supplier_name, &self.search_term)
            || invoice
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, &self.search_term))
            || invoice
                .category
                .as_deref()
                .is_some_and(|c| contains_ci(c, &self.search_term))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierFilters {
    pub search_term: String,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for SupplierFilters {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_by: "total_amount".to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierFilterPatch {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}

impl SupplierFilters {
    pub fn merge(&mut self, patch: SupplierFilterPatch) {
        if let Some(search_term) = patch.search_term {
            self.search_term = search_term;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }
}

/// Counters shown under the invoice table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub count: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub paid: usize,
    /// Sum of amounts, regardless of currency
    pub total_amount: Decimal,
}

impl InvoiceSummary {
    pub fn of<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Self {
        invoices.into_iter().fold(Self::default(), |mut acc, inv| {
            acc.count += 1;
            match inv.status {
                InvoiceStatus::Pending => acc.pending += 1,
                InvoiceStatus::Confirmed => acc.confirmed += 1,
                InvoiceStatus::Paid => acc.paid += 1,
            }
            acc.total_amount += inv.amount;
            acc
        })
    }
}

/// Everything the dashboard keeps between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub user: Option<User>,
    pub is_authenticated: bool,

    pub invoices: Vec<Invoice>,
    pub suppliers: Vec<Supplier>,
    pub dashboard: Option<DashboardData>,

    /// Newest first
    pub notifications: Vec<QueuedNotification>,

    pub invoice_filters: InvoiceFilters,
    pub supplier_filters: SupplierFilters,

    pub loading: PerResource<bool>,
    pub errors: PerResource<Option<String>>,
}

impl DashboardState {
    pub fn invoice(&self, id: i64) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.id == id)
    }

    /// Cached invoices that pass the current filters, in cache order.
    pub fn filtered_invoices(&self) -> Vec<&Invoice> {
        self.invoices
            .iter()
            .filter(|inv| self.invoice_filters.matches(inv))
            .collect()
    }
}
