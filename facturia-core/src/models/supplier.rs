use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How recently a supplier has invoiced the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Active,
    LowActivity,
    Inactive,
}

/// Supplier with the aggregate figures the backend computes for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Operator rating, 1 to 5
    #[serde(default)]
    pub rating: Option<u8>,
    pub total_invoices: i64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub last_invoice_date: Option<NaiveDate>,
    pub activity_status: ActivityStatus,
}

/// Supplier update request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Supplier {
    pub fn apply(&mut self, changes: &SupplierChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(tax_id) = &changes.tax_id {
            self.tax_id = Some(tax_id.clone());
        }
        if let Some(phone) = &changes.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(email) = &changes.email {
            self.email = Some(email.clone());
        }
        if let Some(rating) = changes.rating {
            self.rating = Some(rating);
        }
    }
}
