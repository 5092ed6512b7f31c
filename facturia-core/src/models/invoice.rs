use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invoice status enumeration.
///
/// Serialized in lowercase (`pending`, `confirmed`, `paid`), which is the
/// representation the backend accepts on `PATCH /invoices/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Confirmed,
    Paid,
}

impl InvoiceStatus {
    /// Every status, in canonical workflow order.
    pub const ALL: [InvoiceStatus; 3] = [
        InvoiceStatus::Pending,
        InvoiceStatus::Confirmed,
        InvoiceStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Confirmed => "confirmed",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Confirmed => "Confirmed",
            InvoiceStatus::Paid => "Paid",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "The invoice is awaiting confirmation",
            InvoiceStatus::Confirmed => "The invoice has been confirmed and is ready for payment",
            InvoiceStatus::Paid => "The invoice has been paid in full",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invoice status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "confirmed" => Ok(InvoiceStatus::Confirmed),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Invoice model as returned by the remote backend.
///
/// The dashboard never persists invoices itself; this is the cached copy
/// held in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Backend identifier
    pub id: i64,

    /// Phone number identifying the owning company
    pub company_phone: String,

    /// Supplier name as printed on the invoice
    pub supplier_name: String,

    /// Invoice amount
    pub amount: Decimal,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// Date the invoice was issued
    pub invoice_date: NaiveDate,

    /// Due date for payment
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Supplier tax identifier
    #[serde(default)]
    pub tax_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Workflow status
    pub status: InvoiceStatus,

    pub created_at: DateTime<Utc>,

    /// Set when the invoice moves to `confirmed`
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,

    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Amount with two decimals followed by the currency code, e.g. `1250.00 EUR`.
    pub fn formatted_amount(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }

    /// Merges a partial update into this invoice. Absent fields are left alone.
    pub fn apply(&mut self, changes: &InvoiceChanges) {
        if let Some(supplier_name) = &changes.supplier_name {
            self.supplier_name = supplier_name.clone();
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(currency) = &changes.currency {
            self.currency = currency.clone();
        }
        if let Some(invoice_date) = changes.invoice_date {
            self.invoice_date = invoice_date;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(tax_id) = &changes.tax_id {
            self.tax_id = Some(tax_id.clone());
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(category) = &changes.category {
            self.category = Some(category.clone());
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(confirmed_at) = changes.confirmed_at {
            self.confirmed_at = Some(confirmed_at);
        }
        if let Some(updated_at) = changes.updated_at {
            self.updated_at = updated_at;
        }
    }
}

/// Invoice creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub company_phone: String,
    pub supplier_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub invoice_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
}

/// Partial invoice update. Only fields that are `Some` are sent and applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoiceChanges {
    /// Changes recorded locally after a successful status update.
    ///
    /// `confirmed_at` is stamped only when moving to `confirmed`.
    pub fn status_change(status: InvoiceStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            updated_at: Some(at),
            confirmed_at: (status == InvoiceStatus::Confirmed).then_some(at),
            ..Self::default()
        }
    }
}

impl From<Invoice> for InvoiceChanges {
    fn from(invoice: Invoice) -> Self {
        InvoiceChanges {
            supplier_name: Some(invoice.supplier_name),
            amount: Some(invoice.amount),
            currency: Some(invoice.currency),
            invoice_date: Some(invoice.invoice_date),
            due_date: invoice.due_date,
            tax_id: invoice.tax_id,
            description: invoice.description,
            category: invoice.category,
            status: Some(invoice.status),
            confirmed_at: invoice.confirmed_at,
            updated_at: Some(invoice.updated_at),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::invoice;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(json!(InvoiceStatus::Confirmed), json!("confirmed"));
        let parsed: InvoiceStatus = serde_json::from_value(json!("paid")).unwrap();
        assert_eq!(parsed, InvoiceStatus::Paid);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_value::<InvoiceStatus>(json!("overdue")).is_err());
        assert_eq!(
            "draft".parse::<InvoiceStatus>(),
            Err(UnknownStatus("draft".to_string()))
        );
    }

    #[test]
    fn test_formatted_amount() {
        assert_eq!(invoice(1, InvoiceStatus::Pending).formatted_amount(), "1250.50 EUR");
    }

    #[test]
    fn test_status_change_stamps_confirmed_at_only_for_confirmed() {
        let at = Utc::now();
        let confirmed = InvoiceChanges::status_change(InvoiceStatus::Confirmed, at);
        assert_eq!(confirmed.confirmed_at, Some(at));

        let paid = InvoiceChanges::status_change(InvoiceStatus::Paid, at);
        assert_eq!(paid.confirmed_at, None);
        assert_eq!(paid.updated_at, Some(at));
    }

    #[test]
    fn test_apply_merges_present_fields_only() {
        let mut inv = invoice(7, InvoiceStatus::Pending);
        let changes = InvoiceChanges {
            category: Some("services".to_string()),
            ..InvoiceChanges::default()
        };
        inv.apply(&changes);

        assert_eq!(inv.category.as_deref(), Some("services"));
        assert_eq!(inv.supplier_name, "Acme Supplies");
        assert_eq!(inv.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_deserialize_backend_invoice() {
        let value = json!({
            "id": 12,
            "company_phone": "+34600000000",
            "supplier_name": "Papeleria Sol",
            "amount": 89.9,
            "currency": "EUR",
            "invoice_date": "2024-02-10",
            "status": "pending",
            "created_at": "2024-02-10T10:00:00Z",
            "updated_at": "2024-02-10T10:00:00Z"
        });
        let inv: Invoice = serde_json::from_value(value).unwrap();
        assert_eq!(inv.id, 12);
        assert_eq!(inv.status, InvoiceStatus::Pending);
        assert!(inv.due_date.is_none());
        assert!(inv.confirmed_at.is_none());
    }
}
