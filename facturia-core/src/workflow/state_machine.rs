use serde::{Deserialize, Serialize};

use crate::models::InvoiceStatus;

/// Trait for the quick-action progression of invoice statuses.
///
/// The picker lets the operator jump to any status; only the one-click
/// suggestion follows a progression.
pub trait Progression {
    /// Next status to suggest, or `None` when there is nothing to suggest.
    fn next(current: InvoiceStatus) -> Option<InvoiceStatus>;

    /// Status a newly created invoice starts in.
    fn initial() -> InvoiceStatus {
        InvoiceStatus::Pending
    }
}

/// Canonical forward progression:
/// - Pending -> Confirmed
/// - Confirmed -> Paid
/// - Paid -> none (terminal for the quick action)
pub struct ForwardProgression;

impl Progression for ForwardProgression {
    fn next(current: InvoiceStatus) -> Option<InvoiceStatus> {
        match current {
            InvoiceStatus::Pending => Some(InvoiceStatus::Confirmed),
            InvoiceStatus::Confirmed => Some(InvoiceStatus::Paid),
            InvoiceStatus::Paid => None,
        }
    }
}

/// One-click shortcut to the next status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub target: InvoiceStatus,
    /// Button text, e.g. `Mark as Confirmed`
    pub label: String,
}

/// Suggested quick action for an invoice currently in `current`.
pub fn suggestion(current: InvoiceStatus) -> Option<QuickAction> {
    ForwardProgression::next(current).map(|target| QuickAction {
        target,
        label: format!("Mark as {}", target.label()),
    })
}

/// A row of the status picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    pub value: InvoiceStatus,
    pub label: String,
    pub description: String,
    /// Current status; shown but not selectable
    pub is_current: bool,
}

/// All three statuses, in workflow order, flagged against `current`.
pub fn status_options(current: InvoiceStatus) -> Vec<StatusOption> {
    InvoiceStatus::ALL
        .iter()
        .map(|&value| StatusOption {
            value,
            label: value.label().to_string(),
            description: value.description().to_string(),
            is_current: value == current,
        })
        .collect()
}
