pub mod analytics;
pub mod invoice;
pub mod notification;
pub mod supplier;
pub mod user;

pub use analytics::DashboardData;
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use notification::{Notification, NotificationKind, QueuedNotification};
pub use supplier::{ActivityStatus, Supplier, SupplierChanges};
pub use user::{Role, User};
