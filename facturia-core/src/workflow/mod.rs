pub mod changer;
pub mod error;
pub mod state_machine;

#[cfg(test)]
mod tests;

pub use changer::{StatusChanger, TransitionDialog, TransitionOutcome};
pub use error::WorkflowError;
pub use state_machine::{status_options, suggestion, ForwardProgression, Progression, QuickAction, StatusOption};
