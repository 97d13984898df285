pub mod notifier;
pub mod reconciliation;
