pub mod audit_repo;
pub mod bill_repo;
pub mod notification_repo;
pub mod payment_repo;
