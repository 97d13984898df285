pub mod audit;
pub mod bill;
pub mod error;
pub mod fees;
pub mod gateway;
pub mod id;
pub mod money;
pub mod notification;
pub mod payment;
