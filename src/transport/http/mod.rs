pub mod auth;
pub mod errors;
pub mod payments;
pub mod webhook;
