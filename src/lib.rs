//! minibank Library
//!
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod store;

pub use config::Config;
pub use domain::{Amount, AmountError, Balance, DomainError, Identity};
pub use error::{AppError, ErrorResponse};
