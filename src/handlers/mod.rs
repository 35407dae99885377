//! Command Handlers module
//!
//! Handlers that orchestrate business operations. Each one validates its
//! preconditions against the caller's `Identity` and delegates persistence
//! to a `BankStore`.

mod admin_handler;
mod beneficiary_handler;
mod commands;
mod history_handler;
mod transfer_handler;
mod user_handler;


pub use admin_handler::AdminHandler;
pub use beneficiary_handler::BeneficiaryHandler;
pub use commands::*;
pub use history_handler::HistoryHandler;
pub use transfer_handler::TransferHandler;
pub use user_handler::{ensure_admin, LoginHandler, ProfileHandler, RegisterHandler};
