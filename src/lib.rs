//! This crate implements the transfer and feedback helpers of a teaching bank application.
//! It resolves the account a transfer debits, validates free-text input against whitelists,
//! and delegates balance changes and feedback storage to pluggable collaborators.

pub mod types; // Defines accounts, users, request context and the domain errors.
pub mod config; // Defines and loads configuration.
pub mod validation; // Whitelist sanitizers, output encoders and strict date validation.
pub mod accounts; // Debit account resolution and the account-list cookie codec.
pub mod ledger; // Funds ledger and feedback store collaborators.
pub mod operations; // Transfer and feedback services.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use operations::{FeedbackService, TransferOutcome, TransferService};
