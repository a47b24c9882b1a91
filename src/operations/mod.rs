//! Bank Operations Module
//!
//! This module implements the request-level operations:
//! - `TransferService`: resolves the debit account, validates and posts transfers
//! - `FeedbackService`: validates, escapes and stores feedback submissions

mod transfer;
mod feedback;

#[cfg(test)]
mod tests;

pub use transfer::{TransferOutcome, TransferReceipt, TransferService, check_transfer};
pub use feedback::{FeedbackError, FeedbackService};
