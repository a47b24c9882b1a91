//! Ledger Collaborators Module
//!
//! This module defines the external collaborators the operations delegate to:
//! - `FundsLedger`: moves money between accounts
//! - `FeedbackStore`: persists feedback submissions
//!
//! Both come with in-memory implementations used by the binary and the tests.
//! Real deployments put a database behind the same traits.

mod memory;
mod feedback_store;

pub use memory::{InMemoryLedger, LedgerEntry};
pub use feedback_store::InMemoryFeedbackStore;

use crate::{AccountId, FeedbackRecord};
use rust_decimal::Decimal;
use thiserror::Error;

/// A transfer the ledger refused, with the message to show the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LedgerRejection(pub String);

/// Feedback store failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("feedback store is unavailable: {0}")]
    Unavailable(String),
}

/// Balance mutation collaborator
#[allow(async_fn_in_trait)]
pub trait FundsLedger {
    /// Move `amount` from `debit` to `credit` on behalf of `user_name`
    ///
    /// # Returns
    /// * `Ok(())` once the balances have moved
    /// * `Err(LedgerRejection)` carrying the reason otherwise
    async fn transfer_funds(
        &self,
        user_name: &str,
        credit: AccountId,
        debit: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerRejection>;
}

/// Feedback persistence collaborator
#[allow(async_fn_in_trait)]
pub trait FeedbackStore {
    /// Persist a feedback record and return its assigned id
    async fn store_feedback(&self, record: FeedbackRecord) -> Result<i64, StoreError>;
}
