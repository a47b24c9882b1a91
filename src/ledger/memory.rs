use super::{FundsLedger, LedgerRejection};
use crate::{Account, AccountId, User};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Posted transfer
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub user_name: String,
    pub debit: AccountId,
    pub credit: AccountId,
    pub amount: Decimal,
    pub posted_at: DateTime<Utc>,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    history: Vec<LedgerEntry>,
}

/// In-memory funds ledger
///
/// Mirrors what the bank database does: both accounts must exist, the
/// balances move, a history entry is appended. Overdrafts are allowed.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger holding every account of the given users
    pub fn with_users(users: &[User]) -> Self {
        let accounts = users
            .iter()
            .flat_map(|user| user.accounts.iter().cloned())
            .map(|account| (account.id, account))
            .collect();
        Self {
            state: Arc::new(RwLock::new(LedgerState {
                accounts,
                history: Vec::new(),
            })),
        }
    }

    pub async fn open(&self, account: Account) {
        let mut state = self.state.write().await;
        state.accounts.insert(account.id, account);
    }

    pub async fn balance(&self, id: AccountId) -> Option<Decimal> {
        let state = self.state.read().await;
        state.accounts.get(&id).map(|account| account.balance)
    }

    pub async fn history(&self) -> Vec<LedgerEntry> {
        let state = self.state.read().await;
        state.history.clone()
    }
}

impl FundsLedger for InMemoryLedger {
    async fn transfer_funds(
        &self,
        user_name: &str,
        credit: AccountId,
        debit: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerRejection> {
        let mut state = self.state.write().await;

        if !state.accounts.contains_key(&debit) {
            return Err(LedgerRejection("Originating account is invalid".to_string()));
        }
        if !state.accounts.contains_key(&credit) {
            return Err(LedgerRejection("Destination account is invalid".to_string()));
        }

        if let Some(account) = state.accounts.get_mut(&debit) {
            account.balance -= amount;
        }
        if let Some(account) = state.accounts.get_mut(&credit) {
            account.balance += amount;
        }

        state.history.push(LedgerEntry {
            user_name: user_name.to_string(),
            debit,
            credit,
            amount,
            posted_at: Utc::now(),
        });
        debug!("Posted {} from {} to {} for {}", amount, debit, credit, user_name);

        Ok(())
    }
}
