//! Transfer Service Module
//!
//! This module handles fund transfers between accounts.
//! It resolves the debit account, checks the request and delegates the
//! balance mutation to the funds ledger.
//!
//! # Flow
//! 1. Read the account cookie (cookie account source only)
//! 2. Resolve the raw "from" identifier to a debit account id
//! 3. Check account ids and amount (destination and amount failures win over
//!    an unresolved debit account)
//! 4. Post through the ledger unless the amount is zero
//! 5. Report a single status message

use crate::{
    accounts::{decode_account_list, resolve_debit_account, AccountLookup, CookieError},
    config::{AccountSource, AccountsConfig},
    ledger::FundsLedger,
    Account, AccountId, RequestContext, TransferError,
};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Timestamp layout of success messages, e.g. `3/7/24, 4:05 PM`
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%y, %-I:%M %p";

/// Details of a transfer that went through
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub debit: AccountId,
    pub credit: AccountId,
    pub amount: Decimal,
    pub at: DateTime<Local>,
    /// False when there was nothing to move and the ledger was not called
    pub posted: bool,
}

/// Result of a transfer request
///
/// Displays as the status message shown to the user: either the success
/// sentence or `ERROR: <reason>`.
#[derive(Debug, Clone)]
pub enum TransferOutcome {
    Completed(TransferReceipt),
    Rejected(TransferError),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Completed(_))
    }

    /// Status message for the caller
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Completed(receipt) => write!(
                f,
                "{} was successfully transferred from Account {} into Account {} at {}.",
                receipt.amount,
                receipt.debit,
                receipt.credit,
                receipt.at.format(TIMESTAMP_FORMAT)
            ),
            TransferOutcome::Rejected(reason) => write!(f, "ERROR: {}", reason),
        }
    }
}

/// Check account ids and amount before anything is posted
///
/// Checks run in order and the first failure is reported:
/// destination, origin, then amount.
pub fn check_transfer(
    credit: AccountId,
    debit: AccountId,
    amount: Decimal,
) -> Result<(), TransferError> {
    if credit < 0 {
        return Err(TransferError::InvalidDestination);
    }
    if debit < 0 {
        return Err(TransferError::InvalidOrigin);
    }
    if amount < Decimal::ZERO {
        return Err(TransferError::InvalidAmount);
    }
    Ok(())
}

/// Transfer service
///
/// Stateless apart from the ledger handle and the account resolution settings;
/// every call works on its own request data.
pub struct TransferService<L> {
    ledger: L,
    accounts: AccountsConfig,
}

impl<L: FundsLedger> TransferService<L> {
    /// Creates a new transfer service
    ///
    /// # Arguments
    /// * `ledger` - Collaborator that moves the money
    /// * `accounts` - Account source and cookie name used to resolve debit accounts
    pub fn new(ledger: L, accounts: AccountsConfig) -> Self {
        Self { ledger, accounts }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Transfer on behalf of the request's user
    ///
    /// `from` is the raw debit account identifier from the request: a numeric
    /// id or an account name. Which accounts it may name depends on the
    /// configured account source.
    ///
    /// # Arguments
    /// * `ctx` - Authenticated user and request cookies
    /// * `credit` - Destination account id
    /// * `from` - Raw debit account identifier
    /// * `amount` - Amount to move
    pub async fn transfer_from_request(
        &self,
        ctx: &RequestContext,
        credit: AccountId,
        from: &str,
        amount: Decimal,
    ) -> TransferOutcome {
        debug!(
            "transfer_from_request({}, {}, '{}', {})",
            ctx.user.username, credit, from, amount
        );

        let cookie_accounts = match self.cookie_accounts(ctx) {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Unreadable account cookie from {}: {}", ctx.user.username, e);
                return report(TransferOutcome::Rejected(TransferError::UnreadableAccountCookie));
            }
        };

        let lookup = resolve_debit_account(
            self.accounts.source,
            &ctx.user.accounts,
            cookie_accounts.as_deref(),
            from,
        );

        let unresolved = match lookup {
            AccountLookup::Found(debit) => {
                return self.transfer(&ctx.user.username, credit, debit, amount).await;
            }
            AccountLookup::NotFound { identifier } => {
                TransferError::UnknownDebitAccount { identifier }
            }
            AccountLookup::Malformed { identifier } => {
                TransferError::MalformedDebitAccount { identifier }
            }
        };

        // An unresolved origin reads as id 0, so destination and amount still report first
        let reason = check_transfer(credit, 0, amount).err().unwrap_or(unresolved);
        report(TransferOutcome::Rejected(reason))
    }

    /// Transfer between two known account ids
    ///
    /// A zero amount succeeds without touching the ledger. Ledger rejections
    /// are reported with the ledger's own message.
    ///
    /// # Arguments
    /// * `user_name` - User the transfer is posted for
    /// * `credit` - Destination account id
    /// * `debit` - Originating account id
    /// * `amount` - Amount to move
    pub async fn transfer(
        &self,
        user_name: &str,
        credit: AccountId,
        debit: AccountId,
        amount: Decimal,
    ) -> TransferOutcome {
        debug!("transfer({}, {}, {}, {})", user_name, credit, debit, amount);

        let outcome = match self.post(user_name, credit, debit, amount).await {
            Ok(posted) => TransferOutcome::Completed(TransferReceipt {
                debit,
                credit,
                amount,
                at: Local::now(),
                posted,
            }),
            Err(reason) => TransferOutcome::Rejected(reason),
        };

        report(outcome)
    }

    async fn post(
        &self,
        user_name: &str,
        credit: AccountId,
        debit: AccountId,
        amount: Decimal,
    ) -> Result<bool, TransferError> {
        check_transfer(credit, debit, amount)?;

        if amount.is_zero() {
            return Ok(false);
        }

        self.ledger
            .transfer_funds(user_name, credit, debit, amount)
            .await
            .map_err(|rejection| TransferError::Ledger(rejection.0))?;
        Ok(true)
    }

    fn cookie_accounts(&self, ctx: &RequestContext) -> Result<Option<Vec<Account>>, CookieError> {
        if self.accounts.source != AccountSource::Cookie {
            return Ok(None);
        }

        ctx.cookie(&self.accounts.cookie_name)
            .map(|cookie| decode_account_list(&cookie.value))
            .transpose()
    }
}

fn report(outcome: TransferOutcome) -> TransferOutcome {
    match &outcome {
        TransferOutcome::Completed(_) => info!("{}", outcome),
        TransferOutcome::Rejected(_) => error!("{}", outcome),
    }
    outcome
}
