//! Debit Account Resolver
//!
//! Turns the raw "from account" string of a transfer into an account id.
//! The string may be a numeric id or an account name; which accounts it is
//! checked against depends on the configured `AccountSource`.

use crate::{Account, AccountId, config::AccountSource, validation::is_blank};
use tracing::{debug, warn};

/// Outcome of resolving a debit account identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    /// The identifier names one of the candidate accounts
    Found(AccountId),
    /// A well-formed id or name that no candidate account carries
    NotFound { identifier: String },
    /// Blank, or numeric-looking but not a positive account id
    Malformed { identifier: String },
}

impl AccountLookup {
    /// Legacy reading where `0` stands for "no account"
    pub fn id_or_zero(&self) -> AccountId {
        match self {
            AccountLookup::Found(id) => *id,
            _ => 0,
        }
    }
}

/// Accounts a debit identifier is checked against
///
/// In `Cookie` mode a decoded cookie replaces the user's accounts entirely.
pub fn candidate_accounts<'a>(
    source: AccountSource,
    user_accounts: &'a [Account],
    cookie_accounts: Option<&'a [Account]>,
) -> &'a [Account] {
    match (source, cookie_accounts) {
        (AccountSource::Cookie, Some(cookie_accounts)) => cookie_accounts,
        _ => user_accounts,
    }
}

/// Resolve the debit account of a transfer
///
/// # Arguments
/// * `source` - Whether a client-supplied cookie may stand in for the user's accounts
/// * `user_accounts` - Accounts the authenticated session says the user owns
/// * `cookie_accounts` - Accounts decoded from the request cookie, if any
/// * `identifier` - Raw identifier: a positive numeric id or an account name
///
/// # Returns
/// The resolved id, or why nothing was resolved
pub fn resolve_debit_account(
    source: AccountSource,
    user_accounts: &[Account],
    cookie_accounts: Option<&[Account]>,
    identifier: &str,
) -> AccountLookup {
    if let Some(cookie_accounts) = cookie_accounts {
        match source {
            AccountSource::Cookie => {
                for account in cookie_accounts {
                    if !user_accounts.iter().any(|owned| owned.id == account.id) {
                        warn!(
                            "Account cookie lists account {} that the session does not grant",
                            account.id
                        );
                    }
                }
            }
            AccountSource::Session => debug!("Ignoring account cookie, accounts come from the session"),
        }
    }

    let candidates = candidate_accounts(source, user_accounts, cookie_accounts);
    lookup_account(candidates, identifier)
}

/// Look an identifier up in a list of accounts
///
/// A positive number is matched by id only. Anything else is matched against
/// account names, ignoring case.
pub fn lookup_account(candidates: &[Account], identifier: &str) -> AccountLookup {
    match identifier.parse::<AccountId>() {
        Ok(id) if id > 0 => {
            return match candidates.iter().find(|account| account.id == id) {
                Some(account) => AccountLookup::Found(account.id),
                None => AccountLookup::NotFound {
                    identifier: identifier.to_string(),
                },
            };
        }
        Ok(id) => debug!("Account id {} is not positive, trying name match", id),
        Err(e) => warn!(
            "Account identifier '{}' is not an id ({}), trying name match",
            identifier, e
        ),
    }

    if let Some(account) = candidates
        .iter()
        .find(|account| names_match(&account.name, identifier))
    {
        return AccountLookup::Found(account.id);
    }

    let identifier = identifier.to_string();
    if is_blank(&identifier) || looks_numeric(&identifier) {
        AccountLookup::Malformed { identifier }
    } else {
        AccountLookup::NotFound { identifier }
    }
}

fn names_match(name: &str, identifier: &str) -> bool {
    name.to_lowercase() == identifier.to_lowercase()
}

fn looks_numeric(identifier: &str) -> bool {
    let digits = identifier.strip_prefix(['+', '-']).unwrap_or(identifier);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
