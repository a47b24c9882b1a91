//! Account Resolution Module
//!
//! This module decides which account a transfer debits:
//! - Decodes the client-side account list carried in a cookie
//! - Picks the candidate accounts according to the configured `AccountSource`
//! - Resolves a raw identifier (numeric id or account name) against them

mod cookie;
mod resolver;


pub use cookie::{CookieError, decode_account_list, encode_account_list};
pub use resolver::{AccountLookup, candidate_accounts, lookup_account, resolve_debit_account};
