//! Account List Cookie Codec
//!
//! Wire format: standard base64 over `id~name~balance|id~name~balance|...`.
//! Nothing in the payload is signed, so whatever the client sends decodes.

use crate::{Account, AccountId};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rust_decimal::Decimal;
use thiserror::Error;

const ENTRY_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = '~';

/// Errors decoding an account list cookie
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("cookie payload is not UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
    #[error("account entry '{0}' does not have id, name and balance")]
    MalformedEntry(String),
    #[error("account id '{0}' is not a number")]
    InvalidId(String),
    #[error("balance '{0}' is not a decimal amount")]
    InvalidBalance(String),
}

/// Encode accounts into a cookie value
///
/// Account names must not contain `~` or `|`.
pub fn encode_account_list(accounts: &[Account]) -> String {
    let payload: String = accounts
        .iter()
        .map(|account| {
            format!(
                "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{ENTRY_SEPARATOR}",
                account.id, account.name, account.balance
            )
        })
        .collect();
    STANDARD.encode(payload)
}

/// Decode a cookie value into accounts
///
/// Decoded accounts carry no owner: the client is the only source for them.
pub fn decode_account_list(value: &str) -> Result<Vec<Account>, CookieError> {
    let bytes = STANDARD.decode(value.trim())?;
    let payload = String::from_utf8(bytes)?;

    payload
        .split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(decode_entry)
        .collect()
}

fn decode_entry(entry: &str) -> Result<Account, CookieError> {
    let mut fields = entry.split(FIELD_SEPARATOR);
    let (Some(id), Some(name), Some(balance), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CookieError::MalformedEntry(entry.to_string()));
    };

    let id: AccountId = id
        .trim()
        .parse()
        .map_err(|_| CookieError::InvalidId(id.to_string()))?;
    let balance: Decimal = balance
        .trim()
        .parse()
        .map_err(|_| CookieError::InvalidBalance(balance.to_string()))?;

    Ok(Account::new(id, name, balance))
}
