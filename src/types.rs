use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Account identifier as used by the ledger and by request parameters.
///
/// Signed so that out-of-range request values (e.g. `-1`) can be represented
/// and rejected by validation instead of failing to parse.
pub type AccountId = i64;

/// Bank account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance: Decimal,
    /// Owning user, `None` when the account was decoded from client-supplied data
    #[serde(default)]
    pub owner: Option<String>,
}

impl Account {
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            owner: None,
        }
    }

    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// Authenticated user and the accounts the session says it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Raw request cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Per-request view of the outside world
///
/// Bundles what the session collaborator knows (the authenticated user) with
/// what the client sent (cookies). Nothing here is shared between requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: User,
    pub cookies: Vec<Cookie>,
}

impl RequestContext {
    pub fn new(user: User) -> Self {
        Self {
            user,
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(Cookie {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// First cookie with the given name, if the client sent one
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|cookie| cookie.name == name)
    }
}

/// Transfer as submitted by a client
///
/// `from` is kept raw: it may hold either a numeric account id or an account name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: AccountId,
    pub amount: Decimal,
}

/// Feedback submission handed to the feedback store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub comments: String,
}

/// Free-text field checked by a whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Text,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::Text => write!(f, "text"),
        }
    }
}

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid {field}: input is blank")]
    Blank { field: Field },
    #[error("Invalid {field}: input contains characters that are not allowed")]
    Rejected { field: Field },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Blank { field } | ValidationError::Rejected { field } => *field,
        }
    }
}

/// Reasons a transfer did not go through
///
/// The `Display` text is the reason part of the `ERROR: ...` status message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Destination account is invalid")]
    InvalidDestination,
    #[error("Originating account is invalid")]
    InvalidOrigin,
    #[error("Transfer amount is invalid")]
    InvalidAmount,
    #[error("Originating account {identifier} was not found")]
    UnknownDebitAccount { identifier: String },
    #[error("Originating account identifier '{identifier}' is malformed")]
    MalformedDebitAccount { identifier: String },
    #[error("Account cookie could not be read")]
    UnreadableAccountCookie,
    /// Message reported by the funds ledger
    #[error("{0}")]
    Ledger(String),
}
