//! Configuration Module
//!
//! This module defines all configuration structures for the bank operations helper.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::{Account, User};
use serde::Deserialize;
use std::fs;

/// Default name of the cookie carrying a client-side account list
pub const DEFAULT_ACCOUNT_COOKIE: &str = "NotSecureBankAccounts";

/// Main configuration structure
///
/// Contains all configuration sections.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [accounts]
/// source = "session"
/// cookie_name = "NotSecureBankAccounts"
///
/// [validation]
/// date_format = "yyyy-MM-dd"
///
/// [logging]
/// filter = "info"
///
/// [[users]]
/// username = "jsmith"
/// [[users.accounts]]
/// id = 800002
/// name = "Savings"
/// balance = "1000.00"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Users and accounts seeded into the in-memory ledger
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

/// Where the debit account of a transfer is looked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountSource {
    /// Only the authenticated user's own accounts
    #[default]
    Session,
    /// A client-supplied account cookie replaces the user's accounts when present.
    /// This is the insecure teaching mode: the cookie is not checked against ownership.
    Cookie,
}

/// Account resolution configuration
///
/// # Fields
/// - `source`: `"session"` (default) or `"cookie"`
/// - `cookie_name`: name of the cookie holding the encoded account list
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    #[serde(default)]
    pub source: AccountSource,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            source: AccountSource::default(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_cookie_name() -> String {
    DEFAULT_ACCOUNT_COOKIE.to_string()
}

/// Input validation configuration
///
/// # Fields
/// - `date_format`: date pattern used when a command does not name one
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

fn default_date_format() -> String {
    "yyyy-MM-dd".to_string()
}

/// Logging configuration
///
/// `filter` uses `tracing_subscriber::EnvFilter` directive syntax
/// (e.g. `"info"` or `"bank_operations=debug"`). `RUST_LOG` wins when set.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Seed user
#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub username: String,
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

/// Seed account owned by the enclosing user
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSeed {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub balance: rust_decimal::Decimal,
}

impl UserSeed {
    /// Build the session-side `User` for this seed, with ownership filled in
    pub fn to_user(&self) -> User {
        let accounts = self
            .accounts
            .iter()
            .map(|seed| Account::new(seed.id, seed.name.clone(), seed.balance).owned_by(&self.username))
            .collect();
        User {
            username: self.username.clone(),
            accounts,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    ///
    /// # Example
    /// ```no_run
    /// # use bank_operations::Config;
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: &str) -> anyhow::Result<Self> {
        // Read the file contents as a string
        let content = fs::read_to_string(path)?;

        // Parse the TOML into our Config structure
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Session-side users built from the seed section
    pub fn seeded_users(&self) -> Vec<User> {
        self.users.iter().map(UserSeed::to_user).collect()
    }
}
