//! Whitelist Sanitizers
//!
//! Each sanitizer rejects blank input, matches the untrimmed input against a
//! fixed whitelist, and returns the trimmed input HTML-encoded.
//!
//! `\s` in the whitelists below means ASCII whitespace only
//! (space, tab, LF, VT, FF, CR).

use super::encoder::encode_for_html;
use crate::{Field, ValidationError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const NAME_PATTERN: &str = r"^[a-zA-Z \t\n\x0B\x0C\r'-]+$";
const EMAIL_PATTERN: &str =
    r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,7}$";
const TEXT_PATTERN: &str = r"^[a-zA-Z0-9.,!? \t\n\x0B\x0C\r'-]+$";

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static TEXT_RE: OnceLock<Regex> = OnceLock::new();

fn whitelist(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("whitelist regex {pattern} failed to compile: {error}"))
    })
}

/// True for empty or whitespace-only input
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Sanitize a person's name
///
/// Letters, ASCII whitespace, apostrophes and hyphens only.
///
/// ```
/// use bank_operations::validation::sanitize_name;
/// assert_eq!(sanitize_name("  Ada Lovelace ").unwrap(), "Ada Lovelace");
/// assert!(sanitize_name("Robert'); DROP TABLE").is_err());
/// ```
pub fn sanitize_name(input: &str) -> Result<String, ValidationError> {
    sanitize(input, Field::Name, whitelist(&NAME_RE, NAME_PATTERN))
}

/// Sanitize an email address
pub fn sanitize_email(input: &str) -> Result<String, ValidationError> {
    sanitize(input, Field::Email, whitelist(&EMAIL_RE, EMAIL_PATTERN))
}

/// Validate free text such as a subject line or a comment
///
/// Letters, digits, ASCII whitespace and `. , ! ? ' -` only.
pub fn validate_text(input: &str) -> Result<String, ValidationError> {
    sanitize(input, Field::Text, whitelist(&TEXT_RE, TEXT_PATTERN))
}

fn sanitize(input: &str, field: Field, pattern: &Regex) -> Result<String, ValidationError> {
    if is_blank(input) {
        return Err(ValidationError::Blank { field });
    }

    if !pattern.is_match(input) {
        debug!("Rejected {} input of {} chars", field, input.chars().count());
        return Err(ValidationError::Rejected { field });
    }

    Ok(encode_for_html(input.trim()))
}
