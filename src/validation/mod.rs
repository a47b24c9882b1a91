//! Input Validation Module
//!
//! This module checks free-text input before it reaches storage or display:
//! - Whitelist sanitizers for names, email addresses and free text
//! - HTML and SQL escaping helpers
//! - Strict date validation against a date pattern

mod sanitizer;
mod encoder;
mod date;


pub use sanitizer::{is_blank, sanitize_email, sanitize_name, validate_text};
pub use encoder::{encode_for_html, escape_sql};
pub use date::{DatePattern, DatePatternError, validate_date};
