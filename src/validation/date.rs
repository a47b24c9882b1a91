//! Strict Date Validation
//!
//! Date patterns use the familiar letter notation (`yyyy-MM-dd`, `dd/MM/yy HH:mm`)
//! and are compiled into chrono strftime items. Parsing is strict about
//! values: every field must be in range and the resulting calendar date must
//! exist. Like a prefix parser, input left over after the pattern is ignored.
//!
//! # Supported Letters
//! - `y`: year (`yy` two-digit, any other run length full year)
//! - `M`: month (`M`/`MM` numeric, `MMM` short name, `MMMM` full name)
//! - `d`: day of month
//! - `H`: hour 0-23, `h`: hour 1-12, `a`: AM/PM marker
//! - `m`: minute, `s`: second
//!
//! Text between single quotes is literal; `''` is a literal quote.
//! Any other letter (`E`, `S`, `k`, `K`, `D`, `z`, `Z`, ...) makes the pattern
//! unsupported.

use super::sanitizer::is_blank;
use chrono::format::{parse_and_remainder, ParseResult, Parsed, StrftimeItems};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors compiling a date pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatePatternError {
    #[error("unsupported pattern letter '{0}'")]
    UnsupportedLetter(char),
    #[error("unterminated quoted literal in date pattern")]
    UnterminatedQuote,
}

/// Which fields a pattern mentions
#[derive(Debug, Clone, Copy, Default)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour24: bool,
    hour12: bool,
    am_pm: bool,
    minute: bool,
    second: bool,
}

impl Fields {
    fn has_date(&self) -> bool {
        self.year || self.month || self.day
    }

    fn has_time(&self) -> bool {
        self.hour24 || self.hour12 || self.am_pm || self.minute || self.second
    }
}

/// A date pattern compiled to a chrono format string
#[derive(Debug, Clone)]
pub struct DatePattern {
    format: String,
    fields: Fields,
}

impl DatePattern {
    /// Compile a letter-based date pattern
    ///
    /// # Returns
    /// * `Err(DatePatternError)` for letters outside the supported set or an unclosed quote
    pub fn compile(pattern: &str) -> Result<Self, DatePatternError> {
        let mut format = String::with_capacity(pattern.len() * 2);
        let mut fields = Fields::default();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                read_quoted(&mut chars, &mut format)?;
                continue;
            }

            if !c.is_ascii_alphabetic() {
                push_literal(&mut format, c);
                continue;
            }

            // Letters repeat to select a width or a textual form
            let mut run = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                run += 1;
            }

            let item = match c {
                'y' => {
                    fields.year = true;
                    if run == 2 { "%y" } else { "%Y" }
                }
                'M' => {
                    fields.month = true;
                    match run {
                        1 | 2 => "%m",
                        3 => "%b",
                        _ => "%B",
                    }
                }
                'd' => {
                    fields.day = true;
                    "%d"
                }
                'H' => {
                    fields.hour24 = true;
                    "%H"
                }
                'h' => {
                    fields.hour12 = true;
                    "%I"
                }
                'a' => {
                    fields.am_pm = true;
                    "%p"
                }
                'm' => {
                    fields.minute = true;
                    "%M"
                }
                's' => {
                    fields.second = true;
                    "%S"
                }
                other => return Err(DatePatternError::UnsupportedLetter(other)),
            };
            format.push_str(item);
        }

        Ok(Self { format, fields })
    }

    /// The chrono strftime format this pattern compiled to
    pub fn format(&self) -> &str {
        &self.format
    }

    /// True if `input` starts with a real date/time written in this pattern
    pub fn matches(&self, input: &str) -> bool {
        self.check(input).is_ok()
    }

    fn check(&self, input: &str) -> ParseResult<()> {
        let mut parsed = Parsed::new();
        let rest = parse_and_remainder(&mut parsed, input, StrftimeItems::new(&self.format))?;
        if !rest.is_empty() {
            debug!("Ignoring '{}' after the date", rest);
        }

        let fields = self.fields;
        if fields.has_date() {
            // Fill in what the pattern leaves out, then let chrono check the calendar
            if !fields.year {
                parsed.set_year(1970)?;
            }
            if !fields.month {
                parsed.set_month(1)?;
            }
            if !fields.day {
                parsed.set_day(1)?;
            }
            parsed.to_naive_date()?;
        }

        if fields.has_time() {
            if !fields.hour24 {
                if !fields.hour12 {
                    parsed.set_hour12(12)?;
                }
                if !fields.am_pm {
                    parsed.set_ampm(false)?;
                }
            }
            if !fields.minute {
                parsed.set_minute(0)?;
            }
            if !fields.second {
                parsed.set_second(0)?;
            }
            parsed.to_naive_time()?;
        }

        Ok(())
    }
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, format: &mut String) -> Result<(), DatePatternError> {
    // '' outside a quoted section is a single literal quote
    if chars.peek() == Some(&'\'') {
        chars.next();
        format.push('\'');
        return Ok(());
    }

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                format.push('\'');
                continue;
            }
            return Ok(());
        }
        push_literal(format, c);
    }

    Err(DatePatternError::UnterminatedQuote)
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

/// Validate a date string against a date pattern
///
/// Fails closed: blank input, an unsupported pattern, or any parse error
/// yields `false`.
///
/// ```
/// use bank_operations::validation::validate_date;
/// assert!(validate_date("2024-02-29", "yyyy-MM-dd"));
/// assert!(!validate_date("2023-02-29", "yyyy-MM-dd"));
/// ```
pub fn validate_date(input: &str, pattern: &str) -> bool {
    if is_blank(input) {
        return false;
    }

    match DatePattern::compile(pattern) {
        Ok(compiled) => compiled.matches(input),
        Err(e) => {
            warn!("Cannot validate date against pattern '{}': {}", pattern, e);
            false
        }
    }
}
