//! Output Encoders
//!
//! HTML encoding for values echoed back into pages, and quote doubling for
//! values embedded into SQL string literals by the storage collaborator.

/// Characters written through unchanged regardless of class
const IMMUNE: [char; 5] = [',', '.', '-', '_', ' '];

/// Encode a string for safe inclusion in HTML element content
///
/// Alphanumerics below U+00FF and `, . - _ space` pass through. Control
/// characters that are illegal in HTML become `&#xfffd;`. Everything else is
/// written as a named entity when one is known, otherwise as a hex entity.
///
/// ```
/// use bank_operations::validation::encode_for_html;
/// assert_eq!(encode_for_html("O'Neil <b>"), "O&#x27;Neil &lt;b&gt;");
/// ```
pub fn encode_for_html(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for c in input.chars() {
        push_encoded(&mut encoded, c);
    }
    encoded
}

fn push_encoded(out: &mut String, c: char) {
    if IMMUNE.contains(&c) || passes_through(c) {
        out.push(c);
        return;
    }

    if is_illegal_in_html(c) {
        out.push_str("&#xfffd;");
        return;
    }

    match named_entity(c) {
        Some(name) => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        }
        None => out.push_str(&format!("&#x{:x};", u32::from(c))),
    }
}

fn passes_through(c: char) -> bool {
    u32::from(c) < 0xFF && (c.is_alphabetic() || c.is_ascii_digit())
}

fn is_illegal_in_html(c: char) -> bool {
    (c <= '\u{1f}' && !matches!(c, '\t' | '\n' | '\r')) || ('\u{7f}'..='\u{9f}').contains(&c)
}

fn named_entity(c: char) -> Option<&'static str> {
    let name = match c {
        '&' => "amp",
        '<' => "lt",
        '>' => "gt",
        '"' => "quot",
        '\u{a0}' => "nbsp",
        '\u{a2}' => "cent",
        '\u{a3}' => "pound",
        '\u{a5}' => "yen",
        '\u{a7}' => "sect",
        '\u{a9}' => "copy",
        '\u{ae}' => "reg",
        '\u{b0}' => "deg",
        '\u{b1}' => "plusmn",
        '\u{20ac}' => "euro",
        _ => return None,
    };
    Some(name)
}

/// Double every single quote so the value can sit inside a SQL string literal
pub fn escape_sql(input: &str) -> String {
    input.replace('\'', "''")
}
