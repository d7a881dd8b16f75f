use std::sync::LazyLock;

use regex::Regex;

use super::Value;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

static FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").expect("float pattern is valid"));

/// Converts a raw token into a typed value.
///
/// Never fails: anything that is not a quoted string, boolean, number or
/// block marker comes back as a plain string.
///
/// # Examples
///
/// ```
/// use doclint::storage::yaml::{parse_scalar, Value};
///
/// assert_eq!(parse_scalar(" 'RF-001' "), Value::from("RF-001"));
/// assert_eq!(parse_scalar("False"), Value::Bool(false));
/// assert_eq!(parse_scalar("-12"), Value::Int(-12));
/// assert_eq!(parse_scalar("TELA_LOGIN"), Value::from("TELA_LOGIN"));
/// ```
#[must_use]
pub fn parse_scalar(raw: &str) -> Value {
    let text = raw.trim();

    if text == Value::FOLDED || text == Value::LITERAL {
        return Value::from(text);
    }

    if let Some(inner) = unquote(text) {
        return Value::from(inner);
    }

    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    // Out-of-range numbers stay strings rather than losing digits.
    if INTEGER.is_match(text) {
        if let Ok(i) = text.parse() {
            return Value::Int(i);
        }
    } else if FLOAT.is_match(text) {
        if let Ok(f) = text.parse() {
            return Value::Float(f);
        }
    }

    Value::from(text)
}

/// Strips one pair of matching quotes. No escape processing.
pub(super) fn unquote(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        (text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote))
            .then(|| &text[1..text.len() - 1])
    })
}
