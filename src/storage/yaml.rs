//! A minimal reader for the subset of YAML used by the documentation corpus.
//!
//! Supported: `key: value` mappings and `- item` sequences nested by
//! two-space indentation, quoted and plain scalars, booleans, integers,
//! floats, and `>`/`|` blocks on allow-listed top-level keys. Anchors, flow
//! collections, multi-document streams and escape sequences are not.

mod block;
mod folded;
mod scalar;
mod value;

pub use block::{BlockParser, Line, parse_block, tokenize};
pub use folded::recover_folded_text;
pub use scalar::parse_scalar;
pub use value::{Mapping, Value};

/// A structural error that makes a document unreadable.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// A line that is neither a `- item` nor a `key: value` entry.
    #[error("line {line}: expected `key: value` or `- item`, found `{text}`")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// A list item and a mapping entry at the same indentation.
    #[error("line {line}: mapping entries and list items mixed at one indentation level")]
    MixedContainer {
        /// 1-based line number of the first line that does not fit.
        line: usize,
    },

    /// A list item whose inline key is repeated on one of its nested lines.
    #[error("line {line}: duplicate key `{key}`")]
    DuplicateKey {
        /// 1-based line number.
        line: usize,
        /// The repeated key.
        key: String,
    },
}

/// Parses a whole document.
///
/// Multi-line text is recovered for the top-level keys named in
/// `folded_fields`; see [`recover_folded_text`].
///
/// Lines indented deeper than their block allows are dropped with a warning.
///
/// # Errors
///
/// Returns an error if a line is malformed, if a block mixes list items and
/// mapping entries, or if a list item repeats its inline key on a nested
/// line.
pub fn parse_document<S: AsRef<str>>(source: &str, folded_fields: &[S]) -> Result<Value, ParseError> {
    let lines = tokenize(source);
    let mut parser = BlockParser::new(&lines, 0);
    let value = parser.parse_block(0)?;

    if let Some(line) = parser.peek() {
        tracing::warn!(
            line = line.number,
            skipped = lines.len() - parser.position(),
            "document does not start at column 0; ignoring its indented lines"
        );
    }

    Ok(recover_folded_text(source, value, folded_fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_document() {
        let source = r"# Login screen
id: TELA_LOGIN
name: Login
purpose: >
  Lets a user sign in.

  Shown on first access.
figma:
  url: https://www.figma.com/file/abc
components:
  - id: INP_EMAIL
    required: true
  - BTN_SUBMIT
requirements:
  - RF-001
";
        let value = parse_document(source, &["purpose"]).unwrap();

        assert_eq!(value.get("id"), Some(&Value::from("TELA_LOGIN")));
        assert_eq!(
            value.get("purpose"),
            Some(&Value::from("Lets a user sign in.\n\nShown on first access."))
        );
        assert_eq!(
            value.get("figma").and_then(|f| f.get("url")),
            Some(&Value::from("https://www.figma.com/file/abc"))
        );

        let components = value.get("components").and_then(Value::as_sequence).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].get("required"), Some(&Value::Bool(true)));
        assert_eq!(components[1], Value::from("BTN_SUBMIT"));
    }

    #[test]
    fn over_indented_block_is_dropped() {
        let value =
            parse_document::<&str>("id: RF-001\nlinks:\n    rules:\n      - RN-001\n", &[]).unwrap();
        assert_eq!(value.get("id"), Some(&Value::from("RF-001")));
        assert_eq!(value.get("links"), Some(&Value::empty_mapping()));
    }

    #[test]
    fn list_body_four_spaces_past_the_dash_is_dropped() {
        let value =
            parse_document::<&str>("main_flow:\n  - refs:\n      - RF-001\n", &[]).unwrap();
        let steps = value.get("main_flow").and_then(Value::as_sequence).unwrap();
        assert_eq!(steps[0].get("refs"), Some(&Value::empty_mapping()));
    }

    #[test]
    fn fully_indented_document_reads_as_empty() {
        let value = parse_document::<&str>("  id: X\n", &[]).unwrap();
        assert_eq!(value, Value::empty_mapping());
    }

    #[test]
    fn colon_without_space_is_an_entry() {
        let value = parse_document::<&str>("id: RF-001\ntimeout:30\n", &[]).unwrap();
        assert_eq!(value.get("timeout"), Some(&Value::Int(30)));
    }

    #[test]
    fn error_messages() {
        let error = ParseError::Malformed {
            line: 3,
            text: "oops".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "line 3: expected `key: value` or `- item`, found `oops`"
        );
    }
}
