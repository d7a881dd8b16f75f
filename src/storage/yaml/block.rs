//! Recursive-descent reader for indentation-delimited blocks.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! block    := mapping | sequence
//! mapping  := entry+          (all at the same indentation)
//! sequence := item+           (all at the same indentation)
//! entry    := key ':' (scalar | NEWLINE block)
//! item     := '-' (scalar | key ':' (scalar | NEWLINE block) block?)
//! ```
//!
//! Nested blocks sit exactly two spaces deeper than their parent. Every line
//! is classified once, before dispatch, into an item, an entry or a
//! malformed line. Lines indented deeper than their block allows are skipped
//! with a warning, never treated as an error.

use super::{Mapping, ParseError, Value, parse_scalar, scalar::unquote};

/// Width of one level of nesting.
const STEP: usize = 2;

/// A significant line of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source text.
    pub number: usize,
    /// Number of leading spaces.
    pub indent: usize,
    /// The line content without surrounding whitespace.
    pub text: &'a str,
}

/// Splits a document into significant lines.
///
/// Blank lines and comment lines are dropped; line numbers still refer to
/// the original text.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Line<'_>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                return None;
            }
            Some(Line {
                number: i + 1,
                indent: raw.len() - raw.trim_start_matches(' ').len(),
                text,
            })
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Item(&'a str),
    Entry { key: &'a str, value: &'a str },
    Malformed,
}

impl<'a> LineKind<'a> {
    fn classify(text: &'a str) -> Self {
        if let Some(body) = text.strip_prefix("- ") {
            return Self::Item(body.trim());
        }
        match split_key(text) {
            Some((key, value)) => Self::Entry { key, value },
            None => Self::Malformed,
        }
    }
}

/// Splits `key: value` at a colon outside quotes.
///
/// A colon followed by whitespace or the end of the line is preferred, so
/// `url: https://...` keeps its value whole; failing that, the first colon
/// splits (`timeout:30`).
fn split_key(text: &str) -> Option<(&str, &str)> {
    let mut quote = None;
    let mut previous = None;
    let mut first_colon = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') if previous.is_none_or(char::is_whitespace) => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, ':') => {
                let rest = &text[i + 1..];
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    return split_at(text, i);
                }
                first_colon.get_or_insert(i);
            }
            _ => {}
        }
        previous = Some(c);
    }
    first_colon.and_then(|i| split_at(text, i))
}

fn split_at(text: &str, colon: usize) -> Option<(&str, &str)> {
    let key = text[..colon].trim();
    let key = unquote(key).unwrap_or(key);
    (!key.is_empty()).then_some((key, text[colon + 1..].trim()))
}

/// The container being filled by one block.
///
/// A block becomes a sequence or a mapping on its first line and must stay
/// that way.
enum Container {
    Empty,
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Container {
    fn sequence(&mut self, line: &Line) -> Result<&mut Vec<Value>, ParseError> {
        if matches!(self, Self::Empty) {
            *self = Self::Sequence(Vec::new());
        }
        match self {
            Self::Sequence(items) => Ok(items),
            _ => Err(ParseError::MixedContainer { line: line.number }),
        }
    }

    fn mapping(&mut self, line: &Line) -> Result<&mut Mapping, ParseError> {
        if matches!(self, Self::Empty) {
            *self = Self::Mapping(Mapping::new());
        }
        match self {
            Self::Mapping(map) => Ok(map),
            _ => Err(ParseError::MixedContainer { line: line.number }),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::empty_mapping(),
            Self::Sequence(items) => Value::Sequence(items),
            Self::Mapping(map) => Value::Mapping(map),
        }
    }
}

/// Cursor over a pre-tokenized line stream.
#[derive(Debug)]
pub struct BlockParser<'l, 'a> {
    lines: &'l [Line<'a>],
    pos: usize,
}

impl<'l, 'a> BlockParser<'l, 'a> {
    /// Creates a parser positioned at the given line index.
    #[must_use]
    pub const fn new(lines: &'l [Line<'a>], start: usize) -> Self {
        Self { lines, pos: start }
    }

    /// Index of the next unconsumed line.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The next unconsumed line, if any.
    #[must_use]
    pub fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    /// Reads one block at exactly `indent` spaces.
    ///
    /// The block ends, without consuming it, at the first line indented less
    /// than `indent`. If the very first line is indented more, the block is
    /// absent and reads as an empty mapping; the enclosing block then skips
    /// those lines. Deeper lines found between siblings are skipped with a
    /// warning. A key repeated within one mapping keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is neither a list item nor a mapping entry,
    /// or if list items and mapping entries are mixed at one level.
    pub fn parse_block(&mut self, indent: usize) -> Result<Value, ParseError> {
        let mut container = Container::Empty;

        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                if matches!(container, Container::Empty) {
                    break;
                }
                let skipped = self.skip_deeper(indent);
                tracing::warn!(
                    line = line.number,
                    skipped,
                    "ignoring lines indented deeper than their block"
                );
                continue;
            }

            match LineKind::classify(line.text) {
                LineKind::Item(body) => {
                    let items = container.sequence(&line)?;
                    self.pos += 1;
                    items.push(self.parse_item(&line, body, indent)?);
                }
                LineKind::Entry { key, value } => {
                    let map = container.mapping(&line)?;
                    self.pos += 1;
                    let value = self.parse_entry(&line, value, indent)?;
                    if map.insert(key.to_string(), value).is_some() {
                        tracing::warn!(line = line.number, key, "repeated key; the last value wins");
                    }
                }
                LineKind::Malformed => {
                    return Err(ParseError::Malformed {
                        line: line.number,
                        text: line.text.to_string(),
                    });
                }
            }
        }

        Ok(container.into_value())
    }

    fn parse_entry(&mut self, line: &Line, value: &str, indent: usize) -> Result<Value, ParseError> {
        if value.is_empty() {
            return self.parse_block(indent + STEP);
        }
        let scalar = parse_scalar(value);
        self.skip_nested(line, indent, scalar.is_block_marker());
        Ok(scalar)
    }

    fn parse_item(&mut self, line: &Line, body: &str, indent: usize) -> Result<Value, ParseError> {
        let Some((key, value)) = split_key(body) else {
            return Ok(parse_scalar(body));
        };

        let mut item = Mapping::new();
        if value.is_empty() {
            item.insert(key.to_string(), self.parse_block(indent + STEP)?);
            return Ok(Value::Mapping(item));
        }

        let scalar = parse_scalar(value);
        if scalar.is_block_marker() {
            self.skip_nested(line, indent + STEP, true);
        }
        item.insert(key.to_string(), scalar);

        // Deeper lines continue the same item as sibling keys.
        let first_sibling = self.peek();
        match self.parse_block(indent + STEP)? {
            Value::Mapping(siblings) => {
                for (sibling, value) in siblings {
                    if item.contains_key(&sibling) {
                        return Err(ParseError::DuplicateKey {
                            line: line.number,
                            key: sibling,
                        });
                    }
                    item.insert(sibling, value);
                }
            }
            _ => {
                return Err(ParseError::MixedContainer {
                    line: first_sibling.map_or(line.number, |l| l.number),
                });
            }
        }

        Ok(Value::Mapping(item))
    }

    /// Consumes lines nested deeper than `indent` under a key that already
    /// has an inline value.
    ///
    /// Under a block marker those lines are the block's text, which is
    /// recovered separately. Otherwise the inline value wins and the nested
    /// lines are dropped.
    fn skip_nested(&mut self, line: &Line, indent: usize, block_text: bool) {
        let skipped = self.skip_deeper(indent);
        if !block_text && skipped > 0 {
            tracing::warn!(
                line = line.number,
                skipped,
                "ignoring nested lines under a key with an inline value"
            );
        }
    }

    /// Consumes the run of lines indented more than `indent`, returning how
    /// many were consumed.
    fn skip_deeper(&mut self, indent: usize) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|next| next.indent > indent) {
            self.pos += 1;
        }
        self.pos - start
    }
}

/// Reads one block starting at line `start`, returning it with the index of
/// the next unconsumed line.
///
/// # Errors
///
/// See [`BlockParser::parse_block`].
pub fn parse_block(
    lines: &[Line<'_>],
    start: usize,
    indent: usize,
) -> Result<(Value, usize), ParseError> {
    let mut parser = BlockParser::new(lines, start);
    let value = parser.parse_block(indent)?;
    Ok((value, parser.position()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Value, ParseError> {
        let lines = tokenize(source);
        parse_block(&lines, 0, 0).map(|(value, _)| value)
    }

    fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::Mapping(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn tokenize_drops_blanks_and_comments() {
        let lines = tokenize("# heading\nid: X\n\n  # nested comment\n  name: Y\n");
        assert_eq!(
            lines,
            vec![
                Line { number: 2, indent: 0, text: "id: X" },
                Line { number: 5, indent: 2, text: "name: Y" },
            ]
        );
    }

    #[test]
    fn classify_lines() {
        assert_eq!(LineKind::classify("- BTN_OK"), LineKind::Item("BTN_OK"));
        assert_eq!(LineKind::classify("-"), LineKind::Malformed);
        assert_eq!(
            LineKind::classify("id: TELA_LOGIN"),
            LineKind::Entry { key: "id", value: "TELA_LOGIN" }
        );
        assert_eq!(
            LineKind::classify("components:"),
            LineKind::Entry { key: "components", value: "" }
        );
        assert_eq!(LineKind::classify("just some prose"), LineKind::Malformed);
        assert_eq!(LineKind::classify("-5"), LineKind::Malformed);
    }

    #[test]
    fn split_key_respects_quotes_and_urls() {
        assert_eq!(
            split_key("url: https://figma.com/file/abc"),
            Some(("url", "https://figma.com/file/abc"))
        );
        assert_eq!(split_key("\"a: b\""), None);
        assert_eq!(split_key("\"a:b\": c"), Some(("a:b", "c")));
        assert_eq!(split_key("title: 'Note: read me'"), Some(("title", "'Note: read me'")));
        assert_eq!(split_key(": orphan"), None);
        assert_eq!(split_key("no colon here"), None);
    }

    #[test]
    fn colon_without_space_still_splits() {
        assert_eq!(split_key("timeout:30"), Some(("timeout", "30")));
        assert_eq!(split_key("'a:b':c"), Some(("a:b", "c")));
        assert_eq!(
            parse("id: RF-001\ntimeout:30\n").unwrap(),
            map([("id", Value::from("RF-001")), ("timeout", Value::Int(30))])
        );
    }

    #[test]
    fn bare_dash_is_malformed() {
        let error = parse("items:\n  -\n").unwrap_err();
        assert_eq!(
            error,
            ParseError::Malformed {
                line: 2,
                text: "-".to_string()
            }
        );
    }

    #[test]
    fn two_level_mapping() {
        let value = parse("id: X\nname: Y\nscope:\n  screen: TELA_A\n  component: BTN_B\n").unwrap();
        assert_eq!(
            value,
            map([
                ("id", Value::from("X")),
                ("name", Value::from("Y")),
                (
                    "scope",
                    map([
                        ("screen", Value::from("TELA_A")),
                        ("component", Value::from("BTN_B")),
                    ])
                ),
            ])
        );
    }

    #[test]
    fn sequence_of_scalars() {
        let value = parse("rules:\n  - RN-001\n  - RN-002\n").unwrap();
        assert_eq!(
            value,
            map([(
                "rules",
                Value::Sequence(vec![Value::from("RN-001"), Value::from("RN-002")])
            )])
        );
    }

    #[test]
    fn item_with_inline_value_merges_siblings() {
        let value = parse("components:\n  - id: BTN_OK\n    label: Ok\n  - LBL_TITLE\n").unwrap();
        assert_eq!(
            value,
            map([(
                "components",
                Value::Sequence(vec![
                    map([("id", Value::from("BTN_OK")), ("label", Value::from("Ok"))]),
                    Value::from("LBL_TITLE"),
                ])
            )])
        );
    }

    #[test]
    fn item_with_empty_value_reads_nested_block() {
        let source = "\
alternatives:
  - then:
    - show_message: MSG-ERR
    - log: true
";
        let value = parse(source).unwrap();
        assert_eq!(
            value,
            map([(
                "alternatives",
                Value::Sequence(vec![map([(
                    "then",
                    Value::Sequence(vec![
                        map([("show_message", Value::from("MSG-ERR"))]),
                        map([("log", Value::Bool(true))]),
                    ])
                )])])
            )])
        );
    }

    #[test]
    fn quoted_item_is_a_scalar() {
        let value = parse("notes:\n  - \"see: above\"\n").unwrap();
        assert_eq!(
            value,
            map([("notes", Value::Sequence(vec![Value::from("see: above")]))])
        );
    }

    #[test]
    fn empty_document_is_an_empty_mapping() {
        assert_eq!(parse("# nothing here\n\n").unwrap(), Value::empty_mapping());
    }

    #[test]
    fn key_without_block_is_an_empty_mapping() {
        assert_eq!(
            parse("links:\nid: X\n").unwrap(),
            map([("id", Value::from("X")), ("links", Value::empty_mapping())])
        );
    }

    #[test]
    fn mapping_then_item_is_mixed() {
        let error = parse("id: X\n- Y\n").unwrap_err();
        assert_eq!(error, ParseError::MixedContainer { line: 2 });
    }

    #[test]
    fn item_then_mapping_is_mixed() {
        let error = parse("- X\nid: Y\n").unwrap_err();
        assert_eq!(error, ParseError::MixedContainer { line: 2 });
    }

    #[test]
    fn line_without_colon_or_marker_is_malformed() {
        let error = parse("id: X\nthis is prose\n").unwrap_err();
        assert_eq!(
            error,
            ParseError::Malformed {
                line: 2,
                text: "this is prose".to_string()
            }
        );
    }

    #[test]
    fn inline_item_value_colliding_with_sibling_is_rejected() {
        let error = parse("- id: A\n  id: B\n").unwrap_err();
        assert_eq!(
            error,
            ParseError::DuplicateKey {
                line: 1,
                key: "id".to_string()
            }
        );
    }

    #[test]
    fn repeated_key_keeps_the_last_value() {
        let value = parse("id: RF-001\nname: A\nname: B\n").unwrap();
        assert_eq!(
            value,
            map([("id", Value::from("RF-001")), ("name", Value::from("B"))])
        );
    }

    #[test]
    fn inline_value_wins_over_nested_lines() {
        let value = parse("behavior: simple\n  main: ignored\nid: X\n").unwrap();
        assert_eq!(
            value,
            map([("behavior", Value::from("simple")), ("id", Value::from("X"))])
        );
    }

    #[test]
    fn block_marker_body_is_skipped() {
        let value = parse("purpose: >\n  Does X.\n  Also Y.\nid: X\n").unwrap();
        assert_eq!(
            value,
            map([("id", Value::from("X")), ("purpose", Value::from(">"))])
        );
    }

    #[test]
    fn deeper_first_line_stops_the_nested_block() {
        let lines = tokenize("links:\n    rules:\n      - RN-001\n");
        let (value, next) = parse_block(&lines, 1, 2).unwrap();
        assert_eq!(value, Value::empty_mapping());
        assert_eq!(next, 1);
    }

    #[test]
    fn over_indented_lines_are_skipped() {
        let value = parse("links:\n    rules:\n      - RN-001\nid: RF-001\n").unwrap();
        assert_eq!(
            value,
            map([("id", Value::from("RF-001")), ("links", Value::empty_mapping())])
        );
    }

    #[test]
    fn over_indented_item_body_is_skipped() {
        let source = "\
main_flow:
  - refs:
      - RF-001
  - refs:
    - RN-001
id: UC-001-login
";
        let value = parse(source).unwrap();
        assert_eq!(
            value,
            map([
                ("id", Value::from("UC-001-login")),
                (
                    "main_flow",
                    Value::Sequence(vec![
                        map([("refs", Value::empty_mapping())]),
                        map([("refs", Value::Sequence(vec![Value::from("RN-001")]))]),
                    ])
                ),
            ])
        );
    }

    #[test]
    fn block_stops_at_shallower_line() {
        let lines = tokenize("a:\n  b: 1\nc: 2\n");
        let (value, next) = parse_block(&lines, 1, 2).unwrap();
        assert_eq!(value, map([("b", Value::Int(1))]));
        assert_eq!(next, 2);
    }
}
