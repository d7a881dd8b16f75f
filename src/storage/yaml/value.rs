use std::{collections::BTreeMap, fmt};

/// A mapping of keys to parsed values.
pub type Mapping = BTreeMap<String, Value>;

/// A value produced by the document parser.
///
/// Values are immutable once the parser has built them; the loader and the
/// validators only ever read them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A plain or quoted string.
    String(String),
    /// `true` or `false`, in any letter case.
    Bool(bool),
    /// An optionally negative run of digits.
    Int(i64),
    /// An optionally negative decimal with digits on both sides of the point.
    Float(f64),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A mapping of string keys to values.
    Mapping(Mapping),
}

impl Value {
    /// The marker left in place of a `>` folded block.
    pub const FOLDED: &'static str = ">";

    /// The marker left in place of a `|` literal block.
    pub const LITERAL: &'static str = "|";

    /// Returns an empty mapping.
    #[must_use]
    pub const fn empty_mapping() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the items if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the entries if this is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key, if this is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Renders a scalar as text.
    ///
    /// Strings, booleans and numbers all have a textual form; containers do
    /// not.
    #[must_use]
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Whether this is the placeholder for a folded or literal block whose
    /// text has not been recovered.
    #[must_use]
    pub fn is_block_marker(&self) -> bool {
        matches!(self.as_str(), Some(Self::FOLDED | Self::LITERAL))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Sequence(items) => write!(f, "<sequence of {}>", items.len()),
            Self::Mapping(map) => write!(f, "<mapping of {}>", map.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
