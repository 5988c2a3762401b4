use std::fmt;

use crate::editing::Document;
use crate::error::Result;

/// Appendable/insertable value, replacing the source editor's
/// per-native-type overload set with one sum type and one
/// stringification.
///
/// Formatting rules: `Bool` renders `true`/`false`, `Int` decimal,
/// `Float` via Rust `Display`, `Text` verbatim, `Pointer` as a
/// `0x`-prefixed lowercase hex address, and `Nested` as the other
/// buffer's flat text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Pointer(usize),
    Nested(Document),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Pointer(addr) => write!(f, "{addr:#x}"),
            Value::Nested(doc) => f.write_str(&doc.raw_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Nested(doc)
    }
}

impl Document {
    /// Stringify `value` and append it at the end of the flat text.
    /// Equivalent to `insert(len(), value)`.
    pub fn append(&mut self, value: impl Into<Value>) {
        let text = value.into().to_string();
        // Appending at the end cannot be out of bounds.
        let _ = self.insert_text(self.len(), &text);
    }

    /// Stringify `value` and insert it at 0-based flat char offset
    /// `position` in `[0, len]`.
    pub fn insert(&mut self, position: usize, value: impl Into<Value>) -> Result<()> {
        let text = value.into().to_string();
        self.insert_text(position, &text)
    }
}
