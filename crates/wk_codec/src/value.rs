use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::CodecError;

// -----------------------------------------------------------------------------
// Symbol

/// An ASCII identifier on the wire.
///
/// Symbols are used for descriptors and other protocol-level names.
/// Construction through [`Symbol::new`] rejects non-ASCII input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol, failing on non-ASCII text.
    pub fn new(text: impl Into<String>) -> Result<Self, CodecError> {
        let text = text.into();
        if text.is_ascii() {
            Ok(Self(text))
        } else {
            Err(CodecError::InvalidSymbol(text))
        }
    }

    /// Creates a symbol, replacing every non-ASCII character with `\u{XXXX}`
    /// and every backslash with `\\`.
    ///
    /// Distinct inputs map to distinct symbols.
    pub fn escaped(text: &str) -> Self {
        if text.is_ascii() && !text.contains('\\') {
            return Self(text.into());
        }
        let mut out = String::with_capacity(text.len() + 8);
        for c in text.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                c if c.is_ascii() => out.push(c),
                c => {
                    use core::fmt::Write;
                    let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
                }
            }
        }
        Self(out)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Symbol {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// -----------------------------------------------------------------------------
// Described

/// A value tagged with a descriptor.
///
/// This is the envelope every custom wire type travels in:
/// the descriptor names the wire type, the value is its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Described {
    pub descriptor: Symbol,
    pub value: WireValue,
}

impl Described {
    #[inline]
    pub fn new(descriptor: Symbol, value: WireValue) -> Self {
        Self { descriptor, value }
    }
}

// -----------------------------------------------------------------------------
// WireKind

/// The kind of a [`WireValue`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Null,
    Bool,
    Int,
    Long,
    ULong,
    Double,
    Char,
    String,
    Symbol,
    Binary,
    List,
    Map,
    Described,
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Bool => f.pad("boolean"),
            Self::Int => f.pad("int"),
            Self::Long => f.pad("long"),
            Self::ULong => f.pad("ulong"),
            Self::Double => f.pad("double"),
            Self::Char => f.pad("char"),
            Self::String => f.pad("string"),
            Self::Symbol => f.pad("symbol"),
            Self::Binary => f.pad("binary"),
            Self::List => f.pad("list"),
            Self::Map => f.pad("map"),
            Self::Described => f.pad("described"),
        }
    }
}

// -----------------------------------------------------------------------------
// WireValue

/// A value of the wire type system.
///
/// Scalars map one to one onto primitive wire types, `List` and `Map` are the
/// compound types and `Described` attaches a descriptor to a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    ULong(u64),
    Double(f64),
    Char(char),
    String(String),
    Symbol(Symbol),
    Binary(Vec<u8>),
    List(Vec<WireValue>),
    Map(Vec<(WireValue, WireValue)>),
    Described(Box<Described>),
}

impl WireValue {
    /// Wraps `value` in a described envelope.
    #[inline]
    pub fn described(descriptor: Symbol, value: WireValue) -> Self {
        Self::Described(Box::new(Described::new(descriptor, value)))
    }

    pub fn kind(&self) -> WireKind {
        match self {
            Self::Null => WireKind::Null,
            Self::Bool(_) => WireKind::Bool,
            Self::Int(_) => WireKind::Int,
            Self::Long(_) => WireKind::Long,
            Self::ULong(_) => WireKind::ULong,
            Self::Double(_) => WireKind::Double,
            Self::Char(_) => WireKind::Char,
            Self::String(_) => WireKind::String,
            Self::Symbol(_) => WireKind::Symbol,
            Self::Binary(_) => WireKind::Binary,
            Self::List(_) => WireKind::List,
            Self::Map(_) => WireKind::Map,
            Self::Described(_) => WireKind::Described,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text of a `String` or `Symbol` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[WireValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_described(&self) -> Option<&Described> {
        match self {
            Self::Described(described) => Some(described),
            _ => None,
        }
    }

    /// Like [`as_str`](Self::as_str), but reports the mismatch.
    pub fn expect_str(&self) -> Result<&str, CodecError> {
        self.as_str().ok_or(CodecError::Mismatch {
            expected: WireKind::String,
            found: self.kind(),
        })
    }

    /// Like [`as_list`](Self::as_list), but reports the mismatch.
    pub fn expect_list(&self) -> Result<&[WireValue], CodecError> {
        self.as_list().ok_or(CodecError::Mismatch {
            expected: WireKind::List,
            found: self.kind(),
        })
    }

    /// Like [`as_described`](Self::as_described), but reports the mismatch.
    pub fn expect_described(&self) -> Result<&Described, CodecError> {
        self.as_described().ok_or(CodecError::Mismatch {
            expected: WireKind::Described,
            found: self.kind(),
        })
    }
}

impl From<bool> for WireValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for WireValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for WireValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<u64> for WireValue {
    #[inline]
    fn from(value: u64) -> Self {
        Self::ULong(value)
    }
}

impl From<f64> for WireValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<char> for WireValue {
    #[inline]
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<String> for WireValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for WireValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Symbol> for WireValue {
    #[inline]
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Symbol, WireKind, WireValue};

    #[test]
    fn symbol_rejects_non_ascii() {
        assert!(Symbol::new("net.wirekit:Currency").is_ok());
        assert!(Symbol::new("währung").is_err());
        assert_eq!(Symbol::escaped("währung").as_str(), "w\\u{e4}hrung");
        assert_eq!(Symbol::escaped("plain").as_str(), "plain");
        assert_eq!(Symbol::escaped("a\\b").as_str(), "a\\\\b");
        assert_ne!(Symbol::escaped("w\\u{e4}hrung"), Symbol::escaped("währung"));
    }

    #[test]
    fn expect_helpers_report_kind() {
        let value = WireValue::Long(7);
        let err = value.expect_str().unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch: expected string, found long"
        );
        assert_eq!(value.kind(), WireKind::Long);
        assert_eq!(WireValue::from("USD").expect_str().unwrap(), "USD");
    }
}
