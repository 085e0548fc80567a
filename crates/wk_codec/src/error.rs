use alloc::string::{String, ToString};
use core::fmt::Display;

use thiserror::Error;

use crate::WireKind;

// -----------------------------------------------------------------------------
// CodecError

/// Failures of the binary codec and of the serde bridge.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CodecError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unknown constructor code 0x{0:02x}")]
    UnknownConstructor(u8),

    #[error("{0} trailing bytes after the encoded value")]
    TrailingBytes(usize),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("symbol {0:?} is not ASCII")]
    InvalidSymbol(String),

    #[error("0x{0:x} is not a unicode scalar value")]
    InvalidChar(u32),

    #[error("values nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("length does not fit the 32-bit wire limit")]
    LengthOverflow,

    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: WireKind, found: WireKind },

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    #[inline]
    pub fn custom(msg: impl Display) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde_core::ser::Error for CodecError {
    #[cold]
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde_core::de::Error for CodecError {
    #[cold]
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}
