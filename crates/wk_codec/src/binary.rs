//! Binary representation of [`WireValue`].
//!
//! Every value starts with a one byte constructor code, using the AMQP 1.0
//! numbering. Variable width types always use the 32-bit length forms except
//! for strings, symbols and binaries shorter than 256 bytes.
//!
//! | constructor | value                          |
//! |-------------|--------------------------------|
//! | `0x00`      | described: descriptor, value   |
//! | `0x40`      | null                           |
//! | `0x41/0x42` | true / false                   |
//! | `0x71`      | int (4 bytes, big endian)      |
//! | `0x73`      | char (4 bytes, UTF-32)         |
//! | `0x80`      | ulong (8 bytes)                |
//! | `0x81`      | long (8 bytes)                 |
//! | `0x82`      | double (8 bytes, IEEE 754)     |
//! | `0xa0/0xb0` | binary, 8/32-bit length        |
//! | `0xa1/0xb1` | UTF-8 string, 8/32-bit length  |
//! | `0xa3/0xb3` | ASCII symbol, 8/32-bit length  |
//! | `0xd0`      | list: size, count, items       |
//! | `0xd1`      | map: size, count, keys/values  |

use alloc::string::String;
use alloc::vec::Vec;

use crate::{CodecError, Symbol, WireValue};

// -----------------------------------------------------------------------------
// Constructor codes

const DESCRIBED: u8 = 0x00;
const NULL: u8 = 0x40;
const TRUE: u8 = 0x41;
const FALSE: u8 = 0x42;
const INT: u8 = 0x71;
const CHAR: u8 = 0x73;
const ULONG: u8 = 0x80;
const LONG: u8 = 0x81;
const DOUBLE: u8 = 0x82;
const VBIN8: u8 = 0xa0;
const STR8: u8 = 0xa1;
const SYM8: u8 = 0xa3;
const VBIN32: u8 = 0xb0;
const STR32: u8 = 0xb1;
const SYM32: u8 = 0xb3;
const LIST32: u8 = 0xd0;
const MAP32: u8 = 0xd1;

/// The deepest nesting of lists, maps and described values [`from_bytes`]
/// accepts.
pub const MAX_DEPTH: usize = 128;

// -----------------------------------------------------------------------------
// Encoding

/// Encodes `value` to a fresh buffer.
pub fn to_bytes(value: &WireValue) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode(value, &mut out)?;
    Ok(out)
}

/// Appends the encoding of `value` to `out`.
///
/// On failure `out` is truncated back to its original length,
/// so a failed call never leaves a partial value behind.
pub fn encode(value: &WireValue, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let start = out.len();
    let result = encode_value(value, out);
    if result.is_err() {
        out.truncate(start);
    }
    result
}

fn len_u32(len: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::LengthOverflow)
}

fn encode_variable(out: &mut Vec<u8>, short: u8, long: u8, bytes: &[u8]) -> Result<(), CodecError> {
    if let Ok(len) = u8::try_from(bytes.len()) {
        out.push(short);
        out.push(len);
    } else {
        out.push(long);
        out.extend_from_slice(&len_u32(bytes.len())?.to_be_bytes());
    }
    out.extend_from_slice(bytes);
    Ok(())
}

// Writes `code`, a size placeholder and the item count, runs `body`,
// then patches the size with the number of bytes that follow it.
fn encode_compound(
    out: &mut Vec<u8>,
    code: u8,
    count: usize,
    body: impl FnOnce(&mut Vec<u8>) -> Result<(), CodecError>,
) -> Result<(), CodecError> {
    out.push(code);
    let size_at = out.len();
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&len_u32(count)?.to_be_bytes());
    body(out)?;
    let size = len_u32(out.len() - size_at - 4)?;
    out[size_at..size_at + 4].copy_from_slice(&size.to_be_bytes());
    Ok(())
}

fn encode_value(value: &WireValue, out: &mut Vec<u8>) -> Result<(), CodecError> {
    match value {
        WireValue::Null => out.push(NULL),
        WireValue::Bool(true) => out.push(TRUE),
        WireValue::Bool(false) => out.push(FALSE),
        WireValue::Int(v) => {
            out.push(INT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        WireValue::Long(v) => {
            out.push(LONG);
            out.extend_from_slice(&v.to_be_bytes());
        }
        WireValue::ULong(v) => {
            out.push(ULONG);
            out.extend_from_slice(&v.to_be_bytes());
        }
        WireValue::Double(v) => {
            out.push(DOUBLE);
            out.extend_from_slice(&v.to_bits().to_be_bytes());
        }
        WireValue::Char(c) => {
            out.push(CHAR);
            out.extend_from_slice(&u32::from(*c).to_be_bytes());
        }
        WireValue::String(s) => encode_variable(out, STR8, STR32, s.as_bytes())?,
        WireValue::Symbol(s) => encode_variable(out, SYM8, SYM32, s.as_str().as_bytes())?,
        WireValue::Binary(b) => encode_variable(out, VBIN8, VBIN32, b)?,
        WireValue::List(items) => encode_compound(out, LIST32, items.len(), |out| {
            items.iter().try_for_each(|item| encode_value(item, out))
        })?,
        WireValue::Map(entries) => encode_compound(out, MAP32, entries.len() * 2, |out| {
            entries.iter().try_for_each(|(key, value)| {
                encode_value(key, out)?;
                encode_value(value, out)
            })
        })?,
        WireValue::Described(described) => {
            out.push(DESCRIBED);
            encode_variable(out, SYM8, SYM32, described.descriptor.as_str().as_bytes())?;
            encode_value(&described.value, out)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Decoding

/// Decodes exactly one value from `bytes`.
pub fn from_bytes(bytes: &[u8]) -> Result<WireValue, CodecError> {
    let mut reader = Reader {
        bytes,
        pos: 0,
        depth: 0,
    };
    let value = reader.value()?;
    match bytes.len() - reader.pos {
        0 => Ok(value),
        rest => Err(CodecError::TrailingBytes(rest)),
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(n).ok_or(CodecError::UnexpectedEof)?;
        let slice = self.bytes.get(self.pos..end).ok_or(CodecError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, CodecError> {
        self.array().map(u32::from_be_bytes)
    }

    fn variable(&mut self, wide: bool) -> Result<&'a [u8], CodecError> {
        let len = if wide {
            self.u32()? as usize
        } else {
            self.u8()? as usize
        };
        self.take(len)
    }

    fn string(&mut self, wide: bool) -> Result<String, CodecError> {
        let bytes = self.variable(wide)?;
        core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    fn symbol(&mut self, wide: bool) -> Result<Symbol, CodecError> {
        Symbol::new(self.string(wide)?)
    }

    // Returns the item count and checks that the declared size is available.
    fn compound_header(&mut self) -> Result<usize, CodecError> {
        let size = self.u32()? as usize;
        if self.bytes.len() - self.pos < size {
            return Err(CodecError::UnexpectedEof);
        }
        Ok(self.u32()? as usize)
    }

    // Reads a value nested one level below the current one.
    fn nested(&mut self) -> Result<WireValue, CodecError> {
        if self.depth == MAX_DEPTH {
            return Err(CodecError::NestingTooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.value();
        self.depth -= 1;
        value
    }

    fn value(&mut self) -> Result<WireValue, CodecError> {
        let code = self.u8()?;
        let value = match code {
            NULL => WireValue::Null,
            TRUE => WireValue::Bool(true),
            FALSE => WireValue::Bool(false),
            INT => WireValue::Int(i32::from_be_bytes(self.array()?)),
            LONG => WireValue::Long(i64::from_be_bytes(self.array()?)),
            ULONG => WireValue::ULong(u64::from_be_bytes(self.array()?)),
            DOUBLE => WireValue::Double(f64::from_bits(u64::from_be_bytes(self.array()?))),
            CHAR => {
                let raw = self.u32()?;
                WireValue::Char(char::from_u32(raw).ok_or(CodecError::InvalidChar(raw))?)
            }
            STR8 | STR32 => WireValue::String(self.string(code == STR32)?),
            SYM8 | SYM32 => WireValue::Symbol(self.symbol(code == SYM32)?),
            VBIN8 | VBIN32 => WireValue::Binary(self.variable(code == VBIN32)?.to_vec()),
            LIST32 => {
                let count = self.compound_header()?;
                let mut items = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    items.push(self.nested()?);
                }
                WireValue::List(items)
            }
            MAP32 => {
                let count = self.compound_header()?;
                if count % 2 != 0 {
                    return Err(CodecError::custom("map with an odd number of elements"));
                }
                let mut entries = Vec::with_capacity((count / 2).min(1024));
                for _ in 0..count / 2 {
                    let key = self.nested()?;
                    let value = self.nested()?;
                    entries.push((key, value));
                }
                WireValue::Map(entries)
            }
            DESCRIBED => {
                let descriptor = match self.u8()? {
                    SYM8 => self.symbol(false)?,
                    SYM32 => self.symbol(true)?,
                    other => return Err(CodecError::UnknownConstructor(other)),
                };
                let value = self.nested()?;
                WireValue::described(descriptor, value)
            }
            other => return Err(CodecError::UnknownConstructor(other)),
        };
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Tests
