#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod binary;
mod de;
mod error;
mod ser;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use binary::{MAX_DEPTH, encode, from_bytes, to_bytes};
pub use de::{WireValueDeserializer, from_wire_value};
pub use error::CodecError;
pub use ser::{WireValueSerializer, to_wire_value};
pub use value::{Described, Symbol, WireKind, WireValue};
