#![doc = include_str!("../README.md")]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod error;
mod hash;
mod object;
mod structural;

#[cfg(test)]
mod fixtures;

pub mod factory;
pub mod info;
pub mod schema;
pub mod serializer;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

pub use wk_codec as codec;

pub use descriptor::{DESCRIPTOR_DOMAIN, TypeDescriptor};
pub use error::SerializeError;
pub use object::WireObject;
pub use structural::{Structural, StructuralSerializer};
