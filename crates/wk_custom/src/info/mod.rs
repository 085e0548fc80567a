//! Runtime type information.
//!
//! Rust has no class hierarchy, so "subclass of" is expressed through
//! declared [`Supertype`] edges on each type's [`TypeInfo`]. Serializers
//! match runtime types against these edges.

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod macros;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use type_info::{Supertype, TypeInfo};
pub use type_path::TypePath;
pub use typed::{DynamicTyped, TypeInfoCell, Typed};
