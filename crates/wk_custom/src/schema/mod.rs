//! Schema notations describing custom wire types.
//!
//! A writer collects the notations of the types it emits into a
//! [`SchemaDocument`] that travels next to the payload, so a reader can
//! recognise wire types it has no serializer for.

// -----------------------------------------------------------------------------
// Modules

mod document;
mod notation;

// -----------------------------------------------------------------------------
// Exports

pub use document::SchemaDocument;
pub use notation::{FieldNotation, SchemaNotation};
