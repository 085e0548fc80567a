//! The serializer registry and the serialization contexts.
//!
//! [`SerializerFactory`] owns every serializer. A serialization runs in a
//! [`SerializationOutput`], which collects declared schema notations, and
//! produces an [`Envelope`]; deserialization reads it back through a
//! [`SerializationInput`].

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto;
mod config;
mod envelope;
mod input;
mod output;
mod primitive;
mod registry;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto::AutoSerializer;
pub use config::{FactoryConfig, ResolutionPolicy};
pub use envelope::Envelope;
pub use input::SerializationInput;
pub use output::SerializationOutput;
pub use registry::SerializerFactory;

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! submit_serializer {
    ($make:path) => {};
}
