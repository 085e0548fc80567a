use alloc::boxed::Box;

use wk_codec::WireValue;

use crate::error::SerializeError;
use crate::factory::{SerializerFactory, primitive};
use crate::object::WireObject;
use crate::schema::{SchemaDocument, SchemaNotation};

// -----------------------------------------------------------------------------
// SerializationInput

/// The reading side of one deserialization.
pub struct SerializationInput<'a> {
    factory: &'a SerializerFactory,
    schema: &'a SchemaDocument,
}

impl<'a> SerializationInput<'a> {
    #[inline]
    pub fn new(factory: &'a SerializerFactory, schema: &'a SchemaDocument) -> Self {
        Self { factory, schema }
    }

    #[inline]
    pub fn factory(&self) -> &'a SerializerFactory {
        self.factory
    }

    /// The schema the writer sent along.
    #[inline]
    pub fn schema(&self) -> &'a SchemaDocument {
        self.schema
    }

    /// Reads one value.
    ///
    /// Described values are dispatched on their descriptor: a custom
    /// serializer first, then a structural one. A descriptor the factory
    /// does not know, but which the schema declares as a restriction of a
    /// known type, is read with that type's serializer.
    pub fn read_object(&mut self, value: &WireValue) -> Result<Box<dyn WireObject>, SerializeError> {
        let Some(described) = value.as_described() else {
            return primitive::from_wire(value);
        };
        let descriptor = described.descriptor.as_str();
        let factory = self.factory;
        let schema = self.schema;

        if let Some(serializer) = factory.resolve_by_descriptor(descriptor) {
            return serializer.decode(value, self);
        }
        if let Some(structural) = factory.structural_by_descriptor(descriptor) {
            return structural.decode(value);
        }
        if let Some(SchemaNotation::Restricted { source, .. }) = schema.get(descriptor)
            && let Some(serializer) = factory.resolve_by_type_path(source)
        {
            log::debug!("reading unknown `{descriptor}` as its source type `{source}`");
            return serializer.decode_payload(&described.value, self);
        }

        log::warn!("no serializer for descriptor `{descriptor}`");
        Err(SerializeError::UnresolvedDescriptor {
            descriptor: descriptor.into(),
        })
    }
}
