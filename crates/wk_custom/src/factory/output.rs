use wk_codec::WireValue;

use crate::error::SerializeError;
use crate::factory::{Envelope, SerializerFactory, primitive};
use crate::info::TypeInfo;
use crate::object::WireObject;
use crate::schema::{SchemaDocument, SchemaNotation};
use crate::serializer::type_mismatch;

// -----------------------------------------------------------------------------
// SerializationOutput

/// The writing side of one serialization.
///
/// Collects the schema notations declared while writing. A failed write
/// leaves the output unusable; start a new one instead.
pub struct SerializationOutput<'a> {
    factory: &'a SerializerFactory,
    schema: SchemaDocument,
}

impl<'a> SerializationOutput<'a> {
    #[inline]
    pub fn new(factory: &'a SerializerFactory) -> Self {
        Self {
            factory,
            schema: SchemaDocument::new(),
        }
    }

    #[inline]
    pub fn factory(&self) -> &'a SerializerFactory {
        self.factory
    }

    /// Writes `value` as its own runtime type.
    #[inline]
    pub fn write_object(&mut self, value: &dyn WireObject) -> Result<WireValue, SerializeError> {
        self.write_object_as(value, value.type_info())
    }

    /// Writes `value`, which must be assignable to `declared`.
    ///
    /// Primitives are written as themselves. Other values go to the first
    /// matching custom serializer, then to a registered structural
    /// serializer.
    pub fn write_object_as(
        &mut self,
        value: &dyn WireObject,
        declared: &TypeInfo,
    ) -> Result<WireValue, SerializeError> {
        if let Some(primitive) = primitive::to_wire(value) {
            return Ok(primitive);
        }
        let factory = self.factory;
        let runtime = value.type_info();

        if let Some(serializer) = factory.resolve(runtime) {
            let encoded = serializer.encode(value, declared, self)?;
            serializer.declare_wire_types(self);
            return Ok(encoded);
        }

        if let Some(structural) = factory.structural_serializer_for(runtime) {
            if !runtime.is_assignable_to(declared) {
                return Err(type_mismatch(declared, runtime));
            }
            let encoded = structural.encode(value)?;
            self.declare(structural.notation());
            self.schema.extend(structural.field_dependencies());
            return Ok(encoded);
        }

        Err(SerializeError::NoSerializer {
            type_path: runtime.path().into(),
        })
    }

    /// Adds `notation` to the schema unless its descriptor is present.
    pub fn declare(&mut self, notation: SchemaNotation) -> bool {
        let added = self.schema.insert(notation);
        if added {
            log::trace!("declared wire type #{}", self.schema.len());
        }
        added
    }

    #[inline]
    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    /// Pairs `body` with the collected schema.
    #[inline]
    pub fn finish(self, body: WireValue) -> Envelope {
        Envelope::new(body, self.schema)
    }
}
