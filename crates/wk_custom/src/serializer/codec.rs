use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use wk_codec::WireValue;

use crate::descriptor::TypeDescriptor;
use crate::error::SerializeError;
use crate::factory::{SerializationInput, SerializationOutput};
use crate::info::{TypeInfo, Typed};
use crate::object::WireObject;
use crate::schema::{FieldNotation, SchemaNotation};

// -----------------------------------------------------------------------------
// PayloadCodec

/// The shape a [`PayloadCodec`] writes, for the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireShape {
    /// A list of named fields.
    Composite(Vec<FieldNotation>),
    /// A value of the named wire type.
    Restricted(String),
}

/// Hand-written payload logic for exact and interface serializers.
///
/// The codec receives values the serializer has already accepted; with an
/// interface serializer that includes subtypes, which the codec views
/// through [`upcast_ref`](crate::WireObject::upcast_ref). Nested custom
/// values should be written with
/// [`SerializationOutput::write_object`] so that they carry their own
/// descriptor.
pub trait PayloadCodec: Send + Sync + 'static {
    fn write_payload(
        &self,
        value: &dyn WireObject,
        output: &mut SerializationOutput<'_>,
    ) -> Result<WireValue, SerializeError>;

    fn read_payload(
        &self,
        payload: &WireValue,
        input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError>;

    /// Defaults to an opaque list.
    fn wire_shape(&self) -> WireShape {
        WireShape::Restricted(String::from("list"))
    }

    /// Notations of other custom types the payload contains.
    fn dependencies(&self) -> Vec<SchemaNotation> {
        Vec::new()
    }
}

// -----------------------------------------------------------------------------
// CodecStrategy

/// A target type bound to a [`PayloadCodec`].
pub struct CodecStrategy {
    target: &'static TypeInfo,
    codec: Box<dyn PayloadCodec>,
}

impl CodecStrategy {
    pub fn new<T: Typed>(codec: impl PayloadCodec) -> Self {
        Self {
            target: T::type_info(),
            codec: Box::new(codec),
        }
    }

    #[inline]
    pub fn target(&self) -> &'static TypeInfo {
        self.target
    }

    #[inline]
    pub fn codec(&self) -> &dyn PayloadCodec {
        &*self.codec
    }

    pub(super) fn notation(&self, descriptor: &TypeDescriptor) -> SchemaNotation {
        let name = String::from(self.target.path());
        let descriptor = descriptor.clone();
        match self.codec.wire_shape() {
            WireShape::Composite(fields) => SchemaNotation::Composite {
                name,
                descriptor,
                fields,
            },
            WireShape::Restricted(source) => SchemaNotation::Restricted {
                name,
                source,
                descriptor,
            },
        }
    }
}
