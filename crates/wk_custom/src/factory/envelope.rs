use alloc::vec::Vec;

use wk_codec::WireValue;

use crate::descriptor::{DESCRIPTOR_DOMAIN, TypeDescriptor};
use crate::error::SerializeError;
use crate::schema::SchemaDocument;

const ENVELOPE: &str = "envelope";

// -----------------------------------------------------------------------------
// Envelope

/// A serialized object graph together with the schema of its custom types.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub body: WireValue,
    pub schema: SchemaDocument,
}

impl Envelope {
    #[inline]
    pub fn new(body: WireValue, schema: SchemaDocument) -> Self {
        Self { body, schema }
    }

    fn tag() -> TypeDescriptor {
        TypeDescriptor::new(DESCRIPTOR_DOMAIN, ENVELOPE)
    }

    /// Encodes the envelope as `described(envelope, [body, schema])`.
    pub fn to_wire(&self) -> WireValue {
        WireValue::described(
            Self::tag().to_symbol(),
            WireValue::List(alloc::vec![self.body.clone(), self.schema.to_wire()]),
        )
    }

    pub fn from_wire(value: &WireValue) -> Result<Self, SerializeError> {
        let tag = Self::tag();
        let described = value.expect_described()?;
        let malformed = |reason: &str| SerializeError::MalformedPayload {
            descriptor: tag.as_str().into(),
            reason: reason.into(),
        };
        if described.descriptor != *tag.as_symbol() {
            return Err(malformed("not an envelope"));
        }
        match described.value.expect_list()? {
            [body, schema] => Ok(Self {
                body: body.clone(),
                schema: SchemaDocument::from_wire(schema)?,
            }),
            _ => Err(malformed("expected body and schema")),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        Ok(wk_codec::to_bytes(&self.to_wire())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializeError> {
        Self::from_wire(&wk_codec::from_bytes(bytes)?)
    }
}
