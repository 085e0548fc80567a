use alloc::string::{String, ToString};
use alloc::vec::Vec;

use wk_codec::{Symbol, WireValue};

use crate::descriptor::{DESCRIPTOR_DOMAIN, TypeDescriptor};
use crate::error::SerializeError;
use crate::info::TypePath;

const COMPOSITE: &str = "composite-type";
const RESTRICTED: &str = "restricted-type";
const FIELD: &str = "field";

fn tag(name: &str) -> Symbol {
    TypeDescriptor::new(DESCRIPTOR_DOMAIN, name).to_symbol()
}

fn malformed(what: &str, reason: impl ToString) -> SerializeError {
    SerializeError::MalformedPayload {
        descriptor: alloc::format!("{DESCRIPTOR_DOMAIN}:{what}"),
        reason: reason.to_string(),
    }
}

// Unwraps a described list of exactly `N` items tagged `what`.
fn described_items<'a, const N: usize>(
    value: &'a WireValue,
    what: &str,
) -> Result<&'a [WireValue; N], SerializeError> {
    let described = value.expect_described()?;
    if described.descriptor != tag(what) {
        return Err(malformed(what, alloc::format!("unexpected tag `{}`", described.descriptor)));
    }
    let items = described.value.expect_list()?;
    <&[WireValue; N]>::try_from(items)
        .map_err(|_| malformed(what, alloc::format!("expected {N} items, found {}", items.len())))
}

fn read_descriptor(value: &WireValue, what: &str) -> Result<TypeDescriptor, SerializeError> {
    let text = value.expect_str()?;
    TypeDescriptor::parse(text).ok_or_else(|| malformed(what, alloc::format!("bad descriptor `{text}`")))
}

// -----------------------------------------------------------------------------
// FieldNotation

/// One field of a composite type, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNotation {
    name: String,
    wire_type: String,
    mandatory: bool,
}

impl FieldNotation {
    /// A mandatory field.
    pub fn new(name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.into(),
            mandatory: true,
        }
    }

    /// A field that may be null.
    pub fn optional(name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        Self {
            mandatory: false,
            ..Self::new(name, wire_type)
        }
    }

    /// A mandatory field holding a `T`.
    #[inline]
    pub fn of<T: TypePath>(name: impl Into<String>) -> Self {
        Self::new(name, T::type_path())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn wire_type(&self) -> &str {
        &self.wire_type
    }

    #[inline]
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    fn to_wire(&self) -> WireValue {
        WireValue::described(
            tag(FIELD),
            WireValue::List(alloc::vec![
                WireValue::from(self.name.as_str()),
                WireValue::from(self.wire_type.as_str()),
                WireValue::Bool(self.mandatory),
            ]),
        )
    }

    fn from_wire(value: &WireValue) -> Result<Self, SerializeError> {
        let [name, wire_type, mandatory] = described_items::<3>(value, FIELD)?;
        let mandatory = match mandatory {
            WireValue::Bool(flag) => *flag,
            other => return Err(malformed(FIELD, alloc::format!("mandatory flag is {}", other.kind()))),
        };
        Ok(Self {
            name: name.expect_str()?.into(),
            wire_type: wire_type.expect_str()?.into(),
            mandatory,
        })
    }
}

// -----------------------------------------------------------------------------
// SchemaNotation

/// The schema description of one wire type.
///
/// A `Composite` lists its fields in wire order. A `Restricted` type reuses
/// the encoding of its `source` type under a descriptor of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNotation {
    Composite {
        name: String,
        descriptor: TypeDescriptor,
        fields: Vec<FieldNotation>,
    },
    Restricted {
        name: String,
        source: String,
        descriptor: TypeDescriptor,
    },
}

impl SchemaNotation {
    /// Returns the name of the described type.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Composite { name, .. } | Self::Restricted { name, .. } => name,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        match self {
            Self::Composite { descriptor, .. } | Self::Restricted { descriptor, .. } => descriptor,
        }
    }

    /// Returns the fields of a composite, or an empty slice.
    #[inline]
    pub fn fields(&self) -> &[FieldNotation] {
        match self {
            Self::Composite { fields, .. } => fields,
            Self::Restricted { .. } => &[],
        }
    }

    /// Returns the source type of a restricted type.
    #[inline]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Restricted { source, .. } => Some(source),
            Self::Composite { .. } => None,
        }
    }

    /// Encodes the notation as a described value.
    pub fn to_wire(&self) -> WireValue {
        match self {
            Self::Composite {
                name,
                descriptor,
                fields,
            } => WireValue::described(
                tag(COMPOSITE),
                WireValue::List(alloc::vec![
                    WireValue::from(name.as_str()),
                    WireValue::Symbol(descriptor.to_symbol()),
                    WireValue::List(fields.iter().map(FieldNotation::to_wire).collect()),
                ]),
            ),
            Self::Restricted {
                name,
                source,
                descriptor,
            } => WireValue::described(
                tag(RESTRICTED),
                WireValue::List(alloc::vec![
                    WireValue::from(name.as_str()),
                    WireValue::from(source.as_str()),
                    WireValue::Symbol(descriptor.to_symbol()),
                ]),
            ),
        }
    }

    /// Decodes a notation written by [`to_wire`](Self::to_wire).
    pub fn from_wire(value: &WireValue) -> Result<Self, SerializeError> {
        let described = value.expect_described()?;
        if described.descriptor == tag(RESTRICTED) {
            let [name, source, descriptor] = described_items::<3>(value, RESTRICTED)?;
            return Ok(Self::Restricted {
                name: name.expect_str()?.into(),
                source: source.expect_str()?.into(),
                descriptor: read_descriptor(descriptor, RESTRICTED)?,
            });
        }
        let [name, descriptor, fields] = described_items::<3>(value, COMPOSITE)?;
        Ok(Self::Composite {
            name: name.expect_str()?.into(),
            descriptor: read_descriptor(descriptor, COMPOSITE)?,
            fields: fields
                .expect_list()?
                .iter()
                .map(FieldNotation::from_wire)
                .collect::<Result<_, _>>()?,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
