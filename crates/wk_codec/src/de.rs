use alloc::string::String;
use alloc::vec::{self, Vec};

use serde_core::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};
use serde_core::forward_to_deserialize_any;

use crate::{CodecError, WireKind, WireValue};

// -----------------------------------------------------------------------------
// Entry

/// Rebuilds a serde value from a [`WireValue`].
///
/// This is the inverse of [`to_wire_value`](crate::to_wire_value).
/// Structs are read positionally from a `List`, and by name from a `Map`.
/// A list with more elements than the struct has fields is rejected.
pub fn from_wire_value<T: DeserializeOwned>(value: WireValue) -> Result<T, CodecError> {
    T::deserialize(WireValueDeserializer::new(value))
}

// -----------------------------------------------------------------------------
// WireValueDeserializer

/// A [`serde_core::Deserializer`] reading an owned [`WireValue`].
#[derive(Debug, Clone)]
pub struct WireValueDeserializer {
    value: WireValue,
}

impl WireValueDeserializer {
    #[inline]
    pub const fn new(value: WireValue) -> Self {
        Self { value }
    }
}

fn visit_list<'de, V: Visitor<'de>>(items: Vec<WireValue>, visitor: V) -> Result<V::Value, CodecError> {
    let len = items.len();
    let mut access = ListAccess {
        iter: items.into_iter(),
    };
    let value = visitor.visit_seq(&mut access)?;
    match access.iter.len() {
        0 => Ok(value),
        _ => Err(de::Error::invalid_length(len, &"fewer elements in list")),
    }
}

fn visit_map<'de, V: Visitor<'de>>(
    entries: Vec<(WireValue, WireValue)>,
    visitor: V,
) -> Result<V::Value, CodecError> {
    let mut access = MapAccess {
        iter: entries.into_iter(),
        value: None,
    };
    visitor.visit_map(&mut access)
}

impl<'de> de::Deserializer<'de> for WireValueDeserializer {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CodecError> {
        match self.value {
            WireValue::Null => visitor.visit_unit(),
            WireValue::Bool(v) => visitor.visit_bool(v),
            WireValue::Int(v) => visitor.visit_i32(v),
            WireValue::Long(v) => visitor.visit_i64(v),
            WireValue::ULong(v) => visitor.visit_u64(v),
            WireValue::Double(v) => visitor.visit_f64(v),
            WireValue::Char(v) => visitor.visit_char(v),
            WireValue::String(v) => visitor.visit_string(v),
            WireValue::Symbol(v) => visitor.visit_string(v.into_string()),
            WireValue::Binary(v) => visitor.visit_byte_buf(v),
            WireValue::List(items) => visit_list(items, visitor),
            WireValue::Map(entries) => visit_map(entries, visitor),
            WireValue::Described(described) => Err(CodecError::Custom(alloc::format!(
                "described value `{}` cannot be read structurally",
                described.descriptor
            ))),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CodecError> {
        match self.value {
            WireValue::Null => visitor.visit_none(),
            value => visitor.visit_some(Self::new(value)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, CodecError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, CodecError> {
        match self.value {
            WireValue::List(items) => visit_list(items, visitor),
            WireValue::Map(entries) => visit_map(entries, visitor),
            other => Err(CodecError::Mismatch {
                expected: WireKind::List,
                found: other.kind(),
            }),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, CodecError> {
        let (variant, value) = match self.value {
            WireValue::String(name) => (name, None),
            WireValue::Symbol(name) => (name.into_string(), None),
            WireValue::List(items) if items.len() == 2 => {
                let mut iter = items.into_iter();
                match (iter.next(), iter.next()) {
                    (Some(name), Some(payload)) => {
                        let name = name.expect_str()?.into();
                        (name, Some(payload))
                    }
                    _ => return Err(CodecError::UnexpectedEof),
                }
            }
            other => {
                return Err(CodecError::Mismatch {
                    expected: WireKind::String,
                    found: other.kind(),
                });
            }
        };
        visitor.visit_enum(EnumAccess { variant, value })
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CodecError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
    }
}

impl IntoDeserializer<'_, CodecError> for WireValue {
    type Deserializer = WireValueDeserializer;

    #[inline]
    fn into_deserializer(self) -> WireValueDeserializer {
        WireValueDeserializer::new(self)
    }
}

// -----------------------------------------------------------------------------
// Access helpers

struct ListAccess {
    iter: vec::IntoIter<WireValue>,
}

impl<'de> de::SeqAccess<'de> for ListAccess {
    type Error = CodecError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, CodecError> {
        match self.iter.next() {
            Some(value) => seed.deserialize(WireValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapAccess {
    iter: vec::IntoIter<(WireValue, WireValue)>,
    value: Option<WireValue>,
}

impl<'de> de::MapAccess<'de> for MapAccess {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, CodecError> {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(WireValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, CodecError> {
        let value = self
            .value
            .take()
            .ok_or_else(|| CodecError::custom("map value requested before its key"))?;
        seed.deserialize(WireValueDeserializer::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumAccess {
    variant: String,
    value: Option<WireValue>,
}

impl<'de> de::EnumAccess<'de> for EnumAccess {
    type Error = CodecError;
    type Variant = VariantAccess;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantAccess), CodecError> {
        let name: de::value::StringDeserializer<CodecError> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantAccess { value: self.value }))
    }
}

struct VariantAccess {
    value: Option<WireValue>,
}

impl<'de> de::VariantAccess<'de> for VariantAccess {
    type Error = CodecError;

    fn unit_variant(self) -> Result<(), CodecError> {
        match self.value {
            None | Some(WireValue::Null) => Ok(()),
            Some(other) => Err(CodecError::Mismatch {
                expected: WireKind::Null,
                found: other.kind(),
            }),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, CodecError> {
        let value = self.value.unwrap_or(WireValue::Null);
        seed.deserialize(WireValueDeserializer::new(value))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, CodecError> {
        match self.value {
            Some(WireValue::List(items)) => visit_list(items, visitor),
            other => Err(CodecError::Mismatch {
                expected: WireKind::List,
                found: other.map_or(WireKind::Null, |v| v.kind()),
            }),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, CodecError> {
        match self.value {
            Some(WireValue::List(items)) => visit_list(items, visitor),
            Some(WireValue::Map(entries)) => visit_map(entries, visitor),
            other => Err(CodecError::Mismatch {
                expected: WireKind::List,
                found: other.map_or(WireKind::Null, |v| v.kind()),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
