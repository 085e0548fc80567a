use alloc::string::String;
use alloc::vec::Vec;

use serde_core::ser::{self, Serialize};

use crate::{CodecError, WireValue};

// -----------------------------------------------------------------------------
// Entry

/// Converts any serde value into a [`WireValue`].
///
/// # Mapping
///
/// - Structs and tuples become a `List` of their fields, in declaration order.
/// - Maps become a `Map`, sequences a `List`.
/// - `None` and unit values become `Null`, `Some(v)` is encoded as `v`.
/// - Unit variants become a `String` holding the variant name; data-carrying
///   variants become `[name, payload]`.
///
/// Field names are not part of the encoding: the field order of the
/// structural type is the wire contract.
///
/// # Examples
///
/// ```
/// use wk_codec::{to_wire_value, WireValue};
///
/// let value = to_wire_value(&(7_i64, "USD")).unwrap();
/// assert_eq!(
///     value,
///     WireValue::List(vec![WireValue::Long(7), WireValue::String("USD".into())]),
/// );
/// ```
pub fn to_wire_value<T: ?Sized + Serialize>(value: &T) -> Result<WireValue, CodecError> {
    value.serialize(WireValueSerializer)
}

// -----------------------------------------------------------------------------
// WireValueSerializer

/// A [`serde_core::Serializer`] producing [`WireValue`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireValueSerializer;

impl ser::Serializer for WireValueSerializer {
    type Ok = WireValue;
    type Error = CodecError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeList;
    type SerializeStructVariant = SerializeVariant;

    fn serialize_bool(self, v: bool) -> Result<WireValue, CodecError> {
        Ok(WireValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<WireValue, CodecError> {
        Ok(WireValue::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<WireValue, CodecError> {
        Ok(WireValue::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<WireValue, CodecError> {
        Ok(WireValue::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<WireValue, CodecError> {
        Ok(WireValue::Long(v))
    }

    fn serialize_u8(self, v: u8) -> Result<WireValue, CodecError> {
        Ok(WireValue::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<WireValue, CodecError> {
        Ok(WireValue::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<WireValue, CodecError> {
        Ok(WireValue::Long(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<WireValue, CodecError> {
        Ok(WireValue::ULong(v))
    }

    fn serialize_f32(self, v: f32) -> Result<WireValue, CodecError> {
        Ok(WireValue::Double(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<WireValue, CodecError> {
        Ok(WireValue::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<WireValue, CodecError> {
        Ok(WireValue::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<WireValue, CodecError> {
        Ok(WireValue::String(v.into()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<WireValue, CodecError> {
        Ok(WireValue::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<WireValue, CodecError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<WireValue, CodecError> {
        Ok(WireValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<WireValue, CodecError> {
        Ok(WireValue::String(variant.into()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<WireValue, CodecError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<WireValue, CodecError> {
        Ok(WireValue::List(alloc::vec![
            WireValue::String(variant.into()),
            value.serialize(self)?,
        ]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList, CodecError> {
        Ok(SerializeList::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList, CodecError> {
        Ok(SerializeList::with_capacity(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeList, CodecError> {
        Ok(SerializeList::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant, CodecError> {
        Ok(SerializeVariant::new(variant, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, CodecError> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeList, CodecError> {
        Ok(SerializeList::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant, CodecError> {
        Ok(SerializeVariant::new(variant, len))
    }
}

// -----------------------------------------------------------------------------
// Compound serializers

#[doc(hidden)]
pub struct SerializeList {
    items: Vec<WireValue>,
}

impl SerializeList {
    fn with_capacity(len: usize) -> Self {
        Self {
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        self.items.push(to_wire_value(value)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeList {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::List(self.items))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::List(self.items))
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::List(self.items))
    }
}

impl ser::SerializeStruct for SerializeList {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), CodecError> {
        self.push(value)
    }

    // A skipped field would shift every later field, breaking positional decoding.
    fn skip_field(&mut self, key: &'static str) -> Result<(), CodecError> {
        Err(CodecError::Custom(alloc::format!(
            "field `{key}` cannot be skipped in a positional encoding"
        )))
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::List(self.items))
    }
}

#[doc(hidden)]
pub struct SerializeVariant {
    variant: &'static str,
    items: Vec<WireValue>,
}

impl SerializeVariant {
    fn new(variant: &'static str, len: usize) -> Self {
        Self {
            variant,
            items: Vec::with_capacity(len),
        }
    }

    fn finish(self) -> WireValue {
        WireValue::List(alloc::vec![
            WireValue::String(String::from(self.variant)),
            WireValue::List(self.items),
        ])
    }
}

impl ser::SerializeTupleVariant for SerializeVariant {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        self.items.push(to_wire_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeVariant {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), CodecError> {
        self.items.push(to_wire_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(self.finish())
    }
}

#[doc(hidden)]
pub struct SerializeMap {
    entries: Vec<(WireValue, WireValue)>,
    next_key: Option<WireValue>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = WireValue;
    type Error = CodecError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), CodecError> {
        self.next_key = Some(to_wire_value(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), CodecError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| CodecError::custom("map value serialized before its key"))?;
        self.entries.push((key, to_wire_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<WireValue, CodecError> {
        Ok(WireValue::Map(self.entries))
    }
}
