//! The built-in field-by-field serializer.
//!
//! Ordinary data types are encoded through their serde implementation as
//! a positional list of fields. Custom serializers use it for their proxy
//! types, and the factory falls back to it for types registered with
//! [`register_structural`](crate::factory::SerializerFactory::register_structural).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;
use wk_codec::WireValue;

use crate::descriptor::TypeDescriptor;
use crate::error::SerializeError;
use crate::info::{TypeInfo, Typed};
use crate::object::WireObject;
use crate::schema::{FieldNotation, SchemaNotation};

// -----------------------------------------------------------------------------
// Structural

/// A data type encoded as a positional list of its fields.
///
/// [`fields`](Structural::fields) must list the fields in the order the
/// serde implementation writes them. Only the field count is checked at
/// runtime, the names and types end up in the schema.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use wk_custom::impl_typed;
/// use wk_custom::schema::FieldNotation;
/// use wk_custom::{Structural, StructuralSerializer};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Amount {
///     quantity: i64,
///     currency: String,
/// }
///
/// impl_typed!(Amount, "money::Amount");
///
/// impl Structural for Amount {
///     fn fields() -> Vec<FieldNotation> {
///         vec![
///             FieldNotation::of::<i64>("quantity"),
///             FieldNotation::of::<String>("currency"),
///         ]
///     }
/// }
///
/// let serializer = StructuralSerializer::of::<Amount>();
/// let amount = Amount { quantity: 5, currency: "USD".into() };
/// let wire = serializer.encode(&amount).unwrap();
/// let back = serializer.decode(&wire).unwrap();
/// assert_eq!(back.downcast_ref::<Amount>(), Some(&amount));
/// ```
pub trait Structural: Typed + Serialize + DeserializeOwned + fmt::Debug + Send + Sync {
    /// The fields of the type, in wire order.
    fn fields() -> Vec<FieldNotation>;

    /// Notations of the custom types used by the fields.
    #[inline]
    fn field_dependencies() -> Vec<SchemaNotation> {
        Vec::new()
    }
}

// -----------------------------------------------------------------------------
// StructuralSerializer

/// A type-erased serializer for one [`Structural`] type.
pub struct StructuralSerializer {
    type_info: &'static TypeInfo,
    descriptor: TypeDescriptor,
    fields: Vec<FieldNotation>,
    dependencies: fn() -> Vec<SchemaNotation>,
    to_wire: fn(&dyn WireObject) -> Result<WireValue, SerializeError>,
    from_wire: fn(WireValue) -> Result<Box<dyn WireObject>, SerializeError>,
}

fn encode_as<T: Structural>(value: &dyn WireObject) -> Result<WireValue, SerializeError> {
    let value = value
        .downcast_ref::<T>()
        .ok_or_else(|| SerializeError::TypeMismatch {
            expected: T::type_path().into(),
            found: value.type_info().path().into(),
        })?;
    Ok(wk_codec::to_wire_value(value)?)
}

fn decode_as<T: Structural>(payload: WireValue) -> Result<Box<dyn WireObject>, SerializeError> {
    let value: T = wk_codec::from_wire_value(payload)?;
    Ok(Box::new(value))
}

impl StructuralSerializer {
    pub fn of<T: Structural>() -> Self {
        let type_info = T::type_info();
        Self {
            type_info,
            descriptor: TypeDescriptor::for_type(type_info),
            fields: T::fields(),
            dependencies: T::field_dependencies,
            to_wire: encode_as::<T>,
            from_wire: decode_as::<T>,
        }
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The fields in wire order.
    #[inline]
    pub fn fields(&self) -> &[FieldNotation] {
        &self.fields
    }

    /// The composite notation of the type.
    pub fn notation(&self) -> SchemaNotation {
        SchemaNotation::Composite {
            name: self.type_info.path().into(),
            descriptor: self.descriptor.clone(),
            fields: self.fields.clone(),
        }
    }

    /// Notations of the custom types used by the fields.
    #[inline]
    pub fn field_dependencies(&self) -> Vec<SchemaNotation> {
        (self.dependencies)()
    }

    fn check_arity(&self, items: &[WireValue]) -> Result<(), SerializeError> {
        if items.len() == self.fields.len() {
            return Ok(());
        }
        Err(SerializeError::MalformedPayload {
            descriptor: self.descriptor.as_str().into(),
            reason: alloc::format!(
                "expected {} fields, found {}",
                self.fields.len(),
                items.len()
            ),
        })
    }

    /// Writes the fields of `value` as a list, in declared order.
    pub fn encode_fields(&self, value: &dyn WireObject) -> Result<WireValue, SerializeError> {
        let list = (self.to_wire)(value)?;
        self.check_arity(list.expect_list()?)?;
        Ok(list)
    }

    /// Reads a value back from a field list.
    pub fn decode_fields(&self, payload: &WireValue) -> Result<Box<dyn WireObject>, SerializeError> {
        self.check_arity(payload.expect_list()?)?;
        (self.from_wire)(payload.clone())
    }

    /// Writes `value` as a described field list.
    pub fn encode(&self, value: &dyn WireObject) -> Result<WireValue, SerializeError> {
        let fields = self.encode_fields(value)?;
        Ok(WireValue::described(self.descriptor.to_symbol(), fields))
    }

    /// Reads a value written by [`encode`](Self::encode).
    pub fn decode(&self, value: &WireValue) -> Result<Box<dyn WireObject>, SerializeError> {
        let described = value.expect_described()?;
        if described.descriptor != *self.descriptor.as_symbol() {
            return Err(SerializeError::TypeMismatch {
                expected: self.descriptor.as_str().into(),
                found: described.descriptor.as_str().into(),
            });
        }
        self.decode_fields(&described.value)
    }
}

impl fmt::Debug for StructuralSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralSerializer")
            .field("type", &self.type_info.path())
            .field("fields", &self.fields)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use serde::{Deserialize, Serialize};
    use wk_codec::WireValue;

    use super::{Structural, StructuralSerializer};
    use crate::error::SerializeError;
    use crate::impl_typed;
    use crate::schema::{FieldNotation, SchemaNotation};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Leg {
        account: String,
        units: i64,
    }

    // Declares one field too few.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Broken {
        a: i64,
        b: i64,
    }

    impl_typed!(Leg, "test::Leg");
    impl_typed!(Broken, "test::Broken");

    impl Structural for Leg {
        fn fields() -> Vec<FieldNotation> {
            alloc::vec![
                FieldNotation::of::<String>("account"),
                FieldNotation::of::<i64>("units"),
            ]
        }
    }

    impl Structural for Broken {
        fn fields() -> Vec<FieldNotation> {
            alloc::vec![FieldNotation::of::<i64>("a")]
        }
    }

    #[test]
    fn encodes_positionally() {
        let serializer = StructuralSerializer::of::<Leg>();
        let leg = Leg {
            account: String::from("acc-1"),
            units: -3,
        };
        let fields = serializer.encode_fields(&leg).unwrap();
        assert_eq!(
            fields,
            WireValue::List(alloc::vec![WireValue::from("acc-1"), WireValue::Long(-3)])
        );
        let back = serializer.decode_fields(&fields).unwrap();
        assert_eq!(back.downcast_ref::<Leg>(), Some(&leg));
    }

    #[test]
    fn notation_lists_fields() {
        let notation = StructuralSerializer::of::<Leg>().notation();
        assert!(matches!(notation, SchemaNotation::Composite { .. }));
        assert_eq!(notation.name(), "test::Leg");
        assert_eq!(notation.fields().len(), 2);
    }

    #[test]
    fn arity_is_checked_both_ways() {
        let serializer = StructuralSerializer::of::<Broken>();
        let err = serializer.encode_fields(&Broken { a: 1, b: 2 }).unwrap_err();
        assert!(matches!(err, SerializeError::MalformedPayload { .. }));

        let leg = StructuralSerializer::of::<Leg>();
        let err = leg
            .decode_fields(&WireValue::List(alloc::vec![WireValue::from("x")]))
            .unwrap_err();
        assert!(matches!(err, SerializeError::MalformedPayload { .. }));
    }

    #[test]
    fn rejects_other_types() {
        let serializer = StructuralSerializer::of::<Leg>();
        let err = serializer.encode(&5_i64).unwrap_err();
        assert_eq!(
            err,
            SerializeError::TypeMismatch {
                expected: "test::Leg".into(),
                found: "long".into(),
            }
        );
    }
}
