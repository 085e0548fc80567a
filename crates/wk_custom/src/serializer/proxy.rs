use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use wk_codec::WireValue;

use crate::descriptor::TypeDescriptor;
use crate::error::SerializeError;
use crate::info::{TypeInfo, Typed};
use crate::object::WireObject;
use crate::schema::SchemaNotation;
use crate::serializer::type_mismatch;
use crate::structural::{Structural, StructuralSerializer};

// -----------------------------------------------------------------------------
// ProxyConvert

/// Conversion between a target type and a plain data proxy.
///
/// The proxy is written by the structural serializer, so the target's wire
/// form is the proxy's field list. `from_proxy` may reject proxies that
/// violate the target's invariants.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use wk_custom::{impl_typed, SerializeError, Structural};
/// use wk_custom::schema::FieldNotation;
/// use wk_custom::serializer::ProxyConvert;
///
/// #[derive(Debug, PartialEq)]
/// struct Ratio { num: i64, den: i64 }
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct RatioProxy { num: i64, den: i64 }
///
/// impl_typed!(Ratio, "math::Ratio");
/// impl_typed!(RatioProxy, "math::RatioProxy");
///
/// impl Structural for RatioProxy {
///     fn fields() -> Vec<FieldNotation> {
///         vec![FieldNotation::of::<i64>("num"), FieldNotation::of::<i64>("den")]
///     }
/// }
///
/// struct RatioConvert;
///
/// impl ProxyConvert for RatioConvert {
///     type Target = Ratio;
///     type Proxy = RatioProxy;
///
///     fn to_proxy(&self, value: &Ratio) -> RatioProxy {
///         RatioProxy { num: value.num, den: value.den }
///     }
///
///     fn from_proxy(&self, proxy: RatioProxy) -> Result<Ratio, SerializeError> {
///         if proxy.den == 0 {
///             return Err(SerializeError::Construct {
///                 type_path: "math::Ratio".into(),
///                 reason: "zero denominator".into(),
///             });
///         }
///         Ok(Ratio { num: proxy.num, den: proxy.den })
///     }
/// }
///
/// assert!(RatioConvert.from_proxy(RatioProxy { num: 1, den: 0 }).is_err());
/// ```
pub trait ProxyConvert: Send + Sync + 'static {
    type Target: Typed + Debug + Send + Sync;
    type Proxy: Structural;

    fn to_proxy(&self, value: &Self::Target) -> Self::Proxy;

    fn from_proxy(&self, proxy: Self::Proxy) -> Result<Self::Target, SerializeError>;
}

trait ErasedProxy: Send + Sync {
    fn write_fields(
        &self,
        value: &dyn WireObject,
        structural: &StructuralSerializer,
    ) -> Result<WireValue, SerializeError>;

    fn read_fields(
        &self,
        payload: &WireValue,
        structural: &StructuralSerializer,
    ) -> Result<Box<dyn WireObject>, SerializeError>;
}

impl<C: ProxyConvert> ErasedProxy for C {
    fn write_fields(
        &self,
        value: &dyn WireObject,
        structural: &StructuralSerializer,
    ) -> Result<WireValue, SerializeError> {
        let target = value
            .upcast_ref::<C::Target>()
            .ok_or_else(|| type_mismatch(C::Target::type_info(), value.type_info()))?;
        let proxy = self.to_proxy(target);
        structural.encode_fields(&proxy)
    }

    fn read_fields(
        &self,
        payload: &WireValue,
        structural: &StructuralSerializer,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        let decoded = structural.decode_fields(payload)?;
        let found = decoded.type_info();
        let proxy = decoded
            .take::<C::Proxy>()
            .ok_or_else(|| type_mismatch(C::Proxy::type_info(), found))?;
        let target = self.from_proxy(proxy)?;
        Ok(Box::new(target))
    }
}

// -----------------------------------------------------------------------------
// ProxyStrategy

/// Writes a target type through its proxy's structural encoding.
///
/// By default only the exact target type matches.
/// [`with_inheritance`](Self::with_inheritance) extends that to subtypes,
/// which must reach the target through upcast edges to be written.
pub struct ProxyStrategy {
    target: &'static TypeInfo,
    with_inheritance: bool,
    structural: StructuralSerializer,
    convert: Box<dyn ErasedProxy>,
}

impl ProxyStrategy {
    pub fn new<C: ProxyConvert>(convert: C) -> Self {
        Self {
            target: C::Target::type_info(),
            with_inheritance: false,
            structural: StructuralSerializer::of::<C::Proxy>(),
            convert: Box::new(convert),
        }
    }

    #[inline]
    pub fn with_inheritance(mut self, with_inheritance: bool) -> Self {
        self.with_inheritance = with_inheritance;
        self
    }

    #[inline]
    pub fn target(&self) -> &'static TypeInfo {
        self.target
    }

    /// The type info of the proxy type.
    #[inline]
    pub fn proxy_type(&self) -> &'static TypeInfo {
        self.structural.type_info()
    }

    #[inline]
    pub fn is_with_inheritance(&self) -> bool {
        self.with_inheritance
    }

    pub(super) fn matches(&self, candidate: &TypeInfo) -> bool {
        if self.with_inheritance {
            candidate.is_assignable_to(self.target)
        } else {
            *candidate == *self.target
        }
    }

    pub(super) fn write_payload(&self, value: &dyn WireObject) -> Result<WireValue, SerializeError> {
        self.convert.write_fields(value, &self.structural)
    }

    pub(super) fn read_payload(
        &self,
        payload: &WireValue,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        self.convert.read_fields(payload, &self.structural)
    }

    // Named after the target, laid out like the proxy.
    pub(super) fn notation(&self, descriptor: &TypeDescriptor) -> SchemaNotation {
        SchemaNotation::Composite {
            name: self.target.path().into(),
            descriptor: descriptor.clone(),
            fields: self.structural.fields().to_vec(),
        }
    }

    pub(super) fn dependencies(&self) -> Vec<SchemaNotation> {
        self.structural.field_dependencies()
    }
}
