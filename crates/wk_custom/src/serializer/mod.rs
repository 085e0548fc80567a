//! Custom serializers and their strategies.
//!
//! A [`CustomSerializer`] owns one wire type: it decides which runtime types
//! it accepts, how their payload is written, and which schema notation
//! describes it. The payload logic is one of five [`Strategy`] variants.

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod forwarding;
mod proxy;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{CodecStrategy, PayloadCodec, WireShape};
pub use forwarding::ForwardingStrategy;
pub use proxy::{ProxyConvert, ProxyStrategy};
pub use scalar::ScalarStringStrategy;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::{Debug, Display};
use core::str::FromStr;
use std::sync::OnceLock;

use wk_codec::WireValue;

use crate::descriptor::TypeDescriptor;
use crate::error::SerializeError;
use crate::factory::{SerializationInput, SerializationOutput};
use crate::hash::HashSet;
use crate::info::{TypeInfo, Typed};
use crate::object::WireObject;
use crate::schema::{SchemaDocument, SchemaNotation};

// -----------------------------------------------------------------------------
// Strategy

/// How a [`CustomSerializer`] matches types and writes payloads.
pub enum Strategy {
    /// Matches exactly one runtime type.
    Exact(CodecStrategy),
    /// Matches every type assignable to the target.
    Interface(CodecStrategy),
    /// Reuses a parent serializer's payload for one subclass, under a
    /// descriptor of its own.
    SubclassForwarding(ForwardingStrategy),
    /// Writes the fields of a proxy value.
    Proxy(ProxyStrategy),
    /// Writes a single string.
    ScalarString(ScalarStringStrategy),
}

impl Strategy {
    /// A short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Interface(_) => "interface",
            Self::SubclassForwarding(_) => "subclass-forwarding",
            Self::Proxy(_) => "proxy",
            Self::ScalarString(_) => "scalar-string",
        }
    }

    fn target(&self) -> &'static TypeInfo {
        match self {
            Self::Exact(s) | Self::Interface(s) => s.target(),
            Self::SubclassForwarding(s) => s.subclass(),
            Self::Proxy(s) => s.target(),
            Self::ScalarString(s) => s.target(),
        }
    }

    fn descriptor(&self) -> TypeDescriptor {
        match self {
            Self::SubclassForwarding(s) => {
                TypeDescriptor::fingerprinted(s.parent().type_descriptor(), s.subclass().path())
            }
            other => TypeDescriptor::for_type(other.target()),
        }
    }

    fn matches(&self, candidate: &TypeInfo) -> bool {
        match self {
            Self::Exact(s) => *candidate == *s.target(),
            Self::Interface(s) => candidate.is_assignable_to(s.target()),
            Self::SubclassForwarding(s) => *candidate == *s.subclass(),
            Self::Proxy(s) => s.matches(candidate),
            Self::ScalarString(s) => s.matches(candidate),
        }
    }

    fn write_payload(
        &self,
        value: &dyn WireObject,
        output: &mut SerializationOutput<'_>,
    ) -> Result<WireValue, SerializeError> {
        match self {
            Self::Exact(s) | Self::Interface(s) => s.codec().write_payload(value, output),
            Self::SubclassForwarding(s) => s.parent().strategy.write_payload(value, output),
            Self::Proxy(s) => s.write_payload(value),
            Self::ScalarString(s) => s.to_proxy(value).map(WireValue::String),
        }
    }

    fn read_payload(
        &self,
        payload: &WireValue,
        input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        match self {
            Self::Exact(s) | Self::Interface(s) => s.codec().read_payload(payload, input),
            Self::SubclassForwarding(s) => {
                let decoded = s.parent().strategy.read_payload(payload, input)?;
                s.rebuild(decoded)
            }
            Self::Proxy(s) => s.read_payload(payload),
            Self::ScalarString(s) => s.from_proxy(payload.expect_str()?),
        }
    }

    fn notation(&self, descriptor: &TypeDescriptor) -> SchemaNotation {
        match self {
            Self::Exact(s) | Self::Interface(s) => s.notation(descriptor),
            Self::SubclassForwarding(s) => SchemaNotation::Restricted {
                name: s.subclass().path().into(),
                source: s.parent().target().path().into(),
                descriptor: descriptor.clone(),
            },
            Self::Proxy(s) => s.notation(descriptor),
            Self::ScalarString(s) => SchemaNotation::Restricted {
                name: s.target().path().into(),
                source: String::from("string"),
                descriptor: descriptor.clone(),
            },
        }
    }

    fn dependencies(&self) -> Vec<SchemaNotation> {
        match self {
            Self::Exact(s) | Self::Interface(s) => s.codec().dependencies(),
            Self::SubclassForwarding(s) => s.parent().schema_for_documentation().iter().cloned().collect(),
            Self::Proxy(s) => s.dependencies(),
            Self::ScalarString(_) => Vec::new(),
        }
    }
}

impl From<ForwardingStrategy> for Strategy {
    #[inline]
    fn from(strategy: ForwardingStrategy) -> Self {
        Self::SubclassForwarding(strategy)
    }
}

impl From<ProxyStrategy> for Strategy {
    #[inline]
    fn from(strategy: ProxyStrategy) -> Self {
        Self::Proxy(strategy)
    }
}

impl From<ScalarStringStrategy> for Strategy {
    #[inline]
    fn from(strategy: ScalarStringStrategy) -> Self {
        Self::ScalarString(strategy)
    }
}

pub(crate) fn type_mismatch(expected: &TypeInfo, found: &TypeInfo) -> SerializeError {
    SerializeError::TypeMismatch {
        expected: expected.path().into(),
        found: found.path().into(),
    }
}

// -----------------------------------------------------------------------------
// CustomSerializer

/// The serializer of one custom wire type.
///
/// # Contract
///
/// - [`is_serializer_for`](Self::is_serializer_for) decides which runtime
///   types the serializer accepts; [`encode`](Self::encode) refuses others.
/// - The descriptor is fixed at construction and written in front of every
///   payload; [`decode`](Self::decode) refuses other descriptors.
/// - Decoding an encoded value yields an equal value.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wk_custom::impl_typed;
/// use wk_custom::factory::SerializerFactory;
/// use wk_custom::serializer::CustomSerializer;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Currency(String);
///
/// impl std::fmt::Display for Currency {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str(&self.0)
///     }
/// }
///
/// impl std::str::FromStr for Currency {
///     type Err = String;
///
///     fn from_str(s: &str) -> Result<Self, String> {
///         match s.len() {
///             3 => Ok(Currency(s.into())),
///             _ => Err(format!("`{s}` is not an ISO 4217 code")),
///         }
///     }
/// }
///
/// impl_typed!(Currency, "money::Currency");
///
/// let mut factory = SerializerFactory::new();
/// factory.register(CustomSerializer::scalar_string::<Currency>()).unwrap();
///
/// let usd = Currency("USD".into());
/// assert_eq!(factory.round_trip(&usd).unwrap(), usd);
/// ```
pub struct CustomSerializer {
    descriptor: TypeDescriptor,
    strategy: Strategy,
    additional: Vec<Arc<CustomSerializer>>,
    notation: OnceLock<SchemaNotation>,
    documentation: OnceLock<SchemaDocument>,
}

impl CustomSerializer {
    /// Creates a serializer from a strategy.
    ///
    /// The descriptor is derived from the target type, or fingerprinted
    /// from the parent for subclass forwarding.
    pub fn new(strategy: impl Into<Strategy>) -> Self {
        let strategy = strategy.into();
        Self {
            descriptor: strategy.descriptor(),
            strategy,
            additional: Vec::new(),
            notation: OnceLock::new(),
            documentation: OnceLock::new(),
        }
    }

    /// A serializer for exactly `T`, writing payloads with `codec`.
    #[inline]
    pub fn exact<T: Typed>(codec: impl PayloadCodec) -> Self {
        Self::new(Strategy::Exact(CodecStrategy::new::<T>(codec)))
    }

    /// A serializer for `T` and every type assignable to it.
    #[inline]
    pub fn interface<T: Typed>(codec: impl PayloadCodec) -> Self {
        Self::new(Strategy::Interface(CodecStrategy::new::<T>(codec)))
    }

    /// A serializer for exactly the proxied target type.
    #[inline]
    pub fn proxy<C: ProxyConvert>(convert: C) -> Self {
        Self::new(ProxyStrategy::new(convert))
    }

    /// A serializer writing exactly `T` as its `Display` text and reading it
    /// back through `FromStr`.
    #[inline]
    pub fn scalar_string<T>() -> Self
    where
        T: Typed + Debug + Send + Sync + Display + FromStr,
        T::Err: Display,
    {
        Self::new(ScalarStringStrategy::new::<T>())
    }

    /// A serializer writing `S` with `parent`'s payload logic.
    ///
    /// Decoding yields whatever `parent` decodes, typically an `S` viewed
    /// as the parent type. Fails if `S` is not assignable to the parent's
    /// target type.
    #[inline]
    pub fn subclass<S: Typed>(parent: Arc<CustomSerializer>) -> Result<Self, SerializeError> {
        ForwardingStrategy::new::<S>(parent).map(Self::new)
    }

    /// Like [`subclass`](Self::subclass), rebuilding an `S` from the decoded
    /// parent value.
    #[inline]
    pub fn subclass_rebuilding<S, P>(parent: Arc<CustomSerializer>) -> Result<Self, SerializeError>
    where
        S: Typed + From<P> + Debug + Send + Sync,
        P: Typed,
    {
        ForwardingStrategy::rebuilding::<S, P>(parent).map(Self::new)
    }

    /// Adds serializers the factory must also register.
    pub fn with_additional(
        mut self,
        serializers: impl IntoIterator<Item = Arc<CustomSerializer>>,
    ) -> Self {
        self.additional.extend(serializers);
        self
    }

    #[inline]
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The type this serializer is written for.
    #[inline]
    pub fn target(&self) -> &'static TypeInfo {
        self.strategy.target()
    }

    #[inline]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    #[inline]
    pub fn additional_serializers(&self) -> &[Arc<CustomSerializer>] {
        &self.additional
    }

    /// Returns `true` if values of `candidate` may be handed to
    /// [`encode`](Self::encode).
    #[inline]
    pub fn is_serializer_for(&self, candidate: &TypeInfo) -> bool {
        self.strategy.matches(candidate)
    }

    /// Writes `value` as a described payload.
    ///
    /// `declared` is the static type the value is written as; the value
    /// must be assignable to it.
    pub fn encode(
        &self,
        value: &dyn WireObject,
        declared: &TypeInfo,
        output: &mut SerializationOutput<'_>,
    ) -> Result<WireValue, SerializeError> {
        let runtime = value.type_info();
        if !self.is_serializer_for(runtime) {
            return Err(type_mismatch(self.target(), runtime));
        }
        if !runtime.is_assignable_to(declared) {
            return Err(type_mismatch(declared, runtime));
        }
        let payload = self.strategy.write_payload(value, output)?;
        Ok(WireValue::described(self.descriptor.to_symbol(), payload))
    }

    /// Reads a value written by [`encode`](Self::encode).
    pub fn decode(
        &self,
        value: &WireValue,
        input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        let described = value.expect_described()?;
        if described.descriptor != *self.descriptor.as_symbol() {
            return Err(SerializeError::TypeMismatch {
                expected: self.descriptor.as_str().into(),
                found: described.descriptor.as_str().into(),
            });
        }
        self.strategy.read_payload(&described.value, input)
    }

    // Reads a bare payload, bypassing the descriptor check.
    pub(crate) fn decode_payload(
        &self,
        payload: &WireValue,
        input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        self.strategy.read_payload(payload, input)
    }

    /// The notation describing this serializer's wire type. Built once.
    pub fn schema_notation(&self) -> &SchemaNotation {
        self.notation
            .get_or_init(|| self.strategy.notation(&self.descriptor))
    }

    /// Adds the notations a reader needs but cannot derive on its own.
    ///
    /// Only subclass forwarding declares anything: its restricted notation
    /// tells a reader which parent type the payload belongs to.
    pub fn declare_wire_types(&self, output: &mut SerializationOutput<'_>) {
        if let Strategy::SubclassForwarding(_) = self.strategy {
            output.declare(self.schema_notation().clone());
        }
    }

    /// Every notation this serializer and its additional serializers
    /// describe, deduplicated by descriptor. Built once.
    pub fn schema_for_documentation(&self) -> &SchemaDocument {
        self.documentation.get_or_init(|| {
            let mut document = SchemaDocument::new();
            let mut visited = HashSet::default();
            self.collect_documentation(&mut document, &mut visited);
            document
        })
    }

    fn collect_documentation(&self, document: &mut SchemaDocument, visited: &mut HashSet<String>) {
        if !visited.insert(self.descriptor.as_str().into()) {
            return;
        }
        document.insert(self.schema_notation().clone());
        document.extend(self.strategy.dependencies());
        for serializer in &self.additional {
            serializer.collect_documentation(document, visited);
        }
    }
}

impl Debug for CustomSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSerializer")
            .field("descriptor", &self.descriptor.as_str())
            .field("strategy", &self.strategy.name())
            .field("target", &self.target().path())
            .field("additional", &self.additional.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use wk_codec::WireValue;

    use super::{CustomSerializer, ScalarStringStrategy};
    use crate::DESCRIPTOR_DOMAIN;
    use crate::error::SerializeError;
    use crate::factory::{SerializationInput, SerializationOutput, SerializerFactory};
    use crate::fixtures::{
        Crypto, Currency, CurrencyCodec, Token, UnitCodec, Unrelated, btc, usd,
    };
    use crate::info::Typed;
    use crate::schema::{SchemaDocument, SchemaNotation};

    #[test]
    fn exact_and_interface_predicates() {
        let exact = CustomSerializer::exact::<Currency>(CurrencyCodec);
        assert!(exact.is_serializer_for(Currency::type_info()));
        assert!(!exact.is_serializer_for(Crypto::type_info()));

        let interface = CustomSerializer::interface::<Currency>(CurrencyCodec);
        assert!(interface.is_serializer_for(Currency::type_info()));
        assert!(interface.is_serializer_for(Crypto::type_info()));
        assert!(!interface.is_serializer_for(Unrelated::type_info()));
    }

    #[test]
    fn inheritance_flag_widens_scalar_match() {
        let plain = CustomSerializer::scalar_string::<Currency>();
        assert!(!plain.is_serializer_for(Crypto::type_info()));

        let widened = CustomSerializer::new(ScalarStringStrategy::new::<Currency>().with_inheritance(true));
        assert!(widened.is_serializer_for(Crypto::type_info()));
    }

    #[test]
    fn encode_refuses_unaccepted_values() {
        let factory = SerializerFactory::new();
        let mut output = SerializationOutput::new(&factory);
        let exact = CustomSerializer::exact::<Currency>(CurrencyCodec);

        let err = exact
            .encode(&btc(), Crypto::type_info(), &mut output)
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::TypeMismatch {
                expected: "test::Currency".into(),
                found: "test::Crypto".into(),
            }
        );

        // The value must also fit the declared type.
        let err = exact
            .encode(&usd(), Crypto::type_info(), &mut output)
            .unwrap_err();
        assert!(matches!(err, SerializeError::TypeMismatch { .. }));
    }

    #[test]
    fn decode_checks_descriptor() {
        let factory = SerializerFactory::new();
        let schema = SchemaDocument::new();
        let mut output = SerializationOutput::new(&factory);
        let mut input = SerializationInput::new(&factory, &schema);

        let currency = CustomSerializer::scalar_string::<Currency>();
        let crypto = CustomSerializer::scalar_string::<Crypto>();
        let encoded = currency
            .encode(&usd(), Currency::type_info(), &mut output)
            .unwrap();

        let decoded = currency.decode(&encoded, &mut input).unwrap();
        assert_eq!(decoded.downcast_ref::<Currency>(), Some(&usd()));
        assert!(matches!(
            crypto.decode(&encoded, &mut input),
            Err(SerializeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            currency.decode(&WireValue::from("USD"), &mut input),
            Err(SerializeError::Codec(_))
        ));
    }

    #[test]
    fn scalar_string_payload_and_notation() {
        let factory = SerializerFactory::new();
        let mut output = SerializationOutput::new(&factory);
        let serializer = CustomSerializer::scalar_string::<Currency>();

        let encoded = serializer
            .encode(&usd(), Currency::type_info(), &mut output)
            .unwrap();
        let described = encoded.as_described().unwrap();
        assert_eq!(described.descriptor.as_str(), "net.wirekit:test::Currency");
        assert_eq!(described.value, WireValue::from("USD"));

        assert_eq!(
            serializer.schema_notation(),
            &SchemaNotation::Restricted {
                name: "test::Currency".into(),
                source: "string".into(),
                descriptor: serializer.type_descriptor().clone(),
            }
        );
        assert!(core::ptr::eq(
            serializer.schema_notation(),
            serializer.schema_notation()
        ));
    }

    #[test]
    fn forwarding_requires_a_subclass() {
        let parent = Arc::new(CustomSerializer::scalar_string::<Currency>());
        let err = CustomSerializer::subclass::<Unrelated>(Arc::clone(&parent)).unwrap_err();
        assert_eq!(
            err,
            SerializeError::NotASubclass {
                subclass: "test::Unrelated".into(),
                parent: "test::Currency".into(),
            }
        );
        assert!(CustomSerializer::subclass::<Crypto>(parent).is_ok());
    }

    #[test]
    fn forwarding_over_scalar_needs_an_upcast() {
        let scalar = Arc::new(CustomSerializer::scalar_string::<Currency>());
        let err = CustomSerializer::subclass_rebuilding::<Token, Currency>(Arc::clone(&scalar))
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::NoUpcast {
                subclass: "test::Token".into(),
                parent: "test::Currency".into(),
            }
        );

        // A forwarding parent writes through the scalar; its own target is reachable.
        let crypto = Arc::new(CustomSerializer::subclass::<Crypto>(scalar).unwrap());
        assert!(CustomSerializer::subclass::<Crypto>(crypto).is_ok());
    }

    #[test]
    fn forwarding_descriptor_and_payload() {
        let factory = SerializerFactory::new();
        let schema = SchemaDocument::new();
        let parent = Arc::new(CustomSerializer::scalar_string::<Currency>());
        let forwarding =
            CustomSerializer::subclass_rebuilding::<Crypto, Currency>(Arc::clone(&parent)).unwrap();

        let descriptor = forwarding.type_descriptor();
        assert_eq!(descriptor.domain(), DESCRIPTOR_DOMAIN);
        assert_ne!(descriptor, parent.type_descriptor());
        assert!(forwarding.is_serializer_for(Crypto::type_info()));
        assert!(!forwarding.is_serializer_for(Currency::type_info()));

        let mut output = SerializationOutput::new(&factory);
        let encoded = forwarding
            .encode(&btc(), Crypto::type_info(), &mut output)
            .unwrap();
        // Same payload the parent writes, different descriptor.
        let described = encoded.as_described().unwrap();
        assert_eq!(described.descriptor, *descriptor.as_symbol());
        assert_eq!(described.value, WireValue::from("BTC"));

        forwarding.declare_wire_types(&mut output);
        parent.declare_wire_types(&mut output);
        let notations: Vec<_> = output.schema().iter().cloned().collect();
        assert_eq!(
            notations,
            [SchemaNotation::Restricted {
                name: "test::Crypto".into(),
                source: "test::Currency".into(),
                descriptor: descriptor.clone(),
            }]
        );

        let mut input = SerializationInput::new(&factory, &schema);
        let decoded = forwarding.decode(&encoded, &mut input).unwrap();
        assert_eq!(decoded.downcast_ref::<Crypto>(), Some(&btc()));
    }

    #[test]
    fn forwarding_without_rebuild_yields_parent_value() {
        let factory = SerializerFactory::new();
        let schema = SchemaDocument::new();
        let parent = Arc::new(CustomSerializer::exact::<Currency>(CurrencyCodec));
        let forwarding = CustomSerializer::subclass::<Crypto>(parent).unwrap();

        let mut output = SerializationOutput::new(&factory);
        let encoded = forwarding
            .encode(&btc(), Crypto::type_info(), &mut output)
            .unwrap();
        let mut input = SerializationInput::new(&factory, &schema);
        let decoded = forwarding.decode(&encoded, &mut input).unwrap();
        assert_eq!(decoded.downcast_ref::<Currency>(), Some(&btc().0));
    }

    #[test]
    fn documentation_is_a_deduplicated_closure() {
        let currency = Arc::new(CustomSerializer::scalar_string::<Currency>());
        let crypto = Arc::new(
            CustomSerializer::subclass::<Crypto>(Arc::clone(&currency))
                .unwrap()
                .with_additional([Arc::clone(&currency)]),
        );
        let root = CustomSerializer::exact::<Unrelated>(UnitCodec)
            .with_additional([Arc::clone(&crypto), Arc::clone(&currency)]);

        let names: Vec<_> = root
            .schema_for_documentation()
            .iter()
            .map(SchemaNotation::name)
            .collect();
        assert_eq!(names, ["test::Unrelated", "test::Crypto", "test::Currency"]);
    }
}
