use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use wk_custom::codec::WireValue;
use wk_custom::factory::{Envelope, SerializationInput, SerializationOutput, SerializerFactory};
use wk_custom::info::{TypePath, Typed};
use wk_custom::schema::{FieldNotation, SchemaDocument, SchemaNotation};
use wk_custom::serializer::{CustomSerializer, PayloadCodec, ProxyConvert, WireShape};
use wk_custom::{SerializeError, Structural, TypeDescriptor, WireObject, impl_typed};

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Clone, PartialEq)]
struct Currency(String);

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        if s.len() == 3 && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(s.into()))
        } else {
            Err(format!("`{s}` is not an ISO 4217 code"))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Crypto(Currency);

#[derive(Debug, Clone, PartialEq)]
struct Commodity(Currency);

impl AsRef<Currency> for Crypto {
    fn as_ref(&self) -> &Currency {
        &self.0
    }
}

impl From<Currency> for Crypto {
    fn from(currency: Currency) -> Self {
        Self(currency)
    }
}

impl AsRef<Currency> for Commodity {
    fn as_ref(&self) -> &Currency {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Amount {
    quantity: i64,
    token: Currency,
}

impl Amount {
    fn new(quantity: i64, token: Currency) -> Result<Self, String> {
        if quantity < 0 {
            return Err(format!("negative quantity {quantity}"));
        }
        Ok(Self { quantity, token })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AmountProxy {
    quantity: i64,
    token: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Payment {
    amount: Amount,
    memo: String,
}

#[derive(Debug, Clone, PartialEq)]
struct UrgentPayment(Payment);

impl AsRef<Payment> for UrgentPayment {
    fn as_ref(&self) -> &Payment {
        &self.0
    }
}

// Display drops precision.
#[derive(Debug, Clone, PartialEq)]
struct Lossy(f64);

impl fmt::Display for Lossy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl FromStr for Lossy {
    type Err = core::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl_typed!(Currency, "money::Currency");
impl_typed!(Crypto, "money::Crypto", upcast [Currency]);
impl_typed!(Commodity, "money::Commodity", upcast [Currency]);
impl_typed!(Amount, "money::Amount");
impl_typed!(AmountProxy, "money::AmountProxy");
impl_typed!(Payment, "money::Payment");
impl_typed!(UrgentPayment, "money::UrgentPayment", upcast [Payment]);
impl_typed!(Lossy, "money::Lossy");

// -----------------------------------------------------------------------------
// Serializers

fn currency_serializer() -> CustomSerializer {
    CustomSerializer::scalar_string::<Currency>()
}

impl Structural for AmountProxy {
    fn fields() -> Vec<FieldNotation> {
        vec![
            FieldNotation::of::<i64>("quantity"),
            FieldNotation::of::<String>("token"),
        ]
    }
}

struct AmountConvert;

impl ProxyConvert for AmountConvert {
    type Target = Amount;
    type Proxy = AmountProxy;

    fn to_proxy(&self, value: &Amount) -> AmountProxy {
        AmountProxy {
            quantity: value.quantity,
            token: value.token.0.clone(),
        }
    }

    fn from_proxy(&self, proxy: AmountProxy) -> Result<Amount, SerializeError> {
        let construct = |reason: String| SerializeError::Construct {
            type_path: Amount::type_path().into(),
            reason,
        };
        let token = proxy.token.parse::<Currency>().map_err(construct)?;
        Amount::new(proxy.quantity, token).map_err(construct)
    }
}

struct PaymentCodec;

impl PayloadCodec for PaymentCodec {
    fn write_payload(
        &self,
        value: &dyn WireObject,
        output: &mut SerializationOutput<'_>,
    ) -> Result<WireValue, SerializeError> {
        let payment = value
            .upcast_ref::<Payment>()
            .ok_or_else(|| SerializeError::TypeMismatch {
                expected: Payment::type_path().into(),
                found: value.type_info().path().into(),
            })?;
        Ok(WireValue::List(vec![
            output.write_object(&payment.amount)?,
            WireValue::from(payment.memo.as_str()),
        ]))
    }

    fn read_payload(
        &self,
        payload: &WireValue,
        input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        let [amount, memo] = payload.expect_list()? else {
            return Err(SerializeError::MalformedPayload {
                descriptor: Payment::type_path().into(),
                reason: "expected amount and memo".into(),
            });
        };
        let amount = input
            .read_object(amount)?
            .take::<Amount>()
            .ok_or_else(|| SerializeError::TypeMismatch {
                expected: Amount::type_path().into(),
                found: "another type".into(),
            })?;
        Ok(Box::new(Payment {
            amount,
            memo: memo.expect_str()?.into(),
        }))
    }

    fn wire_shape(&self) -> WireShape {
        WireShape::Composite(vec![
            FieldNotation::of::<Amount>("amount"),
            FieldNotation::of::<String>("memo"),
        ])
    }
}

fn factory() -> SerializerFactory {
    let currency = Arc::new(currency_serializer());
    let amount = Arc::new(
        CustomSerializer::proxy(AmountConvert).with_additional([Arc::clone(&currency)]),
    );
    let payment = CustomSerializer::interface::<Payment>(PaymentCodec).with_additional([amount]);

    let mut factory = SerializerFactory::new();
    factory.register(payment).unwrap();
    factory
}

fn usd() -> Currency {
    Currency("USD".into())
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn usd_travels_as_a_described_string() {
    let factory = factory();
    let envelope = factory.serialize(&usd()).unwrap();

    let described = envelope.body.as_described().unwrap();
    assert_eq!(described.descriptor.as_str(), "net.wirekit:money::Currency");
    assert_eq!(described.value, WireValue::from("USD"));
    assert!(envelope.schema.is_empty());

    assert_eq!(factory.round_trip(&usd()).unwrap(), usd());
}

#[test]
fn malformed_currency_text_is_refused() {
    let factory = factory();
    let descriptor = TypeDescriptor::for_type(Currency::type_info());
    let envelope = Envelope::new(
        WireValue::described(descriptor.to_symbol(), WireValue::from("usd")),
        SchemaDocument::new(),
    );
    let err = factory.deserialize(&envelope).unwrap_err();
    assert!(matches!(
        &err,
        SerializeError::Construct { type_path, .. } if type_path == "money::Currency"
    ));
}

#[test]
fn proxy_enforces_invariants_on_decode() {
    let factory = factory();
    let descriptor = TypeDescriptor::for_type(Amount::type_info());
    let payload = WireValue::List(vec![WireValue::Long(-5), WireValue::from("USD")]);
    let envelope = Envelope::new(
        WireValue::described(descriptor.to_symbol(), payload),
        SchemaDocument::new(),
    );
    assert!(matches!(
        factory.deserialize(&envelope),
        Err(SerializeError::Construct { .. })
    ));
}

#[test]
fn proxy_schema_lists_proxy_fields() {
    let amount = CustomSerializer::proxy(AmountConvert);
    let notation = amount.schema_notation();
    assert_eq!(notation.name(), "money::Amount");

    let fields: Vec<_> = notation
        .fields()
        .iter()
        .map(|field| (field.name(), field.wire_type()))
        .collect();
    assert_eq!(fields, [("quantity", "long"), ("token", "string")]);

    let documented: Vec<_> = amount
        .schema_for_documentation()
        .iter()
        .map(SchemaNotation::name)
        .collect();
    assert_eq!(documented, ["money::Amount"]);
}

#[test]
fn documentation_holds_one_notation_per_wire_type() {
    let currency = Arc::new(currency_serializer());
    let crypto = CustomSerializer::subclass::<Crypto>(Arc::clone(&currency))
        .unwrap()
        .with_additional([Arc::clone(&currency)]);
    let commodity = CustomSerializer::subclass::<Commodity>(Arc::clone(&currency))
        .unwrap()
        .with_additional([currency]);
    let amount = CustomSerializer::proxy(AmountConvert)
        .with_additional([Arc::new(crypto), Arc::new(commodity)]);

    let document = amount.schema_for_documentation();
    let names: Vec<_> = document.iter().map(SchemaNotation::name).collect();
    assert_eq!(
        names,
        ["money::Amount", "money::Crypto", "money::Currency", "money::Commodity"]
    );
}

#[test]
fn interface_serializer_writes_nested_custom_values() {
    let factory = factory();
    let payment = Payment {
        amount: Amount::new(250, usd()).unwrap(),
        memo: "rent".into(),
    };
    assert_eq!(factory.round_trip(&payment).unwrap(), payment);

    // Subtypes are written by the interface serializer and read back as
    // the interface type.
    let urgent = UrgentPayment(payment.clone());
    let bytes = factory.to_bytes(&urgent).unwrap();
    let decoded = factory.from_bytes(&bytes).unwrap();
    assert_eq!(decoded.downcast_ref::<Payment>(), Some(&payment));
}

#[test]
fn subclass_descriptors_are_stable_and_distinct() {
    let parent = Arc::new(currency_serializer());
    let crypto = CustomSerializer::subclass::<Crypto>(Arc::clone(&parent)).unwrap();
    let again = CustomSerializer::subclass::<Crypto>(Arc::new(currency_serializer())).unwrap();
    let commodity = CustomSerializer::subclass::<Commodity>(Arc::clone(&parent)).unwrap();

    assert_eq!(crypto.type_descriptor(), again.type_descriptor());
    assert_ne!(crypto.type_descriptor(), commodity.type_descriptor());
    assert_ne!(crypto.type_descriptor(), parent.type_descriptor());
}

#[test]
fn subclass_envelope_declares_its_parent() {
    let parent = Arc::new(currency_serializer());
    let mut factory = SerializerFactory::new();
    factory
        .register(
            CustomSerializer::subclass_rebuilding::<Crypto, Currency>(Arc::clone(&parent))
                .unwrap()
                .with_additional([parent]),
        )
        .unwrap();

    let btc = Crypto(Currency("BTC".into()));
    let envelope = factory.serialize(&btc).unwrap();
    let declared: Vec<_> = envelope.schema.iter().filter_map(SchemaNotation::source).collect();
    assert_eq!(declared, ["money::Currency"]);

    assert_eq!(factory.round_trip(&btc).unwrap(), btc);
    assert_eq!(factory.round_trip(&usd()).unwrap(), usd());
}

#[test]
fn lossy_serializers_are_detected() {
    let mut factory = SerializerFactory::new();
    factory
        .register(CustomSerializer::scalar_string::<Lossy>())
        .unwrap();

    assert_eq!(factory.round_trip(&Lossy(0.5)).unwrap(), Lossy(0.5));
    assert!(matches!(
        factory.round_trip(&Lossy(1.25)),
        Err(SerializeError::RoundTripViolation { .. })
    ));
}

proptest! {
    #[test]
    fn payments_round_trip(quantity in 0_i64.., code in "[A-Z]{3}", memo in ".*") {
        let factory = factory();
        let payment = Payment {
            amount: Amount::new(quantity, Currency(code)).unwrap(),
            memo,
        };
        prop_assert_eq!(factory.round_trip(&payment).unwrap(), payment);
    }
}
