//! Types shared by the unit tests.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use wk_codec::WireValue;

use crate::error::SerializeError;
use crate::factory::{SerializationInput, SerializationOutput};
use crate::impl_typed;
use crate::object::WireObject;
use crate::schema::FieldNotation;
use crate::serializer::{PayloadCodec, WireShape};
use crate::structural::Structural;

#[derive(Debug, Clone, PartialEq)]
pub struct Currency(pub String);

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        if s.len() == 3 && s.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(s.into()))
        } else {
            Err(alloc::format!("`{s}` is not a currency code"))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crypto(pub Currency);

impl fmt::Display for Crypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Crypto {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        Currency::from_str(s).map(Self)
    }
}

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

/// Declared a currency, without a way to view it as one.
#[derive(Debug, PartialEq)]
pub struct Token(pub String);

impl From<Currency> for Token {
    fn from(currency: Currency) -> Self {
        Self(currency.0)
    }
}

#[derive(Debug, PartialEq)]
pub struct Unrelated;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub account: String,
    pub units: i64,
}

impl Structural for Position {
    fn fields() -> Vec<FieldNotation> {
        alloc::vec![
            FieldNotation::of::<String>("account"),
            FieldNotation::of::<i64>("units"),
        ]
    }
}

impl_typed!(Currency, "test::Currency");
impl_typed!(Crypto, "test::Crypto", upcast [Currency]);
impl_typed!(Token, "test::Token", marker [Currency]);
impl_typed!(Unrelated, "test::Unrelated");
impl_typed!(Position, "test::Position");

pub fn usd() -> Currency {
    Currency(String::from("USD"))
}

pub fn btc() -> Crypto {
    Crypto(Currency(String::from("BTC")))
}

/// Writes a currency as a one element list.
pub struct CurrencyCodec;

impl PayloadCodec for CurrencyCodec {
    fn write_payload(
        &self,
        value: &dyn WireObject,
        _output: &mut SerializationOutput<'_>,
    ) -> Result<WireValue, SerializeError> {
        let currency = value
            .upcast_ref::<Currency>()
            .ok_or_else(|| SerializeError::TypeMismatch {
                expected: "test::Currency".into(),
                found: value.type_info().path().into(),
            })?;
        Ok(WireValue::List(alloc::vec![WireValue::from(currency.0.as_str())]))
    }

    fn read_payload(
        &self,
        payload: &WireValue,
        _input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        match payload.expect_list()? {
            [code] => Ok(Box::new(Currency(code.expect_str()?.into()))),
            _ => Err(SerializeError::MalformedPayload {
                descriptor: "test::Currency".into(),
                reason: "expected one item".into(),
            }),
        }
    }

    fn wire_shape(&self) -> WireShape {
        WireShape::Composite(alloc::vec![FieldNotation::of::<String>("code")])
    }
}

pub struct UnitCodec;

impl PayloadCodec for UnitCodec {
    fn write_payload(
        &self,
        _value: &dyn WireObject,
        _output: &mut SerializationOutput<'_>,
    ) -> Result<WireValue, SerializeError> {
        Ok(WireValue::Null)
    }

    fn read_payload(
        &self,
        _payload: &WireValue,
        _input: &mut SerializationInput<'_>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        Ok(Box::new(Unrelated))
    }

    fn wire_shape(&self) -> WireShape {
        WireShape::Restricted("null".into())
    }
}
