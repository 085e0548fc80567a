use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt::{Debug, Display};
use core::str::FromStr;

use crate::error::SerializeError;
use crate::info::{TypeInfo, TypePath, Typed};
use crate::object::WireObject;
use crate::serializer::type_mismatch;

type Maker = Box<dyn Fn(&str) -> Result<Box<dyn WireObject>, SerializeError> + Send + Sync>;
type Unmaker = Box<dyn Fn(&dyn WireObject) -> Option<String> + Send + Sync>;

fn parse_scalar<T>(text: &str) -> Result<T, SerializeError>
where
    T: TypePath + FromStr,
    T::Err: Display,
{
    text.parse::<T>().map_err(|err| SerializeError::Construct {
        type_path: T::type_path().into(),
        reason: err.to_string(),
    })
}

fn render_scalar<T: Display>(value: &T) -> String {
    value.to_string()
}

// -----------------------------------------------------------------------------
// ScalarStringStrategy

/// Writes a value as a single string.
///
/// The payload is the string itself, and the schema describes the type as
/// a restriction of `string`. By default only the exact target type
/// matches.
pub struct ScalarStringStrategy {
    target: &'static TypeInfo,
    with_inheritance: bool,
    maker: Maker,
    unmaker: Unmaker,
}

impl ScalarStringStrategy {
    /// Uses `Display` to write and `FromStr` to read.
    pub fn new<T>() -> Self
    where
        T: Typed + Debug + Send + Sync + Display + FromStr,
        T::Err: Display,
    {
        Self::with_functions::<T>(parse_scalar::<T>, render_scalar::<T>)
    }

    /// Uses `maker` to read and `unmaker` to write.
    pub fn with_functions<T: Typed + Debug + Send + Sync>(
        maker: fn(&str) -> Result<T, SerializeError>,
        unmaker: fn(&T) -> String,
    ) -> Self {
        Self {
            target: T::type_info(),
            with_inheritance: false,
            maker: Box::new(move |text: &str| {
                maker(text).map(|value| Box::new(value) as Box<dyn WireObject>)
            }),
            unmaker: Box::new(move |value: &dyn WireObject| value.upcast_ref::<T>().map(unmaker)),
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

    #[inline]
    pub fn is_with_inheritance(&self) -> bool {
        self.with_inheritance
    }

    /// Renders `value`, which must be viewable as the target type.
    pub fn to_proxy(&self, value: &dyn WireObject) -> Result<String, SerializeError> {
        (self.unmaker)(value).ok_or_else(|| type_mismatch(self.target, value.type_info()))
    }

    /// Rebuilds a value from its text.
    pub fn from_proxy(&self, proxy: &str) -> Result<Box<dyn WireObject>, SerializeError> {
        (self.maker)(proxy)
    }

    pub(super) fn matches(&self, candidate: &TypeInfo) -> bool {
        if self.with_inheritance {
            candidate.is_assignable_to(self.target)
        } else {
            *candidate == *self.target
        }
    }
}
