//! Static serializer registration through [`inventory`].

use crate::serializer::CustomSerializer;

// -----------------------------------------------------------------------------
// AutoSerializer

/// A serializer constructor submitted with
/// [`submit_serializer!`](crate::submit_serializer).
pub struct AutoSerializer {
    make: fn() -> CustomSerializer,
}

impl AutoSerializer {
    #[doc(hidden)]
    #[inline]
    pub const fn new(make: fn() -> CustomSerializer) -> Self {
        Self { make }
    }

    #[inline]
    pub fn make(&self) -> CustomSerializer {
        (self.make)()
    }
}

inventory::collect!(AutoSerializer);

/// Submits a serializer constructor for
/// [`SerializerFactory::auto_register`](crate::factory::SerializerFactory::auto_register).
///
/// Takes a path to a `fn() -> CustomSerializer`. Without the
/// `auto_register` feature this expands to nothing.
///
/// ```no_run
/// use wk_custom::{impl_typed, submit_serializer};
/// use wk_custom::factory::SerializerFactory;
/// use wk_custom::info::Typed;
/// use wk_custom::serializer::CustomSerializer;
///
/// #[derive(Debug, PartialEq)]
/// struct Ticker(String);
///
/// impl std::fmt::Display for Ticker {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str(&self.0)
///     }
/// }
///
/// impl std::str::FromStr for Ticker {
///     type Err = std::convert::Infallible;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         Ok(Ticker(s.into()))
///     }
/// }
///
/// impl_typed!(Ticker, "market::Ticker");
///
/// fn ticker_serializer() -> CustomSerializer {
///     CustomSerializer::scalar_string::<Ticker>()
/// }
///
/// submit_serializer!(ticker_serializer);
///
/// fn main() {
///     let mut factory = SerializerFactory::new();
///     factory.auto_register().unwrap();
///     assert!(factory.resolve(Ticker::type_info()).is_some());
/// }
/// ```
#[macro_export]
macro_rules! submit_serializer {
    ($make:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::factory::AutoSerializer::new($make)
        }
    };
}
