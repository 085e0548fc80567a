use std::sync::OnceLock;

use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to runtime type information.
///
/// It is not recommended to implement manually, [`impl_typed!`] covers the
/// common cases. A manual implementation should cache the info in a
/// [`TypeInfoCell`]:
///
/// ```
/// use wk_custom::info::{Supertype, TypeInfo, TypeInfoCell, TypePath, Typed};
///
/// #[derive(Debug)]
/// struct Settlement;
///
/// #[derive(Debug)]
/// struct Instruction;
///
/// impl TypePath for Settlement {
///     fn type_path() -> &'static str {
///         "clearing::Settlement"
///     }
/// }
///
/// impl TypePath for Instruction {
///     fn type_path() -> &'static str {
///         "clearing::Instruction"
///     }
/// }
///
/// impl Typed for Instruction {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(TypeInfo::new::<Self>)
///     }
/// }
///
/// impl Typed for Settlement {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::new::<Self>().with_supertype(Supertype::marker::<Instruction>())
///         })
///     }
/// }
///
/// assert!(Settlement::type_info().is_assignable_to(Instruction::type_info()));
/// ```
///
/// [`impl_typed!`]: crate::impl_typed
pub trait Typed: TypePath {
    /// Note: Use [`DynamicTyped`] for dynamic dispatch.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Provide dynamic dispatch for types that implement [`Typed`].
///
/// Auto impl for all types that implemented [`Typed`].
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }
}

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Storage for the [`TypeInfo`] of a non-generic type.
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init<F: FnOnce() -> TypeInfo>(&self, f: F) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}
