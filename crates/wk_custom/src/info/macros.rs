/// Implements [`TypePath`] and [`Typed`] for a non-generic type.
///
/// Supertypes are listed after the path:
///
/// - `upcast [A, B]`: the type implements `AsRef<A>` and `AsRef<B>`, values
///   can be viewed as the supertype.
/// - `marker [M]`: the type is declared a subtype of `M` without a
///   conversion.
///
/// ```
/// use wk_custom::impl_typed;
/// use wk_custom::info::{TypePath, Typed};
///
/// #[derive(Debug)]
/// struct Tradable;
///
/// #[derive(Debug)]
/// struct Bond {
///     isin: String,
/// }
///
/// impl_typed!(Tradable, "market::Tradable");
/// impl_typed!(Bond, "market::fixed_income::Bond", marker [Tradable]);
///
/// assert_eq!(Bond::type_name(), "Bond");
/// assert!(Bond::type_info().is_assignable_to(Tradable::type_info()));
/// ```
///
/// [`TypePath`]: crate::info::TypePath
/// [`Typed`]: crate::info::Typed
#[macro_export]
macro_rules! impl_typed {
    (
        $ty:ty, $path:literal
        $(, upcast [$($up:ty),* $(,)?])?
        $(, marker [$($mk:ty),* $(,)?])?
        $(,)?
    ) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }
        }

        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::TypeInfoCell = $crate::info::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::new::<$ty>()
                        $($(.with_supertype($crate::info::Supertype::upcast::<$ty, $up>()))*)?
                        $($(.with_supertype($crate::info::Supertype::marker::<$mk>()))*)?
                })
            }
        }
    };
}
