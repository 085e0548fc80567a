// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// The type path is the stable name of a type on the wire: custom type
/// descriptors and schema notations are derived from it, so it must not
/// change when the Rust definition is moved or renamed.
///
/// # Methods
///
/// - [`type_path`]: The unique identifier of the type, cannot be duplicated.
/// - [`type_name`]: Type name without module path, may be duplicated.
/// - [`module_path`]: Optional module path.
///
/// Paths use `::` as separator and have no leading `::`. Primitive types
/// use their wire type names (`"long"`, `"string"`, ...) and have no
/// module path.
///
/// Usually implemented through [`impl_typed!`](crate::impl_typed).
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`module_path`]: TypePath::module_path
pub trait TypePath: 'static {
    /// Returns the fully qualified path of the type.
    fn type_path() -> &'static str;

    /// Returns the last segment of [`type_path`](TypePath::type_path).
    #[inline]
    fn type_name() -> &'static str {
        short_name(Self::type_path())
    }

    /// Returns everything before the last `::` of the type path.
    ///
    /// Primitive types return `None`.
    #[inline]
    fn module_path() -> Option<&'static str> {
        module_of(Self::type_path())
    }
}

#[inline]
pub(crate) fn short_name(path: &str) -> &str {
    path.rsplit_once("::").map_or(path, |(_, name)| name)
}

#[inline]
pub(crate) fn module_of(path: &str) -> Option<&str> {
    path.rsplit_once("::").map(|(module, _)| module)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypePath;

    struct Deep;

    impl TypePath for Deep {
        fn type_path() -> &'static str {
            "ledger::assets::cash::Deep"
        }
    }

    #[test]
    fn derived_names() {
        assert_eq!(Deep::type_name(), "Deep");
        assert_eq!(Deep::module_path(), Some("ledger::assets::cash"));
        assert_eq!(<i64 as TypePath>::type_name(), "long");
        assert_eq!(<i64 as TypePath>::module_path(), None);
    }
}
