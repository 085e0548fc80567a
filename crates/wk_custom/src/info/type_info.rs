use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypePath, Typed};

// -----------------------------------------------------------------------------
// Supertype

/// An edge of the declared subtype graph.
///
/// A `Supertype` either only records that the owning type is a subtype of
/// another one ([`marker`](Supertype::marker)), or additionally knows how to
/// view a value of the owning type as the supertype
/// ([`upcast`](Supertype::upcast)), through its [`AsRef`] implementation.
///
/// The target's [`TypeInfo`] is resolved lazily, so two types may name each
/// other without deadlocking their type info cells.
#[derive(Clone, Copy)]
pub struct Supertype {
    info: fn() -> &'static TypeInfo,
    upcast: Option<fn(&dyn Any) -> Option<&dyn Any>>,
}

fn upcast_via_as_ref<S: AsRef<P> + Any, P: Any>(value: &dyn Any) -> Option<&dyn Any> {
    value.downcast_ref::<S>().map(|s| s.as_ref() as &dyn Any)
}

impl Supertype {
    /// Declares `P` as a supertype without a value-level conversion.
    ///
    /// Suitable for interface-like marker types.
    #[inline]
    pub fn marker<P: Typed>() -> Self {
        Self {
            info: P::type_info,
            upcast: None,
        }
    }

    /// Declares `P` as a supertype of `S`, viewing `S` as `P` through `AsRef`.
    #[inline]
    pub fn upcast<S: AsRef<P> + Any, P: Typed>() -> Self {
        Self {
            info: P::type_info,
            upcast: Some(upcast_via_as_ref::<S, P>),
        }
    }

    /// Returns the type info of the supertype.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    /// Returns `true` if values can be viewed as the supertype.
    #[inline]
    pub fn has_upcast(&self) -> bool {
        self.upcast.is_some()
    }
}

impl fmt::Debug for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supertype")
            .field("path", &self.info().path())
            .field("upcast", &self.has_upcast())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Runtime information about a [`Typed`] type.
///
/// Besides its identity and path, a type carries the list of its declared
/// supertypes. Assignability is the reflexive, transitive closure of that
/// list, which is what interface and inheritance-aware serializers match on.
///
/// # Examples
///
/// ```
/// use wk_custom::impl_typed;
/// use wk_custom::info::Typed;
///
/// #[derive(Debug)]
/// struct Currency(String);
///
/// #[derive(Debug)]
/// struct Euro(Currency);
///
/// impl AsRef<Currency> for Euro {
///     fn as_ref(&self) -> &Currency {
///         &self.0
///     }
/// }
///
/// impl_typed!(Currency, "money::Currency");
/// impl_typed!(Euro, "money::Euro", upcast [Currency]);
///
/// let euro = Euro::type_info();
/// assert!(euro.is_assignable_to(Currency::type_info()));
/// assert!(!Currency::type_info().is_assignable_to(euro));
/// assert_eq!(euro.name(), "Euro");
/// ```
pub struct TypeInfo {
    type_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    module_path: Option<&'static str>,
    supertypes: Vec<Supertype>,
}

impl TypeInfo {
    /// Creates the info of `T` with no supertypes.
    pub fn new<T: TypePath>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            module_path: T::module_path(),
            supertypes: Vec::new(),
        }
    }

    /// Adds a declared supertype.
    #[inline]
    pub fn with_supertype(mut self, supertype: Supertype) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.module_path
    }

    /// Returns the directly declared supertypes.
    #[inline]
    pub fn supertypes(&self) -> &[Supertype] {
        &self.supertypes
    }

    /// Returns `true` if this is the info of `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns `true` if a value of this type may be used where `target`
    /// is expected: the types are equal, or `target` is reachable through
    /// declared supertypes.
    ///
    /// Cycles in the declared graph are tolerated.
    #[inline]
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.reaches(target, |_| true)
    }

    /// Like [`is_assignable_to`](Self::is_assignable_to), following only
    /// upcast edges: values of this type can be viewed as `target` through
    /// [`upcast`](Self::upcast).
    #[inline]
    pub fn can_upcast_to(&self, target: &TypeInfo) -> bool {
        self.reaches(target, Supertype::has_upcast)
    }

    fn reaches(&self, target: &TypeInfo, follow: fn(&Supertype) -> bool) -> bool {
        if self.type_id == target.type_id {
            return true;
        }
        let edges = |info: &TypeInfo| {
            info.supertypes
                .iter()
                .filter(|edge| follow(edge))
                .map(Supertype::info)
                .collect::<Vec<_>>()
        };
        let mut visited: Vec<TypeId> = alloc::vec![self.type_id];
        let mut pending: Vec<&'static TypeInfo> = edges(self);

        while let Some(info) = pending.pop() {
            if info.type_id == target.type_id {
                return true;
            }
            if visited.contains(&info.type_id) {
                continue;
            }
            visited.push(info.type_id);
            pending.extend(edges(info));
        }
        false
    }

    /// Views `value`, which must be of this type, as the type `target`.
    ///
    /// Only upcast edges are followed; marker edges carry no conversion.
    /// Returns `None` if `value` is not of this type or no chain of upcast
    /// edges leads to `target`.
    pub fn upcast<'a>(&self, value: &'a dyn Any, target: TypeId) -> Option<&'a dyn Any> {
        let mut visited = Vec::new();
        self.upcast_inner(value, target, &mut visited)
    }

    fn upcast_inner<'a>(
        &self,
        value: &'a dyn Any,
        target: TypeId,
        visited: &mut Vec<TypeId>,
    ) -> Option<&'a dyn Any> {
        if value.type_id() != self.type_id {
            return None;
        }
        if self.type_id == target {
            return Some(value);
        }
        if visited.contains(&self.type_id) {
            return None;
        }
        visited.push(self.type_id);

        self.supertypes.iter().find_map(|supertype| {
            let parent = (supertype.upcast?)(value)?;
            supertype.info().upcast_inner(parent, target, visited)
        })
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("path", &self.type_path)
            .field("supertypes", &self.supertypes)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
