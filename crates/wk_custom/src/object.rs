use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt::Debug;

use crate::info::{DynamicTyped, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// WireObject

/// A value that can travel through a [`SerializerFactory`].
///
/// Automatically implemented for every [`Typed`] type that is `Debug`,
/// `Send` and `Sync`. Serializers receive values as `&dyn WireObject` and
/// decoders hand back `Box<dyn WireObject>`.
///
/// [`SerializerFactory`]: crate::factory::SerializerFactory
pub trait WireObject: DynamicTyped + Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_wire_object(&self) -> &dyn WireObject;
}

impl<T: Typed + Debug + Send + Sync> WireObject for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn as_wire_object(&self) -> &dyn WireObject {
        self
    }
}

impl dyn WireObject {
    /// Returns the type info of the concrete value.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.reflect_type_info()
    }

    /// Returns `true` if the concrete value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Views the value as `T`, following declared upcast edges.
    ///
    /// Returns the value itself when it is a `T`.
    pub fn upcast_ref<T: Typed>(&self) -> Option<&T> {
        self.reflect_type_info()
            .upcast(self.as_any(), TypeId::of::<T>())
            .and_then(<dyn Any>::downcast_ref::<T>)
    }

    /// Consumes the box, returning the concrete value if it is a `T`.
    pub fn take<T: Any>(self: Box<Self>) -> Option<T> {
        self.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }
}

// -----------------------------------------------------------------------------
// Tests
