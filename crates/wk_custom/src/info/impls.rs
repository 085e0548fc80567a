//! [`Typed`](crate::info::Typed) for the primitive wire types.
//!
//! Their type paths are the wire type names, which is what schema field
//! notations refer to.

use alloc::string::String;

crate::impl_typed!(bool, "boolean");
crate::impl_typed!(i32, "int");
crate::impl_typed!(i64, "long");
crate::impl_typed!(u64, "ulong");
crate::impl_typed!(f64, "double");
crate::impl_typed!(char, "char");
crate::impl_typed!(String, "string");
