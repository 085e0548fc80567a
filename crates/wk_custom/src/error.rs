use alloc::string::String;

use thiserror::Error;
use wk_codec::CodecError;

// -----------------------------------------------------------------------------
// SerializeError

/// Failures raised while registering, resolving, encoding or decoding
/// custom wire types.
///
/// `TypeMismatch` and `UnresolvedDescriptor` are the failures a peer can
/// trigger with a malformed message; the remaining variants point at a
/// misconfigured registry or a broken serializer.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializeError {
    /// A serializer was handed a value or payload it does not own.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    /// Decoding an encoded value did not give back an equal value.
    #[error("round trip of `{type_path}` is not the identity: {detail}")]
    RoundTripViolation { type_path: String, detail: String },

    /// No serializer is registered for a descriptor read off the wire.
    #[error("no serializer registered for descriptor `{descriptor}`")]
    UnresolvedDescriptor { descriptor: String },

    /// Two serializers claim the same runtime type under the strict policy.
    #[error("`{type_path}` is claimed by both `{first}` and `{second}`")]
    AmbiguousResolution {
        type_path: String,
        first: String,
        second: String,
    },

    /// Neither a custom nor a structural serializer handles the type.
    #[error("no serializer can handle `{type_path}`")]
    NoSerializer { type_path: String },

    /// A forwarding serializer was built for a type that is not a subclass
    /// of the parent serializer's type.
    #[error("`{subclass}` does not declare `{parent}` as a supertype")]
    NotASubclass { subclass: String, parent: String },

    /// A forwarding serializer's parent writes payloads from a view of the
    /// parent type, which the subclass cannot provide.
    #[error("`{subclass}` has no upcast path to `{parent}`")]
    NoUpcast { subclass: String, parent: String },

    /// Primitive types are always written as bare wire scalars.
    #[error("`{type_path}` is a primitive wire type and cannot have a custom serializer")]
    PrimitiveTarget { type_path: String },

    /// A different serializer with the same descriptor is already registered.
    #[error("descriptor `{descriptor}` is already registered")]
    DuplicateDescriptor { descriptor: String },

    /// A proxy or string could not be turned back into the target type.
    #[error("cannot construct `{type_path}`: {reason}")]
    Construct { type_path: String, reason: String },

    /// The payload of a described value has the wrong shape.
    #[error("malformed payload for `{descriptor}`: {reason}")]
    MalformedPayload { descriptor: String, reason: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}
