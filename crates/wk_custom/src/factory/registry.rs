use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::Debug;
use std::sync::{PoisonError, RwLock};

use crate::error::SerializeError;
use crate::factory::{
    Envelope, FactoryConfig, ResolutionPolicy, SerializationInput, SerializationOutput, primitive,
};
use crate::hash::{HashMap, HashSet};
use crate::info::{TypeInfo, Typed};
use crate::object::WireObject;
use crate::serializer::{CustomSerializer, Strategy, type_mismatch};
use crate::structural::{Structural, StructuralSerializer};

fn is_forwarding(serializer: &CustomSerializer) -> bool {
    matches!(serializer.strategy(), Strategy::SubclassForwarding(_))
}

// A forwarding serializer is expected to share its subclass with the parent.
fn claims_same(a: &CustomSerializer, b: &CustomSerializer) -> bool {
    if is_forwarding(a) != is_forwarding(b) {
        return false;
    }
    a.is_serializer_for(b.target()) || b.is_serializer_for(a.target())
}

// -----------------------------------------------------------------------------
// SerializerFactory

/// The registry of serializers, and the entry point of serialization.
///
/// Custom serializers are matched in registration order: the first one
/// whose [`is_serializer_for`](CustomSerializer::is_serializer_for)
/// accepts a runtime type handles it. Subclass forwarding serializers are
/// tried before all others, so a subclass keeps its own descriptor even
/// when its parent serializer also accepts it. Types no custom serializer claims
/// fall back to structural serializers registered through
/// [`register_structural`](Self::register_structural).
///
/// Registration needs `&mut self`; lookups and (de)serialization only
/// `&self`, so a built factory can be shared across threads.
pub struct SerializerFactory {
    config: FactoryConfig,
    serializers: Vec<Arc<CustomSerializer>>,
    by_descriptor: HashMap<String, usize>,
    structural: Vec<Arc<StructuralSerializer>>,
    structural_by_type: HashMap<TypeId, usize>,
    structural_by_descriptor: HashMap<String, usize>,
    resolved: RwLock<HashMap<TypeId, Option<usize>>>,
}

impl Default for SerializerFactory {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerFactory {
    /// Creates an empty factory with the default config.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            config,
            serializers: Vec::new(),
            by_descriptor: HashMap::default(),
            structural: Vec::new(),
            structural_by_type: HashMap::default(),
            structural_by_descriptor: HashMap::default(),
            resolved: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// The registered custom serializers, in registration order.
    #[inline]
    pub fn serializers(&self) -> &[Arc<CustomSerializer>] {
        &self.serializers
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers `serializer` and, transitively, its additional serializers.
    ///
    /// Additional serializers whose descriptor is already registered are
    /// skipped. Nothing is registered if any check fails.
    ///
    /// Overlap checks apply between forwarding serializers, and between
    /// all others, but not across the two groups.
    ///
    /// # Errors
    ///
    /// - [`PrimitiveTarget`]: a serializer targets `bool`, `i32`, `i64`,
    ///   `u64`, `f64`, `char` or `String`, which are always written as bare
    ///   wire scalars.
    /// - [`DuplicateDescriptor`]: another serializer already uses the
    ///   descriptor of `serializer`.
    /// - [`AmbiguousResolution`]: under [`ResolutionPolicy::Strict`], a
    ///   serializer claims a type another one already claims.
    ///
    /// [`DuplicateDescriptor`]: SerializeError::DuplicateDescriptor
    /// [`AmbiguousResolution`]: SerializeError::AmbiguousResolution
    /// [`PrimitiveTarget`]: SerializeError::PrimitiveTarget
    pub fn register(
        &mut self,
        serializer: impl Into<Arc<CustomSerializer>>,
    ) -> Result<(), SerializeError> {
        let serializer = serializer.into();

        let mut batch = Vec::new();
        let mut visited = HashSet::default();
        Self::collect_tree(&serializer, &mut visited, &mut batch);

        let mut accepted: Vec<Arc<CustomSerializer>> = Vec::with_capacity(batch.len());
        for (depth, candidate) in batch.into_iter().enumerate() {
            let descriptor = candidate.type_descriptor().as_str();
            if primitive::is_primitive(candidate.target()) {
                return Err(SerializeError::PrimitiveTarget {
                    type_path: candidate.target().path().into(),
                });
            }
            if let Some(&index) = self.by_descriptor.get(descriptor) {
                let existing = &self.serializers[index];
                if depth == 0 && !Arc::ptr_eq(existing, &candidate) {
                    return Err(SerializeError::DuplicateDescriptor {
                        descriptor: descriptor.into(),
                    });
                }
                log::debug!("`{descriptor}` is already registered, skipping");
                continue;
            }
            if let Some(other) = self
                .serializers
                .iter()
                .chain(accepted.iter())
                .find(|other| claims_same(other, &candidate))
            {
                let type_path = candidate.target().path();
                match self.config.policy {
                    ResolutionPolicy::FirstMatch => log::warn!(
                        "`{}` and `{descriptor}` both claim `{type_path}`, the former wins",
                        other.type_descriptor(),
                    ),
                    ResolutionPolicy::Strict => {
                        return Err(SerializeError::AmbiguousResolution {
                            type_path: type_path.into(),
                            first: other.type_descriptor().as_str().into(),
                            second: descriptor.into(),
                        });
                    }
                }
            }
            accepted.push(candidate);
        }

        for serializer in accepted {
            log::debug!(
                "registered {} serializer `{}` for `{}`",
                serializer.strategy().name(),
                serializer.type_descriptor(),
                serializer.target().path(),
            );
            let index = self.serializers.len();
            self.by_descriptor
                .insert(serializer.type_descriptor().as_str().into(), index);
            self.serializers.push(serializer);
        }
        self.clear_resolutions();
        Ok(())
    }

    // Depth-first, each descriptor once.
    fn collect_tree(
        serializer: &Arc<CustomSerializer>,
        visited: &mut HashSet<String>,
        out: &mut Vec<Arc<CustomSerializer>>,
    ) {
        if !visited.insert(serializer.type_descriptor().as_str().into()) {
            return;
        }
        out.push(Arc::clone(serializer));
        for additional in serializer.additional_serializers() {
            Self::collect_tree(additional, visited, out);
        }
    }

    /// Registers the structural serializer of `T`.
    ///
    /// Returns `false` if `T` was already registered.
    pub fn register_structural<T: Structural>(&mut self) -> bool {
        let type_id = TypeId::of::<T>();
        if self.structural_by_type.contains_key(&type_id) {
            return false;
        }
        let serializer = StructuralSerializer::of::<T>();
        let index = self.structural.len();
        log::debug!("registered structural serializer for `{}`", T::type_path());
        self.structural_by_descriptor
            .insert(serializer.type_descriptor().as_str().into(), index);
        self.structural_by_type.insert(type_id, index);
        self.structural.push(Arc::new(serializer));
        true
    }

    /// Registers every serializer submitted with
    /// [`submit_serializer!`](crate::submit_serializer).
    ///
    /// Serializers whose descriptor is already registered are skipped, so
    /// repeated calls are cheap. Returns the number of newly registered
    /// serializers. The order between submissions is unspecified.
    ///
    /// Without the `auto_register` feature this does nothing.
    pub fn auto_register(&mut self) -> Result<usize, SerializeError> {
        #[cfg(feature = "auto_register")]
        {
            let mut count = 0;
            for entry in inventory::iter::<crate::factory::AutoSerializer> {
                let serializer = Arc::new(entry.make());
                if self.resolve_by_descriptor(serializer.type_descriptor().as_str()).is_some() {
                    continue;
                }
                self.register(serializer)?;
                count += 1;
            }
            Ok(count)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(0)
        }
    }

    fn clear_resolutions(&mut self) {
        self.resolved
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// Returns the first registered forwarding serializer accepting
    /// `runtime`, or else the first registered serializer accepting it.
    pub fn resolve(&self, runtime: &TypeInfo) -> Option<&Arc<CustomSerializer>> {
        if self.config.cache_resolutions {
            let cached = self
                .resolved
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&runtime.id())
                .copied();
            if let Some(hit) = cached {
                return hit.map(|index| &self.serializers[index]);
            }
        }

        let found = self
            .serializers
            .iter()
            .position(|serializer| {
                is_forwarding(serializer) && serializer.is_serializer_for(runtime)
            })
            .or_else(|| {
                self.serializers
                    .iter()
                    .position(|serializer| serializer.is_serializer_for(runtime))
            });
        log::trace!("resolved `{}` to {found:?}", runtime.path());

        if self.config.cache_resolutions {
            self.resolved
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(runtime.id(), found);
        }
        found.map(|index| &self.serializers[index])
    }

    /// Returns the serializer registered under `descriptor`.
    #[inline]
    pub fn resolve_by_descriptor(&self, descriptor: &str) -> Option<&Arc<CustomSerializer>> {
        self.by_descriptor
            .get(descriptor)
            .map(|&index| &self.serializers[index])
    }

    /// Returns the first serializer written for the type named `type_path`.
    pub fn resolve_by_type_path(&self, type_path: &str) -> Option<&Arc<CustomSerializer>> {
        self.serializers
            .iter()
            .find(|serializer| serializer.target().path() == type_path)
    }

    #[inline]
    pub fn structural_serializer_for(&self, runtime: &TypeInfo) -> Option<&Arc<StructuralSerializer>> {
        self.structural_by_type
            .get(&runtime.id())
            .map(|&index| &self.structural[index])
    }

    #[inline]
    pub fn structural_by_descriptor(&self, descriptor: &str) -> Option<&Arc<StructuralSerializer>> {
        self.structural_by_descriptor
            .get(descriptor)
            .map(|&index| &self.structural[index])
    }

    // -------------------------------------------------------------------------
    // Serialization

    /// Writes `value` into an envelope carrying the declared schema.
    pub fn serialize(&self, value: &dyn WireObject) -> Result<Envelope, SerializeError> {
        let mut output = SerializationOutput::new(self);
        let body = output.write_object(value)?;
        Ok(output.finish(body))
    }

    /// Reads the value of an envelope.
    pub fn deserialize(&self, envelope: &Envelope) -> Result<Box<dyn WireObject>, SerializeError> {
        SerializationInput::new(self, &envelope.schema).read_object(&envelope.body)
    }

    /// [`serialize`](Self::serialize), then encode to bytes.
    pub fn to_bytes(&self, value: &dyn WireObject) -> Result<Vec<u8>, SerializeError> {
        self.serialize(value)?.to_bytes()
    }

    /// Decode an envelope from bytes, then [`deserialize`](Self::deserialize).
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Box<dyn WireObject>, SerializeError> {
        self.deserialize(&Envelope::from_bytes(bytes)?)
    }

    /// Writes `value` to bytes, reads it back and checks the result is equal.
    ///
    /// # Errors
    ///
    /// [`SerializeError::RoundTripViolation`] if the value read back differs.
    pub fn round_trip<T>(&self, value: &T) -> Result<T, SerializeError>
    where
        T: Typed + Debug + Send + Sync + PartialEq,
    {
        let bytes = self.to_bytes(value)?;
        let decoded = self.from_bytes(&bytes)?;
        let found = decoded.type_info();
        let decoded = decoded
            .take::<T>()
            .ok_or_else(|| type_mismatch(T::type_info(), found))?;
        if decoded != *value {
            return Err(SerializeError::RoundTripViolation {
                type_path: T::type_path().into(),
                detail: alloc::format!("wrote {value:?}, read {decoded:?}"),
            });
        }
        Ok(decoded)
    }
}

impl Debug for SerializerFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerializerFactory")
            .field("config", &self.config)
            .field("serializers", &self.serializers)
            .field("structural", &self.structural)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
