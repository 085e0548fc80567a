// -----------------------------------------------------------------------------
// ResolutionPolicy

/// What registration does when two serializers claim the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Keep both, log a warning; the one registered first wins.
    #[default]
    FirstMatch,
    /// Refuse the later registration.
    Strict,
}

// -----------------------------------------------------------------------------
// FactoryConfig

/// Settings of a [`SerializerFactory`](crate::factory::SerializerFactory).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    pub policy: ResolutionPolicy,
    /// Remember which serializer each runtime type resolved to.
    pub cache_resolutions: bool,
}

impl Default for FactoryConfig {
    #[inline]
    fn default() -> Self {
        Self {
            policy: ResolutionPolicy::FirstMatch,
            cache_resolutions: true,
        }
    }
}

impl FactoryConfig {
    #[inline]
    pub fn strict() -> Self {
        Self {
            policy: ResolutionPolicy::Strict,
            ..Self::default()
        }
    }
}
