//! Hash containers with a stable hash state.
//!
//! Registry and schema lookups do not need DoS resistance, and a fixed seed
//! keeps iteration of debug dumps reproducible between runs.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// Hash state based on `foldhash` with a fixed seed.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;
