use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hasher;

use rapidhash::RapidHasher;
use wk_codec::Symbol;

use crate::info::TypeInfo;

/// The domain prefix of every descriptor minted by this crate.
pub const DESCRIPTOR_DOMAIN: &str = "net.wirekit";

const FINGERPRINT_SEED_HIGH: u64 = 0x6E65_742E_7769_7265;
const FINGERPRINT_SEED_LOW: u64 = 0x6B69_743A_666F_7277;

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The stable identifier of a custom wire type, `domain:name`.
///
/// A descriptor is written in front of every custom payload and is the key
/// a reader resolves its serializer by. Descriptors are always ASCII: any
/// other character of the name is escaped.
///
/// # Examples
///
/// ```
/// use wk_custom::TypeDescriptor;
///
/// let descriptor = TypeDescriptor::new("net.wirekit", "money::Currency");
/// assert_eq!(descriptor.to_string(), "net.wirekit:money::Currency");
/// assert_eq!(TypeDescriptor::parse("net.wirekit:money::Currency"), Some(descriptor));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
    symbol: Symbol,
    // Byte offset of the `:` separating domain and name.
    split: usize,
}

impl TypeDescriptor {
    /// Creates a descriptor from its parts.
    ///
    /// The first `:` separates the parts, so the domain must not contain one.
    pub fn new(domain: &str, name: &str) -> Self {
        let domain = Symbol::escaped(domain);
        let name = Symbol::escaped(name);
        let split = domain.as_str().len();
        let mut text = String::with_capacity(split + 1 + name.as_str().len());
        text.push_str(domain.as_str());
        text.push(':');
        text.push_str(name.as_str());
        Self {
            symbol: Symbol::escaped(&text),
            split,
        }
    }

    /// The descriptor of a custom serializer targeting `info`.
    #[inline]
    pub fn for_type(info: &TypeInfo) -> Self {
        Self::new(DESCRIPTOR_DOMAIN, info.path())
    }

    /// The descriptor of a serializer forwarding `subclass` to the serializer
    /// described by `parent`.
    ///
    /// The name is a 128-bit fingerprint of both inputs: it is stable across
    /// processes and platforms, differs from `parent`, and differs between
    /// subclasses of the same parent.
    pub fn fingerprinted(parent: &TypeDescriptor, subclass: &str) -> Self {
        Self::new(DESCRIPTOR_DOMAIN, &fingerprint(&[parent.as_str(), subclass]))
    }

    /// Parses `domain:name`, splitting at the first `:`.
    pub fn parse(text: &str) -> Option<Self> {
        let (domain, name) = text.split_once(':')?;
        if domain.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(domain, name))
    }

    #[inline]
    pub fn domain(&self) -> &str {
        &self.symbol.as_str()[..self.split]
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.symbol.as_str()[self.split + 1..]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.symbol.as_str()
    }

    #[inline]
    pub fn as_symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[inline]
    pub fn to_symbol(&self) -> Symbol {
        self.symbol.clone()
    }
}

impl fmt::Display for TypeDescriptor {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Parts are length-prefixed so that ("ab", "c") and ("a", "bc") differ.
fn fingerprint(parts: &[&str]) -> String {
    let mut bytes = Vec::new();
    for part in parts {
        bytes.extend_from_slice(&(part.len() as u64).to_be_bytes());
        bytes.extend_from_slice(part.as_bytes());
    }
    let digest = |seed| {
        let mut hasher = RapidHasher::new(seed);
        hasher.write(&bytes);
        hasher.finish()
    };
    alloc::format!(
        "{:016x}{:016x}",
        digest(FINGERPRINT_SEED_HIGH),
        digest(FINGERPRINT_SEED_LOW)
    )
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DESCRIPTOR_DOMAIN, TypeDescriptor};

    #[test]
    fn parts() {
        let descriptor = TypeDescriptor::new("corp.example", "billing::Invoice");
        assert_eq!(descriptor.domain(), "corp.example");
        assert_eq!(descriptor.name(), "billing::Invoice");
        assert_eq!(descriptor.as_symbol().as_str(), "corp.example:billing::Invoice");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!(TypeDescriptor::parse("no-separator").is_none());
        assert!(TypeDescriptor::parse(":name").is_none());
        assert!(TypeDescriptor::parse("domain:").is_none());
        let parsed = TypeDescriptor::parse("a:b:c").unwrap();
        assert_eq!(parsed.domain(), "a");
        assert_eq!(parsed.name(), "b:c");
    }

    #[test]
    fn non_ascii_names_are_escaped() {
        let descriptor = TypeDescriptor::new(DESCRIPTOR_DOMAIN, "geld::Währung");
        assert!(descriptor.as_str().is_ascii());
        assert_eq!(descriptor.domain(), DESCRIPTOR_DOMAIN);
    }

    #[test]
    fn fingerprint_is_deterministic_and_distinct() {
        let parent = TypeDescriptor::new(DESCRIPTOR_DOMAIN, "money::Currency");
        let a = TypeDescriptor::fingerprinted(&parent, "money::Euro");
        let b = TypeDescriptor::fingerprinted(&parent, "money::Euro");
        let c = TypeDescriptor::fingerprinted(&parent, "money::Franc");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, parent);
        assert_eq!(a.domain(), DESCRIPTOR_DOMAIN);
        assert_eq!(a.name().len(), 32);
    }
}
