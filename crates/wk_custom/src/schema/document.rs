use alloc::string::String;
use alloc::vec::{self, Vec};
use core::slice;

use wk_codec::WireValue;

use crate::error::SerializeError;
use crate::hash::HashMap;
use crate::schema::SchemaNotation;

// -----------------------------------------------------------------------------
// SchemaDocument

/// An ordered set of [`SchemaNotation`]s, unique by descriptor.
///
/// The first notation inserted for a descriptor wins; later ones with the
/// same descriptor are ignored. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    notations: Vec<SchemaNotation>,
    index: HashMap<String, usize>,
}

impl SchemaDocument {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `notation` unless its descriptor is already present.
    ///
    /// Returns `true` if the notation was added.
    pub fn insert(&mut self, notation: SchemaNotation) -> bool {
        let key = notation.descriptor().as_str();
        if self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key.into(), self.notations.len());
        self.notations.push(notation);
        true
    }

    /// Looks up a notation by its descriptor text.
    #[inline]
    pub fn get(&self, descriptor: &str) -> Option<&SchemaNotation> {
        self.index.get(descriptor).map(|&i| &self.notations[i])
    }

    #[inline]
    pub fn contains(&self, descriptor: &str) -> bool {
        self.index.contains_key(descriptor)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, SchemaNotation> {
        self.notations.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.notations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.notations.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[SchemaNotation] {
        &self.notations
    }

    /// Encodes the document as a list of notations.
    pub fn to_wire(&self) -> WireValue {
        WireValue::List(self.notations.iter().map(SchemaNotation::to_wire).collect())
    }

    /// Decodes a document written by [`to_wire`](Self::to_wire).
    pub fn from_wire(value: &WireValue) -> Result<Self, SerializeError> {
        let mut document = Self::new();
        for item in value.expect_list()? {
            document.insert(SchemaNotation::from_wire(item)?);
        }
        Ok(document)
    }
}

impl PartialEq for SchemaDocument {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.notations == other.notations
    }
}

impl Eq for SchemaDocument {}

impl Extend<SchemaNotation> for SchemaDocument {
    fn extend<I: IntoIterator<Item = SchemaNotation>>(&mut self, iter: I) {
        for notation in iter {
            self.insert(notation);
        }
    }
}

impl FromIterator<SchemaNotation> for SchemaDocument {
    fn from_iter<I: IntoIterator<Item = SchemaNotation>>(iter: I) -> Self {
        let mut document = Self::new();
        document.extend(iter);
        document
    }
}

impl IntoIterator for SchemaDocument {
    type Item = SchemaNotation;
    type IntoIter = vec::IntoIter<SchemaNotation>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.notations.into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaDocument {
    type Item = &'a SchemaNotation;
    type IntoIter = slice::Iter<'a, SchemaNotation>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.notations.iter()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SchemaDocument;
    use crate::TypeDescriptor;
    use crate::schema::SchemaNotation;

    fn restricted(name: &str, source: &str) -> SchemaNotation {
        SchemaNotation::Restricted {
            name: name.into(),
            source: source.into(),
            descriptor: TypeDescriptor::new("net.wirekit", name),
        }
    }

    #[test]
    fn first_insert_wins() {
        let mut document = SchemaDocument::new();
        assert!(document.insert(restricted("a::Token", "string")));
        assert!(document.insert(restricted("a::Pound", "a::Token")));
        assert!(!document.insert(restricted("a::Token", "long")));

        assert_eq!(document.len(), 2);
        assert_eq!(
            document.get("net.wirekit:a::Token").and_then(SchemaNotation::source),
            Some("string")
        );
        let names: Vec<_> = document.iter().map(SchemaNotation::name).collect();
        assert_eq!(names, ["a::Token", "a::Pound"]);
    }

    #[test]
    fn wire_form_is_readable_back() {
        let document: SchemaDocument = [restricted("a::X", "string"), restricted("a::Y", "a::X")]
            .into_iter()
            .collect();
        let back = SchemaDocument::from_wire(&document.to_wire()).unwrap();
        assert_eq!(back, document);
    }
}
