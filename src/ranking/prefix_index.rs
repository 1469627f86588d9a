//! Lower-cased name prefix -> ids, in registration order.
//!
//! Every non-empty prefix of the lower-cased name is a key, cut on character
//! boundaries so multi-byte names index cleanly. Lookup is exact on the key:
//! `"ali"` finds `"Alice_1"` but `"lic"` does not. Memory grows with the sum
//! of name lengths.
//!
//! Case folding is per character, so the folded form of a prefix is always a
//! prefix of the folded name.

use ahash::AHashMap;

use crate::core::types::EntityId;

/// Lower-case `text` one character at a time, without context rules such as
/// the Greek final sigma.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Prefix lookup structure
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NamePrefixIndex {
    prefixes: AHashMap<String, Vec<EntityId>>,
}

impl NamePrefixIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` under every prefix of the lower-cased `name`.
    pub fn index(&mut self, name: &str, id: EntityId) {
        let normalized = fold_case(name);
        for (start, ch) in normalized.char_indices() {
            let end = start + ch.len_utf8();
            self.prefixes
                .entry(normalized[..end].to_owned())
                .or_default()
                .push(id);
        }
    }

    /// Ids registered under the lower-cased `query`, in registration order.
    /// Empty for an empty query.
    pub fn lookup(&self, query: &str) -> &[EntityId] {
        if query.is_empty() {
            return &[];
        }
        self.prefixes
            .get(fold_case(query).as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct prefix keys
    pub fn prefix_count(&self) -> usize {
        self.prefixes.len()
    }
}
