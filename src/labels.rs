// snapshot/src/labels.rs
//! Extension → fence label ("language hint") table.

use std::collections::BTreeMap;

use crate::util::extension_of;

/// Labels for the built-in table. Anything not listed gets a bare fence.
const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("jsx", "jsx"),
    ("js", "javascript"),
    ("css", "css"),
    ("md", "markdown"),
];

/// Read-only mapping from file extension to fence label.
/// Lookup is exact (case-sensitive); misses resolve to `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    map: BTreeMap<String, String>,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_LABELS.iter().copied())
    }
}

impl LabelTable {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { map }
    }

    /// Label for a logical path, derived from its extension.
    pub fn label_of(&self, logical: &str) -> &str {
        self.label_for_ext(extension_of(logical))
    }

    pub fn label_for_ext(&self, ext: &str) -> &str {
        self.map.get(ext).map(String::as_str).unwrap_or("")
    }

    /// Entries in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/* ================================== Tests ================================== */
