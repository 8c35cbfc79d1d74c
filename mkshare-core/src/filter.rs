//! Inclusion filter over artifact names.
//!
//! Names are compared after normalization: the `.mk` extension is dropped
//! (in any case) and the rest is lower-cased, so `RUST`, `rust.mk` and
//! `Rust.MK` all select `Rust.mk`. Entries that match nothing are ignored.

use std::collections::BTreeSet;

use crate::layout::ARTIFACT_EXTENSION;

/// Normalized comparison key for an artifact or filter entry.
pub fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let suffix = format!(".{ARTIFACT_EXTENSION}");
    match lower.strip_suffix(&suffix) {
        Some(stem) => stem.to_owned(),
        None => lower,
    }
}

/// Allow-list of artifact names. Empty means "include everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionFilter {
    names: BTreeSet<String>,
}

impl InclusionFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Parse a comma-separated list such as `"rust, common"`.
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn includes(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(&normalize(name))
    }

    /// Keep the items whose name passes the filter, preserving input order.
    pub fn apply<T, F>(&self, items: Vec<T>, name_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        if self.names.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| self.includes(name_of(item)))
            .collect()
    }
}
