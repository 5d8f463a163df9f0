//! Source-ID → destination-ID mapping table
//!
//! Serializes to exactly three keys (`assistants`, `tools`,
//! `structuredOutputs`). Unknown keys and missing kinds are rejected on
//! deserialization so a damaged file is never mistaken for empty state.

use crate::kind::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type IdMap = BTreeMap<String, String>;

/// Migration memory, one mapping per resource kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MappingTable {
    assistants: IdMap,
    tools: IdMap,
    structured_outputs: IdMap,
}

impl MappingTable {
    /// Empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: ResourceKind) -> &IdMap {
        match kind {
            ResourceKind::Assistant => &self.assistants,
            ResourceKind::Tool => &self.tools,
            ResourceKind::StructuredOutput => &self.structured_outputs,
        }
    }

    fn map_mut(&mut self, kind: ResourceKind) -> &mut IdMap {
        match kind {
            ResourceKind::Assistant => &mut self.assistants,
            ResourceKind::Tool => &mut self.tools,
            ResourceKind::StructuredOutput => &mut self.structured_outputs,
        }
    }

    /// Destination ID recorded for `source_id`
    #[inline]
    #[must_use]
    pub fn get(&self, kind: ResourceKind, source_id: &str) -> Option<&str> {
        self.map(kind).get(source_id).map(String::as_str)
    }

    /// Whether `source_id` has been migrated before
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: ResourceKind, source_id: &str) -> bool {
        self.map(kind).contains_key(source_id)
    }

    /// Record a mapping entry, returning the previous destination ID if any
    pub fn insert(
        &mut self,
        kind: ResourceKind,
        source_id: impl Into<String>,
        destination_id: impl Into<String>,
    ) -> Option<String> {
        self.map_mut(kind)
            .insert(source_id.into(), destination_id.into())
    }

    /// Entries of one kind in key order
    pub fn entries(&self, kind: ResourceKind) -> impl Iterator<Item = (&str, &str)> {
        self.map(kind)
            .iter()
            .map(|(src, dst)| (src.as_str(), dst.as_str()))
    }

    /// Number of entries of one kind
    #[inline]
    #[must_use]
    pub fn len(&self, kind: ResourceKind) -> usize {
        self.map(kind).len()
    }

    /// Whether no kind has any entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        ResourceKind::ALL.iter().all(|kind| self.map(*kind).is_empty())
    }
}
