//! Dependency Extractor
//!
//! Reconstructs the dependency set of an assistant by scanning every known
//! [`DependencyShape`](crate::shape::DependencyShape). Legacy and modern
//! shapes are scanned unconditionally and merged; an assistant may carry both.

use crate::kind::ResourceKind;
use crate::resource::Resource;
use crate::shape::shapes_for;
use indexmap::IndexSet;

/// Ordered, de-duplicated set of IDs (first occurrence wins)
pub type IdSet = IndexSet<String>;

fn ids_of_kind(resource: &Resource, kind: ResourceKind) -> IdSet {
    let mut ids = IdSet::new();
    for shape in shapes_for(kind) {
        shape.for_each(resource.fields(), |id| {
            if !id.is_empty() && !ids.contains(id) {
                ids.insert(id.to_string());
            }
        });
    }
    ids
}

/// Tool IDs referenced from model tools, `model.toolIds`, hook `toolId`
/// and hook `do` actions
#[must_use]
pub fn tool_ids(assistant: &Resource) -> IdSet {
    ids_of_kind(assistant, ResourceKind::Tool)
}

/// Structured output IDs referenced from the structured data plan and the
/// artifact plan (single and list forms)
#[must_use]
pub fn structured_output_ids(assistant: &Resource) -> IdSet {
    ids_of_kind(assistant, ResourceKind::StructuredOutput)
}

/// Everything an assistant depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub tools: IdSet,
    pub structured_outputs: IdSet,
}

impl Dependencies {
    /// Scan `assistant` for every dependency shape
    #[must_use]
    pub fn of(assistant: &Resource) -> Self {
        Self {
            tools: tool_ids(assistant),
            structured_outputs: structured_output_ids(assistant),
        }
    }

    /// IDs of one kind
    #[must_use]
    pub fn ids(&self, kind: ResourceKind) -> Option<&IdSet> {
        match kind {
            ResourceKind::Tool => Some(&self.tools),
            ResourceKind::StructuredOutput => Some(&self.structured_outputs),
            ResourceKind::Assistant => None,
        }
    }

    /// Total dependency count
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len() + self.structured_outputs.len()
    }

    /// Whether the assistant has no dependencies
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
