//! Resource kinds
//!
//! Each kind owns its REST collection path and its key in the persisted
//! mapping file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of migratable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    /// Root configuration object
    Assistant,
    /// Callable tool referenced from model and hook configuration
    Tool,
    /// Structured output schema referenced from analysis/artifact plans
    StructuredOutput,
}

impl ResourceKind {
    /// All kinds, dependencies first
    pub const ALL: [ResourceKind; 3] = [Self::StructuredOutput, Self::Tool, Self::Assistant];

    /// REST collection segment (`/tool`, `/structured-output`, ...)
    #[inline]
    #[must_use]
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Assistant => "/assistant",
            Self::Tool => "/tool",
            Self::StructuredOutput => "/structured-output",
        }
    }

    /// Path of a single object of this kind
    #[must_use]
    pub fn item_path(self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    /// Key of this kind in the mapping file
    #[inline]
    #[must_use]
    pub fn mapping_key(self) -> &'static str {
        match self {
            Self::Assistant => "assistants",
            Self::Tool => "tools",
            Self::StructuredOutput => "structuredOutputs",
        }
    }

    /// Singular name used in logs and error messages
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::StructuredOutput => "structuredOutput",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_per_kind() {
        assert_eq!(ResourceKind::Assistant.item_path("A1"), "/assistant/A1");
        assert_eq!(ResourceKind::Tool.collection_path(), "/tool");
        assert_eq!(
            ResourceKind::StructuredOutput.item_path("S1"),
            "/structured-output/S1"
        );
    }

    #[test]
    fn mapping_keys_match_file_schema() {
        let keys: Vec<_> = ResourceKind::ALL.iter().map(|k| k.mapping_key()).collect();
        assert_eq!(keys, vec!["structuredOutputs", "tools", "assistants"]);
    }

    #[test]
    fn serde_uses_camel_case() {
        let s = serde_json::to_string(&ResourceKind::StructuredOutput).unwrap();
        assert_eq!(s, "\"structuredOutput\"");
        assert_eq!(ResourceKind::StructuredOutput.to_string(), "structuredOutput");
    }
}
