//! Migration report

use serde::Serialize;
use std::fmt;
use vapi_sync_core::ResourceKind;

/// What the synchronizer did with one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// No mapping entry existed; a destination object was created
    Created,
    /// A mapping entry existed; the destination object was patched
    Updated,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
        })
    }
}

/// A resource resolved to its destination counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    pub kind: ResourceKind,
    pub source_id: String,
    pub destination_id: String,
    pub action: SyncAction,
}

/// Outcome of a successful assistant migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub source_assistant_id: String,
    pub destination_assistant_id: String,
    /// Every resolved resource in processing order, assistant last
    pub resources: Vec<ResolvedResource>,
}

impl MigrationReport {
    /// Number of destination objects created
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(SyncAction::Created)
    }

    /// Number of destination objects updated
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(SyncAction::Updated)
    }

    fn count(&self, action: SyncAction) -> usize {
        self.resources.iter().filter(|r| r.action == action).count()
    }

    /// Resolved resources of one kind
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResolvedResource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "assistant {} -> {}",
            self.source_assistant_id, self.destination_assistant_id
        )?;
        for r in &self.resources {
            writeln!(
                f,
                "  {:<16} {} -> {} ({})",
                r.kind.as_str(),
                r.source_id,
                r.destination_id,
                r.action
            )?;
        }
        write!(f, "{} created, {} updated", self.created(), self.updated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> MigrationReport {
        MigrationReport {
            source_assistant_id: "A1".into(),
            destination_assistant_id: "A1'".into(),
            resources: vec![
                ResolvedResource {
                    kind: ResourceKind::Tool,
                    source_id: "T1".into(),
                    destination_id: "T1'".into(),
                    action: SyncAction::Created,
                },
                ResolvedResource {
                    kind: ResourceKind::Assistant,
                    source_id: "A1".into(),
                    destination_id: "A1'".into(),
                    action: SyncAction::Updated,
                },
            ],
        }
    }

    #[test]
    fn counters() {
        let r = report();
        assert_eq!(r.created(), 1);
        assert_eq!(r.updated(), 1);
        assert_eq!(r.of_kind(ResourceKind::Tool).count(), 1);
    }

    #[test]
    fn json_shape() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["sourceAssistantId"], "A1");
        assert_eq!(
            value["resources"][0],
            json!({ "kind": "tool", "sourceId": "T1", "destinationId": "T1'", "action": "created" })
        );
    }

    #[test]
    fn display_summary() {
        let text = report().to_string();
        assert!(text.starts_with("assistant A1 -> A1'"));
        assert!(text.ends_with("1 created, 1 updated"));
    }
}
