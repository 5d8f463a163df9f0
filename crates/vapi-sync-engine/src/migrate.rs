//! Assistant migration orchestrator
//!
//! Linear state machine, no back-edges:
//!
//! ```text
//! FetchSource → ExtractDependencies → SyncStructuredOutputs* → SyncTools*
//!   → RewriteReferences → ResolveAssistant(create|update) → PersistMapping
//! ```
//!
//! Every step is awaited before the next starts. `PersistMapping` runs on
//! the success path and on the failure path, so dependencies created before
//! a failure are remembered by the next run.

use crate::config::{Credentials, MigrationConfig};
use crate::error::SyncError;
use crate::report::MigrationReport;
use crate::store::MappingStore;
use crate::sync::Synchronizer;
use std::fmt;
use vapi_sync_client::ApiClient;
use vapi_sync_core::{rewrite, Dependencies, MappingTable, ResourceKind};

/// Orchestrator stage, used for progress logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchSource,
    ExtractDependencies,
    SyncStructuredOutputs,
    SyncTools,
    RewriteReferences,
    ResolveAssistant,
    PersistMapping,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FetchSource => "fetch-source",
            Self::ExtractDependencies => "extract-dependencies",
            Self::SyncStructuredOutputs => "sync-structured-outputs",
            Self::SyncTools => "sync-tools",
            Self::RewriteReferences => "rewrite-references",
            Self::ResolveAssistant => "resolve-assistant",
            Self::PersistMapping => "persist-mapping",
        })
    }
}

/// Migrates one assistant and its dependencies
#[derive(Debug)]
pub struct Migrator<C> {
    sync: Synchronizer<C>,
    store: MappingStore,
}

impl<C: ApiClient> Migrator<C> {
    /// Create new migrator
    #[must_use]
    pub fn new(client: C, credentials: Credentials, store: MappingStore) -> Self {
        Self {
            sync: Synchronizer::new(client, credentials),
            store,
        }
    }

    /// Create from a validated configuration
    ///
    /// # Errors
    /// [`SyncError::Configuration`] if `config` is incomplete
    pub fn from_config(client: C, config: &MigrationConfig) -> Result<Self, SyncError> {
        config.validate()?;
        Ok(Self::new(
            client,
            config.credentials.clone(),
            MappingStore::new(config.mapping_path.clone()),
        ))
    }

    /// Mapping store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Migrate `assistant_id` and persist the mapping table
    ///
    /// The mapping file is written exactly once, whether or not the
    /// migration succeeds. If both the migration and the flush fail, the
    /// migration error is returned and the flush error is logged.
    ///
    /// # Errors
    /// - [`SyncError::Configuration`] if `assistant_id` is empty
    /// - [`SyncError::MappingParse`] / [`SyncError::MappingIo`] from the store
    /// - any error of [`Self::migrate_with_table`]
    pub async fn migrate_assistant(&self, assistant_id: &str) -> Result<MigrationReport, SyncError> {
        if assistant_id.trim().is_empty() {
            return Err(SyncError::configuration("assistant id is required"));
        }

        let mut table = self.store.load().await?;
        let outcome = self.migrate_with_table(assistant_id, &mut table).await;

        tracing::info!(stage = %Stage::PersistMapping, path = %self.store.path().display(), "persisting mapping");
        let saved = self.store.save(&table).await;

        match (outcome, saved) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(save_err)) => Err(save_err),
            (Err(err), Ok(())) => {
                tracing::warn!(error = %err, "migration failed; partial mapping persisted");
                Err(err)
            }
            (Err(err), Err(save_err)) => {
                tracing::error!(error = %save_err, "failed to persist mapping after migration failure");
                Err(err)
            }
        }
    }

    /// Run every stage except `PersistMapping` against an in-memory table
    ///
    /// Entries for created resources are in `table` even when this returns
    /// an error.
    ///
    /// # Errors
    /// The first [`SyncError`] raised by any stage
    pub async fn migrate_with_table(
        &self,
        assistant_id: &str,
        table: &mut MappingTable,
    ) -> Result<MigrationReport, SyncError> {
        tracing::info!(stage = %Stage::FetchSource, assistant_id, "fetching source assistant");
        let assistant = self.sync.fetch(ResourceKind::Assistant, assistant_id).await?;

        let deps = Dependencies::of(&assistant);
        tracing::info!(
            stage = %Stage::ExtractDependencies,
            tools = deps.tools.len(),
            structured_outputs = deps.structured_outputs.len(),
            "extracted dependencies"
        );

        let mut resources = Vec::with_capacity(deps.len() + 1);

        for id in &deps.structured_outputs {
            tracing::debug!(stage = %Stage::SyncStructuredOutputs, id = %id, "syncing");
            resources.push(
                self.sync
                    .synchronize(ResourceKind::StructuredOutput, id, table)
                    .await?,
            );
        }

        for id in &deps.tools {
            tracing::debug!(stage = %Stage::SyncTools, id = %id, "syncing");
            resources.push(self.sync.synchronize(ResourceKind::Tool, id, table).await?);
        }

        let rewritten = rewrite::rewrite(&assistant, table);
        tracing::info!(
            stage = %Stage::RewriteReferences,
            rewritten = rewrite::count_rewrites(&assistant, table),
            "rewrote references"
        );

        tracing::info!(
            stage = %Stage::ResolveAssistant,
            assistant_id,
            mapped = table.contains(ResourceKind::Assistant, assistant_id),
            "resolving assistant"
        );
        let resolved = self
            .sync
            .apply(ResourceKind::Assistant, assistant_id, &rewritten, table)
            .await?;

        let destination_assistant_id = resolved.destination_id.clone();
        resources.push(resolved);

        Ok(MigrationReport {
            source_assistant_id: assistant_id.to_string(),
            destination_assistant_id,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SyncAction;
    use serde_json::json;
    use vapi_sync_client::Method;
    use vapi_sync_test_utils::FakeApi;

    fn migrator<'a>(api: &'a FakeApi, dir: &tempfile::TempDir) -> Migrator<&'a FakeApi> {
        Migrator::new(
            api,
            Credentials::new("src", "dst"),
            MappingStore::new(dir.path().join("map.json")),
        )
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::FetchSource.to_string(), "fetch-source");
        assert_eq!(Stage::PersistMapping.to_string(), "persist-mapping");
    }

    #[tokio::test]
    async fn empty_assistant_id_touches_nothing() {
        let api = FakeApi::new();
        let dir = tempfile::tempdir().unwrap();

        let err = migrator(&api, &dir).migrate_assistant("  ").await.unwrap_err();

        assert!(err.is_configuration());
        assert!(api.requests().is_empty());
        assert!(!dir.path().join("map.json").exists());
    }

    #[tokio::test]
    async fn from_config_rejects_missing_credentials() {
        let api = FakeApi::new();
        let config = MigrationConfig::new(Credentials::new("src", ""));
        let err = Migrator::from_config(&api, &config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn dependency_free_assistant_is_created() {
        let api = FakeApi::new();
        api.add_source(ResourceKind::Assistant, json!({ "id": "A1", "name": "Bare" }));
        let dir = tempfile::tempdir().unwrap();

        let report = migrator(&api, &dir).migrate_assistant("A1").await.unwrap();

        assert_eq!(report.resources.len(), 1);
        assert_eq!(report.resources[0].action, SyncAction::Created);
        assert_eq!(api.writes()[0].method, Method::Post);
        assert_eq!(api.writes()[0].path, "/assistant");
    }

    #[tokio::test]
    async fn structured_outputs_resolve_before_tools() {
        let api = FakeApi::new();
        api.add_source(
            ResourceKind::Assistant,
            json!({
                "id": "A1",
                "model": { "toolIds": ["T1"] },
                "artifactPlan": { "structuredOutputIds": ["S1"] }
            }),
        );
        api.add_source(ResourceKind::Tool, json!({ "id": "T1", "type": "function" }));
        api.add_source(ResourceKind::StructuredOutput, json!({ "id": "S1", "name": "s" }));
        let dir = tempfile::tempdir().unwrap();

        let report = migrator(&api, &dir).migrate_assistant("A1").await.unwrap();

        let kinds: Vec<_> = report.resources.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::StructuredOutput,
                ResourceKind::Tool,
                ResourceKind::Assistant
            ]
        );
    }
}
