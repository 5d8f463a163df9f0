//! Resource Synchronizer
//!
//! Create-or-update resolution for a single resource. The mapping table
//! decides the branch: a recorded source ID means the destination object
//! exists and is patched in place; otherwise it is created and the new
//! destination ID is recorded before returning.

use crate::config::Credentials;
use crate::error::SyncError;
use crate::report::{ResolvedResource, SyncAction};
use serde_json::Value;
use vapi_sync_client::{ApiClient, ApiRequest};
use vapi_sync_core::{ExclusionPolicy, MappingTable, Resource, ResourceKind, WriteMode};

/// Applies source resources to the destination account
#[derive(Debug, Clone)]
pub struct Synchronizer<C> {
    client: C,
    credentials: Credentials,
}

impl<C: ApiClient> Synchronizer<C> {
    /// Create new synchronizer
    #[inline]
    #[must_use]
    pub fn new(client: C, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Read a source object with the source credential
    ///
    /// # Errors
    /// - [`SyncError::Fetch`] on any transport failure or non-success status
    /// - [`SyncError::InvalidResource`] if the response is not a resource
    pub async fn fetch(&self, kind: ResourceKind, source_id: &str) -> Result<Resource, SyncError> {
        let request = ApiRequest::get(kind.item_path(source_id), self.credentials.source.as_str());
        let value = self
            .client
            .send(request)
            .await
            .map_err(|source| SyncError::Fetch {
                kind,
                id: source_id.to_string(),
                source,
            })?;

        Resource::from_value(value).map_err(|source| SyncError::InvalidResource {
            kind,
            id: source_id.to_string(),
            source,
        })
    }

    /// Fetch `source_id` and apply it to the destination
    ///
    /// # Errors
    /// Any error of [`Self::fetch`] or [`Self::apply`]
    pub async fn synchronize(
        &self,
        kind: ResourceKind,
        source_id: &str,
        table: &mut MappingTable,
    ) -> Result<ResolvedResource, SyncError> {
        let source = self.fetch(kind, source_id).await?;
        self.apply(kind, source_id, &source, table).await
    }

    /// Create or update the destination counterpart of `source`
    ///
    /// On create, the new mapping entry is written to `table` before this
    /// returns, so later failures in the run cannot lose it.
    ///
    /// # Errors
    /// - [`SyncError::Write`] on any transport failure or non-success status
    /// - [`SyncError::MissingDestinationId`] if a create response has no `id`
    pub async fn apply(
        &self,
        kind: ResourceKind,
        source_id: &str,
        source: &Resource,
        table: &mut MappingTable,
    ) -> Result<ResolvedResource, SyncError> {
        if let Some(existing) = table.get(kind, source_id) {
            let destination_id = existing.to_string();
            let payload = source.to_payload(&ExclusionPolicy::for_kind(kind, WriteMode::Update));
            let request = ApiRequest::patch(
                kind.item_path(&destination_id),
                self.credentials.destination.as_str(),
                payload,
            );
            self.write(kind, WriteMode::Update, source_id, request).await?;

            tracing::info!(%kind, source_id, destination_id = %destination_id, "updated");
            return Ok(ResolvedResource {
                kind,
                source_id: source_id.to_string(),
                destination_id,
                action: SyncAction::Updated,
            });
        }

        let payload = source.to_payload(&ExclusionPolicy::for_kind(kind, WriteMode::Create));
        let request = ApiRequest::post(
            kind.collection_path(),
            self.credentials.destination.as_str(),
            payload,
        );
        let created = self.write(kind, WriteMode::Create, source_id, request).await?;

        let destination_id = created
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SyncError::MissingDestinationId {
                kind,
                id: source_id.to_string(),
            })?
            .to_string();

        table.insert(kind, source_id, destination_id.as_str());
        tracing::info!(%kind, source_id, destination_id = %destination_id, "created");

        Ok(ResolvedResource {
            kind,
            source_id: source_id.to_string(),
            destination_id,
            action: SyncAction::Created,
        })
    }

    async fn write(
        &self,
        kind: ResourceKind,
        mode: WriteMode,
        source_id: &str,
        request: ApiRequest,
    ) -> Result<Value, SyncError> {
        tracing::debug!(%kind, %mode, source_id, path = %request.path, "writing to destination");
        self.client
            .send(request)
            .await
            .map_err(|source| SyncError::Write {
                kind,
                mode,
                id: source_id.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vapi_sync_client::Method;
    use vapi_sync_test_utils::FakeApi;

    fn synchronizer(api: &FakeApi) -> Synchronizer<&FakeApi> {
        Synchronizer::new(api, Credentials::new("src-key", "dst-key"))
    }

    #[tokio::test]
    async fn absent_mapping_creates_and_records() {
        let api = FakeApi::new();
        api.add_source(
            ResourceKind::Tool,
            json!({ "id": "T1", "orgId": "org", "createdAt": "t", "type": "function", "name": "lookup" }),
        );
        let mut table = MappingTable::new();

        let resolved = synchronizer(&api)
            .synchronize(ResourceKind::Tool, "T1", &mut table)
            .await
            .unwrap();

        assert_eq!(resolved.action, SyncAction::Created);
        assert_eq!(table.get(ResourceKind::Tool, "T1"), Some(resolved.destination_id.as_str()));

        let create = api.last_write().unwrap();
        assert_eq!(create.method, Method::Post);
        assert_eq!(create.path, "/tool");
        assert_eq!(create.api_key, "dst-key");
        assert_eq!(create.body, Some(json!({ "type": "function", "name": "lookup" })));
    }

    #[tokio::test]
    async fn present_mapping_patches_without_type() {
        let api = FakeApi::new();
        api.add_source(
            ResourceKind::Tool,
            json!({ "id": "T1", "orgId": "org", "createdAt": "t", "type": "function", "name": "lookup" }),
        );
        api.add_destination(ResourceKind::Tool, "T1-dest");
        let mut table = MappingTable::new();
        table.insert(ResourceKind::Tool, "T1", "T1-dest");

        let resolved = synchronizer(&api)
            .synchronize(ResourceKind::Tool, "T1", &mut table)
            .await
            .unwrap();

        assert_eq!(resolved.action, SyncAction::Updated);
        assert_eq!(resolved.destination_id, "T1-dest");
        assert_eq!(table.len(ResourceKind::Tool), 1);

        let update = api.last_write().unwrap();
        assert_eq!(update.method, Method::Patch);
        assert_eq!(update.path, "/tool/T1-dest");
        assert_eq!(update.body, Some(json!({ "name": "lookup" })));
    }

    #[tokio::test]
    async fn fetch_uses_source_credential() {
        let api = FakeApi::new();
        api.add_source(ResourceKind::StructuredOutput, json!({ "id": "S1", "name": "summary" }));
        synchronizer(&api)
            .fetch(ResourceKind::StructuredOutput, "S1")
            .await
            .unwrap();

        let requests = api.requests();
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].path, "/structured-output/S1");
        assert_eq!(requests[0].api_key, "src-key");
    }

    #[tokio::test]
    async fn missing_source_is_a_fetch_error_and_nothing_is_written() {
        let api = FakeApi::new();
        let mut table = MappingTable::new();

        let err = synchronizer(&api)
            .synchronize(ResourceKind::Tool, "gone", &mut table)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Fetch { kind: ResourceKind::Tool, .. }));
        assert_eq!(err.http_status(), Some(404));
        assert!(api.writes().is_empty());
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn failed_create_leaves_mapping_untouched() {
        let api = FakeApi::new();
        api.add_source(ResourceKind::Tool, json!({ "id": "T1", "type": "function" }));
        api.fail_on(Method::Post, "/tool", 500);
        let mut table = MappingTable::new();

        let err = synchronizer(&api)
            .synchronize(ResourceKind::Tool, "T1", &mut table)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::Write { mode: WriteMode::Create, .. }
        ));
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn create_without_id_is_rejected() {
        let api = FakeApi::new();
        api.add_source(ResourceKind::Tool, json!({ "id": "T1", "type": "function" }));
        api.respond_without_id(ResourceKind::Tool);
        let mut table = MappingTable::new();

        let err = synchronizer(&api)
            .synchronize(ResourceKind::Tool, "T1", &mut table)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::MissingDestinationId { .. }));
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn structured_output_back_refs_never_sent() {
        let api = FakeApi::new();
        api.add_source(
            ResourceKind::StructuredOutput,
            json!({ "id": "S1", "name": "summary", "type": "ai", "assistantIds": ["A1"], "workflowIds": [] }),
        );
        let mut table = MappingTable::new();
        let sync = synchronizer(&api);

        sync.synchronize(ResourceKind::StructuredOutput, "S1", &mut table)
            .await
            .unwrap();
        sync.synchronize(ResourceKind::StructuredOutput, "S1", &mut table)
            .await
            .unwrap();

        let writes = api.writes();
        assert_eq!(writes.len(), 2);
        for write in writes {
            assert_eq!(write.body, Some(json!({ "name": "summary", "type": "ai" })));
        }
    }
}
