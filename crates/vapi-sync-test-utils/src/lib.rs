//! Testing utilities for vapi-sync workspace
//!
//! [`FakeApi`] is an in-memory [`ApiClient`] holding a source account and a
//! destination account. It records every request so tests can assert on
//! ordering, credentials and payloads.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use vapi_sync_client::{ApiClient, ApiRequest, Method, TransportError};
use vapi_sync_core::ResourceKind;

#[derive(Debug, Default)]
struct State {
    source: HashMap<(ResourceKind, String), Value>,
    destination: HashMap<(ResourceKind, String), Value>,
    queued_ids: HashMap<ResourceKind, VecDeque<String>>,
    failures: HashMap<(Method, String), u16>,
    no_id_kinds: HashSet<ResourceKind>,
    requests: Vec<ApiRequest>,
    next_id: usize,
}

/// In-memory source and destination accounts
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a source object; its `id` field is the lookup key
    pub fn add_source(&self, kind: ResourceKind, object: Value) {
        let id = object["id"].as_str().unwrap_or_default().to_string();
        self.state.lock().source.insert((kind, id), object);
    }

    /// Seed a destination object that already exists
    pub fn add_destination(&self, kind: ResourceKind, id: &str) {
        self.state
            .lock()
            .destination
            .insert((kind, id.to_string()), json!({ "id": id }));
    }

    /// ID the next create of `kind` returns; otherwise `dst-<kind>-<n>`
    pub fn queue_destination_id(&self, kind: ResourceKind, id: &str) {
        self.state
            .lock()
            .queued_ids
            .entry(kind)
            .or_default()
            .push_back(id.to_string());
    }

    /// Answer `method path` with `status` instead of performing it
    pub fn fail_on(&self, method: Method, path: &str, status: u16) {
        self.state
            .lock()
            .failures
            .insert((method, path.to_string()), status);
    }

    /// Creates of `kind` succeed but the response has no `id`
    pub fn respond_without_id(&self, kind: ResourceKind) {
        self.state.lock().no_id_kinds.insert(kind);
    }

    /// Every request received, in order
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().requests.clone()
    }

    /// Create and update requests, in order
    #[must_use]
    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get)
            .collect()
    }

    #[must_use]
    pub fn last_write(&self) -> Option<ApiRequest> {
        self.writes().pop()
    }

    /// Number of create requests
    #[must_use]
    pub fn creates(&self) -> usize {
        self.count(Method::Post)
    }

    /// Number of update requests
    #[must_use]
    pub fn updates(&self) -> usize {
        self.count(Method::Patch)
    }

    fn count(&self, method: Method) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Current destination object
    #[must_use]
    pub fn destination(&self, kind: ResourceKind, id: &str) -> Option<Value> {
        self.state
            .lock()
            .destination
            .get(&(kind, id.to_string()))
            .cloned()
    }

    /// Number of destination objects of `kind`
    #[must_use]
    pub fn destination_count(&self, kind: ResourceKind) -> usize {
        self.state
            .lock()
            .destination
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

fn parse_path(path: &str) -> Option<(ResourceKind, Option<&str>)> {
    ResourceKind::ALL.iter().find_map(|kind| {
        let rest = path.strip_prefix(kind.collection_path())?;
        if rest.is_empty() {
            Some((*kind, None))
        } else {
            rest.strip_prefix('/').map(|id| (*kind, Some(id)))
        }
    })
}

fn not_found(request: &ApiRequest) -> TransportError {
    TransportError::status(request.method, request.path.clone(), 404, "Not Found")
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());

        if let Some(status) = state
            .failures
            .get(&(request.method, request.path.clone()))
            .copied()
        {
            return Err(TransportError::status(
                request.method,
                request.path.clone(),
                status,
                "injected failure",
            ));
        }

        let Some((kind, id)) = parse_path(&request.path) else {
            return Err(not_found(&request));
        };

        match (request.method, id) {
            (Method::Get, Some(id)) => state
                .source
                .get(&(kind, id.to_string()))
                .cloned()
                .ok_or_else(|| not_found(&request)),
            (Method::Post, None) => {
                let id = match state.queued_ids.get_mut(&kind).and_then(VecDeque::pop_front) {
                    Some(id) => id,
                    None => {
                        state.next_id += 1;
                        format!("dst-{kind}-{}", state.next_id)
                    }
                };
                let mut object = request.body.clone().unwrap_or_else(|| json!({}));
                merge(&mut object, &json!({ "id": id }));
                state.destination.insert((kind, id), object.clone());

                if state.no_id_kinds.contains(&kind) {
                    if let Some(map) = object.as_object_mut() {
                        map.remove("id");
                    }
                }
                Ok(object)
            }
            (Method::Patch, Some(id)) => {
                let key = (kind, id.to_string());
                let Some(object) = state.destination.get_mut(&key) else {
                    return Err(not_found(&request));
                };
                if let Some(body) = &request.body {
                    merge(object, body);
                }
                Ok(object.clone())
            }
            _ => Err(not_found(&request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_patch_round_trip() {
        let api = FakeApi::new();
        api.queue_destination_id(ResourceKind::Tool, "T1'");

        let created = api
            .send(ApiRequest::post("/tool", "k", json!({ "name": "a" })))
            .await
            .unwrap();
        assert_eq!(created["id"], "T1'");

        api.send(ApiRequest::patch("/tool/T1'", "k", json!({ "name": "b" })))
            .await
            .unwrap();
        assert_eq!(
            api.destination(ResourceKind::Tool, "T1'"),
            Some(json!({ "name": "b", "id": "T1'" }))
        );
        assert_eq!(api.creates(), 1);
        assert_eq!(api.updates(), 1);
    }

    #[tokio::test]
    async fn unknown_objects_are_404() {
        let api = FakeApi::new();
        let err = api
            .send(ApiRequest::get("/assistant/missing", "k"))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(404));

        let err = api
            .send(ApiRequest::patch("/tool/missing", "k", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(404));
    }

    #[test]
    fn path_parsing() {
        assert_eq!(
            parse_path("/structured-output/S1"),
            Some((ResourceKind::StructuredOutput, Some("S1")))
        );
        assert_eq!(parse_path("/tool"), Some((ResourceKind::Tool, None)));
        assert_eq!(parse_path("/squad/X"), None);
    }
}
