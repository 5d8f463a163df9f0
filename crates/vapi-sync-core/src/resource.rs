//! Opaque resource records
//!
//! Resources are fetched as one JSON object and submitted as one JSON object.
//! Only `id` is interpreted here; every other field is carried verbatim.

use crate::error::ResourceError;
use crate::policy::ExclusionPolicy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely-typed record with a mandatory string `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Resource {
    fields: Map<String, Value>,
}

impl Resource {
    /// Interpret a fetched JSON value as a resource
    ///
    /// # Errors
    /// - [`ResourceError::NotAnObject`] if `value` is not an object
    /// - [`ResourceError::MissingId`] if `id` is absent, empty or not a string
    pub fn from_value(value: Value) -> Result<Self, ResourceError> {
        match value {
            Value::Object(fields) => {
                let has_id = fields
                    .get("id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| !id.is_empty());
                if has_id {
                    Ok(Self { fields })
                } else {
                    Err(ResourceError::MissingId)
                }
            }
            other => Err(ResourceError::not_an_object(&other)),
        }
    }

    /// Server-assigned identifier
    #[must_use]
    pub fn id(&self) -> &str {
        // Invariant established by `from_value`.
        self.fields.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    /// Read a top-level field
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All top-level fields
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Mutable access for in-crate transformations
    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Copy of the fields with everything `policy` excludes removed
    ///
    /// The result is the request body for a create or update call.
    #[must_use]
    pub fn to_payload(&self, policy: &ExclusionPolicy) -> Value {
        let payload: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(key, _)| !policy.excludes(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(payload)
    }

    /// Consume into the underlying JSON object
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Value> for Resource {
    type Error = ResourceError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        resource.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResourceKind, WriteMode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rejects_non_objects_and_missing_ids() {
        assert!(matches!(
            Resource::from_value(json!("A1")),
            Err(ResourceError::NotAnObject { found: "string" })
        ));
        assert_eq!(
            Resource::from_value(json!({ "name": "x" })),
            Err(ResourceError::MissingId)
        );
        assert_eq!(
            Resource::from_value(json!({ "id": "" })),
            Err(ResourceError::MissingId)
        );
        assert_eq!(
            Resource::from_value(json!({ "id": 7 })),
            Err(ResourceError::MissingId)
        );
    }

    #[test]
    fn payload_strips_policy_fields_and_keeps_the_rest() {
        let tool = Resource::from_value(json!({
            "id": "T1",
            "orgId": "org-src",
            "createdAt": "2024-01-01T00:00:00Z",
            "type": "function",
            "function": { "name": "lookup" }
        }))
        .unwrap();

        let payload =
            tool.to_payload(&ExclusionPolicy::for_kind(ResourceKind::Tool, WriteMode::Create));

        assert_eq!(
            payload,
            json!({ "type": "function", "function": { "name": "lookup" } })
        );
        // Source untouched
        assert_eq!(tool.id(), "T1");
        assert!(tool.get("orgId").is_some());
    }

    #[test]
    fn serde_round_trip_validates() {
        let parsed: Result<Resource, _> = serde_json::from_value(json!({ "name": "no id" }));
        assert!(parsed.is_err());

        let resource: Resource = serde_json::from_value(json!({ "id": "A1", "name": "x" })).unwrap();
        assert_eq!(serde_json::to_value(&resource).unwrap(), json!({ "id": "A1", "name": "x" }));
    }
}
