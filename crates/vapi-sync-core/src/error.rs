//! Error types for the resource model

/// A JSON value could not be interpreted as a [`crate::Resource`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// Top-level value was not a JSON object
    #[error("resource is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },

    /// The mandatory `id` field is absent or not a non-empty string
    #[error("resource has no string `id` field")]
    MissingId,
}

impl ResourceError {
    /// Name the JSON type of a rejected value
    pub(crate) fn not_an_object(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { found }
    }
}
