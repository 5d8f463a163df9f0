//! Field exclusion policies
//!
//! Server-owned and non-portable fields are removed from a payload before
//! it is submitted to the destination account.

use crate::kind::ResourceKind;
use std::fmt;

/// Fields the server assigns or owns, stripped for every kind
const SERVER_OWNED: &[&str] = &["id", "orgId", "createdAt", "updatedAt", "isDeleted"];

/// Derived read-only flags
const READ_ONLY: &[&str] = &["isServerUrlSecretSet"];

/// Back-references from a structured output to the resources linking to it
const STRUCTURED_OUTPUT_BACK_REFS: &[&str] = &["assistantIds", "workflowIds"];

/// Discriminator that cannot change after creation
const IMMUTABLE_TYPE: &[&str] = &["type"];

/// Which destination call a payload is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// `POST` to the collection
    Create,
    /// `PATCH` an existing object
    Update,
}

impl WriteMode {
    /// HTTP method name
    #[inline]
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Create => "POST",
            Self::Update => "PATCH",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
        })
    }
}

/// Set of top-level fields excluded from a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    fields: Vec<&'static str>,
}

impl ExclusionPolicy {
    /// Policy for `kind` when building a payload for `mode`
    ///
    /// The update policy is always a superset of the create policy.
    #[must_use]
    pub fn for_kind(kind: ResourceKind, mode: WriteMode) -> Self {
        let mut fields: Vec<&'static str> = SERVER_OWNED.to_vec();

        match kind {
            ResourceKind::Assistant => fields.extend_from_slice(READ_ONLY),
            ResourceKind::Tool => {
                fields.extend_from_slice(READ_ONLY);
                if mode == WriteMode::Update {
                    fields.extend_from_slice(IMMUTABLE_TYPE);
                }
            }
            ResourceKind::StructuredOutput => {
                fields.extend_from_slice(STRUCTURED_OUTPUT_BACK_REFS);
            }
        }

        Self { fields }
    }

    /// Whether `field` is stripped
    #[inline]
    #[must_use]
    pub fn excludes(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Stripped field names
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}
