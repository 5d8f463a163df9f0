//! Error types for the migration engine
//!
//! Every variant aborts the run. Nothing is retried or recovered locally;
//! the orchestrator only guarantees the mapping table is flushed first.

use std::path::PathBuf;
use vapi_sync_client::TransportError;
use vapi_sync_core::{ResourceError, ResourceKind, WriteMode};

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing credential or identifier, detected before any I/O
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Source read failed
    #[error("failed to fetch {kind} {id}: {source}")]
    Fetch {
        kind: ResourceKind,
        id: String,
        #[source]
        source: TransportError,
    },

    /// Destination create or update failed
    #[error("failed to {mode} {kind} {id}: {source}")]
    Write {
        kind: ResourceKind,
        mode: WriteMode,
        id: String,
        #[source]
        source: TransportError,
    },

    /// Create call succeeded but returned no usable `id`
    #[error("create of {kind} {id} returned no destination id")]
    MissingDestinationId { kind: ResourceKind, id: String },

    /// Fetched source object is not a resource
    #[error("source {kind} {id} is malformed: {source}")]
    InvalidResource {
        kind: ResourceKind,
        id: String,
        #[source]
        source: ResourceError,
    },

    /// Mapping file exists but does not match the three-kind schema
    #[error("mapping file {} is invalid: {source}", .path.display())]
    MappingParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Mapping file could not be read or written
    #[error("mapping file {}: {source}", .path.display())]
    MappingIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Create configuration error
    #[inline]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether the error was raised before any network or file activity
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether the error concerns the mapping file
    #[inline]
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::MappingParse { .. } | Self::MappingIo { .. })
    }

    /// HTTP status of the failed call, if the server answered
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { source, .. } | Self::Write { source, .. } => source.http_status(),
            _ => None,
        }
    }

    /// Resource kind the failure concerns, if any
    #[must_use]
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Fetch { kind, .. }
            | Self::Write { kind, .. }
            | Self::MissingDestinationId { kind, .. }
            | Self::InvalidResource { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
