//! vapi-sync Core
//!
//! Pure data model for migrating an assistant and its dependencies between
//! accounts. Nothing in this crate performs I/O.
//!
//! # Core Concepts
//!
//! - [`ResourceKind`]: The three migratable kinds and their endpoints
//! - [`Resource`]: Opaque JSON record with a mandatory `id`
//! - [`MappingTable`]: Source-ID → destination-ID memory, per kind
//! - [`ExclusionPolicy`]: Fields stripped before create/update calls
//! - [`extract`]: Dependency discovery across legacy and modern shapes
//! - [`rewrite`]: Cross-reference rewriting through the mapping table
//!
//! # Example
//!
//! ```rust
//! use vapi_sync_core::{extract, rewrite, MappingTable, Resource, ResourceKind};
//! use serde_json::json;
//!
//! let assistant = Resource::from_value(json!({
//!     "id": "A1",
//!     "model": { "toolIds": ["T1"] }
//! }))
//! .unwrap();
//!
//! assert_eq!(extract::tool_ids(&assistant).len(), 1);
//!
//! let mut table = MappingTable::new();
//! table.insert(ResourceKind::Tool, "T1", "T1-dest");
//! let rewritten = rewrite::rewrite(&assistant, &table);
//! assert_eq!(rewritten.get("model").unwrap()["toolIds"][0], "T1-dest");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod error;
pub mod extract;
mod kind;
mod mapping;
mod policy;
mod resource;
pub mod rewrite;
pub mod shape;

// Re-exports
pub use error::ResourceError;
pub use extract::{structured_output_ids, tool_ids, Dependencies, IdSet};
pub use kind::ResourceKind;
pub use mapping::MappingTable;
pub use policy::{ExclusionPolicy, WriteMode};
pub use resource::Resource;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
