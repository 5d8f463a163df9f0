//! vapi-sync Engine
//!
//! One-way migration of an assistant and its tools and structured outputs
//! from a source account to a destination account, keeping logical identity
//! across runs through a persisted mapping file.
//!
//! # Workflow
//!
//! 1. Load the mapping table ([`MappingStore::load`])
//! 2. Fetch the root assistant
//! 3. Extract dependency IDs from every known schema shape
//! 4. Create or update each dependency ([`Synchronizer::synchronize`])
//! 5. Rewrite the assistant's references to destination IDs
//! 6. Create or update the assistant itself
//! 7. Persist the mapping table, on success and on failure
//!
//! # Example
//!
//! ```rust,no_run
//! use vapi_sync_client::{ClientConfig, HttpClient};
//! use vapi_sync_engine::{Credentials, MigrationConfig, Migrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MigrationConfig::new(Credentials::new("src-key", "dst-key"));
//! let client = HttpClient::new(ClientConfig::new(&config.base_url))?;
//! let migrator = Migrator::from_config(client, &config)?;
//!
//! let report = migrator.migrate_assistant("asst_123").await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod error;
pub mod migrate;
pub mod report;
pub mod store;
pub mod sync;

// Re-exports for convenience
pub use config::{Credentials, MigrationConfig, DEFAULT_MAPPING_FILE};
pub use error::SyncError;
pub use migrate::{Migrator, Stage};
pub use report::{MigrationReport, ResolvedResource, SyncAction};
pub use store::MappingStore;
pub use sync::Synchronizer;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a migration
    pub use crate::{
        Credentials, MappingStore, MigrationConfig, MigrationReport, Migrator, SyncAction,
        SyncError,
    };
    pub use vapi_sync_client::{ApiClient, ClientConfig, HttpClient};
    pub use vapi_sync_core::{MappingTable, Resource, ResourceKind};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
