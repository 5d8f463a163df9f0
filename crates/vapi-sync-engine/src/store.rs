//! Mapping Store
//!
//! Whole-file persistence of the [`MappingTable`]. A missing file is an
//! empty table; a present but invalid file is an error, never silently
//! replaced.

use crate::error::SyncError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use vapi_sync_core::MappingTable;

/// File-backed mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    /// Store backed by `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table
    ///
    /// # Errors
    /// - [`SyncError::MappingParse`] if the file is not a three-kind mapping
    /// - [`SyncError::MappingIo`] if the file exists but cannot be read
    pub async fn load(&self) -> Result<MappingTable, SyncError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no mapping file, starting empty");
                return Ok(MappingTable::new());
            }
            Err(source) => {
                return Err(SyncError::MappingIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let table: MappingTable =
            serde_json::from_str(&content).map_err(|source| SyncError::MappingParse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), "loaded mapping file");
        Ok(table)
    }

    /// Persist the table, replacing any existing file
    ///
    /// The table is written to a sibling temporary file and renamed over the
    /// target so a crash mid-write never leaves a truncated mapping.
    ///
    /// # Errors
    /// [`SyncError::MappingIo`] if the directory or file cannot be written
    pub async fn save(&self, table: &MappingTable) -> Result<(), SyncError> {
        let io_err = |source| SyncError::MappingIo {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }

        let mut json = serde_json::to_string_pretty(table).map_err(|e| io_err(e.into()))?;
        json.push('\n');

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(source));
        }

        tracing::debug!(path = %self.path.display(), "saved mapping file");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(ToOwned::to_owned)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
