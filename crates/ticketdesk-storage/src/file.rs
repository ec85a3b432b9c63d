// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file implementation of the [`StateStore`] trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use ticketdesk_config::model::StorageConfig;
use ticketdesk_core::{StateStore, StoreDocument, TicketdeskError};

/// Stores the whole document as pretty-printed JSON in one file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous document intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_atomic(&self, bytes: &[u8]) -> Result<(), TicketdeskError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(TicketdeskError::storage)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(TicketdeskError::storage)?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(TicketdeskError::storage)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<StoreDocument, TicketdeskError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let mut document: StoreDocument =
                    serde_json::from_slice(&bytes).map_err(TicketdeskError::storage)?;
                document.normalize();
                Ok(document)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let mut document = StoreDocument::default();
                document.normalize();
                self.save(&document).await?;
                info!(path = %self.path.display(), "created default state document");
                Ok(document)
            }
            Err(e) => Err(TicketdeskError::storage(e)),
        }
    }

    async fn save(&self, document: &StoreDocument) -> Result<(), TicketdeskError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(TicketdeskError::storage)?;
        self.write_atomic(&bytes).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "state document written");
        Ok(())
    }
}
