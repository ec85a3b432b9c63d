// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`StateStore`] with save counting and fault injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ticketdesk_core::{StateStore, StoreDocument, TicketdeskError};

#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<StoreDocument>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing document.
    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> StoreDocument {
        self.document.lock().await.clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes every subsequent save fail with a storage error.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<StoreDocument, TicketdeskError> {
        let mut document = self.document.lock().await.clone();
        document.normalize();
        Ok(document)
    }

    async fn save(&self, document: &StoreDocument) -> Result<(), TicketdeskError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(TicketdeskError::Storage {
                source: "memory store configured to fail".into(),
            });
        }
        *self.document.lock().await = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
