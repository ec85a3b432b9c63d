// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent store trait for the whole-document state.

use async_trait::async_trait;

use crate::document::StoreDocument;
use crate::error::TicketdeskError;

/// Durable home of the [`StoreDocument`].
///
/// Every mutation is read-entire, modify in memory, write-entire. Stores make
/// no promise about concurrent cycles: two overlapping load/save pairs lose
/// one write. Callers that need exclusion serialize the cycle themselves.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Loads the full document, creating and persisting defaults if none exists.
    /// Missing keys are backfilled.
    async fn load(&self) -> Result<StoreDocument, TicketdeskError>;

    /// Replaces the full document.
    async fn save(&self, document: &StoreDocument) -> Result<(), TicketdeskError>;
}
