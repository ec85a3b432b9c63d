// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder trait: the reply path back to the triggering actor.

use async_trait::async_trait;

use crate::error::TicketdeskError;
use crate::reply::Reply;

/// Answers the single interaction an event came from.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends the response. Platforms accept one initial response per
    /// interaction; later calls become follow-ups.
    async fn respond(&self, reply: Reply) -> Result<(), TicketdeskError>;

    /// Whether a response has already been sent. A deferral alone does not
    /// count; the next response completes it.
    fn has_responded(&self) -> bool;
}
