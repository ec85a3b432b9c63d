// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform trait: channel provisioning, posting, and history access.

use async_trait::async_trait;

use crate::error::TicketdeskError;
use crate::types::{
    ChannelId, ChannelRequest, HistoryMessage, MessageId, OutboundMessage, RoleId,
};

/// The chat community the desk operates in.
#[async_trait]
pub trait ChatPlatform: Send + Sync + 'static {
    /// Creates the dedicated channel for a ticket and returns its id.
    ///
    /// The implementation derives the access-control list and parent
    /// placement from the request.
    async fn provision_ticket_channel(
        &self,
        request: ChannelRequest,
    ) -> Result<ChannelId, TicketdeskError>;

    /// Posts a message to a channel.
    async fn post(
        &self,
        channel: &ChannelId,
        message: OutboundMessage,
    ) -> Result<MessageId, TicketdeskError>;

    /// Fetches up to `limit` messages older than `before` (or the most recent
    /// ones when `before` is `None`), newest first.
    async fn fetch_history(
        &self,
        channel: &ChannelId,
        before: Option<&MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, TicketdeskError>;

    /// Display name of a channel.
    async fn channel_name(&self, channel: &ChannelId) -> Result<String, TicketdeskError>;

    /// Destroys a channel.
    async fn delete_channel(&self, channel: &ChannelId) -> Result<(), TicketdeskError>;

    /// Looks up a role by name, ignoring case.
    async fn find_role(&self, name: &str) -> Result<Option<RoleId>, TicketdeskError>;
}
