// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat platform for deterministic testing.
//!
//! `MockPlatform` implements `ChatPlatform` in memory: provisioned channels get
//! sequential ids, posts and deletions are captured, and channel history is
//! seeded by the test.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use ticketdesk_core::types::{ChannelRequest, HistoryMessage};
use ticketdesk_core::{
    ChannelId, ChatPlatform, MessageId, OutboundMessage, RoleId, TicketdeskError, UserId,
};

/// First id handed out by [`MockPlatform::provision_ticket_channel`].
pub const FIRST_CHANNEL_ID: u64 = 5000;

#[derive(Default)]
struct State {
    provisioned: Vec<(ChannelId, ChannelRequest)>,
    posts: Vec<(ChannelId, OutboundMessage)>,
    deleted: Vec<ChannelId>,
    /// Chronological, oldest first.
    history: HashMap<ChannelId, Vec<HistoryMessage>>,
    names: HashMap<ChannelId, String>,
    roles: HashMap<String, RoleId>,
}

/// A mock chat platform that records every call.
#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<State>,
    next_id: AtomicUsize,
    next_message: AtomicUsize,
    history_fetches: AtomicUsize,
    fail_provisioning: AtomicBool,
    fail_posts: AtomicBool,
    fail_history: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes channel provisioning fail.
    pub fn fail_provisioning(&self, fail: bool) {
        self.fail_provisioning.store(fail, Ordering::SeqCst);
    }

    /// Makes every post fail.
    pub fn fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    /// Makes history retrieval fail.
    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    /// Makes channel deletion fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Registers a named role for `find_role`.
    pub async fn add_role(&self, name: &str, id: impl Into<RoleId>) {
        self.state
            .lock()
            .await
            .roles
            .insert(name.to_lowercase(), id.into());
    }

    /// Replaces the history of a channel. `messages` must be oldest first.
    pub async fn seed_history(&self, channel: &ChannelId, messages: Vec<HistoryMessage>) {
        self.state
            .lock()
            .await
            .history
            .insert(channel.clone(), messages);
    }

    /// Number of `fetch_history` calls so far.
    pub fn history_fetches(&self) -> usize {
        self.history_fetches.load(Ordering::SeqCst)
    }

    /// Every provisioning request, with the id it was given.
    pub async fn provisioned(&self) -> Vec<(ChannelId, ChannelRequest)> {
        self.state.lock().await.provisioned.clone()
    }

    /// Every successful post, in order.
    pub async fn posted(&self) -> Vec<(ChannelId, OutboundMessage)> {
        self.state.lock().await.posts.clone()
    }

    /// Posts sent to one channel.
    pub async fn posted_to(&self, channel: &ChannelId) -> Vec<OutboundMessage> {
        self.state
            .lock()
            .await
            .posts
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub async fn deleted_channels(&self) -> Vec<ChannelId> {
        self.state.lock().await.deleted.clone()
    }

    /// A plain history message whose id and timestamp derive from `n`.
    pub fn history_message(n: u64, author: &str, content: &str) -> HistoryMessage {
        HistoryMessage {
            id: MessageId::from(n.to_string()),
            author_id: UserId::from(author),
            author_name: format!("{author}#0001"),
            created_at: message_time(n),
            content: content.to_string(),
            embeds: Vec::new(),
            attachments: Vec::new(),
        }
    }
}

fn message_time(n: u64) -> DateTime<Utc> {
    let secs = 1_700_000_000 + i64::try_from(n).unwrap_or(0);
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn injected(what: &str) -> TicketdeskError {
    TicketdeskError::platform(format!("mock {what} failure"))
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn provision_ticket_channel(
        &self,
        request: ChannelRequest,
    ) -> Result<ChannelId, TicketdeskError> {
        if self.fail_provisioning.load(Ordering::SeqCst) {
            return Err(injected("provisioning"));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) as u64;
        let id = ChannelId::from((FIRST_CHANNEL_ID + n).to_string());
        let mut state = self.state.lock().await;
        state.names.insert(id.clone(), request.name.clone());
        state.provisioned.push((id.clone(), request));
        Ok(id)
    }

    async fn post(
        &self,
        channel: &ChannelId,
        message: OutboundMessage,
    ) -> Result<MessageId, TicketdeskError> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(injected("post"));
        }
        let n = self.next_message.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .await
            .posts
            .push((channel.clone(), message));
        Ok(MessageId::from(format!("mock-msg-{n}")))
    }

    async fn fetch_history(
        &self,
        channel: &ChannelId,
        before: Option<&MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, TicketdeskError> {
        self.history_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(injected("history"));
        }
        let state = self.state.lock().await;
        let all = state.history.get(channel).map(Vec::as_slice).unwrap_or(&[]);
        let older = match before {
            Some(cursor) => match all.iter().position(|m| &m.id == cursor) {
                Some(idx) => &all[..idx],
                None => &all[..0],
            },
            None => all,
        };
        let start = older.len().saturating_sub(usize::from(limit));
        Ok(older[start..].iter().rev().cloned().collect())
    }

    async fn channel_name(&self, channel: &ChannelId) -> Result<String, TicketdeskError> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(injected("channel lookup"));
        }
        let state = self.state.lock().await;
        Ok(state
            .names
            .get(channel)
            .cloned()
            .unwrap_or_else(|| format!("channel-{channel}")))
    }

    async fn delete_channel(&self, channel: &ChannelId) -> Result<(), TicketdeskError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(injected("delete"));
        }
        self.state.lock().await.deleted.push(channel.clone());
        Ok(())
    }

    async fn find_role(&self, name: &str) -> Result<Option<RoleId>, TicketdeskError> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .get(&name.to_lowercase())
            .cloned())
    }
}
