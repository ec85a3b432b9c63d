// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock interaction responder that captures replies.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ticketdesk_core::{Reply, Responder, TicketdeskError};

#[derive(Default)]
pub struct MockResponder {
    replies: Mutex<Vec<Reply>>,
    responded: AtomicBool,
    fail: AtomicBool,
}

impl MockResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every response fail, as an expired interaction would.
    pub fn fail_responses(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn replies(&self) -> Vec<Reply> {
        self.replies.lock().await.clone()
    }

    pub async fn last_reply(&self) -> Option<Reply> {
        self.replies.lock().await.last().cloned()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, reply: Reply) -> Result<(), TicketdeskError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TicketdeskError::platform("mock response failure"));
        }
        self.replies.lock().await.push(reply);
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }
}
