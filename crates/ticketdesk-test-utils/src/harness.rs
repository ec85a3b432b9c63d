// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end desk tests.
//!
//! `TestHarness` wires a [`Desk`] to a [`MemoryStore`] and a [`MockPlatform`]
//! and drives it with interaction events, returning what the actor saw.

use std::sync::Arc;

use ticketdesk_config::model::DeskConfig;
use ticketdesk_core::{Actor, Category, ChannelId, Reply, StoreDocument};
use ticketdesk_desk::{Desk, InteractionEvent};

use crate::mock_platform::MockPlatform;
use crate::mock_responder::MockResponder;
use crate::mock_store::MemoryStore;

/// Builder for test environments.
#[derive(Default)]
pub struct TestHarnessBuilder {
    document: Option<StoreDocument>,
    config: Option<DeskConfig>,
}

impl TestHarnessBuilder {
    /// Seed the store with an existing document.
    pub fn with_document(mut self, document: StoreDocument) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_config(mut self, config: DeskConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> TestHarness {
        let store = Arc::new(match self.document {
            Some(document) => MemoryStore::with_document(document),
            None => MemoryStore::new(),
        });
        let platform = Arc::new(MockPlatform::new());
        let desk = Desk::new(
            store.clone(),
            platform.clone(),
            self.config.unwrap_or_default(),
        );
        TestHarness {
            desk,
            store,
            platform,
        }
    }
}

/// A desk with in-memory collaborators.
pub struct TestHarness {
    pub desk: Desk,
    pub store: Arc<MemoryStore>,
    pub platform: Arc<MockPlatform>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Dispatches one event and returns every reply the actor received.
    pub async fn send(&self, event: InteractionEvent) -> Vec<Reply> {
        let responder = MockResponder::new();
        self.desk.dispatch(event, &responder).await;
        responder.replies().await
    }

    /// Dispatches one event and returns its single reply.
    ///
    /// # Panics
    ///
    /// Panics if the desk replied more or less than once.
    pub async fn send_one(&self, event: InteractionEvent) -> Reply {
        let mut replies = self.send(event).await;
        assert_eq!(replies.len(), 1, "expected exactly one reply, got {replies:?}");
        replies.remove(0)
    }

    /// Submits an intake form and returns the channel of the new ticket.
    ///
    /// # Panics
    ///
    /// Panics if no channel was provisioned.
    pub async fn open_ticket(&self, creator: &Actor, category: Category) -> ChannelId {
        let values = category
            .intake_fields()
            .iter()
            .map(|f| format!("{} value", f.label))
            .collect();
        self.send(InteractionEvent::SubmitIntake {
            actor: creator.clone(),
            category,
            values,
        })
        .await;
        let provisioned = self.platform.provisioned().await;
        let (channel, _) = provisioned
            .last()
            .expect("intake submission provisioned no channel");
        channel.clone()
    }

    /// Current persisted document.
    pub async fn document(&self) -> StoreDocument {
        self.store.snapshot().await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
