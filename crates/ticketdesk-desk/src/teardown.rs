// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed deletion of closed ticket channels.
//!
//! State changes happen before a teardown is scheduled, so a failed deletion
//! (channel already gone, missing permission) only leaves a stray channel
//! behind. Failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;
use tracing::{info, warn, Instrument};

use ticketdesk_core::{ChannelId, ChatPlatform};

pub struct TeardownScheduler {
    platform: Arc<dyn ChatPlatform>,
    tracker: TaskTracker,
}

impl TeardownScheduler {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self {
            platform,
            tracker: TaskTracker::new(),
        }
    }

    /// Deletes `channel` once `delay` has elapsed.
    pub fn schedule(&self, channel: ChannelId, delay: Duration) {
        let platform = Arc::clone(&self.platform);
        self.tracker.spawn(async move {
            tokio::time::sleep(delay).await;
            match platform.delete_channel(&channel).await {
                Ok(()) => info!(channel_id = %channel, "ticket channel deleted"),
                Err(e) => warn!(channel_id = %channel, error = %e, "failed to delete ticket channel"),
            }
        }
        .in_current_span());
    }

    /// Teardowns scheduled but not yet finished.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Waits up to `timeout` for scheduled teardowns. Returns `true` if all finished.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let pending = self.tracker.len();
        if pending == 0 {
            return true;
        }
        info!(pending, "waiting for scheduled channel teardowns");

        self.tracker.close();
        let finished = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();

        if !finished {
            warn!(
                remaining = self.tracker.len(),
                "timeout reached, some ticket channels were not deleted"
            );
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use ticketdesk_test_utils::MockPlatform;
    use tracing_test::traced_test;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deletes_after_delay() {
        let platform = Arc::new(MockPlatform::new());
        let scheduler = TeardownScheduler::new(platform.clone());
        scheduler.schedule(ChannelId::from("7"), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(platform.deleted_channels().await.is_empty());
        assert_eq!(scheduler.pending(), 1);

        assert!(scheduler.drain(Duration::from_secs(5)).await);
        assert_eq!(platform.deleted_channels().await, vec![ChannelId::from("7")]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn failed_deletion_is_logged_not_raised() {
        let platform = Arc::new(MockPlatform::new());
        platform.fail_deletes(true);
        let scheduler = TeardownScheduler::new(platform.clone());
        scheduler.schedule(ChannelId::from("8"), Duration::from_secs(10));

        assert!(scheduler.drain(Duration::from_secs(30)).await);
        assert!(logs_contain("failed to delete ticket channel"));
    }

    #[tokio::test(start_paused = true)]
    async fn drain_times_out_on_long_delay() {
        let platform = Arc::new(MockPlatform::new());
        let scheduler = TeardownScheduler::new(platform.clone());
        scheduler.schedule(ChannelId::from("9"), Duration::from_secs(60));
        assert!(!scheduler.drain(Duration::from_secs(1)).await);
        assert!(platform.deleted_channels().await.is_empty());
    }
}
