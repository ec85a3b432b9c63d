// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord adapter for the Ticketdesk support bot.
//!
//! Implements [`ChatPlatform`](ticketdesk_core::ChatPlatform) over the
//! Discord REST API via serenity, answers interactions through
//! [`DiscordResponder`], and runs the gateway connection that feeds
//! interactions to the desk.

pub mod access;
pub mod commands;
pub mod handler;
pub mod ids;
pub mod platform;
pub mod render;
pub mod responder;

use std::sync::Arc;

use serenity::all::{Client, GatewayIntents};
use tokio_util::sync::CancellationToken;
use tracing::info;

use ticketdesk_core::TicketdeskError;

pub use handler::Handler;
pub use platform::DiscordPlatform;
pub use render::CardStyle;
pub use responder::DiscordResponder;

/// Connects to the gateway and serves interactions until `cancel` fires.
///
/// Interactions and guild metadata are all the bot needs, so only the
/// `GUILDS` intent is requested.
pub async fn run(
    token: &str,
    handler: Handler,
    cancel: CancellationToken,
) -> Result<(), TicketdeskError> {
    let mut client = Client::builder(token, GatewayIntents::GUILDS)
        .event_handler(handler)
        .await
        .map_err(|e| TicketdeskError::Platform {
            message: format!("failed to build Discord client: {e}"),
            source: Some(Box::new(e)),
        })?;

    let shards = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        cancel.cancelled().await;
        info!("disconnecting from Discord gateway");
        shards.shutdown_all().await;
    });

    info!("connecting to Discord gateway");
    client.start().await.map_err(|e| TicketdeskError::Platform {
        message: format!("gateway connection failed: {e}"),
        source: Some(Box::new(e)),
    })
}
