// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ticketdesk serve`: wires the store, the Discord platform and the desk,
//! then runs the gateway until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use ticketdesk_config::TicketdeskConfig;
use ticketdesk_core::{StateStore, TicketdeskError};
use ticketdesk_desk::Desk;
use ticketdesk_discord::{CardStyle, DiscordPlatform, Handler};
use ticketdesk_storage::JsonFileStore;

use crate::shutdown;

/// Extra time granted to teardowns beyond their own delay at shutdown.
const TEARDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn run_serve(config: TicketdeskConfig) -> Result<(), TicketdeskError> {
    init_tracing(&config.bot.log_level);

    let token = ticketdesk_config::require_token(&config)
        .map_err(|e| TicketdeskError::Config(e.to_string()))?;

    info!(
        name = %config.bot.name,
        data_file = %config.storage.data_file,
        "starting ticketdesk"
    );

    let store = Arc::new(JsonFileStore::from_config(&config.storage));
    // Creates the document with defaults if it does not exist yet.
    store.load().await?;

    let platform = Arc::new(DiscordPlatform::with_token(
        token,
        config.discord.guild_id,
        config.desk.helpers_role_name.clone(),
        CardStyle::from_config(&config.desk),
    ));
    let desk = Arc::new(Desk::new(store, platform.clone(), config.desk.clone()));
    let handler = Handler::new(Arc::clone(&desk), platform, config.discord.guild_id);

    let cancel = shutdown::install_signal_handler();
    let result = ticketdesk_discord::run(token, handler, cancel.clone()).await;
    if let Err(e) = &result {
        error!(error = %e, "gateway stopped");
    }
    cancel.cancel();

    let grace = Duration::from_secs(config.desk.teardown_delay_secs) + TEARDOWN_GRACE;
    desk.teardown().drain(grace).await;
    info!("ticketdesk stopped");
    result
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ticketdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
