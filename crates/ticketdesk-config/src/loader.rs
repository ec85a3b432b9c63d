// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ticketdesk.toml` > `~/.config/ticketdesk/ticketdesk.toml`
//! > `/etc/ticketdesk/ticketdesk.toml` with environment variable overrides via the
//! `TICKETDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TicketdeskConfig;

/// Conventional token variable honoured when no `TICKETDESK_` token is set.
pub const FALLBACK_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ticketdesk/ticketdesk.toml` (system-wide)
/// 3. `~/.config/ticketdesk/ticketdesk.toml` (user XDG config)
/// 4. `./ticketdesk.toml` (local directory)
/// 5. `DISCORD_BOT_TOKEN`
/// 6. `TICKETDESK_*` environment variables
pub fn load_config() -> Result<TicketdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TicketdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TicketdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(fallback_token_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TicketdeskConfig::default()))
        .merge(Toml::file("/etc/ticketdesk/ticketdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ticketdesk/ticketdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ticketdesk.toml"))
        .merge(fallback_token_provider())
        .merge(env_provider())
}

/// Maps `DISCORD_BOT_TOKEN` onto `discord.bot_token`.
fn fallback_token_provider() -> Env {
    Env::raw()
        .only(&[FALLBACK_TOKEN_VAR])
        .map(|_| "discord.bot_token".into())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TICKETDESK_DISCORD_BOT_TOKEN` must map to `discord.bot_token`,
/// not `discord.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("TICKETDESK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TICKETDESK_DESK_TEARDOWN_DELAY_SECS -> "desk_teardown_delay_secs"
        let key_str = key.as_str();
        for section in SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

/// Top-level sections, matched against the start of an env key only.
const SECTIONS: [&str; 4] = ["bot", "discord", "storage", "desk"];
