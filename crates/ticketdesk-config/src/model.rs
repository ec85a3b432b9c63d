// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ticketdesk support bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ticketdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketdeskConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Discord gateway settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Persistent state location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ticket workflow tunables.
    #[serde(default)]
    pub desk: DeskConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in log lines.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "ticketdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discord gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Bot token. Falls back to the `DISCORD_BOT_TOKEN` environment variable.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Register slash commands on this guild only instead of globally.
    #[serde(default)]
    pub guild_id: Option<u64>,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the JSON state document.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

fn default_data_file() -> String {
    "data.json".to_string()
}

/// Ticket workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeskConfig {
    /// Card accent color as `#rrggbb`.
    #[serde(default = "default_embed_color")]
    pub embed_color: String,

    /// Grace period between a ticket closing and its channel being deleted.
    #[serde(default = "default_teardown_delay_secs")]
    pub teardown_delay_secs: u64,

    /// Number of entries shown by the leaderboard.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,

    /// Name of the role mentioned on new tickets (matched case-insensitively).
    #[serde(default = "default_helpers_role_name")]
    pub helpers_role_name: String,

    /// Thumbnail shown on the panel, ticket and log cards.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            embed_color: default_embed_color(),
            teardown_delay_secs: default_teardown_delay_secs(),
            leaderboard_size: default_leaderboard_size(),
            helpers_role_name: default_helpers_role_name(),
            thumbnail_url: None,
        }
    }
}

impl DeskConfig {
    /// The accent color as a 24-bit RGB value, if `embed_color` parses.
    pub fn embed_color_rgb(&self) -> Option<u32> {
        parse_hex_color(&self.embed_color)
    }
}

fn default_embed_color() -> String {
    "#b10026".to_string()
}

fn default_teardown_delay_secs() -> u64 {
    10
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_helpers_role_name() -> String {
    "helpers".to_string()
}

/// Parses `#rrggbb` (leading `#` optional) into a 24-bit RGB value.
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_color_parses() {
        assert_eq!(DeskConfig::default().embed_color_rgb(), Some(0xb10026));
    }

    #[test]
    fn hex_color_rejects_garbage() {
        assert_eq!(parse_hex_color("b10026"), Some(0xb10026));
        assert_eq!(parse_hex_color("#b1002"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color(""), None);
    }
}
