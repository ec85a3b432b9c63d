// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. All failures
//! are collected rather than stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::{parse_hex_color, TicketdeskConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Upper bound on leaderboard entries; one card description holds them all.
const MAX_LEADERBOARD_SIZE: usize = 50;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &TicketdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::invalid(
            "bot.log_level",
            format!(
                "`{}` is not one of {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if let Some(token) = &config.discord.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::invalid(
            "discord.bot_token",
            "must not be empty when set",
        ));
    }

    if config.discord.guild_id == Some(0) {
        errors.push(ConfigError::invalid("discord.guild_id", "must be non-zero"));
    }

    if config.storage.data_file.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.data_file", "must not be empty"));
    }

    if parse_hex_color(&config.desk.embed_color).is_none() {
        errors.push(ConfigError::invalid(
            "desk.embed_color",
            format!("`{}` is not a #rrggbb color", config.desk.embed_color),
        ));
    }

    if config.desk.leaderboard_size == 0 || config.desk.leaderboard_size > MAX_LEADERBOARD_SIZE {
        errors.push(ConfigError::invalid(
            "desk.leaderboard_size",
            format!(
                "must be between 1 and {MAX_LEADERBOARD_SIZE}, got {}",
                config.desk.leaderboard_size
            ),
        ));
    }

    if config.desk.helpers_role_name.trim().is_empty() {
        errors.push(ConfigError::invalid(
            "desk.helpers_role_name",
            "must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Token required by `serve`. Checked separately so `check-config` can pass
/// on a machine without credentials.
pub fn require_token(config: &TicketdeskConfig) -> Result<&str, ConfigError> {
    config
        .discord
        .bot_token
        .as_deref()
        .ok_or_else(|| ConfigError::MissingKey {
            key: "discord.bot_token".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(errors: &[ConfigError]) -> Vec<&str> {
        errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::Validation { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&TicketdeskConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let mut config = TicketdeskConfig::default();
        config.bot.log_level = "loud".to_string();
        config.storage.data_file = "  ".to_string();
        config.desk.embed_color = "red".to_string();
        config.desk.leaderboard_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            keys(&errors),
            vec![
                "bot.log_level",
                "storage.data_file",
                "desk.embed_color",
                "desk.leaderboard_size"
            ]
        );
    }

    #[test]
    fn blank_token_rejected() {
        let mut config = TicketdeskConfig::default();
        config.discord.bot_token = Some(" ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(keys(&errors), vec!["discord.bot_token"]);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = TicketdeskConfig::default();
        config.bot.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn token_required_for_serving() {
        let mut config = TicketdeskConfig::default();
        assert!(matches!(
            require_token(&config),
            Err(ConfigError::MissingKey { key }) if key == "discord.bot_token"
        ));
        config.discord.bot_token = Some("abc".to_string());
        assert_eq!(require_token(&config).unwrap(), "abc");
    }
}
