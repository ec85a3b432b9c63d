// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Ticketdesk support bot.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use ticketdesk_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("State file: {}", config.storage.data_file);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TicketdeskConfig;
pub use validation::require_token;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<TicketdeskConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<TicketdeskConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path.to_path_buf()).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<TicketdeskConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<TicketdeskConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<TicketdeskConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join("ticketdesk.toml"))
        .unwrap_or_else(|_| PathBuf::from("ticketdesk.toml"));
    let user = dirs::config_dir().map(|d| d.join("ticketdesk/ticketdesk.toml"));
    let system = PathBuf::from("/etc/ticketdesk/ticketdesk.toml");

    [Some(local), user, Some(system)]
        .into_iter()
        .flatten()
        .filter_map(read_source)
        .collect()
}

fn read_source(path: PathBuf) -> Option<(String, String)> {
    let content = std::fs::read_to_string(&path).ok()?;
    Some((path.display().to_string(), content))
}
