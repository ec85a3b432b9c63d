// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticketdesk - a Discord support-ticket desk with helper points.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ticketdesk_config::{ConfigError, TicketdeskConfig};

/// Ticketdesk - a Discord support-ticket desk with helper points.
#[derive(Parser, Debug)]
#[command(name = "ticketdesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Connect to Discord and serve the ticket desk.
    Serve,
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

fn load(path: Option<&PathBuf>) -> Result<TicketdeskConfig, Vec<ConfigError>> {
    match path {
        Some(path) => ticketdesk_config::load_and_validate_path(path),
        None => ticketdesk_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            ticketdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("ticketdesk: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "ticketdesk: config OK (bot.name={}, storage.data_file={})",
                config.bot.name, config.storage.data_file
            );
            if ticketdesk_config::require_token(&config).is_err() {
                println!("ticketdesk: discord.bot_token is not set; `serve` will refuse to start");
            }
        }
        None => {
            println!("ticketdesk: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn parses_subcommands_and_config_path() {
        let cli = Cli::try_parse_from(["ticketdesk", "check-config", "--config", "desk.toml"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::CheckConfig));
        assert_eq!(cli.config, Some(PathBuf::from("desk.toml")));

        let cli = Cli::try_parse_from(["ticketdesk", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["ticketdesk", "shell"]).is_err());
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticketdesk.toml");
        std::fs::write(&path, "[bot]\nname = \"frontdesk\"\n").unwrap();
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.bot.name, "frontdesk");
    }
}
