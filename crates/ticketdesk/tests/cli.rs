// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line behavior of the `ticketdesk` binary.

use std::path::Path;
use std::process::{Command, Output};

fn ticketdesk(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ticketdesk"))
        .args(args)
        .arg("--config")
        .arg(config)
        .env_remove("DISCORD_BOT_TOKEN")
        .env_remove("TICKETDESK_DISCORD_BOT_TOKEN")
        .env_remove("TICKETDESK_BOT_NAME")
        .output()
        .unwrap()
}

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("ticketdesk.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn check_config_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[bot]\nname = \"frontdesk\"\n\n[desk]\nteardown_delay_secs = 30\n",
    );

    let output = ticketdesk(&path, &["check-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bot.name=frontdesk"), "{stdout}");
    assert!(stdout.contains("discord.bot_token is not set"), "{stdout}");
}

#[test]
fn check_config_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[desk]\nteardown_dealy_secs = 30\n");

    let output = ticketdesk(&path, &["check-config"]);
    assert!(!output.status.success());
}

#[test]
fn serve_refuses_to_start_without_token() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let path = write_config(
        dir.path(),
        &format!("[storage]\ndata_file = {:?}\n", data.display().to_string()),
    );

    let output = ticketdesk(&path, &["serve"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("discord.bot_token"), "{stderr}");
    assert!(!data.exists());
}
