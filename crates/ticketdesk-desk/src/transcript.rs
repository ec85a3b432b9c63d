// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript capture: a flat chronological text rendering of a channel.
//!
//! History is only reachable through "before X" cursors, so pages are fetched
//! newest-first and the accumulated messages reversed at the end.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use ticketdesk_core::types::HistoryMessage;
use ticketdesk_core::{ChannelId, ChatPlatform, TicketdeskError};

/// Messages requested per history page.
pub const PAGE_SIZE: u8 = 100;

const RULE_WIDTH: usize = 80;
const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Builds the transcript for `channel`, or `None` if any retrieval fails.
///
/// Never returns partial output. Failures are logged here; callers only
/// need to know that no transcript is available.
pub async fn generate(
    platform: &dyn ChatPlatform,
    channel: &ChannelId,
    generated_at: DateTime<Utc>,
) -> Option<String> {
    let result = async {
        let name = platform.channel_name(channel).await?;
        let messages = collect_history(platform, channel).await?;
        Ok::<_, TicketdeskError>(render(&name, channel, generated_at, &messages))
    }
    .await;

    match result {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(channel_id = %channel, error = %e, "transcript generation failed");
            None
        }
    }
}

/// Fetches the full history of a channel in chronological order.
pub async fn collect_history(
    platform: &dyn ChatPlatform,
    channel: &ChannelId,
) -> Result<Vec<HistoryMessage>, TicketdeskError> {
    let mut messages: Vec<HistoryMessage> = Vec::new();
    let mut pages = 0usize;

    loop {
        let before = messages.last().map(|m| m.id.clone());
        let page = platform
            .fetch_history(channel, before.as_ref(), PAGE_SIZE)
            .await?;
        pages += 1;

        let exhausted = page.len() < usize::from(PAGE_SIZE);
        messages.extend(page);
        if exhausted {
            break;
        }
    }

    messages.reverse();
    debug!(channel_id = %channel, pages, messages = messages.len(), "history collected");
    Ok(messages)
}

/// Renders the banner followed by one block per message.
pub fn render(
    channel_name: &str,
    channel: &ChannelId,
    generated_at: DateTime<Utc>,
    messages: &[HistoryMessage],
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Ticket Transcript - {channel_name}");
    let _ = writeln!(out, "Channel ID: {channel}");
    let _ = writeln!(out, "Generated: {}", generated_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "{}\n", "=".repeat(RULE_WIDTH));

    for message in messages {
        render_message(&mut out, message);
    }
    out
}

fn render_message(out: &mut String, message: &HistoryMessage) {
    let _ = writeln!(
        out,
        "[{}] {} ({}):",
        message.created_at.format(TIMESTAMP_FORMAT),
        message.author_name,
        message.author_id
    );

    if !message.content.is_empty() {
        let _ = writeln!(out, "{}", message.content);
    }

    if !message.embeds.is_empty() {
        let _ = writeln!(out, "[Embeds: {}]", message.embeds.len());
        for (i, embed) in message.embeds.iter().enumerate() {
            let _ = writeln!(out, "  Embed {}:", i + 1);
            if let Some(title) = embed.title.as_deref().filter(|t| !t.is_empty()) {
                let _ = writeln!(out, "    Title: {title}");
            }
            if let Some(description) = embed.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = writeln!(out, "    Description: {description}");
            }
            for (name, value) in &embed.fields {
                let _ = writeln!(out, "    {name}: {value}");
            }
        }
    }

    if !message.attachments.is_empty() {
        let _ = writeln!(out, "[Attachments: {}]", message.attachments.len());
        for attachment in &message.attachments {
            let _ = writeln!(out, "  - {} ({})", attachment.filename, attachment.url);
        }
    }

    out.push('\n');
}
