// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cards and notices the desk shows to members and staff.

use ticketdesk_core::ledger::LeaderboardEntry;
use ticketdesk_core::ticket::{HelperSet, TicketField};
use ticketdesk_core::types::CardField;
use ticketdesk_core::{Card, CardAction, Category, ChannelId, Ticket, UserId};

pub const GENERIC_FAILURE: &str = "An error occurred!";
pub const CATEGORY_PROMPT: &str = "Please select the type of help you need:";
pub const HELPER_PROMPT: &str = "Please type/select the helper(s) who helped this ticket:";
pub const HELPER_REPROMPT: &str = "Please select the helper(s) who resolved this ticket:";
pub const NEW_REQUEST: &str = "New help request!";
pub const CREATOR_FLAGGED_PUBLIC: &str = "✅ This ticket has been marked as completed. Only admins, mods, or authorized roles can finalize this ticket.";
pub const CREATOR_FLAGGED_PRIVATE: &str =
    "✅ Ticket marked as complete. Waiting for authorized staff to finalize.";

pub const DENY_CREATE: &str =
    "You do not have permission to create tickets. Please contact an administrator.";
pub const DENY_COMPLETE: &str =
    "You can't mark the ticket as complete, you're not the ticket creator.";
pub const DENY_NOMINATE: &str = "Only authorized staff can select helpers for this ticket!";
pub const DENY_CONFIRM: &str =
    "Only the staff member who selected the helpers can finalize this ticket!";
pub const DENY_CANCEL: &str = "Only the ticket creator or moderators/admins can cancel this ticket!";
pub const DENY_ADMIN: &str = "This command is for administrators only.";
pub const NO_HELPERS_SELECTED: &str = "No helpers were selected!";

/// `"point"` or `"points"`.
pub fn points_label(points: u64) -> String {
    if points == 1 {
        "1 point".to_string()
    } else {
        format!("{points} points")
    }
}

/// The entry panel carrying the "Create Help Ticket" control.
pub fn panel_card() -> Card {
    let categories: String = Category::ALL
        .iter()
        .map(|c| format!("• {}\n", c.name()))
        .collect();
    Card::new("🎫 AQW Guild Help Desk")
        .description(format!(
            "Need help with AQW activities? Click the button below to create a help ticket!\n\n\
             Our helpers will assist you with:\n{categories}\n\
             Click **Create Help Ticket** to get started!"
        ))
        .actions([CardAction::CreateTicket])
}

/// The card opening a ticket channel.
pub fn ticket_card(ticket: &Ticket) -> Card {
    Card::new(format!("🎫 Help Ticket #{}", ticket.number))
        .description(format!(
            "**Category:** {}\n**Created by:** {}",
            ticket.category,
            ticket.creator.mention()
        ))
        .fields(field_lines(&ticket.fields))
        .timestamped()
        .actions([CardAction::CompleteTicket, CardAction::CancelTicket])
}

pub fn leaderboard_card(entries: &[LeaderboardEntry], size: usize) -> Card {
    let description = if entries.is_empty() {
        "No helpers have earned points yet!".to_string()
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let medal = match index {
                    0 => "🥇".to_string(),
                    1 => "🥈".to_string(),
                    2 => "🥉".to_string(),
                    n => format!("**{}.**", n + 1),
                };
                format!(
                    "{medal} {} - {}",
                    entry.user.mention(),
                    points_label(entry.points)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    Card::new(format!("🏆 Helper Leaderboard - Top {size}"))
        .description(description)
        .footer("Thank you to all our helpers!")
}

pub fn canceled_card(teardown_secs: u64) -> Card {
    Card::new("❌ Ticket Canceled")
        .description(format!(
            "This ticket has been canceled.\n\n{}",
            closing_line(teardown_secs)
        ))
        .timestamped()
}

pub fn completed_card(helpers: &HelperSet, points_each: u32, teardown_secs: u64) -> Card {
    Card::new("✅ Ticket Completed")
        .description(format!(
            "**Helpers awarded {} each:**\n{}\n\n{}",
            points_label(u64::from(points_each)),
            helpers.mentions(),
            closing_line(teardown_secs)
        ))
        .timestamped()
}

fn closing_line(teardown_secs: u64) -> String {
    format!("Generating transcript and closing in {teardown_secs} seconds...")
}

/// Private prompt asking the nominating staff member to confirm.
pub fn confirm_prompt(helpers: &HelperSet) -> String {
    format!(
        "**Selected Helpers:**\n{}\n\nPlease confirm to finalize the ticket and award points, \
         or cancel to select different helpers.",
        helpers.mentions()
    )
}

pub fn created_log(ticket: &Ticket, channel: &ChannelId) -> Card {
    Card::new("📝 Ticket Created")
        .fields(summary_fields(ticket))
        .field("Channel", channel.mention(), false)
        .fields(field_lines(&ticket.fields))
        .timestamped()
}

pub fn canceled_log(ticket: &Ticket, canceled_by: &UserId) -> Card {
    Card::new("❌ Ticket Canceled")
        .fields(summary_fields(ticket))
        .field("Canceled By", canceled_by.mention(), true)
        .fields(flag_field(ticket))
        .timestamped()
}

pub fn completed_log(
    ticket: &Ticket,
    completed_by: &UserId,
    helpers: &HelperSet,
    points_each: u32,
) -> Card {
    let total = u64::from(points_each) * helpers.len() as u64;
    Card::new("✅ Ticket Completed")
        .fields(summary_fields(ticket))
        .field("Completed By", completed_by.mention(), true)
        .field("Helpers Mentioned", helpers.mentions(), false)
        .field(
            "Points Awarded",
            format!(
                "{} per helper ({total} total)",
                points_label(u64::from(points_each))
            ),
            false,
        )
        .fields(flag_field(ticket))
        .timestamped()
}

/// Present once the creator has marked the ticket complete themselves.
fn flag_field(ticket: &Ticket) -> Option<CardField> {
    ticket
        .flagged_by
        .as_ref()
        .map(|user| CardField::new("Marked Complete By Creator", user.mention(), true))
}

fn summary_fields(ticket: &Ticket) -> [CardField; 3] {
    [
        CardField::new("Ticket Number", format!("#{}", ticket.number), true),
        CardField::new("Category", ticket.category.name(), true),
        CardField::new("Created By", ticket.creator.mention(), true),
    ]
}

fn field_lines(fields: &[TicketField]) -> impl Iterator<Item = CardField> + '_ {
    fields
        .iter()
        .map(|f| CardField::new(f.name.clone(), f.value.clone(), false))
}
