// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversions between desk identifiers and Discord snowflakes.

use serenity::all as discord;

use ticketdesk_core::{ChannelId, MessageId, RoleId, TicketdeskError, UserId};

/// Parses a non-zero snowflake.
pub fn snowflake(raw: &str) -> Result<u64, TicketdeskError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| TicketdeskError::platform(format!("invalid snowflake id: {raw:?}")))
}

pub fn to_channel(id: &ChannelId) -> Result<discord::ChannelId, TicketdeskError> {
    snowflake(id.as_str()).map(discord::ChannelId::new)
}

pub fn to_role(id: &RoleId) -> Result<discord::RoleId, TicketdeskError> {
    snowflake(id.as_str()).map(discord::RoleId::new)
}

pub fn to_user(id: &UserId) -> Result<discord::UserId, TicketdeskError> {
    snowflake(id.as_str()).map(discord::UserId::new)
}

pub fn to_message(id: &MessageId) -> Result<discord::MessageId, TicketdeskError> {
    snowflake(id.as_str()).map(discord::MessageId::new)
}

pub fn channel(id: discord::ChannelId) -> ChannelId {
    ChannelId::from(id.get().to_string())
}

pub fn role(id: discord::RoleId) -> RoleId {
    RoleId::from(id.get().to_string())
}

pub fn user(id: discord::UserId) -> UserId {
    UserId::from(id.get().to_string())
}

pub fn message(id: discord::MessageId) -> MessageId {
    MessageId::from(id.get().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_round_trip() {
        let id = ChannelId::from("1100000000000000001");
        assert_eq!(channel(to_channel(&id).unwrap()), id);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(snowflake("0").is_err());
        assert!(snowflake("abc").is_err());
        assert!(snowflake("").is_err());
        assert!(to_role(&RoleId::from("-5")).is_err());
    }
}
