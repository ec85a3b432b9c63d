// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the desk, its collaborators, and platform adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::category::Category;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident, $mention:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Returns the platform mention markup for this id.
            pub fn mention(&self) -> String {
                format!($mention, self.0)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

snowflake_id!(
    /// Identity of a community member.
    UserId,
    "<@{}>"
);
snowflake_id!(
    /// Identity of a role.
    RoleId,
    "<@&{}>"
);
snowflake_id!(
    /// Identity of a channel; doubles as the ticket registry key.
    ChannelId,
    "<#{}>"
);
snowflake_id!(
    /// Identity of a posted message; used as the history pagination cursor.
    MessageId,
    "{}"
);

/// The member who triggered an interaction, as seen by the permission checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub roles: Vec<RoleId>,
    /// Whether the member holds the platform's administrative permission.
    pub is_admin: bool,
}

impl Actor {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
            is_admin: false,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// True if the actor holds at least one role in `roles`.
    pub fn holds_any(&self, roles: &[RoleId]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }
}

/// Interactive controls that can be attached to a card.
///
/// The serialized form is the component custom id the platform echoes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum CardAction {
    #[strum(serialize = "create_ticket")]
    CreateTicket,
    #[strum(serialize = "complete_ticket")]
    CompleteTicket,
    #[strum(serialize = "cancel_ticket")]
    CancelTicket,
    #[strum(serialize = "confirm_completion")]
    ConfirmCompletion,
    #[strum(serialize = "cancel_completion")]
    CancelCompletion,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::CreateTicket => "Create Help Ticket",
            CardAction::CompleteTicket => "Complete Ticket",
            CardAction::CancelTicket => "Cancel",
            CardAction::ConfirmCompletion => "Confirm",
            CardAction::CancelCompletion => "Cancel",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            CardAction::CreateTicket => "🎫",
            CardAction::CompleteTicket | CardAction::ConfirmCompletion => "✅",
            CardAction::CancelTicket | CardAction::CancelCompletion => "❌",
        }
    }

    /// Visual weight of the control.
    pub fn style(self) -> ActionStyle {
        match self {
            CardAction::CreateTicket => ActionStyle::Primary,
            CardAction::CompleteTicket | CardAction::ConfirmCompletion => ActionStyle::Success,
            CardAction::CancelTicket | CardAction::CancelCompletion => ActionStyle::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Primary,
    Success,
    Danger,
}

/// One name/value line of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl CardField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// A structured message: title, description, fields, optional footer and controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<CardField>,
    pub footer: Option<String>,
    /// Stamp the card with the platform's current time.
    pub timestamped: bool,
    pub actions: Vec<CardAction>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(CardField::new(name, value, inline));
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = CardField>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn timestamped(mut self) -> Self {
        self.timestamped = true;
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = CardAction>) -> Self {
        self.actions.extend(actions);
        self
    }
}

/// A file payload attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// A message to be posted to a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: Option<String>,
    pub cards: Vec<Card>,
    pub file: Option<FileAttachment>,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn card(card: Card) -> Self {
        Self {
            cards: vec![card],
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_file(mut self, filename: impl Into<String>, data: Vec<u8>) -> Self {
        self.file = Some(FileAttachment {
            filename: filename.into(),
            data,
        });
        self
    }
}

/// Title, description and fields of a rich-content block found in channel history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedSnapshot {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<(String, String)>,
}

/// A file attached to a message in channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub filename: String,
    pub url: String,
}

/// A message retrieved from a channel's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: MessageId,
    pub author_id: UserId,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub embeds: Vec<EmbedSnapshot>,
    pub attachments: Vec<AttachmentRef>,
}

/// What the desk asks the platform to create for a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequest {
    /// Channel name, `ticket-<number>`.
    pub name: String,
    pub creator: UserId,
    pub category: Category,
    /// Configured destination for this category, used to derive the parent.
    pub placement: Option<ChannelId>,
    /// Union of the completion and creation allow-lists, completion first.
    pub allowed_roles: Vec<RoleId>,
}
