// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound actor actions and the outcome of handling one.

use strum::IntoStaticStr;

use ticketdesk_core::{Actor, Category, ChannelId, Reply, RoleId, UserId};

/// Administrative commands. Everything except `Leaderboard` needs the
/// administrator flag.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum AdminCommand {
    /// Post the ticket-creation panel in the invoking channel.
    SetupPanel,
    Leaderboard,
    ResetLeaderboard,
    #[strum(serialize = "points")]
    SetPoints { category: Category, points: i64 },
    /// Where new channels for a category are placed.
    SetupTicket { category: Category, target: ChannelId },
    SetupLogs { channel: ChannelId },
    #[strum(serialize = "setup-roles")]
    AddCompletionRole { role: RoleId },
    #[strum(serialize = "setup-roles2")]
    AddCreationRole { role: RoleId },
}

impl AdminCommand {
    /// The slash-command name.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn requires_admin(&self) -> bool {
        !matches!(self, AdminCommand::Leaderboard)
    }
}

/// One interaction delivered by the platform.
///
/// `channel` is always the channel the interaction happened in; for ticket
/// actions it is the registry key.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum InteractionEvent {
    /// "Create Help Ticket" pressed on the panel.
    OpenPanel { actor: Actor },
    ChooseCategory { actor: Actor, category: Category },
    /// Intake form submitted; `values` follow the category's field order.
    SubmitIntake {
        actor: Actor,
        category: Category,
        values: Vec<String>,
    },
    RequestCompletion { actor: Actor, channel: ChannelId },
    SelectHelpers {
        actor: Actor,
        channel: ChannelId,
        helpers: Vec<UserId>,
    },
    ConfirmCompletion { actor: Actor, channel: ChannelId },
    WithdrawCompletion { actor: Actor, channel: ChannelId },
    CancelTicket { actor: Actor, channel: ChannelId },
    Admin {
        actor: Actor,
        channel: ChannelId,
        command: AdminCommand,
    },
}

impl InteractionEvent {
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn actor(&self) -> &Actor {
        match self {
            InteractionEvent::OpenPanel { actor }
            | InteractionEvent::ChooseCategory { actor, .. }
            | InteractionEvent::SubmitIntake { actor, .. }
            | InteractionEvent::RequestCompletion { actor, .. }
            | InteractionEvent::SelectHelpers { actor, .. }
            | InteractionEvent::ConfirmCompletion { actor, .. }
            | InteractionEvent::WithdrawCompletion { actor, .. }
            | InteractionEvent::CancelTicket { actor, .. }
            | InteractionEvent::Admin { actor, .. } => actor,
        }
    }
}

/// How a ticket left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ClosureKind {
    Completed,
    Canceled,
}

/// Terminal side effects that run after the reply has been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClosure {
    pub channel: ChannelId,
    pub ticket_number: u64,
    pub kind: ClosureKind,
    pub logs_channel: Option<ChannelId>,
}

impl PendingClosure {
    pub fn transcript_filename(&self) -> String {
        format!("ticket-{}-transcript.txt", self.ticket_number)
    }

    pub fn transcript_caption(&self) -> String {
        let kind: &'static str = self.kind.into();
        format!("Transcript for {kind} ticket #{}:", self.ticket_number)
    }
}

/// A handled interaction: the reply for the actor, plus any closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub reply: Reply,
    pub closure: Option<PendingClosure>,
}

impl From<Reply> for Handled {
    fn from(reply: Reply) -> Self {
        Self {
            reply,
            closure: None,
        }
    }
}
