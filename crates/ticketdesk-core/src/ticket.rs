// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket record and its lifecycle state.
//!
//! On disk a ticket keeps the original flat shape (`selectedHelpers` and
//! `completedBy` as optional siblings). In memory the pair is lifted into
//! [`TicketState`] so "helpers present iff completion is pending" holds by
//! construction. A stored record whose pair is inconsistent loads as `Open`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::category::Category;
use crate::error::TicketdeskError;
use crate::types::UserId;

/// One answered intake question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketField {
    pub name: String,
    pub value: String,
}

impl TicketField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The actors nominated as resolvers of a ticket.
///
/// Always holds between 1 and [`HelperSet::MAX`] distinct ids, in the order
/// they were first nominated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperSet(Vec<UserId>);

impl HelperSet {
    /// Most helpers a single selection may nominate.
    pub const MAX: usize = 25;

    /// Builds a helper set, dropping repeated nominations.
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Result<Self, TicketdeskError> {
        let mut helpers: Vec<UserId> = Vec::new();
        for id in ids {
            if !helpers.contains(&id) {
                helpers.push(id);
            }
        }

        if helpers.is_empty() {
            return Err(TicketdeskError::Validation {
                message: "No helpers selected!".into(),
            });
        }
        if helpers.len() > Self::MAX {
            return Err(TicketdeskError::Validation {
                message: format!("At most {} helpers can be selected!", Self::MAX),
            });
        }
        Ok(Self(helpers))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[UserId] {
        &self.0
    }

    /// Comma-separated mentions, in nomination order.
    pub fn mentions(&self) -> String {
        self.0
            .iter()
            .map(UserId::mention)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Persisted lifecycle state of a registered ticket.
///
/// Terminal states are never stored: a resolved or canceled ticket leaves the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketState {
    Open,
    CompletionPending {
        completed_by: UserId,
        helpers: HelperSet,
    },
}

/// Phase of a registered ticket, without the state's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketPhase {
    Open,
    CompletionPending,
}

/// A help request bound to a dedicated channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TicketRecord", into = "TicketRecord")]
pub struct Ticket {
    pub number: u64,
    pub creator: UserId,
    pub category: Category,
    pub fields: Vec<TicketField>,
    pub state: TicketState,
    /// Creator who marked the ticket complete without the authority to finalize it.
    pub flagged_by: Option<UserId>,
}

impl Ticket {
    /// A fresh ticket in the `Open` state.
    pub fn new(number: u64, creator: UserId, category: Category, fields: Vec<TicketField>) -> Self {
        Self {
            number,
            creator,
            category,
            fields,
            state: TicketState::Open,
            flagged_by: None,
        }
    }

    pub fn phase(&self) -> TicketPhase {
        match self.state {
            TicketState::Open => TicketPhase::Open,
            TicketState::CompletionPending { .. } => TicketPhase::CompletionPending,
        }
    }

    pub fn is_creator(&self, user: &UserId) -> bool {
        self.creator == *user
    }

    /// The nominated helpers, if completion is pending.
    pub fn pending_helpers(&self) -> Option<&HelperSet> {
        match &self.state {
            TicketState::CompletionPending { helpers, .. } => Some(helpers),
            TicketState::Open => None,
        }
    }

    /// The actor who started the completion flow, if completion is pending.
    pub fn completed_by(&self) -> Option<&UserId> {
        match &self.state {
            TicketState::CompletionPending { completed_by, .. } => Some(completed_by),
            TicketState::Open => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketRecord {
    ticket_number: u64,
    user_id: UserId,
    category: Category,
    #[serde(default)]
    fields: Vec<TicketField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_helpers: Option<Vec<UserId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flagged_by: Option<UserId>,
}

impl From<TicketRecord> for Ticket {
    fn from(record: TicketRecord) -> Self {
        let number = record.ticket_number;
        let reopened = |reason: &str| {
            warn!(
                ticket_number = number,
                reason, "inconsistent completion record, loading ticket as open"
            );
            TicketState::Open
        };

        let state = match (record.selected_helpers, record.completed_by) {
            (None, None) => TicketState::Open,
            (Some(helpers), None) if helpers.is_empty() => TicketState::Open,
            (Some(helpers), Some(completed_by)) => match HelperSet::new(helpers) {
                Ok(helpers) => TicketState::CompletionPending {
                    completed_by,
                    helpers,
                },
                Err(_) => reopened("selectedHelpers must hold 1 to 25 users"),
            },
            (Some(_), None) => reopened("selectedHelpers without completedBy"),
            (None, Some(_)) => reopened("completedBy without selectedHelpers"),
        };

        Ticket {
            number,
            creator: record.user_id,
            category: record.category,
            fields: record.fields,
            state,
            flagged_by: record.flagged_by,
        }
    }
}

impl From<Ticket> for TicketRecord {
    fn from(ticket: Ticket) -> Self {
        let (selected_helpers, completed_by) = match ticket.state {
            TicketState::Open => (None, None),
            TicketState::CompletionPending {
                completed_by,
                helpers,
            } => (Some(helpers.0), Some(completed_by)),
        };

        TicketRecord {
            ticket_number: ticket.number,
            user_id: ticket.creator,
            category: ticket.category,
            fields: ticket.fields,
            selected_helpers,
            completed_by,
            flagged_by: ticket.flagged_by,
        }
    }
}
