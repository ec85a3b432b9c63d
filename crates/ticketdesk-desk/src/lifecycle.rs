// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle transitions.
//!
//! Each function applies one transition to an in-memory [`StoreDocument`]
//! and enforces who may perform it. None of them perform I/O: the caller
//! loads the document, applies the transition, and saves the result only
//! when the transition succeeded.
//!
//! ```text
//!   (intake) -> Open -> CompletionPending -> Resolved
//!                 |            |    ^
//!                 |            +----+ (withdraw: back to awaiting helpers)
//!                 +------------+----------> Canceled
//! ```
//!
//! `Resolved` and `Canceled` are never stored: reaching either removes the
//! ticket from the registry.

use ticketdesk_core::category::EMPTY_FIELD_VALUE;
use ticketdesk_core::{
    Actor, Category, ChannelId, HelperSet, RoleId, StoreDocument, Ticket, TicketField,
    TicketState, TicketdeskError, UserId,
};

use crate::cards;

/// Everything provisioning needs, captured when the number is reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub number: u64,
    pub placement: Option<ChannelId>,
    pub allowed_roles: Vec<RoleId>,
    pub creation_roles: Vec<RoleId>,
    pub logs_channel: Option<ChannelId>,
}

/// What a completion request turns into for a given actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRoute {
    /// The actor may finalize: show them the helper picker.
    PickHelpers,
    /// The creator flagged their own ticket; staff still has to finalize.
    CreatorFlagged,
}

/// Outcome of a confirmed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub ticket: Ticket,
    pub completed_by: UserId,
    pub helpers: HelperSet,
    pub points_each: u32,
    pub logs_channel: Option<ChannelId>,
}

/// Outcome of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    pub ticket: Ticket,
    pub logs_channel: Option<ChannelId>,
}

fn denied(reason: &str) -> TicketdeskError {
    TicketdeskError::PermissionDenied {
        reason: reason.to_string(),
    }
}

/// Pairs submitted values with the category's intake fields. Blank values
/// are stored as `N/A`; missing trailing values count as blank.
pub fn intake_fields(category: Category, values: &[String]) -> Vec<TicketField> {
    category
        .intake_fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = values
                .get(i)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .unwrap_or(EMPTY_FIELD_VALUE);
            TicketField::new(field.label, value)
        })
        .collect()
}

/// Checks the creation allow-list.
pub fn ensure_can_create(document: &StoreDocument, actor: &Actor) -> Result<(), TicketdeskError> {
    if document.can_create(actor) {
        Ok(())
    } else {
        Err(denied(cards::DENY_CREATE))
    }
}

/// Allocates the next ticket number for an intake submission.
pub fn reserve(
    document: &mut StoreDocument,
    actor: &Actor,
    category: Category,
) -> Result<Reservation, TicketdeskError> {
    ensure_can_create(document, actor)?;
    Ok(Reservation {
        number: document.reserve_ticket_number(),
        placement: document.ticket_channel(category).cloned(),
        allowed_roles: document.allow_listed_roles(),
        creation_roles: document.allowed_creation_roles.clone(),
        logs_channel: document.logs_channel.clone(),
    })
}

/// Registers a freshly provisioned ticket channel.
pub fn register(
    document: &mut StoreDocument,
    channel: ChannelId,
    ticket: Ticket,
) -> Result<(), TicketdeskError> {
    document.active_tickets.insert(channel, ticket)
}

/// Decides what a "complete ticket" press does for this actor.
///
/// The creator path records the actor in `flagged_by` but leaves the ticket open.
pub fn route_completion_request(
    document: &mut StoreDocument,
    channel: &ChannelId,
    actor: &Actor,
) -> Result<CompletionRoute, TicketdeskError> {
    let authorized = document.can_complete(actor);
    let ticket = document.active_tickets.require_mut(channel)?;
    if authorized {
        Ok(CompletionRoute::PickHelpers)
    } else if ticket.is_creator(&actor.id) {
        ticket.flagged_by = Some(actor.id.clone());
        Ok(CompletionRoute::CreatorFlagged)
    } else {
        Err(denied(cards::DENY_COMPLETE))
    }
}

/// Records a nomination. A later nomination replaces an earlier one.
pub fn nominate(
    document: &mut StoreDocument,
    channel: &ChannelId,
    actor: &Actor,
    helpers: HelperSet,
) -> Result<(), TicketdeskError> {
    let authorized = document.can_complete(actor);
    let ticket = document.active_tickets.require_mut(channel)?;
    if !authorized {
        return Err(denied(cards::DENY_NOMINATE));
    }
    ticket.state = TicketState::CompletionPending {
        completed_by: actor.id.clone(),
        helpers,
    };
    Ok(())
}

/// Finalizes a nomination: awards every helper and removes the ticket.
pub fn confirm(
    document: &mut StoreDocument,
    channel: &ChannelId,
    actor: &Actor,
) -> Result<Resolution, TicketdeskError> {
    let ticket = document.active_tickets.require(channel)?;
    let (completed_by, helpers) = match &ticket.state {
        TicketState::Open => {
            return Err(TicketdeskError::Validation {
                message: cards::NO_HELPERS_SELECTED.to_string(),
            });
        }
        TicketState::CompletionPending {
            completed_by,
            helpers,
        } => (completed_by.clone(), helpers.clone()),
    };
    if completed_by != actor.id {
        return Err(denied(cards::DENY_CONFIRM));
    }

    let points_each = document.category_points.value_for(ticket.category);
    for helper in helpers.iter() {
        document.helper_points.award(helper, points_each);
    }
    let ticket = document
        .active_tickets
        .remove(channel)
        .ok_or_else(|| TicketdeskError::TicketNotFound {
            channel: channel.clone(),
        })?;

    Ok(Resolution {
        ticket,
        completed_by,
        helpers,
        points_each,
        logs_channel: document.logs_channel.clone(),
    })
}

/// Discards a pending nomination so helpers can be chosen again.
pub fn withdraw(
    document: &mut StoreDocument,
    channel: &ChannelId,
    actor: &Actor,
) -> Result<(), TicketdeskError> {
    let ticket = document.active_tickets.require_mut(channel)?;
    if ticket.completed_by().is_some_and(|by| *by != actor.id) {
        return Err(denied(cards::DENY_CONFIRM));
    }
    ticket.state = TicketState::Open;
    Ok(())
}

/// Cancels a ticket. Allowed for the creator, completion staff and administrators.
pub fn cancel(
    document: &mut StoreDocument,
    channel: &ChannelId,
    actor: &Actor,
) -> Result<Cancellation, TicketdeskError> {
    let ticket = document.active_tickets.require(channel)?;
    let allowed =
        ticket.is_creator(&actor.id) || actor.is_admin || document.can_complete(actor);
    if !allowed {
        return Err(denied(cards::DENY_CANCEL));
    }
    let ticket = document
        .active_tickets
        .remove(channel)
        .ok_or_else(|| TicketdeskError::TicketNotFound {
            channel: channel.clone(),
        })?;
    Ok(Cancellation {
        ticket,
        logs_channel: document.logs_channel.clone(),
    })
}
