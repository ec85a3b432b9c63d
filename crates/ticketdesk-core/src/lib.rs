// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Ticketdesk.
//!
//! This crate provides the domain model shared by every other crate in the
//! workspace (help categories, tickets, the points ledger, the ticket registry
//! and the persisted store document), the workspace error type, and the
//! collaborator traits the desk is written against.

pub mod category;
pub mod document;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod reply;
pub mod ticket;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use category::Category;
pub use document::StoreDocument;
pub use error::TicketdeskError;
pub use ledger::{CategoryPoints, HelperLedger, LeaderboardEntry};
pub use registry::TicketRegistry;
pub use reply::Reply;
pub use ticket::{HelperSet, Ticket, TicketField, TicketPhase, TicketState};
pub use types::{Actor, Card, CardAction, ChannelId, MessageId, OutboundMessage, RoleId, UserId};

pub use traits::{ChatPlatform, Responder, StateStore};
