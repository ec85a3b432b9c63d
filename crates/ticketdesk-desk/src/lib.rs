// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket desk: lifecycle rules, the points ledger service, closing cards,
//! transcript capture, and delayed channel teardown.
//!
//! [`Desk`] is platform-agnostic. It is driven by [`InteractionEvent`]s and
//! talks to the outside world only through the collaborator traits in
//! `ticketdesk-core`.

pub mod cards;
pub mod desk;
pub mod events;
pub mod lifecycle;
pub mod teardown;
pub mod transcript;

pub use desk::Desk;
pub use events::{AdminCommand, ClosureKind, Handled, InteractionEvent, PendingClosure};
pub use teardown::TeardownScheduler;
