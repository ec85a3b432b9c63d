// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the desk is written against.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod platform;
pub mod responder;
pub mod store;

pub use platform::ChatPlatform;
pub use responder::Responder;
pub use store::StateStore;
