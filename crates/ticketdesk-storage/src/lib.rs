// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for the Ticketdesk state document.
//!
//! The whole state lives in one JSON document that is read in full at the
//! start of every operation and written in full at the end. [`JsonFileStore`]
//! keeps it on disk.

pub mod file;

pub use file::JsonFileStore;
