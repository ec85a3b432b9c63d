// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ticketdesk integration tests.
//!
//! # Components
//!
//! - [`MockPlatform`] - in-memory chat platform with call capture and fault injection
//! - [`MockResponder`] - captures replies sent to the triggering actor
//! - [`MemoryStore`] - in-memory state store with save counting and fault injection
//! - [`TestHarness`] - a desk wired to both mocks and an in-memory store

pub mod harness;
pub mod mock_platform;
pub mod mock_responder;
pub mod mock_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_platform::MockPlatform;
pub use mock_responder::MockResponder;
pub use mock_store::MemoryStore;
