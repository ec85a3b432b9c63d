// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ticketdesk workspace.

use thiserror::Error;

use crate::types::ChannelId;

/// The primary error type used across Ticketdesk collaborator traits and desk operations.
#[derive(Debug, Error)]
pub enum TicketdeskError {
    /// Configuration errors (missing token, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistent store errors (I/O, malformed document, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (channel creation, posting, history retrieval).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No active ticket is registered for the channel.
    #[error("no ticket registered for channel {channel}")]
    TicketNotFound { channel: ChannelId },

    /// The actor lacks the role or relationship the action requires.
    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// The action was well-formed but its input is unacceptable.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TicketdeskError {
    /// Shorthand for a platform error without an underlying source.
    pub fn platform(message: impl Into<String>) -> Self {
        TicketdeskError::Platform {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any error as a storage error.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        TicketdeskError::Storage {
            source: Box::new(source),
        }
    }

    /// Returns the notice shown to the triggering actor, if this error is one the
    /// actor caused. Collaborator and internal faults return `None`.
    pub fn user_notice(&self) -> Option<String> {
        match self {
            TicketdeskError::TicketNotFound { .. } => Some("❌ Ticket data not found!".to_string()),
            TicketdeskError::PermissionDenied { reason } => Some(format!("❌ {reason}")),
            TicketdeskError::Validation { message } => Some(format!("❌ {message}")),
            _ => None,
        }
    }
}
