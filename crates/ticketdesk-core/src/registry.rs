// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Active tickets keyed by their channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TicketdeskError;
use crate::ticket::Ticket;
use crate::types::ChannelId;

/// Mapping from a ticket channel to the ticket it hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketRegistry(BTreeMap<ChannelId, Ticket>);

impl TicketRegistry {
    pub fn get(&self, channel: &ChannelId) -> Option<&Ticket> {
        self.0.get(channel)
    }

    /// Looks up a ticket, failing with `TicketNotFound` if absent.
    pub fn require(&self, channel: &ChannelId) -> Result<&Ticket, TicketdeskError> {
        self.0.get(channel).ok_or_else(|| not_found(channel))
    }

    pub fn require_mut(&mut self, channel: &ChannelId) -> Result<&mut Ticket, TicketdeskError> {
        self.0.get_mut(channel).ok_or_else(|| not_found(channel))
    }

    /// Registers a ticket for a freshly provisioned channel.
    ///
    /// A channel hosts at most one ticket; registering a second one is an
    /// internal fault.
    pub fn insert(&mut self, channel: ChannelId, ticket: Ticket) -> Result<(), TicketdeskError> {
        if let Some(existing) = self.0.get(&channel) {
            return Err(TicketdeskError::Internal(format!(
                "channel {channel} already hosts ticket #{}",
                existing.number
            )));
        }
        self.0.insert(channel, ticket);
        Ok(())
    }

    pub fn remove(&mut self, channel: &ChannelId) -> Option<Ticket> {
        self.0.remove(channel)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelId, &Ticket)> {
        self.0.iter()
    }
}

fn not_found(channel: &ChannelId) -> TicketdeskError {
    TicketdeskError::TicketNotFound {
        channel: channel.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::types::UserId;

    fn ticket(number: u64) -> Ticket {
        Ticket::new(number, UserId::from("creator"), Category::Others, Vec::new())
    }

    #[test]
    fn insert_get_remove() {
        let mut registry = TicketRegistry::default();
        let channel = ChannelId::from("c1");
        registry.insert(channel.clone(), ticket(1)).unwrap();
        assert_eq!(registry.get(&channel).map(|t| t.number), Some(1));
        assert_eq!(registry.remove(&channel).map(|t| t.number), Some(1));
        assert!(registry.get(&channel).is_none());
        assert!(registry.remove(&channel).is_none());
    }

    #[test]
    fn one_ticket_per_channel() {
        let mut registry = TicketRegistry::default();
        let channel = ChannelId::from("c1");
        registry.insert(channel.clone(), ticket(1)).unwrap();
        assert!(registry.insert(channel.clone(), ticket(2)).is_err());
        assert_eq!(registry.require(&channel).unwrap().number, 1);
    }

    #[test]
    fn require_reports_missing_channel() {
        let mut registry = TicketRegistry::default();
        let err = registry.require_mut(&ChannelId::from("nope")).unwrap_err();
        assert!(matches!(err, TicketdeskError::TicketNotFound { channel } if channel.0 == "nope"));
    }
}
