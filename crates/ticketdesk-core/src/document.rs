// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single persisted document holding all ledger and ticket state.
//!
//! Every top-level key defaults when missing, so documents written by older
//! versions load without faults. Call [`StoreDocument::normalize`] after
//! deserializing to backfill per-category values as well.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ledger::{CategoryPoints, HelperLedger};
use crate::registry::TicketRegistry;
use crate::types::{Actor, ChannelId, RoleId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreDocument {
    pub helper_points: HelperLedger,
    pub category_points: CategoryPoints,
    pub active_tickets: TicketRegistry,
    pub ticket_counter: u64,
    /// Destination (channel or channel category) for new tickets, by category name.
    pub ticket_channels: BTreeMap<String, ChannelId>,
    pub logs_channel: Option<ChannelId>,
    pub allowed_completion_roles: Vec<RoleId>,
    pub allowed_creation_roles: Vec<RoleId>,
}

impl StoreDocument {
    /// Backfills values that the serde defaults cannot express.
    pub fn normalize(&mut self) {
        self.category_points.backfill();
    }

    /// Allocates the next ticket number. Numbers are never handed out twice.
    pub fn reserve_ticket_number(&mut self) -> u64 {
        self.ticket_counter += 1;
        self.ticket_counter
    }

    pub fn ticket_channel(&self, category: Category) -> Option<&ChannelId> {
        self.ticket_channels.get(category.name())
    }

    pub fn set_ticket_channel(&mut self, category: Category, channel: ChannelId) {
        self.ticket_channels
            .insert(category.name().to_string(), channel);
    }

    /// Adds a role to the completion allow-list. Returns `false` if already present.
    pub fn add_completion_role(&mut self, role: RoleId) -> bool {
        add_unique(&mut self.allowed_completion_roles, role)
    }

    /// Adds a role to the creation allow-list. Returns `false` if already present.
    pub fn add_creation_role(&mut self, role: RoleId) -> bool {
        add_unique(&mut self.allowed_creation_roles, role)
    }

    /// An empty creation allow-list admits everyone.
    pub fn can_create(&self, actor: &Actor) -> bool {
        self.allowed_creation_roles.is_empty() || actor.holds_any(&self.allowed_creation_roles)
    }

    /// Whether the actor may finalize tickets. An empty completion allow-list
    /// admits everyone.
    pub fn can_complete(&self, actor: &Actor) -> bool {
        self.allowed_completion_roles.is_empty()
            || actor.holds_any(&self.allowed_completion_roles)
    }

    /// Completion roles followed by creation roles, without repeats.
    pub fn allow_listed_roles(&self) -> Vec<RoleId> {
        let mut roles: Vec<RoleId> = Vec::new();
        for role in self
            .allowed_completion_roles
            .iter()
            .chain(&self.allowed_creation_roles)
        {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }
}

fn add_unique(roles: &mut Vec<RoleId>, role: RoleId) -> bool {
    if roles.contains(&role) {
        return false;
    }
    roles.push(role);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_seeds_category_points() {
        let doc = StoreDocument::default();
        assert_eq!(doc.ticket_counter, 0);
        assert!(doc.logs_channel.is_none());
        for category in Category::ALL {
            assert_eq!(doc.category_points.value_for(category), 1);
        }
    }

    #[test]
    fn missing_keys_are_backfilled() {
        let json = r#"{
            "helperPoints": {"1": 4},
            "activeTickets": {},
            "ticketCounter": 12,
            "categoryPoints": {"Ultra Dailies": 3}
        }"#;
        let mut doc: StoreDocument = serde_json::from_str(json).unwrap();
        doc.normalize();
        assert_eq!(doc.ticket_counter, 12);
        assert!(doc.allowed_creation_roles.is_empty());
        assert!(doc.allowed_completion_roles.is_empty());
        assert!(doc.ticket_channels.is_empty());
        assert_eq!(doc.category_points.value_for(Category::UltraDailies), 3);
        assert_eq!(doc.category_points.value_for(Category::Spamming), 1);
    }

    #[test]
    fn null_logs_channel_loads() {
        let doc: StoreDocument = serde_json::from_str(r#"{"logsChannel": null}"#).unwrap();
        assert!(doc.logs_channel.is_none());
    }

    #[test]
    fn serializes_with_original_key_names() {
        let value = serde_json::to_value(StoreDocument::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "helperPoints",
            "categoryPoints",
            "activeTickets",
            "ticketCounter",
            "ticketChannels",
            "logsChannel",
            "allowedCompletionRoles",
            "allowedCreationRoles",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn counter_only_moves_forward() {
        let mut doc = StoreDocument::default();
        assert_eq!(doc.reserve_ticket_number(), 1);
        assert_eq!(doc.reserve_ticket_number(), 2);
        assert_eq!(doc.ticket_counter, 2);
    }

    #[test]
    fn role_lists_are_idempotent() {
        let mut doc = StoreDocument::default();
        assert!(doc.add_completion_role(RoleId::from("staff")));
        assert!(!doc.add_completion_role(RoleId::from("staff")));
        assert!(doc.add_creation_role(RoleId::from("member")));
        assert!(doc.add_creation_role(RoleId::from("staff")));
        assert_eq!(
            doc.allow_listed_roles(),
            vec![RoleId::from("staff"), RoleId::from("member")]
        );
    }

    #[test]
    fn empty_creation_list_admits_everyone() {
        let mut doc = StoreDocument::default();
        let member = Actor::new("1");
        assert!(doc.can_create(&member));
        doc.add_creation_role(RoleId::from("verified"));
        assert!(!doc.can_create(&member));
        assert!(doc.can_create(&member.with_roles([RoleId::from("verified")])));
    }

    #[test]
    fn completion_list_gates_once_populated() {
        let mut doc = StoreDocument::default();
        let member = Actor::new("1");
        assert!(doc.can_complete(&member));
        doc.add_completion_role(RoleId::from("staff"));
        assert!(!doc.can_complete(&member));
        assert!(!doc.can_complete(&Actor::new("2").admin()));
        assert!(doc.can_complete(&member.with_roles([RoleId::from("staff")])));
    }
}
