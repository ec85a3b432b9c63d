// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Who can see a ticket channel, and where it is placed.
//!
//! Everyone is denied view access; the creator, the helpers role, moderator
//! and administrator roles, and allow-listed roles that still exist are
//! granted view and send. The first grant for an id wins.

use serenity::all::{
    ChannelId, ChannelType, PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId,
    UserId,
};

/// The parts of a guild role the plan looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRole {
    pub id: RoleId,
    pub name: String,
    pub permissions: Permissions,
}

impl GuildRole {
    fn is_staff(&self) -> bool {
        self.permissions.contains(Permissions::ADMINISTRATOR)
            || self.permissions.contains(Permissions::MODERATE_MEMBERS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grantee {
    Member(UserId),
    Role(RoleId),
}

/// A ticket channel's permission overwrites, before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPlan {
    pub everyone: RoleId,
    pub granted: Vec<Grantee>,
}

impl AccessPlan {
    /// Builds the plan. `roles` is the guild's role list; `allow_listed`
    /// roles missing from it are skipped.
    pub fn new(
        everyone: RoleId,
        creator: UserId,
        roles: &[GuildRole],
        helpers_role_name: &str,
        allow_listed: &[RoleId],
    ) -> Self {
        let mut plan = Self {
            everyone,
            granted: vec![Grantee::Member(creator)],
        };

        if let Some(helpers) = roles
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(helpers_role_name))
        {
            plan.grant_role(helpers.id);
        }
        for role in roles.iter().filter(|r| r.is_staff()) {
            plan.grant_role(role.id);
        }
        for id in allow_listed {
            if roles.iter().any(|r| r.id == *id) {
                plan.grant_role(*id);
            }
        }
        plan
    }

    fn grant_role(&mut self, id: RoleId) {
        let grantee = Grantee::Role(id);
        if id != self.everyone && !self.granted.contains(&grantee) {
            self.granted.push(grantee);
        }
    }

    pub fn overwrites(&self) -> Vec<PermissionOverwrite> {
        let access = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        let mut overwrites = vec![PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(self.everyone),
        }];
        overwrites.extend(self.granted.iter().map(|grantee| PermissionOverwrite {
            allow: access,
            deny: Permissions::empty(),
            kind: match *grantee {
                Grantee::Member(id) => PermissionOverwriteType::Member(id),
                Grantee::Role(id) => PermissionOverwriteType::Role(id),
            },
        }));
        overwrites
    }
}

/// Parent category for a new ticket channel: the configured target itself
/// when it is a category, otherwise the target's own parent.
pub fn parent_category(
    target: ChannelId,
    kind: ChannelType,
    target_parent: Option<ChannelId>,
) -> Option<ChannelId> {
    if kind == ChannelType::Category {
        Some(target)
    } else {
        target_parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUILD: u64 = 10;

    fn role(id: u64, name: &str, permissions: Permissions) -> GuildRole {
        GuildRole {
            id: RoleId::new(id),
            name: name.to_string(),
            permissions,
        }
    }

    fn guild_roles() -> Vec<GuildRole> {
        vec![
            role(GUILD, "@everyone", Permissions::empty()),
            role(20, "Helpers", Permissions::SEND_MESSAGES),
            role(30, "Mods", Permissions::MODERATE_MEMBERS),
            role(40, "Owner", Permissions::ADMINISTRATOR),
            role(50, "Members", Permissions::empty()),
        ]
    }

    #[test]
    fn grants_creator_helpers_staff_and_allow_list() {
        let plan = AccessPlan::new(
            RoleId::new(GUILD),
            UserId::new(7),
            &guild_roles(),
            "helpers",
            &[RoleId::new(30), RoleId::new(50), RoleId::new(99)],
        );
        assert_eq!(
            plan.granted,
            vec![
                Grantee::Member(UserId::new(7)),
                Grantee::Role(RoleId::new(20)),
                Grantee::Role(RoleId::new(30)),
                Grantee::Role(RoleId::new(40)),
                Grantee::Role(RoleId::new(50)),
            ]
        );
    }

    #[test]
    fn everyone_is_denied_view() {
        let plan = AccessPlan::new(RoleId::new(GUILD), UserId::new(7), &[], "helpers", &[]);
        let overwrites = plan.overwrites();
        assert_eq!(overwrites.len(), 2);
        assert_eq!(overwrites[0].deny, Permissions::VIEW_CHANNEL);
        assert_eq!(
            overwrites[0].kind,
            PermissionOverwriteType::Role(RoleId::new(GUILD))
        );
        assert_eq!(
            overwrites[1].allow,
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES
        );
    }

    #[test]
    fn everyone_never_granted_even_if_allow_listed() {
        let plan = AccessPlan::new(
            RoleId::new(GUILD),
            UserId::new(7),
            &guild_roles(),
            "nobody",
            &[RoleId::new(GUILD)],
        );
        assert!(!plan.granted.contains(&Grantee::Role(RoleId::new(GUILD))));
    }

    #[test]
    fn parent_follows_target_kind() {
        let target = ChannelId::new(100);
        let parent = ChannelId::new(200);
        assert_eq!(
            parent_category(target, ChannelType::Category, None),
            Some(target)
        );
        assert_eq!(
            parent_category(target, ChannelType::Text, Some(parent)),
            Some(parent)
        );
        assert_eq!(parent_category(target, ChannelType::Text, None), None);
    }
}
