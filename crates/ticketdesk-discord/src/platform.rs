// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ChatPlatform`] over the Discord REST API.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    self as discord, ChannelType, CreateAttachment, CreateChannel, CreateMessage, GetMessages,
    GuildId, Http,
};
use tracing::{debug, info, warn};

use ticketdesk_core::types::{AttachmentRef, ChannelRequest, EmbedSnapshot, HistoryMessage};
use ticketdesk_core::{
    ChannelId, ChatPlatform, MessageId, OutboundMessage, RoleId, TicketdeskError,
};

use crate::access::{self, AccessPlan, GuildRole};
use crate::ids;
use crate::render::{self, CardStyle};

fn platform_error(action: &str) -> impl FnOnce(serenity::Error) -> TicketdeskError + '_ {
    move |e| TicketdeskError::Platform {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// The guild the desk serves, reached over REST.
pub struct DiscordPlatform {
    http: Arc<Http>,
    guild: OnceLock<GuildId>,
    helpers_role_name: String,
    style: CardStyle,
}

impl DiscordPlatform {
    /// Creates the platform. Without a configured guild, the first guild an
    /// interaction arrives from is adopted.
    pub fn new(
        http: Arc<Http>,
        guild: Option<u64>,
        helpers_role_name: impl Into<String>,
        style: CardStyle,
    ) -> Self {
        let cell = OnceLock::new();
        if let Some(id) = guild.filter(|id| *id != 0) {
            let _ = cell.set(GuildId::new(id));
        }
        Self {
            http,
            guild: cell,
            helpers_role_name: helpers_role_name.into(),
            style,
        }
    }

    /// Creates the platform with its own REST client.
    pub fn with_token(
        token: &str,
        guild: Option<u64>,
        helpers_role_name: impl Into<String>,
        style: CardStyle,
    ) -> Self {
        Self::new(Arc::new(Http::new(token)), guild, helpers_role_name, style)
    }

    /// Returns `true` if interactions from `guild` belong to this desk.
    pub fn serves(&self, guild: GuildId) -> bool {
        let bound = *self.guild.get_or_init(|| {
            info!(guild_id = %guild, "bound to guild");
            guild
        });
        bound == guild
    }

    pub fn guild(&self) -> Option<GuildId> {
        self.guild.get().copied()
    }

    fn http(&self) -> &Http {
        &self.http
    }

    fn require_guild(&self) -> Result<GuildId, TicketdeskError> {
        self.guild()
            .ok_or_else(|| TicketdeskError::platform("no guild bound yet"))
    }

    async fn guild_roles(&self, guild: GuildId) -> Result<Vec<GuildRole>, TicketdeskError> {
        let roles = guild
            .roles(self.http())
            .await
            .map_err(platform_error("list guild roles"))?;
        let mut roles: Vec<_> = roles.into_values().collect();
        roles.sort_by_key(|r| (r.position, r.id));
        Ok(roles
            .into_iter()
            .map(|r| GuildRole {
                id: r.id,
                name: r.name,
                permissions: r.permissions,
            })
            .collect())
    }

    /// Looks up the parent category for a configured placement target.
    /// A target that no longer exists places the channel at top level.
    async fn resolve_parent(&self, target: &ChannelId) -> Option<discord::ChannelId> {
        let id = ids::to_channel(target).ok()?;
        match id.to_channel(self.http()).await {
            Ok(channel) => {
                let channel = channel.guild()?;
                access::parent_category(channel.id, channel.kind, channel.parent_id)
            }
            Err(e) => {
                warn!(channel_id = %target, error = %e, "configured ticket placement not found");
                None
            }
        }
    }
}

fn snapshot(message: discord::Message) -> HistoryMessage {
    let created_at = DateTime::<Utc>::from_timestamp(message.timestamp.unix_timestamp(), 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    HistoryMessage {
        id: ids::message(message.id),
        author_id: ids::user(message.author.id),
        author_name: message.author.tag(),
        created_at,
        content: message.content,
        embeds: message
            .embeds
            .into_iter()
            .map(|e| EmbedSnapshot {
                title: e.title,
                description: e.description,
                fields: e.fields.into_iter().map(|f| (f.name, f.value)).collect(),
            })
            .collect(),
        attachments: message
            .attachments
            .into_iter()
            .map(|a| AttachmentRef {
                filename: a.filename,
                url: a.url,
            })
            .collect(),
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn provision_ticket_channel(
        &self,
        request: ChannelRequest,
    ) -> Result<ChannelId, TicketdeskError> {
        let guild = self.require_guild()?;
        let roles = self.guild_roles(guild).await?;
        let allow_listed: Vec<_> = request
            .allowed_roles
            .iter()
            .filter_map(|r| ids::to_role(r).ok())
            .collect();
        let plan = AccessPlan::new(
            discord::RoleId::new(guild.get()),
            ids::to_user(&request.creator)?,
            &roles,
            &self.helpers_role_name,
            &allow_listed,
        );

        let mut builder = CreateChannel::new(request.name.as_str())
            .kind(ChannelType::Text)
            .permissions(plan.overwrites());
        if let Some(target) = &request.placement {
            if let Some(parent) = self.resolve_parent(target).await {
                builder = builder.category(parent);
            }
        }

        let channel = guild
            .create_channel(self.http(), builder)
            .await
            .map_err(platform_error("create ticket channel"))?;
        debug!(
            channel_id = %channel.id,
            grants = plan.granted.len(),
            "ticket channel provisioned"
        );
        Ok(ids::channel(channel.id))
    }

    async fn post(
        &self,
        channel: &ChannelId,
        message: OutboundMessage,
    ) -> Result<MessageId, TicketdeskError> {
        let id = ids::to_channel(channel)?;
        let mut builder = CreateMessage::new();
        if let Some(content) = message.content {
            builder = builder.content(content);
        }
        for card in &message.cards {
            builder = builder
                .embed(render::embed(card, &self.style))
                .components(render::action_rows(&card.actions));
        }
        if let Some(file) = message.file {
            builder = builder.add_file(CreateAttachment::bytes(file.data, file.filename));
        }
        let sent = id
            .send_message(self.http(), builder)
            .await
            .map_err(platform_error("post message"))?;
        Ok(ids::message(sent.id))
    }

    async fn fetch_history(
        &self,
        channel: &ChannelId,
        before: Option<&MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, TicketdeskError> {
        let id = ids::to_channel(channel)?;
        let mut query = GetMessages::new().limit(limit);
        if let Some(cursor) = before {
            query = query.before(ids::to_message(cursor)?);
        }
        let page = id
            .messages(self.http(), query)
            .await
            .map_err(platform_error("fetch channel history"))?;
        Ok(page.into_iter().map(snapshot).collect())
    }

    async fn channel_name(&self, channel: &ChannelId) -> Result<String, TicketdeskError> {
        let id = ids::to_channel(channel)?;
        let channel = id
            .to_channel(self.http())
            .await
            .map_err(platform_error("look up channel"))?;
        channel
            .guild()
            .map(|c| c.name)
            .ok_or_else(|| TicketdeskError::platform("not a guild channel"))
    }

    async fn delete_channel(&self, channel: &ChannelId) -> Result<(), TicketdeskError> {
        ids::to_channel(channel)?
            .delete(self.http())
            .await
            .map_err(platform_error("delete channel"))?;
        Ok(())
    }

    async fn find_role(&self, name: &str) -> Result<Option<RoleId>, TicketdeskError> {
        let guild = self.require_guild()?;
        let roles = self.guild_roles(guild).await?;
        Ok(roles
            .into_iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .map(|r| ids::role(r.id)))
    }
}
