// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handling: registers commands on connect and turns
//! interactions into desk events.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ActionRow, ActionRowComponent, Command, CommandInteraction, ComponentInteraction,
    ComponentInteractionDataKind, Context, EventHandler, GuildId, Http, Interaction, Member,
    ModalInteraction, Permissions, Ready,
};
use tracing::{Instrument, debug, error, info, info_span, warn};

use ticketdesk_core::reply::{CATEGORY_MENU_ID, HELPER_PICKER_ID, INTAKE_FORM_PREFIX};
use ticketdesk_core::{Actor, CardAction, Category, ChannelId, Reply, Responder, UserId};
use ticketdesk_desk::{Desk, InteractionEvent};

use crate::commands;
use crate::ids;
use crate::platform::DiscordPlatform;
use crate::render::{CardStyle, FIELD_ID_PREFIX};
use crate::responder::{DiscordResponder, Target};

/// What a component interaction carried besides its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Nothing,
    Values(Vec<String>),
    Users(Vec<UserId>),
}

impl Selection {
    pub fn from_kind(kind: &ComponentInteractionDataKind) -> Self {
        match kind {
            ComponentInteractionDataKind::StringSelect { values } => {
                Selection::Values(values.clone())
            }
            ComponentInteractionDataKind::UserSelect { values } => {
                Selection::Users(values.iter().map(|id| ids::user(*id)).collect())
            }
            _ => Selection::Nothing,
        }
    }
}

pub fn actor(
    user: serenity::all::UserId,
    roles: &[serenity::all::RoleId],
    permissions: Option<Permissions>,
) -> Actor {
    let actor = Actor::new(ids::user(user)).with_roles(roles.iter().map(|r| ids::role(*r)));
    if permissions.is_some_and(|p| p.administrator()) {
        actor.admin()
    } else {
        actor
    }
}

fn member_actor(member: &Member) -> Actor {
    actor(member.user.id, &member.roles, member.permissions)
}

/// Maps a pressed button or submitted menu to a desk event.
pub fn component_event(
    custom_id: &str,
    selection: Selection,
    actor: Actor,
    channel: ChannelId,
) -> Option<InteractionEvent> {
    if custom_id == CATEGORY_MENU_ID {
        let Selection::Values(values) = selection else {
            return None;
        };
        let category = values.first().and_then(|v| Category::from_str(v).ok())?;
        return Some(InteractionEvent::ChooseCategory { actor, category });
    }
    if custom_id == HELPER_PICKER_ID {
        let Selection::Users(helpers) = selection else {
            return None;
        };
        return Some(InteractionEvent::SelectHelpers {
            actor,
            channel,
            helpers,
        });
    }

    let event = match CardAction::from_str(custom_id).ok()? {
        CardAction::CreateTicket => InteractionEvent::OpenPanel { actor },
        CardAction::CompleteTicket => InteractionEvent::RequestCompletion { actor, channel },
        CardAction::CancelTicket => InteractionEvent::CancelTicket { actor, channel },
        CardAction::ConfirmCompletion => InteractionEvent::ConfirmCompletion { actor, channel },
        CardAction::CancelCompletion => InteractionEvent::WithdrawCompletion { actor, channel },
    };
    Some(event)
}

/// Collects intake form answers in field order. Blank optional inputs
/// arrive as empty strings.
pub fn form_values(rows: &[ActionRow]) -> Vec<String> {
    let mut answers: Vec<(usize, String)> = rows
        .iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => {
                let index = input
                    .custom_id
                    .strip_prefix(FIELD_ID_PREFIX)
                    .and_then(|i| i.parse().ok())
                    .unwrap_or(usize::MAX);
                Some((index, input.value.clone().unwrap_or_default()))
            }
            _ => None,
        })
        .collect();
    answers.sort_by_key(|(index, _)| *index);
    answers.into_iter().map(|(_, value)| value).collect()
}

pub fn intake_event(custom_id: &str, values: Vec<String>, actor: Actor) -> Option<InteractionEvent> {
    let name = custom_id.strip_prefix(INTAKE_FORM_PREFIX)?;
    let category = Category::from_str(name).ok()?;
    Some(InteractionEvent::SubmitIntake {
        actor,
        category,
        values,
    })
}

/// Serenity event handler feeding the desk.
pub struct Handler {
    desk: Arc<Desk>,
    platform: Arc<DiscordPlatform>,
    style: CardStyle,
    command_guild: Option<GuildId>,
}

impl Handler {
    /// `command_guild` scopes slash command registration to one guild;
    /// otherwise commands are registered globally.
    pub fn new(desk: Arc<Desk>, platform: Arc<DiscordPlatform>, command_guild: Option<u64>) -> Self {
        let style = CardStyle::from_config(desk.config());
        Self {
            desk,
            platform,
            style,
            command_guild: command_guild.filter(|id| *id != 0).map(GuildId::new),
        }
    }

    /// Returns the actor if the interaction comes from a member of the
    /// served guild.
    fn admit(&self, guild: Option<GuildId>, actor: Option<Actor>) -> Option<Actor> {
        let Some(guild) = guild else {
            debug!("ignoring interaction outside a guild");
            return None;
        };
        if !self.platform.serves(guild) {
            warn!(guild_id = %guild, "ignoring interaction from another guild");
            return None;
        }
        actor
    }

    async fn on_command(&self, http: Arc<Http>, interaction: CommandInteraction) {
        let actor = interaction.member.as_ref().map(|m| member_actor(m));
        let Some(actor) = self.admit(interaction.guild_id, actor) else {
            return;
        };
        let channel = ids::channel(interaction.channel_id);
        let name = interaction.data.name.clone();
        let parsed = commands::parse(&name, &commands::options(&interaction.data));
        let responder = DiscordResponder::new(http, Target::Command(interaction), self.style.clone());

        match parsed {
            Ok(command) => {
                let event = InteractionEvent::Admin {
                    actor,
                    channel,
                    command,
                };
                self.desk.dispatch(event, &responder).await;
            }
            Err(e) => {
                debug!(command = %name, error = %e, "rejected command options");
                if let Some(notice) = e.user_notice() {
                    if let Err(e) = responder.respond(Reply::ephemeral(notice)).await {
                        warn!(error = %e, "failed to send notice");
                    }
                }
            }
        }
    }

    async fn on_component(&self, http: Arc<Http>, interaction: ComponentInteraction) {
        let actor = interaction.member.as_ref().map(member_actor);
        let Some(actor) = self.admit(interaction.guild_id, actor) else {
            return;
        };
        let selection = Selection::from_kind(&interaction.data.kind);
        let channel = ids::channel(interaction.channel_id);
        let Some(event) = component_event(&interaction.data.custom_id, selection, actor, channel)
        else {
            debug!(custom_id = %interaction.data.custom_id, "ignoring unknown component");
            return;
        };
        let responder =
            DiscordResponder::new(http, Target::Component(interaction), self.style.clone());
        self.desk.dispatch(event, &responder).await;
    }

    async fn on_modal(&self, http: Arc<Http>, interaction: ModalInteraction) {
        let actor = interaction.member.as_ref().map(member_actor);
        let Some(actor) = self.admit(interaction.guild_id, actor) else {
            return;
        };
        let values = form_values(&interaction.data.components);
        let Some(event) = intake_event(&interaction.data.custom_id, values, actor) else {
            debug!(custom_id = %interaction.data.custom_id, "ignoring unknown form");
            return;
        };
        let responder = DiscordResponder::new(http, Target::Modal(interaction), self.style.clone());
        // Provisioning can outlast the interaction deadline.
        if let Err(e) = responder.defer().await {
            warn!(error = %e, "failed to acknowledge form submission");
            return;
        }
        self.desk.dispatch(event, &responder).await;
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "connected to Discord gateway"
        );
        let definitions = commands::definitions();
        let registered = match self.command_guild {
            Some(guild) => guild.set_commands(&ctx.http, definitions).await,
            None => Command::set_global_commands(&ctx.http, definitions).await,
        };
        match registered {
            Ok(commands) => info!(
                count = commands.len(),
                guild_id = ?self.command_guild,
                "slash commands registered"
            ),
            Err(e) => error!(error = %e, "failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let span = info_span!("interaction", id = %interaction.id());
        let http = Arc::clone(&ctx.http);
        async move {
            match interaction {
                Interaction::Command(i) => self.on_command(http, i).await,
                Interaction::Component(i) => self.on_component(http, i).await,
                Interaction::Modal(i) => self.on_modal(http, i).await,
                _ => {}
            }
        }
        .instrument(span)
        .await;
    }
}
