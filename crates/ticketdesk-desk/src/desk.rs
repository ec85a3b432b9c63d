// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The desk service: runs one interaction at a time against the store.
//!
//! Every read-modify-write cycle on the store runs under one mutex, so two
//! interactions touching the same ticket or ledger entry cannot overwrite
//! each other. Platform I/O happens outside the lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use ticketdesk_config::model::DeskConfig;
use ticketdesk_core::types::{Card, ChannelRequest, OutboundMessage};
use ticketdesk_core::{
    Actor, Category, ChannelId, ChatPlatform, HelperSet, Reply, Responder, RoleId,
    StateStore, StoreDocument, Ticket, TicketdeskError, UserId,
};

use crate::cards;
use crate::events::{AdminCommand, ClosureKind, Handled, InteractionEvent, PendingClosure};
use crate::lifecycle::{self, CompletionRoute};
use crate::teardown::TeardownScheduler;
use crate::transcript;

pub struct Desk {
    store: Arc<dyn StateStore>,
    platform: Arc<dyn ChatPlatform>,
    config: DeskConfig,
    write_lock: Mutex<()>,
    teardown: TeardownScheduler,
}

impl Desk {
    pub fn new(
        store: Arc<dyn StateStore>,
        platform: Arc<dyn ChatPlatform>,
        config: DeskConfig,
    ) -> Self {
        let teardown = TeardownScheduler::new(Arc::clone(&platform));
        Self {
            store,
            platform,
            config,
            write_lock: Mutex::new(()),
            teardown,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn teardown(&self) -> &TeardownScheduler {
        &self.teardown
    }

    fn teardown_delay(&self) -> Duration {
        Duration::from_secs(self.config.teardown_delay_secs)
    }

    /// Handles one interaction end to end.
    ///
    /// Nothing escapes: user-facing failures become private notices, anything
    /// else is logged and answered with a generic notice if no response went
    /// out yet.
    pub async fn dispatch(&self, event: InteractionEvent, responder: &dyn Responder) {
        let kind = event.kind();
        let actor = event.actor().id.clone();
        debug!(event = kind, actor_id = %actor, "handling interaction");

        match self.handle(event).await {
            Ok(Handled { reply, closure }) => {
                if let Err(e) = responder.respond(reply).await {
                    warn!(event = kind, actor_id = %actor, error = %e, "failed to send reply");
                }
                if let Some(closure) = closure {
                    self.close_out(closure).await;
                }
            }
            Err(err) => match err.user_notice() {
                Some(notice) => {
                    debug!(event = kind, actor_id = %actor, error = %err, "interaction rejected");
                    if let Err(e) = responder.respond(Reply::ephemeral(notice)).await {
                        warn!(event = kind, actor_id = %actor, error = %e, "failed to send notice");
                    }
                }
                None => {
                    error!(event = kind, actor_id = %actor, error = %err, "interaction failed");
                    if !responder.has_responded() {
                        let _ = responder
                            .respond(Reply::ephemeral(cards::GENERIC_FAILURE))
                            .await;
                    }
                }
            },
        }
    }

    /// Runs the handler for an event without replying.
    pub async fn handle(&self, event: InteractionEvent) -> Result<Handled, TicketdeskError> {
        match event {
            InteractionEvent::OpenPanel { actor } => self.open_panel_request(&actor).await,
            InteractionEvent::ChooseCategory { actor, category } => {
                self.choose_category(&actor, category).await
            }
            InteractionEvent::SubmitIntake {
                actor,
                category,
                values,
            } => self.submit_intake(&actor, category, &values).await,
            InteractionEvent::RequestCompletion { actor, channel } => {
                self.request_completion(&actor, &channel).await
            }
            InteractionEvent::SelectHelpers {
                actor,
                channel,
                helpers,
            } => self.select_helpers(&actor, &channel, helpers).await,
            InteractionEvent::ConfirmCompletion { actor, channel } => {
                self.confirm_completion(&actor, &channel).await
            }
            InteractionEvent::WithdrawCompletion { actor, channel } => {
                self.withdraw_completion(&actor, &channel).await
            }
            InteractionEvent::CancelTicket { actor, channel } => {
                self.cancel_ticket(&actor, &channel).await
            }
            InteractionEvent::Admin {
                actor,
                channel,
                command,
            } => self.admin(&actor, &channel, command).await,
        }
    }

    /// Loads the document, applies `f`, and saves if `f` succeeded and changed it.
    async fn transact<R>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<R, TicketdeskError>,
    ) -> Result<R, TicketdeskError> {
        let _guard = self.write_lock.lock().await;
        let original = self.store.load().await?;
        let mut document = original.clone();
        let result = f(&mut document)?;
        if document != original {
            self.store.save(&document).await?;
        }
        Ok(result)
    }

    async fn read(&self) -> Result<StoreDocument, TicketdeskError> {
        self.store.load().await
    }

    async fn post_log(&self, logs_channel: Option<&ChannelId>, card: Card) {
        let Some(logs_channel) = logs_channel else {
            return;
        };
        if let Err(e) = self
            .platform
            .post(logs_channel, OutboundMessage::card(card))
            .await
        {
            warn!(channel_id = %logs_channel, error = %e, "failed to post log entry");
        }
    }

    pub async fn open_panel_request(&self, actor: &Actor) -> Result<Handled, TicketdeskError> {
        let document = self.read().await?;
        lifecycle::ensure_can_create(&document, actor)?;
        Ok(Reply::CategoryMenu {
            content: cards::CATEGORY_PROMPT.to_string(),
        }
        .into())
    }

    /// A category menu can outlive the member's access, so the check is repeated here.
    pub async fn choose_category(
        &self,
        actor: &Actor,
        category: Category,
    ) -> Result<Handled, TicketdeskError> {
        let document = self.read().await?;
        lifecycle::ensure_can_create(&document, actor)?;
        Ok(Reply::IntakeForm { category }.into())
    }

    pub async fn submit_intake(
        &self,
        actor: &Actor,
        category: Category,
        values: &[String],
    ) -> Result<Handled, TicketdeskError> {
        let fields = lifecycle::intake_fields(category, values);
        let reservation = self
            .transact(|doc| lifecycle::reserve(doc, actor, category))
            .await?;
        info!(
            ticket_number = reservation.number,
            category = %category,
            actor_id = %actor.id,
            "ticket number reserved"
        );

        let helpers_role = self.helpers_role().await;
        let channel = self
            .platform
            .provision_ticket_channel(ChannelRequest {
                name: format!("ticket-{}", reservation.number),
                creator: actor.id.clone(),
                category,
                placement: reservation.placement.clone(),
                allowed_roles: reservation.allowed_roles.clone(),
            })
            .await?;

        let ticket = Ticket::new(reservation.number, actor.id.clone(), category, fields);
        self.transact(|doc| lifecycle::register(doc, channel.clone(), ticket.clone()))
            .await?;

        let content = match helpers_role {
            Some(role) if reservation.creation_roles.contains(&role) => {
                format!("{} - {}", role.mention(), cards::NEW_REQUEST)
            }
            _ => cards::NEW_REQUEST.to_string(),
        };
        self.platform
            .post(
                &channel,
                OutboundMessage::card(cards::ticket_card(&ticket)).with_content(content),
            )
            .await?;

        info!(
            ticket_number = ticket.number,
            channel_id = %channel,
            "ticket opened"
        );
        self.post_log(
            reservation.logs_channel.as_ref(),
            cards::created_log(&ticket, &channel),
        )
        .await;

        Ok(Reply::ephemeral(format!("✅ Ticket created! Check {}", channel.mention())).into())
    }

    async fn helpers_role(&self) -> Option<RoleId> {
        match self.platform.find_role(&self.config.helpers_role_name).await {
            Ok(role) => role,
            Err(e) => {
                warn!(error = %e, "helpers role lookup failed");
                None
            }
        }
    }

    pub async fn request_completion(
        &self,
        actor: &Actor,
        channel: &ChannelId,
    ) -> Result<Handled, TicketdeskError> {
        let route = self
            .transact(|doc| lifecycle::route_completion_request(doc, channel, actor))
            .await?;
        match route {
            CompletionRoute::PickHelpers => Ok(Reply::HelperPicker {
                content: cards::HELPER_PROMPT.to_string(),
                replace: false,
            }
            .into()),
            CompletionRoute::CreatorFlagged => {
                info!(channel_id = %channel, actor_id = %actor.id, "ticket flagged complete by creator");
                self.platform
                    .post(channel, OutboundMessage::text(cards::CREATOR_FLAGGED_PUBLIC))
                    .await?;
                Ok(Reply::ephemeral(cards::CREATOR_FLAGGED_PRIVATE).into())
            }
        }
    }

    pub async fn select_helpers(
        &self,
        actor: &Actor,
        channel: &ChannelId,
        helpers: Vec<UserId>,
    ) -> Result<Handled, TicketdeskError> {
        let helpers = HelperSet::new(helpers)?;
        let content = cards::confirm_prompt(&helpers);
        let count = helpers.len();
        self.transact(|doc| lifecycle::nominate(doc, channel, actor, helpers))
            .await?;
        debug!(channel_id = %channel, actor_id = %actor.id, helpers = count, "helpers nominated");
        Ok(Reply::ConfirmHelpers { content }.into())
    }

    pub async fn confirm_completion(
        &self,
        actor: &Actor,
        channel: &ChannelId,
    ) -> Result<Handled, TicketdeskError> {
        let resolution = self
            .transact(|doc| lifecycle::confirm(doc, channel, actor))
            .await?;
        let ticket = &resolution.ticket;
        info!(
            ticket_number = ticket.number,
            channel_id = %channel,
            helpers = resolution.helpers.len(),
            points_each = resolution.points_each,
            "ticket completed"
        );

        self.post_log(
            resolution.logs_channel.as_ref(),
            cards::completed_log(
                ticket,
                &resolution.completed_by,
                &resolution.helpers,
                resolution.points_each,
            ),
        )
        .await;

        Ok(Handled {
            reply: Reply::Card {
                card: cards::completed_card(
                    &resolution.helpers,
                    resolution.points_each,
                    self.config.teardown_delay_secs,
                ),
                ephemeral: false,
            },
            closure: Some(PendingClosure {
                channel: channel.clone(),
                ticket_number: ticket.number,
                kind: ClosureKind::Completed,
                logs_channel: resolution.logs_channel.clone(),
            }),
        })
    }

    pub async fn withdraw_completion(
        &self,
        actor: &Actor,
        channel: &ChannelId,
    ) -> Result<Handled, TicketdeskError> {
        self.transact(|doc| lifecycle::withdraw(doc, channel, actor))
            .await?;
        debug!(channel_id = %channel, actor_id = %actor.id, "nomination withdrawn");
        Ok(Reply::HelperPicker {
            content: cards::HELPER_REPROMPT.to_string(),
            replace: true,
        }
        .into())
    }

    pub async fn cancel_ticket(
        &self,
        actor: &Actor,
        channel: &ChannelId,
    ) -> Result<Handled, TicketdeskError> {
        let cancellation = self
            .transact(|doc| lifecycle::cancel(doc, channel, actor))
            .await?;
        let ticket = &cancellation.ticket;
        info!(
            ticket_number = ticket.number,
            channel_id = %channel,
            actor_id = %actor.id,
            "ticket canceled"
        );

        self.post_log(
            cancellation.logs_channel.as_ref(),
            cards::canceled_log(ticket, &actor.id),
        )
        .await;

        Ok(Handled {
            reply: Reply::Card {
                card: cards::canceled_card(self.config.teardown_delay_secs),
                ephemeral: false,
            },
            closure: Some(PendingClosure {
                channel: channel.clone(),
                ticket_number: ticket.number,
                kind: ClosureKind::Canceled,
                logs_channel: cancellation.logs_channel.clone(),
            }),
        })
    }

    /// Captures the transcript, delivers it to the log channel, and schedules
    /// the channel's deletion. Never fails.
    pub async fn close_out(&self, closure: PendingClosure) {
        match transcript::generate(self.platform.as_ref(), &closure.channel, Utc::now()).await {
            Some(text) => {
                if let Some(logs_channel) = &closure.logs_channel {
                    let message = OutboundMessage::text(closure.transcript_caption())
                        .with_file(closure.transcript_filename(), text.into_bytes());
                    if let Err(e) = self.platform.post(logs_channel, message).await {
                        warn!(
                            ticket_number = closure.ticket_number,
                            error = %e,
                            "failed to deliver transcript"
                        );
                    }
                }
            }
            None => info!(
                ticket_number = closure.ticket_number,
                "no transcript available, closing anyway"
            ),
        }
        self.teardown
            .schedule(closure.channel, self.teardown_delay());
    }

    async fn admin(
        &self,
        actor: &Actor,
        channel: &ChannelId,
        command: AdminCommand,
    ) -> Result<Handled, TicketdeskError> {
        if command.requires_admin() && !actor.is_admin {
            return Err(TicketdeskError::PermissionDenied {
                reason: cards::DENY_ADMIN.to_string(),
            });
        }
        let name = command.name();

        let reply = match command {
            AdminCommand::SetupPanel => {
                self.platform
                    .post(channel, OutboundMessage::card(cards::panel_card()))
                    .await?;
                Reply::ephemeral("✅ Help panel successfully created!")
            }
            AdminCommand::Leaderboard => {
                let document = self.read().await?;
                let size = self.config.leaderboard_size;
                Reply::Card {
                    card: cards::leaderboard_card(&document.helper_points.rank(size), size),
                    ephemeral: false,
                }
            }
            AdminCommand::ResetLeaderboard => {
                self.transact(|doc| {
                    doc.helper_points.reset();
                    Ok(())
                })
                .await?;
                Reply::ephemeral("✅ Leaderboard has been reset!")
            }
            AdminCommand::SetPoints { category, points } => {
                let value = u32::try_from(points)
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| TicketdeskError::Validation {
                        message: "Points must be a positive whole number.".to_string(),
                    })?;
                self.transact(|doc| doc.category_points.set(category, value))
                    .await?;
                Reply::ephemeral(format!(
                    "✅ Points for **{category}** set to **{}**!",
                    cards::points_label(u64::from(value))
                ))
            }
            AdminCommand::SetupTicket { category, target } => {
                self.transact(|doc| {
                    doc.set_ticket_channel(category, target.clone());
                    Ok(())
                })
                .await?;
                Reply::ephemeral(format!(
                    "✅ Tickets for **{category}** will now be created in {}!",
                    target.mention()
                ))
            }
            AdminCommand::SetupLogs { channel: logs } => {
                self.transact(|doc| {
                    doc.logs_channel = Some(logs.clone());
                    Ok(())
                })
                .await?;
                Reply::ephemeral(format!(
                    "✅ Ticket logs will now be posted to {}!",
                    logs.mention()
                ))
            }
            AdminCommand::AddCompletionRole { role } => {
                let added = self
                    .transact(|doc| Ok(doc.add_completion_role(role.clone())))
                    .await?;
                if added {
                    Reply::ephemeral(format!(
                        "✅ Role {} has been added to the list of roles that can complete tickets!",
                        role.mention()
                    ))
                } else {
                    Reply::ephemeral(format!(
                        "❌ Role {} is already in the list of allowed completion roles!",
                        role.mention()
                    ))
                }
            }
            AdminCommand::AddCreationRole { role } => {
                let added = self
                    .transact(|doc| Ok(doc.add_creation_role(role.clone())))
                    .await?;
                if added {
                    Reply::ephemeral(format!(
                        "✅ Role {} has been added to the list of roles that can create tickets!",
                        role.mention()
                    ))
                } else {
                    Reply::ephemeral(format!(
                        "❌ Role {} is already in the list of allowed creation roles!",
                        role.mention()
                    ))
                }
            }
        };

        info!(command = name, actor_id = %actor.id, "admin command handled");
        Ok(reply.into())
    }
}
