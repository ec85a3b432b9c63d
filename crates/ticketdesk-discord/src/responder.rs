// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Responder`] for a single Discord interaction.
//!
//! The first reply becomes the interaction response, or completes the
//! deferral if one was sent. Later replies go out as follow-ups.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serenity::all::{
    CommandInteraction, ComponentInteraction, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    EditInteractionResponse, Http, ModalInteraction,
};
use tracing::warn;

use ticketdesk_core::{Reply, Responder, TicketdeskError};

use crate::render::{self, CardStyle};

/// The interaction being answered.
pub enum Target {
    Command(CommandInteraction),
    Component(ComponentInteraction),
    Modal(ModalInteraction),
}

pub struct DiscordResponder {
    http: Arc<Http>,
    target: Target,
    style: CardStyle,
    deferred: AtomicBool,
    responded: AtomicBool,
}

fn reply_error(e: serenity::Error) -> TicketdeskError {
    TicketdeskError::Platform {
        message: format!("failed to answer interaction: {e}"),
        source: Some(Box::new(e)),
    }
}

impl DiscordResponder {
    pub fn new(http: Arc<Http>, target: Target, style: CardStyle) -> Self {
        Self {
            http,
            target,
            style,
            deferred: AtomicBool::new(false),
            responded: AtomicBool::new(false),
        }
    }

    /// Acknowledges the interaction privately; the next reply fills it in.
    pub async fn defer(&self) -> Result<(), TicketdeskError> {
        let ack =
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true));
        self.create(ack).await.map_err(reply_error)?;
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, response: CreateInteractionResponse) -> serenity::Result<()> {
        let http = self.http.as_ref();
        match &self.target {
            Target::Command(i) => i.create_response(http, response).await,
            Target::Component(i) => i.create_response(http, response).await,
            Target::Modal(i) => i.create_response(http, response).await,
        }
    }

    async fn edit(&self, edit: EditInteractionResponse) -> serenity::Result<()> {
        let http = self.http.as_ref();
        match &self.target {
            Target::Command(i) => i.edit_response(http, edit).await.map(drop),
            Target::Component(i) => i.edit_response(http, edit).await.map(drop),
            Target::Modal(i) => i.edit_response(http, edit).await.map(drop),
        }
    }

    async fn follow_up(&self, followup: CreateInteractionResponseFollowup) -> serenity::Result<()> {
        let http = self.http.as_ref();
        match &self.target {
            Target::Command(i) => i.create_followup(http, followup).await.map(drop),
            Target::Component(i) => i.create_followup(http, followup).await.map(drop),
            Target::Modal(i) => i.create_followup(http, followup).await.map(drop),
        }
    }
}

#[async_trait]
impl Responder for DiscordResponder {
    async fn respond(&self, reply: Reply) -> Result<(), TicketdeskError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            return match render::followup(&reply, &self.style) {
                Some(followup) => self.follow_up(followup).await.map_err(reply_error),
                None => {
                    warn!("dropping interactive reply after the response was sent");
                    Ok(())
                }
            };
        }

        if self.deferred.load(Ordering::SeqCst) {
            return match render::deferred_edit(&reply, &self.style) {
                Some(edit) => self.edit(edit).await.map_err(reply_error),
                None => {
                    warn!("interactive reply cannot complete a deferred response");
                    self.edit(EditInteractionResponse::new().content("✅ Done."))
                        .await
                        .map_err(reply_error)
                }
            };
        }

        self.create(render::interaction_response(&reply, &self.style))
            .await
            .map_err(reply_error)
    }

    fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }
}
