// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering desk cards and replies into Discord builders.

use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateModal,
    CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, EditInteractionResponse,
    InputTextStyle, ReactionType, Timestamp,
};

use ticketdesk_config::model::DeskConfig;
use ticketdesk_core::category::FieldStyle;
use ticketdesk_core::reply::{CATEGORY_MENU_ID, HELPER_PICKER_ID, intake_form_id};
use ticketdesk_core::types::ActionStyle;
use ticketdesk_core::{Card, CardAction, Category, Reply};

/// Custom id prefix of intake form inputs; the field index follows.
pub const FIELD_ID_PREFIX: &str = "field_";

const HELPER_PLACEHOLDER: &str = "Select helper(s) who resolved this ticket";
const CATEGORY_PLACEHOLDER: &str = "Select help category";
const FALLBACK_COLOR: u32 = 0xb10026;

/// Colour and thumbnail applied to every embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStyle {
    pub color: u32,
    pub thumbnail: Option<String>,
}

impl CardStyle {
    pub fn from_config(config: &DeskConfig) -> Self {
        Self {
            color: config.embed_color_rgb().unwrap_or(FALLBACK_COLOR),
            thumbnail: config.thumbnail_url.clone(),
        }
    }
}

pub fn embed(card: &Card, style: &CardStyle) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(&card.title).colour(style.color);
    if let Some(description) = &card.description {
        embed = embed.description(description);
    }
    embed = embed.fields(
        card.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
    );
    if let Some(footer) = &card.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    if card.timestamped {
        embed = embed.timestamp(Timestamp::now());
    }
    if let Some(url) = &style.thumbnail {
        embed = embed.thumbnail(url);
    }
    embed
}

fn button(action: CardAction) -> CreateButton {
    let style = match action.style() {
        ActionStyle::Primary => ButtonStyle::Primary,
        ActionStyle::Success => ButtonStyle::Success,
        ActionStyle::Danger => ButtonStyle::Danger,
    };
    CreateButton::new(action.to_string())
        .label(action.label())
        .emoji(ReactionType::Unicode(action.emoji().to_string()))
        .style(style)
}

/// One button row holding the card's controls, or nothing.
pub fn action_rows(actions: &[CardAction]) -> Vec<CreateActionRow> {
    if actions.is_empty() {
        return Vec::new();
    }
    vec![CreateActionRow::Buttons(
        actions.iter().copied().map(button).collect(),
    )]
}

pub fn category_menu() -> CreateActionRow {
    let options = Category::ALL
        .iter()
        .map(|c| {
            CreateSelectMenuOption::new(c.name(), c.name())
                .emoji(ReactionType::Unicode(c.emoji().to_string()))
        })
        .collect();
    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(CATEGORY_MENU_ID, CreateSelectMenuKind::String { options })
            .placeholder(CATEGORY_PLACEHOLDER),
    )
}

pub fn helper_picker() -> CreateActionRow {
    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(
            HELPER_PICKER_ID,
            CreateSelectMenuKind::User {
                default_users: None,
            },
        )
        .placeholder(HELPER_PLACEHOLDER)
        .min_values(1)
        .max_values(25),
    )
}

pub fn intake_modal(category: Category) -> CreateModal {
    let rows = category
        .intake_fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let style = match field.style {
                FieldStyle::Short => InputTextStyle::Short,
                FieldStyle::Paragraph => InputTextStyle::Paragraph,
            };
            let mut input =
                CreateInputText::new(style, field.label, format!("{FIELD_ID_PREFIX}{i}"))
                    .placeholder(field.placeholder)
                    .required(field.required);
            if let Some(max) = field.max_length {
                input = input.max_length(max);
            }
            CreateActionRow::InputText(input)
        })
        .collect();
    CreateModal::new(
        intake_form_id(category),
        format!("{category} - Help Request"),
    )
    .components(rows)
}

fn message(reply: &Reply, style: &CardStyle) -> CreateInteractionResponseMessage {
    let base = CreateInteractionResponseMessage::new();
    match reply {
        Reply::Notice { content, ephemeral } => base.content(content).ephemeral(*ephemeral),
        Reply::Card { card, ephemeral } => base
            .embed(embed(card, style))
            .components(action_rows(&card.actions))
            .ephemeral(*ephemeral),
        Reply::CategoryMenu { content } => base
            .content(content)
            .components(vec![category_menu()])
            .ephemeral(true),
        Reply::HelperPicker { content, .. } => base
            .content(content)
            .components(vec![helper_picker()])
            .ephemeral(true),
        Reply::ConfirmHelpers { content } => base
            .content(content)
            .components(action_rows(&[
                CardAction::ConfirmCompletion,
                CardAction::CancelCompletion,
            ]))
            .ephemeral(true),
        // Forms are not messages; `interaction_response` handles them.
        Reply::IntakeForm { .. } => base,
    }
}

/// The initial response to an interaction.
pub fn interaction_response(reply: &Reply, style: &CardStyle) -> CreateInteractionResponse {
    match reply {
        Reply::IntakeForm { category } => CreateInteractionResponse::Modal(intake_modal(*category)),
        Reply::HelperPicker { replace: true, .. } => {
            CreateInteractionResponse::UpdateMessage(message(reply, style))
        }
        _ => CreateInteractionResponse::Message(message(reply, style)),
    }
}

/// The edit that completes a deferred response. Forms and menus cannot be
/// sent this way.
pub fn deferred_edit(reply: &Reply, style: &CardStyle) -> Option<EditInteractionResponse> {
    match reply {
        Reply::Notice { content, .. } => Some(EditInteractionResponse::new().content(content)),
        Reply::Card { card, .. } => Some(
            EditInteractionResponse::new()
                .embed(embed(card, style))
                .components(action_rows(&card.actions)),
        ),
        _ => None,
    }
}

/// A follow-up for an interaction that already has its response.
pub fn followup(reply: &Reply, style: &CardStyle) -> Option<CreateInteractionResponseFollowup> {
    let base = CreateInteractionResponseFollowup::new();
    match reply {
        Reply::Notice { content, ephemeral } => Some(base.content(content).ephemeral(*ephemeral)),
        Reply::Card { card, ephemeral } => Some(
            base.embed(embed(card, style))
                .components(action_rows(&card.actions))
                .ephemeral(*ephemeral),
        ),
        _ => None,
    }
}
