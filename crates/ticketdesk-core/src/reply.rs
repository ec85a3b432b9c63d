// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responses the desk hands back to the actor who triggered an interaction.

use crate::category::Category;
use crate::types::Card;

/// Component id of the category selection menu.
pub const CATEGORY_MENU_ID: &str = "ticket_category";

/// Component id of the helper selection menu.
pub const HELPER_PICKER_ID: &str = "select_helpers";

/// Prefix of intake form ids; the category name follows.
pub const INTAKE_FORM_PREFIX: &str = "ticket_form_";

/// Builds the id of the intake form for a category.
pub fn intake_form_id(category: Category) -> String {
    format!("{INTAKE_FORM_PREFIX}{}", category.name())
}

/// A platform-neutral interaction response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text.
    Notice { content: String, ephemeral: bool },
    /// A structured card.
    Card { card: Card, ephemeral: bool },
    /// Private menu of every help category.
    CategoryMenu { content: String },
    /// The intake form for a category.
    IntakeForm { category: Category },
    /// Private helper picker (1 to 25 users). `replace` edits the prompt the
    /// interaction came from instead of sending a new one.
    HelperPicker { content: String, replace: bool },
    /// Private confirm/cancel prompt for a pending nomination.
    ConfirmHelpers { content: String },
}

impl Reply {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Reply::Notice {
            content: content.into(),
            ephemeral: true,
        }
    }

    pub fn public(content: impl Into<String>) -> Self {
        Reply::Notice {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// Text of the reply, if it carries any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Reply::Notice { content, .. }
            | Reply::CategoryMenu { content }
            | Reply::HelperPicker { content, .. }
            | Reply::ConfirmHelpers { content } => Some(content),
            Reply::Card { .. } | Reply::IntakeForm { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_form_id_embeds_category_name() {
        assert_eq!(
            intake_form_id(Category::UltraWeeklies),
            "ticket_form_Ultra Weeklies"
        );
    }

    #[test]
    fn content_accessor() {
        assert_eq!(Reply::ephemeral("hi").content(), Some("hi"));
        assert_eq!(
            Reply::IntakeForm {
                category: Category::Others
            }
            .content(),
            None
        );
    }
}
