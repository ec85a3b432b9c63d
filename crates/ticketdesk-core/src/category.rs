// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The help-category registry.
//!
//! [`Category::ALL`] is the single ordered table every component reads from:
//! menu order, emoji, intake form fields, and the point defaults seeded into
//! the store document.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A help category a ticket can be opened for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum Category {
    #[strum(serialize = "Ultra Weeklies")]
    #[serde(rename = "Ultra Weeklies")]
    UltraWeeklies,
    #[strum(serialize = "Ultra Speaker")]
    #[serde(rename = "Ultra Speaker")]
    UltraSpeaker,
    #[strum(serialize = "Temple Shrine")]
    #[serde(rename = "Temple Shrine")]
    TempleShrine,
    #[strum(serialize = "Ultra Dailies")]
    #[serde(rename = "Ultra Dailies")]
    UltraDailies,
    Spamming,
    Others,
}

/// How an intake field is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    Short,
    Paragraph,
}

/// One question on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub required: bool,
    pub style: FieldStyle,
    pub max_length: Option<u16>,
}

/// Stored in place of an optional field left blank.
pub const EMPTY_FIELD_VALUE: &str = "N/A";

const STANDARD_FIELDS: &[IntakeField] = &[
    IntakeField {
        label: "Room Name",
        placeholder: "Ex: Ultranulgath-6969",
        required: true,
        style: FieldStyle::Short,
        max_length: None,
    },
    IntakeField {
        label: "Server Name",
        placeholder: "Ex: Safiria",
        required: true,
        style: FieldStyle::Short,
        max_length: None,
    },
    IntakeField {
        label: "Your AQW Username",
        placeholder: "Ex: Aenaen",
        required: true,
        style: FieldStyle::Short,
        max_length: None,
    },
    IntakeField {
        label: "Description",
        placeholder: "Briefly describe your request (Optional)",
        required: false,
        style: FieldStyle::Paragraph,
        max_length: Some(1024),
    },
];

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 6] = [
        Category::UltraWeeklies,
        Category::UltraSpeaker,
        Category::TempleShrine,
        Category::UltraDailies,
        Category::Spamming,
        Category::Others,
    ];

    /// Point value a category starts with before an administrator changes it.
    pub const DEFAULT_POINTS: u32 = 1;

    pub fn name(self) -> &'static str {
        match self {
            Category::UltraWeeklies => "Ultra Weeklies",
            Category::UltraSpeaker => "Ultra Speaker",
            Category::TempleShrine => "Temple Shrine",
            Category::UltraDailies => "Ultra Dailies",
            Category::Spamming => "Spamming",
            Category::Others => "Others",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Category::UltraWeeklies => "⚔️",
            Category::UltraSpeaker => "🗣️",
            Category::TempleShrine => "⛩️",
            Category::UltraDailies => "📅",
            Category::Spamming => "💥",
            Category::Others => "📋",
        }
    }

    /// The intake form questions for this category.
    pub fn intake_fields(self) -> &'static [IntakeField] {
        // All categories currently ask the same questions.
        STANDARD_FIELDS
    }
}
