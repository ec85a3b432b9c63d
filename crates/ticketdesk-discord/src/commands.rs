// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash command definitions and parsing of invoked commands.

use std::str::FromStr;

use serenity::all::{
    CommandData, CommandOptionType, CreateCommand, CreateCommandOption, Permissions,
    ResolvedValue,
};

use ticketdesk_core::{Category, ChannelId, RoleId, TicketdeskError};
use ticketdesk_desk::AdminCommand;

/// A resolved option value, detached from the interaction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    Channel(ChannelId),
    Role(RoleId),
}

fn admin_only(command: CreateCommand) -> CreateCommand {
    command.default_member_permissions(Permissions::ADMINISTRATOR)
}

fn category_option() -> CreateCommandOption {
    Category::ALL.iter().fold(
        CreateCommandOption::new(CommandOptionType::String, "category", "The ticket category")
            .required(true),
        |option, c| option.add_string_choice(c.name(), c.name()),
    )
}

fn channel_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Channel, "channel", description).required(true)
}

fn role_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Role, "role", description).required(true)
}

/// Every slash command the bot registers.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        admin_only(
            CreateCommand::new("setup-panel")
                .description("Set up the ticket panel in the current channel"),
        ),
        CreateCommand::new("leaderboard").description("Display the helper leaderboard"),
        admin_only(
            CreateCommand::new("reset-leaderboard")
                .description("Reset the helper leaderboard (Admin only)"),
        ),
        admin_only(
            CreateCommand::new("points")
                .description("Set points for a category (Admin only)")
                .add_option(category_option())
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "points",
                        "Number of points to award",
                    )
                    .required(true)
                    .min_int_value(1),
                ),
        ),
        admin_only(
            CreateCommand::new("setup-ticket")
                .description(
                    "Set the channel where tickets for a category will be created (Admin only)",
                )
                .add_option(category_option())
                .add_option(channel_option("The channel where tickets will be created")),
        ),
        admin_only(
            CreateCommand::new("setup-logs")
                .description("Set the channel for ticket logs (Admin only)")
                .add_option(channel_option("The channel where logs will be posted")),
        ),
        admin_only(
            CreateCommand::new("setup-roles")
                .description("Set which roles can complete/finalize tickets (Admin only)")
                .add_option(role_option("The role that can complete tickets")),
        ),
        admin_only(
            CreateCommand::new("setup-roles2")
                .description("Set which roles can create and use tickets (Admin only)")
                .add_option(role_option("The role that can create tickets")),
        ),
    ]
}

/// Detaches the options of an invoked command.
pub fn options(data: &CommandData) -> Vec<(String, OptionValue)> {
    data.options()
        .into_iter()
        .filter_map(|option| {
            let value = match option.value {
                ResolvedValue::String(s) => OptionValue::Text(s.to_string()),
                ResolvedValue::Integer(n) => OptionValue::Integer(n),
                ResolvedValue::Channel(c) => OptionValue::Channel(crate::ids::channel(c.id)),
                ResolvedValue::Role(r) => OptionValue::Role(crate::ids::role(r.id)),
                _ => return None,
            };
            Some((option.name.to_string(), value))
        })
        .collect()
}

fn missing(name: &str) -> TicketdeskError {
    TicketdeskError::Validation {
        message: format!("Missing or invalid option `{name}`."),
    }
}

struct Options<'a>(&'a [(String, OptionValue)]);

impl Options<'_> {
    fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn category(&self) -> Result<Category, TicketdeskError> {
        match self.get("category") {
            Some(OptionValue::Text(name)) => {
                Category::from_str(name).map_err(|_| missing("category"))
            }
            _ => Err(missing("category")),
        }
    }

    fn integer(&self, name: &str) -> Result<i64, TicketdeskError> {
        match self.get(name) {
            Some(OptionValue::Integer(n)) => Ok(*n),
            _ => Err(missing(name)),
        }
    }

    fn channel(&self) -> Result<ChannelId, TicketdeskError> {
        match self.get("channel") {
            Some(OptionValue::Channel(id)) => Ok(id.clone()),
            _ => Err(missing("channel")),
        }
    }

    fn role(&self) -> Result<RoleId, TicketdeskError> {
        match self.get("role") {
            Some(OptionValue::Role(id)) => Ok(id.clone()),
            _ => Err(missing("role")),
        }
    }
}

/// Maps a command name and its options to an admin command.
pub fn parse(name: &str, options: &[(String, OptionValue)]) -> Result<AdminCommand, TicketdeskError> {
    let options = Options(options);
    let command = match name {
        "setup-panel" => AdminCommand::SetupPanel,
        "leaderboard" => AdminCommand::Leaderboard,
        "reset-leaderboard" => AdminCommand::ResetLeaderboard,
        "points" => AdminCommand::SetPoints {
            category: options.category()?,
            points: options.integer("points")?,
        },
        "setup-ticket" => AdminCommand::SetupTicket {
            category: options.category()?,
            target: options.channel()?,
        },
        "setup-logs" => AdminCommand::SetupLogs {
            channel: options.channel()?,
        },
        "setup-roles" => AdminCommand::AddCompletionRole {
            role: options.role()?,
        },
        "setup-roles2" => AdminCommand::AddCreationRole {
            role: options.role()?,
        },
        other => {
            return Err(TicketdeskError::Validation {
                message: format!("Unknown command `{other}`."),
            });
        }
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(name: &str, value: OptionValue) -> (String, OptionValue) {
        (name.to_string(), value)
    }

    #[test]
    fn every_definition_parses_back() {
        let options = vec![
            opt("category", OptionValue::Text("Temple Shrine".into())),
            opt("points", OptionValue::Integer(2)),
            opt("channel", OptionValue::Channel(ChannelId::from("3"))),
            opt("role", OptionValue::Role(RoleId::from("4"))),
        ];
        for definition in definitions() {
            let json = serde_json::to_value(&definition).unwrap();
            let name = json["name"].as_str().unwrap().to_string();
            let command = parse(&name, &options).unwrap();
            assert_eq!(command.name(), name);
        }
    }

    #[test]
    fn points_command_fields() {
        let command = parse(
            "points",
            &[
                opt("category", OptionValue::Text("Spamming".into())),
                opt("points", OptionValue::Integer(5)),
            ],
        )
        .unwrap();
        assert_eq!(
            command,
            AdminCommand::SetPoints {
                category: Category::Spamming,
                points: 5
            }
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = parse(
            "setup-ticket",
            &[
                opt("category", OptionValue::Text("Fishing".into())),
                opt("channel", OptionValue::Channel(ChannelId::from("3"))),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, TicketdeskError::Validation { .. }));
    }

    #[test]
    fn missing_role_is_rejected() {
        assert!(parse("setup-roles", &[]).is_err());
        assert!(parse("nope", &[]).is_err());
    }

    #[test]
    fn only_leaderboard_is_open_to_everyone() {
        let open: Vec<String> = definitions()
            .iter()
            .map(|d| serde_json::to_value(d).unwrap())
            .filter(|json| json.get("default_member_permissions").is_none_or(|p| p.is_null()))
            .map(|json| json["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(open, ["leaderboard"]);
    }
}
