//! Application command registration over the Discord HTTP API.

use async_trait::async_trait;
use herald_commands::{CommandData, CommandKind, CommandOption, Error, OptionKind, RemoteRegistrar};
use herald_common::GuildId;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::http::Http;
use serenity::model::application::{Command, CommandOptionType, CommandType};
use std::sync::Arc;

/// [`RemoteRegistrar`] backed by serenity's HTTP client.
#[derive(Debug, Clone)]
pub struct SerenityRegistrar {
    http: Arc<Http>,
}

impl SerenityRegistrar {
    /// `http` must have the application id set.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

const fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Number => CommandOptionType::Number,
        OptionKind::Boolean => CommandOptionType::Boolean,
        OptionKind::User => CommandOptionType::User,
        OptionKind::Channel => CommandOptionType::Channel,
        OptionKind::Role => CommandOptionType::Role,
        OptionKind::Mentionable => CommandOptionType::Mentionable,
    }
}

fn build_option(option: &CommandOption) -> CreateCommandOption {
    let mut builder = CreateCommandOption::new(option_type(option.kind), &option.name, &option.description)
        .required(option.required)
        .set_autocomplete(option.autocomplete);

    if let Some(min) = option.min_value {
        builder = builder.min_number_value(min);
    }
    if let Some(max) = option.max_value {
        builder = builder.max_number_value(max);
    }

    for choice in &option.choices {
        builder = match option.kind {
            OptionKind::Integer => match choice.value.parse::<i32>() {
                Ok(value) => builder.add_int_choice(&choice.name, value),
                Err(_) => builder,
            },
            OptionKind::Number => match choice.value.parse::<f64>() {
                Ok(value) => builder.add_number_choice(&choice.name, value),
                Err(_) => builder,
            },
            _ => builder.add_string_choice(&choice.name, &choice.value),
        };
    }
    builder
}

/// Converts declaration data into a serenity command builder.
pub fn build_command(data: &CommandData) -> CreateCommand {
    let mut command = CreateCommand::new(&data.name);
    match data.kind {
        CommandKind::ChatInput => {
            command = command
                .kind(CommandType::ChatInput)
                .description(&data.description);
            for option in &data.options {
                command = command.add_option(build_option(option));
            }
        }
        CommandKind::User => command = command.kind(CommandType::User),
        CommandKind::Message => command = command.kind(CommandType::Message),
    }
    command
}

#[async_trait]
impl RemoteRegistrar for SerenityRegistrar {
    async fn set_global_commands(&self, commands: Vec<CommandData>) -> Result<usize, Error> {
        let builders = commands.iter().map(build_command).collect();
        let registered = Command::set_global_commands(&self.http, builders).await?;
        Ok(registered.len())
    }

    async fn set_guild_commands(
        &self,
        guild: GuildId,
        commands: Vec<CommandData>,
    ) -> Result<usize, Error> {
        let builders = commands.iter().map(build_command).collect();
        let registered = serenity::model::id::GuildId::new(guild.get())
            .set_commands(&self.http, builders)
            .await?;
        Ok(registered.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_commands::OptionChoice;

    fn json(command: CreateCommand) -> serde_json::Value {
        serde_json::to_value(command).unwrap()
    }

    #[test]
    fn test_chat_input_command() {
        let data = CommandData {
            name: "help".to_string(),
            description: "List commands".to_string(),
            options: vec![CommandOption {
                name: "command".to_string(),
                description: "Command to show".to_string(),
                autocomplete: true,
                ..CommandOption::default()
            }],
            ..CommandData::default()
        };

        let value = json(build_command(&data));
        assert_eq!(value["name"], "help");
        assert_eq!(value["description"], "List commands");
        assert_eq!(value["type"], 1);
        assert_eq!(value["options"][0]["autocomplete"], true);
        assert_eq!(value["options"][0]["type"], 3);
    }

    #[test]
    fn test_context_menu_has_no_description() {
        let data = CommandData {
            name: "Inspect".to_string(),
            description: "ignored".to_string(),
            kind: CommandKind::User,
            ..CommandData::default()
        };
        let value = json(build_command(&data));
        assert_eq!(value["type"], 2);
        assert!(value.get("description").map_or(true, |d| d.is_null() || d == ""));
    }

    #[test]
    fn test_choices_follow_option_type() {
        let option = CommandOption {
            name: "sides".to_string(),
            description: "Die size".to_string(),
            kind: OptionKind::Integer,
            choices: vec![
                OptionChoice {
                    name: "d6".to_string(),
                    value: "6".to_string(),
                },
                OptionChoice {
                    name: "bad".to_string(),
                    value: "six".to_string(),
                },
            ],
            ..CommandOption::default()
        };
        let value = serde_json::to_value(build_option(&option)).unwrap();
        assert_eq!(value["choices"].as_array().unwrap().len(), 1);
        assert!(value["choices"][0]["value"].is_i64());
        assert_eq!(value["choices"][0]["value"], 6);

        let option = CommandOption {
            kind: OptionKind::Number,
            choices: vec![OptionChoice {
                name: "half".to_string(),
                value: "0.5".to_string(),
            }],
            ..option
        };
        let value = serde_json::to_value(build_option(&option)).unwrap();
        assert_eq!(value["choices"][0]["value"], 0.5);
    }
}
