//! # Slash Commands (/)
//!
//! Slash command definitions and registration plus option helpers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod todo;
pub mod todoset;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();
    commands.extend(todo::create_commands());
    commands.extend(todoset::create_commands());
    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// The invoked subcommand and its options, if any.
pub fn subcommand(
    command: &ApplicationCommandInteraction,
) -> Option<(&str, &[CommandDataOption])> {
    command
        .data
        .options
        .first()
        .map(|sub| (sub.name.as_str(), sub.options.as_slice()))
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Utility function to get boolean option from slash command
pub fn get_bool_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}

/// Utility function to get a user option's ID from slash command
pub fn get_user_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(value: serde_json::Value) -> Vec<CommandDataOption> {
        vec![serde_json::from_value(value).unwrap()]
    }

    #[test]
    fn test_create_slash_commands() {
        let commands = create_slash_commands();
        assert_eq!(commands.len(), 2);

        let command_names: Vec<String> = commands
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect();

        assert!(command_names.contains(&"todo".to_string()));
        assert!(command_names.contains(&"todoset".to_string()));
    }

    #[test]
    fn test_get_string_option() {
        let options = option(json!({"name": "note", "value": "buy milk", "type": 3}));
        assert_eq!(get_string_option(&options, "note"), Some("buy milk".to_string()));
        assert_eq!(get_string_option(&options, "list"), None);
    }

    #[test]
    fn test_get_integer_option() {
        let options = option(json!({"name": "id", "value": 3, "type": 4}));
        assert_eq!(get_integer_option(&options, "id"), Some(3));
        assert_eq!(get_integer_option(&options, "count"), None);
    }

    #[test]
    fn test_get_bool_option() {
        let options = option(json!({"name": "confirm", "value": true, "type": 5}));
        assert_eq!(get_bool_option(&options, "confirm"), Some(true));
        assert_eq!(get_bool_option(&options, "other"), None);
    }

    #[test]
    fn test_get_user_option() {
        let options = option(json!({"name": "user", "value": "200130104922800128", "type": 6}));
        assert_eq!(get_user_option(&options, "user"), Some(200130104922800128));
        assert_eq!(get_user_option(&options, "member"), None);
    }
}
