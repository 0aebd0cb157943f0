//! Todoset command handlers (admin)
//!
//! Handles: /todoset settings, metoo, max, purge
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::handlers::{respond_text, unexpected};
use crate::commands::slash::{get_integer_option, get_user_option, subcommand};

/// Handler for the /todoset command group
pub struct TodoSetHandler;

#[async_trait]
impl SlashCommandHandler for TodoSetHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["todoset"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match subcommand(command) {
            Some(("settings", _)) => self.handle_settings(&ctx, serenity_ctx, command).await,
            Some(("metoo", _)) => self.handle_metoo(&ctx, serenity_ctx, command).await,
            Some(("max", options)) => self.handle_max(&ctx, serenity_ctx, command, options).await,
            Some(("purge", options)) => {
                self.handle_purge(&ctx, serenity_ctx, command, options).await
            }
            _ => Ok(()),
        }
    }
}

impl TodoSetHandler {
    /// Handle /todoset settings - show current settings
    async fn handle_settings(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let mut output = String::from("**Server Settings**\n");
        match command.guild_id {
            Some(guild_id) => {
                let guild = ctx
                    .store
                    .guild_settings(&guild_id.to_string())
                    .await
                    .map_err(unexpected)?;
                output.push_str(&format!(
                    "Me too: {}\n",
                    if guild.me_too_enabled { "Enabled" } else { "Disabled" }
                ));
            }
            None => output.push_str("(not in a server)\n"),
        }

        if ctx.is_owner(command.user.id.0) {
            let settings = ctx.store.settings().await.map_err(unexpected)?;
            output.push_str(&format!(
                "\n**Global Settings**\nMaximum todo items per list: {}\n\n**Stats**\nTotal todo items ever: {}",
                settings.max_items_per_list, settings.total_items_created
            ));
        }

        respond_text(serenity_ctx, command, &output).await
    }

    /// Handle /todoset metoo - toggle the guild's me-too prompt
    async fn handle_metoo(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let Some(guild_id) = command.guild_id else {
            respond_text(serenity_ctx, command, "That can only be used in a server.").await?;
            return Ok(());
        };

        let guild = guild_id.to_string();
        let enabled = !ctx
            .store
            .guild_settings(&guild)
            .await
            .map_err(unexpected)?
            .me_too_enabled;
        ctx.store.set_me_too(&guild, enabled).await.map_err(unexpected)?;

        info!("Me-too toggled {} for guild {guild}", if enabled { "on" } else { "off" });
        respond_text(
            serenity_ctx,
            command,
            &format!(
                "✅ I will {} ask if others want to add an item to their todo lists.",
                if enabled { "now" } else { "no longer" }
            ),
        )
        .await
    }

    /// Handle /todoset max - set the global per-list capacity (owner)
    async fn handle_max(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> Result<()> {
        if !ctx.is_owner(command.user.id.0) {
            respond_text(
                serenity_ctx,
                command,
                "Only the bot owner can change the global maximum.",
            )
            .await?;
            return Ok(());
        }
        let Some(maximum) = get_integer_option(options, "maximum") else {
            respond_text(serenity_ctx, command, "No maximum was given!").await?;
            return Ok(());
        };

        ctx.store
            .set_max_items_per_list(maximum)
            .await
            .map_err(unexpected)?;
        let applied = ctx.store.max_items_per_list().await.map_err(unexpected)?;

        info!("Global per-list maximum set to {applied}");
        respond_text(
            serenity_ctx,
            command,
            &format!("✅ Maximum todo items per user list is now set to {applied}"),
        )
        .await
    }

    /// Handle /todoset purge - remove everything stored for a user (owner)
    async fn handle_purge(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> Result<()> {
        if !ctx.is_owner(command.user.id.0) {
            respond_text(
                serenity_ctx,
                command,
                "Only the bot owner can purge user data.",
            )
            .await?;
            return Ok(());
        }
        let Some(user_id) = get_user_option(options, "user") else {
            respond_text(serenity_ctx, command, "No user was given!").await?;
            return Ok(());
        };

        let removed = ctx
            .store
            .delete_all_for_user(&user_id.to_string())
            .await
            .map_err(unexpected)?;
        respond_text(
            serenity_ctx,
            command,
            &format!("✅ Removed {removed} todo item(s) stored for <@{user_id}>."),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todoset_handler_commands() {
        let handler = TodoSetHandler;
        assert_eq!(handler.command_names(), &["todoset"]);
    }
}
