//! Todo command handlers
//!
//! Handles: /todo add, list, lists, edit, remove
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::channel::ReactionType;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::handlers::{
    missing_item_message, respond_embeds, respond_text, too_many_message, unexpected,
};
use crate::commands::slash::{get_bool_option, get_string_option, get_integer_option, subcommand};
use crate::core::embeds::todo_list_embeds;
use crate::core::embeds::todo_lists_embed;
use crate::features::me_too::{MeTooPayload, ME_TOO_EMOJI, WINDOW_SECONDS};
use crate::features::todo::{ItemKey, SortOrder, TodoError, DEFAULT_LIST};

/// Handler for the /todo command group
pub struct TodoHandler;

#[async_trait]
impl SlashCommandHandler for TodoHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["todo"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match subcommand(command) {
            Some(("add", options)) => self.handle_add(&ctx, serenity_ctx, command, options).await,
            Some(("list", options)) => self.handle_list(&ctx, serenity_ctx, command, options).await,
            Some(("lists", _)) => self.handle_lists(&ctx, serenity_ctx, command).await,
            Some(("edit", options)) => self.handle_edit(&ctx, serenity_ctx, command, options).await,
            Some(("remove", options)) => {
                self.handle_remove(&ctx, serenity_ctx, command, options).await
            }
            _ => Ok(()),
        }
    }
}

/// What a `/todo remove` index refers to.
#[derive(Debug, PartialEq, Eq)]
enum RemoveTarget {
    All,
    Last,
    Id(i64),
}

fn parse_remove_target(index: &str) -> Option<RemoveTarget> {
    match index.trim() {
        "all" => Some(RemoveTarget::All),
        "last" => Some(RemoveTarget::Last),
        other => other
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(RemoveTarget::Id),
    }
}

impl TodoHandler {
    /// Handle /todo add - create a new item, then maybe open a me-too window
    async fn handle_add(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let note = get_string_option(options, "note").unwrap_or_default();
        let list = get_string_option(options, "list").unwrap_or_else(|| DEFAULT_LIST.to_string());

        let item = match ctx.store.create_item(&user_id, &list, &note, None).await {
            Ok(item) => item,
            Err(TodoError::EmptyText) => {
                respond_text(serenity_ctx, command, "No text was given!").await?;
                return Ok(());
            }
            Err(TodoError::TooLong) => {
                respond_text(serenity_ctx, command, "your todo text is too long.").await?;
                return Ok(());
            }
            Err(TodoError::TooMany { maximum }) => {
                respond_text(serenity_ctx, command, &too_many_message(maximum)).await?;
                return Ok(());
            }
            Err(err) => return Err(unexpected(err)),
        };

        info!("User {user_id} added item {} to `{list}`", item.id);
        respond_text(
            serenity_ctx,
            command,
            &format!(
                "Successfully added to your todo list. (ID# **{}** in `{list}`)",
                item.id
            ),
        )
        .await?;

        // Tie the item back to the confirmation message it came from
        let mut jump_link = None;
        match command.get_interaction_response(&serenity_ctx.http).await {
            Ok(reply) => {
                let link = reply.link();
                let key = ItemKey::new(user_id.clone(), list.clone(), item.id);
                match ctx.store.attach_jump_link(&key, &link).await {
                    Ok(()) => jump_link = Some(link),
                    Err(err) => debug!("Could not attach jump link: {err}"),
                }
            }
            Err(err) => debug!("Could not fetch interaction response: {err}"),
        }

        // Me-too prompt: guild creations into the main list only
        let Some(guild_id) = command.guild_id else {
            return Ok(());
        };
        if list != DEFAULT_LIST {
            return Ok(());
        }
        let me_too_enabled = match ctx.store.guild_settings(&guild_id.to_string()).await {
            Ok(settings) => settings.me_too_enabled,
            Err(err) => {
                warn!("Could not read settings for guild {guild_id}: {err}");
                false
            }
        };
        if !me_too_enabled {
            return Ok(());
        }

        let prompt = command
            .channel_id
            .send_message(&serenity_ctx.http, |message| {
                message.content(
                    "If anyone else would like to add this to their todo lists, click the notepad!",
                )
            })
            .await?;
        if let Err(err) = prompt
            .react(serenity_ctx, ReactionType::Unicode(ME_TOO_EMOJI.to_string()))
            .await
        {
            warn!("Could not seed me-too reaction: {err}");
        }

        let handle = ctx.me_too.open_window(
            prompt.id.0,
            &user_id,
            MeTooPayload {
                text: item.text.clone(),
                jump_link,
            },
        );

        // Take the prompt down once the window has lapsed
        let me_too = ctx.me_too.clone();
        let http = serenity_ctx.http.clone();
        let channel_id = prompt.channel_id;
        let prompt_id = prompt.id;
        tokio::spawn(async move {
            sleep(Duration::from_secs(WINDOW_SECONDS)).await;
            me_too.close_window(handle);
            if let Err(err) = channel_id.delete_message(&http, prompt_id).await {
                debug!("Could not delete me-too prompt {prompt_id}: {err}");
            }
        });

        Ok(())
    }

    /// Handle /todo list - show one list as embeds
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let list = get_string_option(options, "list").unwrap_or_else(|| DEFAULT_LIST.to_string());
        let sort = match get_string_option(options, "sort") {
            Some(name) => match SortOrder::parse(&name) {
                Some(order) => order,
                None => {
                    respond_text(
                        serenity_ctx,
                        command,
                        "that is not a valid sorting option. choose from `id` (default) or `added`.",
                    )
                    .await?;
                    return Ok(());
                }
            },
            None => SortOrder::default(),
        };

        let items = ctx
            .store
            .list_items(&user_id, &list, sort)
            .await
            .map_err(unexpected)?;
        if items.is_empty() {
            respond_text(
                serenity_ctx,
                command,
                "You haven't added anything to that todo list!",
            )
            .await?;
            return Ok(());
        }

        let embeds = todo_list_embeds(&command.user.name, &command.user.face(), &list, &items);
        respond_embeds(serenity_ctx, command, embeds).await
    }

    /// Handle /todo lists - show every list the user has
    async fn handle_lists(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let names = ctx.store.list_names(&user_id).await.map_err(unexpected)?;
        if names.is_empty() {
            respond_text(serenity_ctx, command, "You don't have any todo lists yet!").await?;
            return Ok(());
        }

        let embed = todo_lists_embed(&command.user.name, &command.user.face(), &names);
        respond_embeds(serenity_ctx, command, vec![embed]).await
    }

    /// Handle /todo edit - replace an item's text
    async fn handle_edit(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let Some(item_id) = get_integer_option(options, "id") else {
            respond_text(serenity_ctx, command, "No item ID was given!").await?;
            return Ok(());
        };
        let text = get_string_option(options, "text").unwrap_or_default();
        let list = get_string_option(options, "list").unwrap_or_else(|| DEFAULT_LIST.to_string());

        let key = ItemKey::new(user_id, list, item_id);
        match ctx.store.edit_text(&key, &text).await {
            Ok(()) => {
                respond_text(
                    serenity_ctx,
                    command,
                    &format!("todo item with ID# **{item_id}** has been edited successfully."),
                )
                .await
            }
            Err(TodoError::NotFound) => {
                respond_text(serenity_ctx, command, &missing_item_message(item_id)).await
            }
            Err(TodoError::TooLong) => {
                respond_text(serenity_ctx, command, "your todo text is too long.").await
            }
            Err(err) => Err(unexpected(err)),
        }
    }

    /// Handle /todo remove - delete one item, the newest item, or a whole list
    async fn handle_remove(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let index = get_string_option(options, "index").unwrap_or_default();
        let list = get_string_option(options, "list").unwrap_or_else(|| DEFAULT_LIST.to_string());

        match parse_remove_target(&index) {
            None => {
                respond_text(
                    serenity_ctx,
                    command,
                    "`index` must be a todo item's ID, `last`, or `all`.",
                )
                .await
            }
            Some(RemoveTarget::All) => {
                if !get_bool_option(options, "confirm").unwrap_or(false) {
                    respond_text(
                        serenity_ctx,
                        command,
                        &format!(
                            "this will delete the whole `{list}` todo list! run the command again with `confirm: True` if you're sure."
                        ),
                    )
                    .await?;
                    return Ok(());
                }
                match ctx.store.delete_list(&user_id, &list).await {
                    Ok(removed) => {
                        info!("User {user_id} deleted list `{list}` ({removed} items)");
                        respond_text(
                            serenity_ctx,
                            command,
                            &format!("todo list `{list}` has been deleted"),
                        )
                        .await
                    }
                    Err(TodoError::NotFound) => {
                        respond_text(
                            serenity_ctx,
                            command,
                            "that todo list doesn't exist! remember that names are case-sensitive!",
                        )
                        .await
                    }
                    Err(err) => Err(unexpected(err)),
                }
            }
            Some(RemoveTarget::Last) => match ctx.store.delete_last(&user_id, &list).await {
                Ok(item) => {
                    respond_text(
                        serenity_ctx,
                        command,
                        &format!(
                            "your most recently created todo item (ID# **{}**) in `{list}` has been removed.",
                            item.id
                        ),
                    )
                    .await
                }
                Err(TodoError::NotFound) => {
                    respond_text(
                        serenity_ctx,
                        command,
                        "you don't have anything in that todo list!",
                    )
                    .await
                }
                Err(err) => Err(unexpected(err)),
            },
            Some(RemoveTarget::Id(item_id)) => {
                let key = ItemKey::new(user_id, list, item_id);
                match ctx.store.delete_item(&key).await {
                    Ok(_) => {
                        respond_text(
                            serenity_ctx,
                            command,
                            &format!("todo item with ID# **{item_id}** has been removed."),
                        )
                        .await
                    }
                    Err(TodoError::NotFound) => {
                        respond_text(serenity_ctx, command, &missing_item_message(item_id)).await
                    }
                    Err(err) => Err(unexpected(err)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_handler_commands() {
        let handler = TodoHandler;
        assert_eq!(handler.command_names(), &["todo"]);
    }

    #[test]
    fn test_parse_remove_target() {
        assert_eq!(parse_remove_target("all"), Some(RemoveTarget::All));
        assert_eq!(parse_remove_target("last"), Some(RemoveTarget::Last));
        assert_eq!(parse_remove_target("3"), Some(RemoveTarget::Id(3)));
        assert_eq!(parse_remove_target(" 12 "), Some(RemoveTarget::Id(12)));
        assert_eq!(parse_remove_target("0"), None);
        assert_eq!(parse_remove_target("-1"), None);
        assert_eq!(parse_remove_target("soon"), None);
        assert_eq!(parse_remove_target(""), None);
    }
}
