//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with todo and todoset handlers

pub mod todo;
pub mod todoset;

use anyhow::{anyhow, Result};
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::core::response::truncate_for_message;
use crate::features::todo::TodoError;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(todo::TodoHandler),
        Arc::new(todoset::TodoSetHandler),
    ]
}

/// Reply to an interaction with plain text.
pub(crate) async fn respond_text(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<()> {
    let content = truncate_for_message(content);
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content))
        })
        .await?;
    Ok(())
}

/// Reply to an interaction with one or more embeds: the first as the
/// response, the rest as followups.
pub(crate) async fn respond_embeds(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    embeds: Vec<CreateEmbed>,
) -> Result<()> {
    let mut embeds = embeds.into_iter();
    let Some(first) = embeds.next() else {
        return Ok(());
    };
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.set_embed(first))
        })
        .await?;
    for embed in embeds {
        command
            .create_followup_message(&serenity_ctx.http, |message| message.set_embed(embed))
            .await?;
    }
    Ok(())
}

/// Lift a store condition the current operation can never produce into an
/// error for the dispatcher.
pub(crate) fn unexpected(err: TodoError) -> anyhow::Error {
    match err {
        TodoError::Persistence(inner) => inner,
        other => anyhow!("unexpected store condition: {other}"),
    }
}

/// The too-many-items reply, pluralized the way users read it.
pub fn too_many_message(maximum: i64) -> String {
    let plural = if maximum == 1 { "todo item" } else { "todo items" };
    format!(
        "you have too many todo items! i can only keep track of {maximum} {plural} for you at a time."
    )
}

/// The missing-item reply for a given ID.
pub(crate) fn missing_item_message(item_id: i64) -> String {
    format!(
        "todo item with ID# **{item_id}** does not exist! check your todo list and verify you typed the correct ID #."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_all_handlers() {
        let handlers = create_all_handlers();
        assert_eq!(handlers.len(), 2);

        let names: Vec<&str> = handlers
            .iter()
            .flat_map(|h| h.command_names().iter().copied())
            .collect();
        assert!(names.contains(&"todo"));
        assert!(names.contains(&"todoset"));
    }

    #[test]
    fn test_too_many_message_pluralizes() {
        assert!(too_many_message(1).contains("1 todo item f"));
        assert!(too_many_message(20).contains("20 todo items"));
    }

    #[test]
    fn test_unexpected_keeps_persistence_cause() {
        let err = unexpected(TodoError::Persistence(anyhow!("disk gone")));
        assert!(err.to_string().contains("disk gone"));
    }
}
