//! Slash command handler trait and dispatch registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::collections::HashMap;
use std::sync::Arc;

use super::context::CommandContext;

/// One unit of command handling.
///
/// A handler owns one top-level slash command (or several that share
/// logic) and is looked up by name when an interaction arrives.
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Top-level command name(s) this handler answers to.
    fn command_names(&self) -> &'static [&'static str];

    /// Process one slash command interaction.
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}

/// Name-to-handler dispatch table.
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    /// Build a registry from a set of handlers, indexing each under every
    /// name it declares.
    pub fn with_handlers(all: Vec<Arc<dyn SlashCommandHandler>>) -> Self {
        let mut handlers = HashMap::new();
        for handler in all {
            for name in handler.command_names() {
                handlers.insert(*name, Arc::clone(&handler));
            }
        }
        CommandRegistry { handlers }
    }

    /// Route one interaction to its handler.
    ///
    /// Returns false when no handler is registered under the command name.
    pub async fn dispatch(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<bool> {
        match self.handlers.get(command.data.name.as_str()) {
            Some(handler) => {
                handler.handle(ctx, serenity_ctx, command).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names (not unique handlers).
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
