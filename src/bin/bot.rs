use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::{Reaction, ReactionType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use jotter::commands::handlers::{create_all_handlers, too_many_message};
use jotter::commands::{register_global_commands, register_guild_commands, CommandContext, CommandRegistry};
use jotter::core::Config;
use jotter::database::Database;
use jotter::features::me_too::{ClaimOutcome, MeTooCoordinator, WindowHandle, ME_TOO_EMOJI};
use jotter::features::todo::TodoStore;

struct Handler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let result = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(err) = result {
            error!("Failed to register slash commands: {err:#}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            let name = command.data.name.clone();
            debug!("Received /{name} from user {}", command.user.id);

            match self
                .registry
                .dispatch(Arc::clone(&self.context), &ctx, &command)
                .await
            {
                Ok(true) => {}
                Ok(false) => warn!("No handler registered for /{name}"),
                Err(err) => {
                    error!("Command /{name} failed: {err:#}");
                    let _ = command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(
                                        "Something went wrong, please try again in a moment.",
                                    )
                                })
                        })
                        .await;
                }
            }
        }
    }

    /// Watches for notepad reactions on me-too prompts.
    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        if !matches!(&reaction.emoji, ReactionType::Unicode(emoji) if emoji == ME_TOO_EMOJI) {
            return;
        }
        let Some(guild_id) = reaction.guild_id else {
            return;
        };
        let Some(user_id) = reaction.user_id else {
            return;
        };
        if user_id == ctx.cache.current_user_id() {
            return;
        }

        let me_too_enabled = match self
            .context
            .store
            .guild_settings(&guild_id.to_string())
            .await
        {
            Ok(settings) => settings.me_too_enabled,
            Err(err) => {
                warn!("Could not read settings for guild {guild_id}: {err}");
                false
            }
        };
        if !me_too_enabled {
            return;
        }

        let user = match user_id.to_user(&ctx).await {
            Ok(user) => user,
            Err(err) => {
                warn!("Could not resolve reacting user {user_id}: {err}");
                return;
            }
        };
        if user.bot {
            return;
        }

        let handle = WindowHandle(reaction.message_id.0);
        match self.context.me_too.claim(handle, &user_id.to_string()).await {
            Ok(ClaimOutcome::Added(item)) => {
                info!("User {user_id} claimed me-too item {} via {handle:?}", item.id);
                let dm = user
                    .dm(&ctx, |message| {
                        message.content(
                            "hey! just letting you know i've added that to your todo list.",
                        )
                    })
                    .await;
                if let Err(err) = dm {
                    debug!("Could not DM user {user_id}: {err}");
                }
            }
            Ok(ClaimOutcome::TooMany { maximum }) => {
                let dm = user
                    .dm(&ctx, |message| message.content(too_many_message(maximum)))
                    .await;
                if let Err(err) = dm {
                    debug!("Could not DM user {user_id}: {err}");
                }
            }
            // A repeat click or a lapsed window needs no reply
            Ok(ClaimOutcome::AlreadyClaimed) | Ok(ClaimOutcome::WindowExpired) => {}
            Err(err) => error!("Me-too claim on {handle:?} failed: {err:#}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting jotter todo bot...");

    let database = Database::new(&config.database_path).await?;
    let store = TodoStore::new(database);
    store.initialize().await?;

    let me_too = MeTooCoordinator::new(store.clone());
    let context = Arc::new(CommandContext::new(store, me_too, config.owner_id));
    let registry = CommandRegistry::with_handlers(create_all_handlers());

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        registry,
        context,
        guild_id,
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
