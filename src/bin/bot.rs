use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use nagbot::command_handler::CommandHandler;
use nagbot::commands::{register_global_commands, register_guild_commands};
use nagbot::core::Config;
use nagbot::features::reminders::{BroadcastScheduler, ReminderService, ReminderStore};
use nagbot::message_components::{DiscordNotifier, MessageComponentHandler};

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: Arc<MessageComponentHandler>,
    guild_id: Option<GuildId>,
}

impl Handler {
    fn new(
        command_handler: CommandHandler,
        component_handler: MessageComponentHandler,
        guild_id: Option<GuildId>,
    ) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            component_handler: Arc::new(component_handler),
            guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("🤖 Bot ID: {}", ready.user.id);

        // Guild commands for development (instant), global for production
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Development mode: Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Production mode: Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {}",
                        command.data.name, e
                    );
                    let _ = command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(serenity::model::application::interaction::InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(
                                        "❌ Sorry, I encountered an error processing your command. Please try again.",
                                    )
                                })
                        })
                        .await;
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {}",
                        component.data.custom_id, e
                    );
                    let _ = component
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(serenity::model::application::interaction::InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(
                                        "❌ Sorry, I encountered an error processing your click. Please try again.",
                                    )
                                })
                        })
                        .await;
                }
            }
            _ => {}
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

    info!("🚀 Starting Persistent Reminder Bot...");
    info!(
        "⏰ Reminder interval: {} minutes",
        config.broadcast_interval_minutes
    );

    // Durable state is loaded once and shared for the process lifetime
    let store = ReminderStore::new(&config.data_file);
    let service = ReminderService::load(store).map_err(|e| {
        error!("Failed to load reminder data from {}: {e}", config.data_file);
        anyhow::anyhow!("could not load reminder store: {}", e)
    })?;

    let command_handler = CommandHandler::new(service.clone());
    let component_handler = MessageComponentHandler::new(service.clone());

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler::new(command_handler, component_handler, guild_id);

    let intents = GatewayIntents::GUILDS | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    // Start the broadcast scheduler; the shutdown sender lives until main
    // returns, keeping the loop alive for the process lifetime.
    let scheduler = BroadcastScheduler::new(service, config.broadcast_interval_minutes);
    let notifier = Arc::new(DiscordNotifier::new(client.cache_and_http.http.clone()));
    let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(scheduler.run(notifier, shutdown_rx));

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
