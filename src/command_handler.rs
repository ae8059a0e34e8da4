//! Slash command dispatch
//!
//! Owns the shared [`CommandContext`] and the [`CommandRegistry`], and routes
//! each incoming interaction to its registered handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial registry-based dispatch

use anyhow::Result;
use log::{debug, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::handlers::create_all_handlers;
use crate::commands::{CommandContext, CommandRegistry};
use crate::features::reminders::ReminderService;

/// Entry point for all slash command interactions.
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(service: ReminderService) -> Self {
        let context = Arc::new(CommandContext::new(service));
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        CommandHandler { context, registry }
    }

    /// Dispatch a slash command to its handler.
    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = command.data.name.as_str();
        debug!(
            "Processing slash command '{name}' from user {}",
            command.user.id
        );

        match self.registry.get(name) {
            Some(handler) => handler.handle(Arc::clone(&self.context), ctx, command).await,
            None => {
                warn!("No handler registered for command '{name}'");
                command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|msg| {
                                msg.content("❓ Unknown command. Try `/help`.")
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }
}
