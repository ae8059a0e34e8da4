//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial extraction with RemindersHandler and HelpHandler

pub mod help;
pub mod reminders;

use std::sync::Arc;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
///
/// Returns a vector of handlers ready to be registered with CommandRegistry.
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(reminders::RemindersHandler),
        Arc::new(help::HelpHandler),
    ]
}

/// Reply to a slash command with plain message content.
pub(crate) async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| msg.content(content))
        })
        .await?;
    Ok(())
}
