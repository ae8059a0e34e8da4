//! Help command handler

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::handlers::respond;

const HELP_TEXT: &str = "\
🔔 **Welcome to the Persistent Reminder Bot!**

I'll nag you at the top of every hour until you complete your tasks!

**Commands:**
• `/add <reminder>` - Add a new reminder
• `/list` - See all active reminders
• `/done <number>` - Mark a reminder as done
• `/remove <number>` - Delete a reminder
• `/help` - Show this help message

**Example:**
`/add Take my vitamins`
`/add Call mom`
`/add Drink water`

I'll keep reminding you every hour until you mark them done! 💪";

/// Handler for /help
pub struct HelpHandler;

#[async_trait]
impl SlashCommandHandler for HelpHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help"]
    }

    async fn handle(
        &self,
        _ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        respond(serenity_ctx, command, HELP_TEXT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_handler_commands() {
        assert_eq!(HelpHandler.command_names(), &["help"]);
    }

    #[test]
    fn test_help_text_mentions_every_command() {
        for cmd in ["/add", "/list", "/done", "/remove", "/help"] {
            assert!(HELP_TEXT.contains(cmd), "help text missing {cmd}");
        }
    }
}
