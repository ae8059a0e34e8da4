//! Reminder command handlers
//!
//! Handles: add, list, done, remove
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::handlers::respond;
use crate::commands::slash::get_string_option;
use crate::core::{truncate_for_message, ReminderError};
use crate::features::reminders::parse_ordinal;

/// Handler for the reminder lifecycle commands
pub struct RemindersHandler;

#[async_trait]
impl SlashCommandHandler for RemindersHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add", "list", "done", "remove"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "add" => self.handle_add(&ctx, serenity_ctx, command).await,
            "list" => self.handle_list(&ctx, serenity_ctx, command).await,
            "done" => self.handle_done(&ctx, serenity_ctx, command).await,
            "remove" => self.handle_remove(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl RemindersHandler {
    /// Handle /add - create a new reminder
    async fn handle_add(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let text = get_string_option(&command.data.options, "text").unwrap_or_default();

        match ctx.service.add_reminder(&user_id, &text) {
            Ok(added) => {
                info!(
                    "Added reminder {} for user {user_id} ({} active)",
                    added.id, added.active_count
                );
                let reply = format!(
                    "✅ **Reminder added!**\n\n\
                     📝 \"{}\"\n\n\
                     I'll remind you at the top of every hour until you mark it done.\n\
                     You have {} active reminder(s).",
                    added.reminder.text, added.active_count
                );
                respond(serenity_ctx, command, truncate_for_message(&reply)).await
            }
            Err(e) => self.reply_user_error(serenity_ctx, command, e).await,
        }
    }

    /// Handle /list - show the active view
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let entries = ctx.service.list_active(&user_id);
        debug!("Listing {} active reminder(s) for user {user_id}", entries.len());

        if entries.is_empty() {
            return respond(
                serenity_ctx,
                command,
                "📭 You have no active reminders!\n\nUse `/add` to create one.",
            )
            .await;
        }

        let mut message = String::from("📋 **Your Active Reminders:**\n\n");
        for entry in &entries {
            message.push_str(&format!("**{}.** {}\n", entry.ordinal, entry.reminder.text));
        }
        message.push_str("\n_Use `/done <number>` to mark one complete._");

        respond(serenity_ctx, command, truncate_for_message(&message)).await
    }

    /// Handle /done - acknowledge by ordinal
    async fn handle_done(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let raw = get_string_option(&command.data.options, "number").unwrap_or_default();

        let outcome = parse_ordinal(&raw)
            .and_then(|ordinal| ctx.service.acknowledge_by_ordinal(&user_id, ordinal));
        match outcome {
            Ok(ack) => {
                info!(
                    "User {user_id} completed a reminder ({} remaining)",
                    ack.remaining
                );
                let reply = format!(
                    "🎉 **Great job!**\n\n\
                     ✅ Marked as done: \"{}\"\n\n\
                     You have {} reminder(s) left.",
                    ack.reminder.text, ack.remaining
                );
                respond(serenity_ctx, command, truncate_for_message(&reply)).await
            }
            Err(e) => self.reply_user_error(serenity_ctx, command, e).await,
        }
    }

    /// Handle /remove - delete by ordinal
    async fn handle_remove(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let raw = get_string_option(&command.data.options, "number").unwrap_or_default();

        let outcome = parse_ordinal(&raw)
            .and_then(|ordinal| ctx.service.remove_by_ordinal(&user_id, ordinal));
        match outcome {
            Ok(removed) => {
                info!("User {user_id} removed a reminder");
                let reply = format!("🗑️ Removed: \"{}\"", removed.text);
                respond(serenity_ctx, command, truncate_for_message(&reply)).await
            }
            Err(e) => self.reply_user_error(serenity_ctx, command, e).await,
        }
    }

    /// Turn a user-recoverable error into a corrective reply; anything else
    /// propagates so the gateway layer reports a generic failure.
    async fn reply_user_error(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        err: ReminderError,
    ) -> Result<()> {
        let reply = match err {
            ReminderError::EmptyText => {
                "❌ Please provide a reminder text!\n\nExample: `/add Take my medicine`".to_string()
            }
            ReminderError::InvalidOrdinal { .. } => "❌ Please provide a valid number!".to_string(),
            ReminderError::OrdinalOutOfRange { count, .. } => format!(
                "❌ Invalid reminder number! You have {count} active reminder(s)."
            ),
            ReminderError::UnknownReminder { .. } => {
                "❌ That reminder doesn't exist anymore.".to_string()
            }
            other => return Err(other.into()),
        };
        respond(serenity_ctx, command, reply).await
    }
}
