//! Slash command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// Trait for slash command handlers
///
/// Each handler processes one or more slash commands and is dispatched by
/// name through the CommandRegistry.
///
/// # Example
///
/// ```ignore
/// pub struct HelpHandler;
///
/// #[async_trait]
/// impl SlashCommandHandler for HelpHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["help"]
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<CommandContext>,
///         serenity_ctx: &Context,
///         command: &ApplicationCommandInteraction,
///     ) -> Result<()> {
///         // Reply with usage text
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the slash command
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared command context with the reminder service
    /// * `serenity_ctx` - Serenity context for Discord API calls
    /// * `command` - The slash command interaction to handle
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}
