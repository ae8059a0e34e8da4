use anyhow::{Context as _, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serenity::builder::CreateComponents;
use serenity::http::Http;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::UserId;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::core::{chunk_for_message, ReminderError};
use crate::features::reminders::{NotificationItem, Notifier, ReminderId, ReminderService};

/// Custom id prefix for acknowledgement buttons
const ACK_PREFIX: &str = "ack:";

/// Discord allows at most 5 action rows of 5 buttons each
const MAX_BUTTONS: usize = 25;
const BUTTONS_PER_ROW: usize = 5;

/// Button label text is capped so long reminders stay readable
const LABEL_TEXT_CHARS: usize = 20;

/// Build the custom id an acknowledgement button carries: `ack:<recipient>:<id>`
pub fn ack_custom_id(recipient_id: &str, id: ReminderId) -> String {
    format!("{ACK_PREFIX}{recipient_id}:{id}")
}

/// Parse an acknowledgement custom id back into `(recipient_id, reminder_id)`.
pub fn parse_ack_custom_id(custom_id: &str) -> Option<(&str, ReminderId)> {
    let rest = custom_id.strip_prefix(ACK_PREFIX)?;
    let (recipient_id, raw_id) = rest.rsplit_once(':')?;
    let id = raw_id.parse().ok()?;
    if recipient_id.is_empty() {
        return None;
    }
    Some((recipient_id, id))
}

/// One "Done" button per reminder, in rows of five.
///
/// Anything past the component cap gets no button; those reminders are still
/// listed in the text and remain acknowledgeable via `/done <number>`.
pub fn create_ack_buttons(recipient_id: &str, items: &[NotificationItem]) -> CreateComponents {
    let mut components = CreateComponents::default();
    for row_items in items.chunks(BUTTONS_PER_ROW).take(MAX_BUTTONS / BUTTONS_PER_ROW) {
        components.create_action_row(|row| {
            for item in row_items {
                let mut label_text: String = item.text.chars().take(LABEL_TEXT_CHARS).collect();
                if label_text.len() < item.text.len() {
                    label_text.push_str("...");
                }
                row.create_button(|button| {
                    button
                        .custom_id(ack_custom_id(recipient_id, item.id))
                        .label(format!("✅ Done: {label_text}"))
                        .style(ButtonStyle::Success)
                });
            }
            row
        });
    }
    components
}

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    service: ReminderService,
}

impl MessageComponentHandler {
    pub fn new(service: ReminderService) -> Self {
        Self { service }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        debug!(
            "Processing component interaction: {custom_id} from user: {}",
            interaction.user.id
        );

        match parse_ack_custom_id(custom_id) {
            Some((recipient_id, reminder_id)) => {
                self.handle_ack_button(ctx, interaction, recipient_id, reminder_id)
                    .await
            }
            None => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown component interaction.")
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }

    /// Acknowledge the reminder the clicked button carries and edit the
    /// notification in place.
    async fn handle_ack_button(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        recipient_id: &str,
        reminder_id: ReminderId,
    ) -> Result<()> {
        match self.service.acknowledge_by_id(recipient_id, reminder_id) {
            Ok(ack) => {
                info!(
                    "User {recipient_id} acknowledged reminder {reminder_id} via button \
                     ({} remaining)",
                    ack.remaining
                );
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!(
                                        "🎉 **Great job!**\n\n\
                                         ✅ Marked as done: \"{}\"\n\n\
                                         You have {} reminder(s) left.",
                                        ack.reminder.text, ack.remaining
                                    ))
                                    .components(|c| c) // Clear buttons
                            })
                    })
                    .await?;
                Ok(())
            }
            // Already gone or never this recipient's: answer the click,
            // nothing to change.
            Err(ReminderError::UnknownReminder { .. }) => {
                warn!("Acknowledgement for missing reminder {reminder_id} from {recipient_id}");
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content("That reminder is already gone - nothing to do.")
                                    .ephemeral(true)
                            })
                    })
                    .await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Delivers broadcast notifications as Discord DMs with per-reminder
/// acknowledgement buttons.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn render_content(items: &[NotificationItem]) -> String {
        let mut content = String::from("⏰ **REMINDER TIME!**\n\nYou still need to:\n\n");
        for (i, item) in items.iter().enumerate() {
            content.push_str(&format!("**{}.** {}\n", i + 1, item.text));
        }
        content.push_str("\n_Click a button when done, or use `/done <number>`_");
        content
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send_notification(
        &self,
        recipient_id: &str,
        items: &[NotificationItem],
    ) -> Result<()> {
        let user_id: u64 = recipient_id
            .parse()
            .with_context(|| format!("recipient id '{recipient_id}' is not a Discord user id"))?;

        let dm = UserId(user_id)
            .create_dm_channel(&self.http)
            .await
            .context("could not open DM channel")?;

        // A long list can exceed the message limit; buttons ride on the
        // final chunk so they sit under the complete list.
        let chunks = chunk_for_message(&Self::render_content(items));
        let last = chunks.len() - 1;
        for (i, chunk) in chunks.into_iter().enumerate() {
            dm.send_message(&self.http, |message| {
                message.content(chunk);
                if i == last {
                    message.set_components(create_ack_buttons(recipient_id, items));
                }
                message
            })
            .await
            .context("DM send failed")?;
        }

        Ok(())
    }
}
