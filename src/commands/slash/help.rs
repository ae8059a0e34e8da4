//! /help command definition

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    let mut command = CreateApplicationCommand::default();
    command
        .name("help")
        .description("How the persistent reminder bot works");
    vec![command]
}
