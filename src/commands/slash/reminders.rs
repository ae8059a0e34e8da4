//! # Reminder Commands
//!
//! Definitions for /add, /list, /done, and /remove.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_command(),
        create_list_command(),
        create_done_command(),
        create_remove_command(),
    ]
}

fn create_add_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("add")
        .description("Add a reminder I'll nag you about every hour")
        .create_option(|option| {
            option
                .name("text")
                .description("What to remind you about")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(500)
        });
    command
}

fn create_list_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("list")
        .description("Show your active reminders");
    command
}

// Number options are plain strings; the ordinal parser owns the
// not-a-number reply.
fn create_done_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("done")
        .description("Mark a reminder as done")
        .create_option(|option| {
            option
                .name("number")
                .description("Reminder number from /list")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(20)
        });
    command
}

fn create_remove_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("remove")
        .description("Delete a reminder without completing it")
        .create_option(|option| {
            option
                .name("number")
                .description("Reminder number from /list")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(20)
        });
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reminder_commands() {
        let commands = create_commands();
        assert_eq!(commands.len(), 4);

        let names: Vec<&str> = commands
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["add", "list", "done", "remove"]);
    }

    #[test]
    fn test_add_requires_text_option() {
        let commands = create_commands();
        let add = &commands[0];
        let options = add.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].get("name").unwrap().as_str().unwrap(), "text");
        assert!(options[0].get("required").unwrap().as_bool().unwrap());
    }
}
