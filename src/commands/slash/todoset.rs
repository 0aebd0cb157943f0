//! Todoset slash command (admin): /todoset settings|metoo|max|purge

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::permissions::Permissions;

/// Creates the todoset command group
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_todoset_command()]
}

fn create_todoset_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("todoset")
        .description("Manage todo settings (Admin)")
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .create_option(|option| {
            option
                .name("settings")
                .description("Display current settings")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("metoo")
                .description("Toggle asking if others want to add an item to their todo lists")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("max")
                .description("Set the global maximum of todo items per list (Owner)")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("maximum")
                        .description("Maximum number of items per (user, list) pair")
                        .kind(CommandOptionType::Integer)
                        .min_int_value(0)
                        .required(true)
                })
        })
        .create_option(|option| {
            option
                .name("purge")
                .description("Remove every todo item stored for a user (Owner)")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("user")
                        .description("The user whose data to remove")
                        .kind(CommandOptionType::User)
                        .required(true)
                })
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todoset_command_shape() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let command = &commands[0];
        assert_eq!(command.0.get("name").unwrap().as_str().unwrap(), "todoset");

        let subcommands: Vec<String> = command
            .0
            .get("options")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.get("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(subcommands, vec!["settings", "metoo", "max", "purge"]);
    }

    #[test]
    fn test_todoset_requires_manage_guild() {
        let command = &create_commands()[0];
        assert!(command.0.contains_key("default_member_permissions"));
    }
}
