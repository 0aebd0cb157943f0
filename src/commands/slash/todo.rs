//! Todo slash command: /todo add|list|lists|edit|remove

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates the todo command group
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_todo_command()]
}

fn create_todo_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("todo")
        .description("Manage your todo lists")
        .create_option(|option| {
            option
                .name("add")
                .description("Add an item to a todo list")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("note")
                        .description("The text of the todo item")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|sub| {
                    sub.name("list")
                        .description("Target list (defaults to main)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
        })
        .create_option(|option| {
            option
                .name("list")
                .description("Show a todo list")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("list")
                        .description("List to show (defaults to main)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
                .create_sub_option(|sub| {
                    sub.name("sort")
                        .description("Item order")
                        .kind(CommandOptionType::String)
                        .required(false)
                        .add_string_choice("id - Sort by item ID (default)", "id")
                        .add_string_choice("added - Sort by time added", "added")
                })
        })
        .create_option(|option| {
            option
                .name("lists")
                .description("Show your todo lists")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("edit")
                .description("Modify the text of an existing todo item")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("id")
                        .description("The todo item's ID")
                        .kind(CommandOptionType::Integer)
                        .min_int_value(1)
                        .required(true)
                })
                .create_sub_option(|sub| {
                    sub.name("text")
                        .description("The new text")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|sub| {
                    sub.name("list")
                        .description("List holding the item (defaults to main)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
        })
        .create_option(|option| {
            option
                .name("remove")
                .description("Delete a todo item")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("index")
                        .description("An item ID, `last` for the newest item, or `all` for the whole list")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|sub| {
                    sub.name("list")
                        .description("List holding the item (defaults to main)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
                .create_sub_option(|sub| {
                    sub.name("confirm")
                        .description("Required to delete a whole list")
                        .kind(CommandOptionType::Boolean)
                        .required(false)
                })
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_command_shape() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let command = &commands[0];
        assert_eq!(command.0.get("name").unwrap().as_str().unwrap(), "todo");

        let subcommands: Vec<String> = command
            .0
            .get("options")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.get("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(subcommands, vec!["add", "list", "lists", "edit", "remove"]);
    }
}
