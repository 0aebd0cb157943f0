//! Todo list embed builders
//!
//! Shared embed construction for list output, including splitting a list
//! across several embeds when it would blow past Discord's per-embed limits.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with list/lists embeds and field splitting

use serenity::builder::CreateEmbed;

use crate::core::response::{truncate_for_field, EMBED_FIELD_COUNT, EMBED_TOTAL_LIMIT};
use crate::features::todo::TodoItem;

/// Accent color for all jotter embeds
pub const EMBED_COLOR: u32 = 0x3BA55D;

/// Build one or more embeds showing a todo list.
///
/// Each item becomes a field (`ID# n` / text plus source-message link). A new
/// embed is started whenever the current one would exceed Discord's 25-field
/// or 6000-character budget; the first embed carries the title and thumbnail,
/// continuations only the accent color.
pub fn todo_list_embeds(
    author_name: &str,
    avatar_url: &str,
    list_name: &str,
    items: &[TodoItem],
) -> Vec<CreateEmbed> {
    let title = format!("{author_name}'s Todo List ({list_name})");
    let mut embeds = Vec::new();
    let mut current = first_page(&title, avatar_url);
    let mut used = title.len();
    let mut fields = 0usize;

    for item in items {
        let name = format!("ID# {}", item.id);
        let mut value = item.text.clone();
        if let Some(link) = &item.jump_link {
            value.push_str(&format!("\n([original message]({link}))"));
        }
        let value = truncate_for_field(&value);

        let cost = name.len() + value.len();
        if fields == EMBED_FIELD_COUNT || used + cost > EMBED_TOTAL_LIMIT {
            embeds.push(current);
            current = continuation_page();
            used = 0;
            fields = 0;
        }
        current.field(name, value, false);
        used += cost;
        fields += 1;
    }

    embeds.push(current);
    embeds
}

/// Build the embed showing every list a user currently has.
pub fn todo_lists_embed(author_name: &str, avatar_url: &str, names: &[String]) -> CreateEmbed {
    let mut listing = String::new();
    for name in names {
        listing.push_str(&format!("• {name}\n"));
    }
    let mut embed = CreateEmbed::default();
    embed.title(format!("{author_name}'s Todo Lists"));
    embed.color(EMBED_COLOR);
    embed.thumbnail(avatar_url);
    embed.description(listing);
    embed
}

fn first_page(title: &str, avatar_url: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(title);
    embed.color(EMBED_COLOR);
    embed.thumbnail(avatar_url);
    embed
}

fn continuation_page() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.color(EMBED_COLOR);
    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, text: &str, link: Option<&str>) -> TodoItem {
        TodoItem {
            id,
            text: text.to_string(),
            jump_link: link.map(|l| l.to_string()),
        }
    }

    fn field_count(embed: &CreateEmbed) -> usize {
        embed
            .0
            .get("fields")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    }

    #[test]
    fn test_small_list_single_embed() {
        let items = vec![item(1, "buy milk", None), item(2, "buy eggs", None)];
        let embeds = todo_list_embeds("Sam", "https://example.com/a.png", "main", &items);
        assert_eq!(embeds.len(), 1);
        assert_eq!(field_count(&embeds[0]), 2);
    }

    #[test]
    fn test_link_rendered_in_field() {
        let items = vec![item(1, "buy milk", Some("https://discord.com/channels/1/2/3"))];
        let embeds = todo_list_embeds("A", "https://example.com/a.png", "main", &items);
        let fields = embeds[0].0.get("fields").unwrap().as_array().unwrap();
        let value = fields[0].get("value").unwrap().as_str().unwrap();
        assert!(value.contains("original message"));
        assert!(value.contains("https://discord.com/channels/1/2/3"));
    }

    #[test]
    fn test_splits_after_25_fields() {
        let items: Vec<TodoItem> = (1..=30).map(|i| item(i, "note", None)).collect();
        let embeds = todo_list_embeds("A", "https://example.com/a.png", "main", &items);
        assert_eq!(embeds.len(), 2);
        assert_eq!(field_count(&embeds[0]), 25);
        assert_eq!(field_count(&embeds[1]), 5);
    }

    #[test]
    fn test_splits_on_char_budget() {
        // 20 items of ~800 chars each cannot fit a 6000-char embed
        let long = "x".repeat(800);
        let items: Vec<TodoItem> = (1..=20).map(|i| item(i, &long, None)).collect();
        let embeds = todo_list_embeds("A", "https://example.com/a.png", "main", &items);
        assert!(embeds.len() > 1);
        for embed in &embeds {
            assert!(field_count(embed) <= EMBED_FIELD_COUNT);
        }
    }

    #[test]
    fn test_lists_embed_builds() {
        let names = vec!["main".to_string(), "groceries".to_string()];
        let embed = todo_lists_embed("A", "https://example.com/a.png", &names);
        let description = embed.0.get("description").unwrap().as_str().unwrap();
        assert!(description.contains("• main"));
        assert!(description.contains("• groceries"));
    }
}
