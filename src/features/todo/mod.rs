//! # Todo Feature
//!
//! Per-user, per-list todo item storage: capacity enforcement, smallest-free
//! ID assignment, and list/item lifecycle on top of the bot database.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Attachable jump links for slash-command replies
//! - 1.0.0: Initial release with store and settings

pub mod store;

pub use store::{
    GlobalSettings, GuildSettings, ItemKey, SortOrder, TodoError, TodoItem, TodoStore,
    DEFAULT_LIST, DEFAULT_MAX_ITEMS, MAX_TEXT_LENGTH,
};
