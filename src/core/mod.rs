//! # Core Module
//!
//! Core configuration, embed building, and Discord limit handling for the
//! jotter bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config, embeds, and response modules

pub mod config;
pub mod embeds;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use embeds::{todo_list_embeds, todo_lists_embed, EMBED_COLOR};
pub use response::{
    truncate_for_field, truncate_for_message, truncate_to, EMBED_FIELD_COUNT, EMBED_TOTAL_LIMIT,
    FIELD_LIMIT, MESSAGE_LIMIT,
};
