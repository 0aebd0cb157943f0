// Core layer - configuration, embeds, Discord limits
pub mod core;

// Features layer - todo store and me-too windows
pub mod features;

// Infrastructure - SQLite persistence
pub mod database;

// Application layer - slash command handling
pub mod commands;

// Re-export core config
pub use core::Config;

// Re-export feature items
pub use features::{
    // Me too
    ClaimOutcome, MeTooCoordinator, MeTooPayload, WindowHandle,
    // Todo store
    GlobalSettings, GuildSettings, ItemKey, SortOrder, TodoError, TodoItem, TodoStore,
};

// Re-export database handle
pub use database::Database;
