//! # Features Layer
//!
//! Feature modules for the jotter bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add me_too broadcast windows
//! - 1.0.0: Initial creation with the todo store

pub mod me_too;
pub mod todo;

// Re-export the main feature types
pub use me_too::{ClaimOutcome, MeTooCoordinator, MeTooPayload, WindowHandle, ME_TOO_EMOJI};
pub use todo::{
    GlobalSettings, GuildSettings, ItemKey, SortOrder, TodoError, TodoItem, TodoStore,
    DEFAULT_LIST,
};
