//! Todo store: item CRUD with capacity enforcement and ID assignment.

use log::{debug, info};
use std::fmt;

use crate::database::{Database, InsertOutcome};

/// List used when the user doesn't name one.
pub const DEFAULT_LIST: &str = "main";
/// Upper bound on item text, in characters.
pub const MAX_TEXT_LENGTH: usize = 800;
/// Default per-(user, list) capacity.
pub const DEFAULT_MAX_ITEMS: i64 = 20;

const SCHEMA_VERSION: i64 = 1;

const KEY_SCHEMA_VERSION: &str = "schema_version";
const KEY_TOTAL: &str = "total";
const KEY_MAX_ITEMS: &str = "max_user_items";

/// A single stored todo item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoItem {
    /// Positive integer, unique within its (user, list) pair.
    pub id: i64,
    pub text: String,
    /// Link to the originating message; immutable once set.
    pub jump_link: Option<String>,
}

/// Composite identity of a todo item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub user_id: String,
    pub list_name: String,
    pub item_id: i64,
}

impl ItemKey {
    pub fn new(user_id: impl Into<String>, list_name: impl Into<String>, item_id: i64) -> Self {
        ItemKey {
            user_id: user_id.into(),
            list_name: list_name.into(),
            item_id,
        }
    }
}

/// Listing order for a todo list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending item ID (the default shown to users).
    #[default]
    ById,
    /// The order items were added, which can differ from ID order once
    /// deleted IDs have been reused.
    ByInsertion,
}

impl SortOrder {
    /// Parse the user-facing sort names (`id`, `added`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(SortOrder::ById),
            "added" => Some(SortOrder::ByInsertion),
            _ => None,
        }
    }
}

/// Snapshot of the global settings and counters.
#[derive(Clone, Copy, Debug)]
pub struct GlobalSettings {
    pub schema_version: i64,
    pub total_items_created: i64,
    pub max_items_per_list: i64,
}

/// Snapshot of one guild's settings.
#[derive(Clone, Copy, Debug)]
pub struct GuildSettings {
    pub me_too_enabled: bool,
}

/// Expected, caller-recoverable store conditions plus storage failures.
#[derive(Debug)]
pub enum TodoError {
    /// Item text was empty after trimming.
    EmptyText,
    /// Item text exceeded [`MAX_TEXT_LENGTH`] characters after trimming.
    TooLong,
    /// The (user, list) pair is at its configured capacity.
    TooMany { maximum: i64 },
    /// No item (or list) exists at the given key.
    NotFound,
    /// Underlying storage failure.
    Persistence(anyhow::Error),
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoError::EmptyText => write!(f, "no text was given"),
            TodoError::TooLong => {
                write!(f, "text is longer than {MAX_TEXT_LENGTH} characters")
            }
            TodoError::TooMany { maximum } => {
                write!(f, "already at the maximum of {maximum} items")
            }
            TodoError::NotFound => write!(f, "no such todo item"),
            TodoError::Persistence(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl std::error::Error for TodoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TodoError::Persistence(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        TodoError::Persistence(err)
    }
}

/// The todo store. Cheap to clone; all state lives in the database.
#[derive(Clone)]
pub struct TodoStore {
    database: Database,
}

impl TodoStore {
    pub fn new(database: Database) -> Self {
        TodoStore { database }
    }

    /// Run settings migrations. Call once at startup.
    pub async fn initialize(&self) -> Result<(), TodoError> {
        let version: i64 = self
            .database
            .get_setting(KEY_SCHEMA_VERSION)
            .await?
            .unwrap_or(0);
        if version < SCHEMA_VERSION {
            self.database
                .set_setting(KEY_SCHEMA_VERSION, &SCHEMA_VERSION)
                .await?;
            info!("Migrated settings schema {version} -> {SCHEMA_VERSION}");
        }
        Ok(())
    }

    /// Create a new item in `(user_id, list_name)`.
    ///
    /// The item gets the smallest positive ID not currently in use for that
    /// list, so IDs freed by deletion are handed out again. Bumps the global
    /// creation counter on success and touches nothing on failure.
    pub async fn create_item(
        &self,
        user_id: &str,
        list_name: &str,
        text: &str,
        jump_link: Option<&str>,
    ) -> Result<TodoItem, TodoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        if text.chars().count() > MAX_TEXT_LENGTH {
            return Err(TodoError::TooLong);
        }

        let maximum = self.max_items_per_list().await?;
        match self
            .database
            .insert_item(user_id, list_name, text, jump_link, maximum)
            .await?
        {
            InsertOutcome::Created(item) => {
                debug!("Created item {} in {user_id}/{list_name}", item.id);
                Ok(item)
            }
            InsertOutcome::AtCapacity => Err(TodoError::TooMany { maximum }),
        }
    }

    /// Items of one list in the requested order. An empty result means the
    /// list does not exist; the store keeps no separate list records.
    pub async fn list_items(
        &self,
        user_id: &str,
        list_name: &str,
        order: SortOrder,
    ) -> Result<Vec<TodoItem>, TodoError> {
        Ok(self.database.get_items(user_id, list_name, order).await?)
    }

    /// Names of every list currently holding at least one item.
    pub async fn list_names(&self, user_id: &str) -> Result<Vec<String>, TodoError> {
        Ok(self.database.list_names(user_id).await?)
    }

    /// Replace an item's text. The jump link is never touched.
    pub async fn edit_text(&self, key: &ItemKey, new_text: &str) -> Result<(), TodoError> {
        let new_text = new_text.trim();
        if new_text.chars().count() > MAX_TEXT_LENGTH {
            return Err(TodoError::TooLong);
        }
        let found = self
            .database
            .update_text(&key.user_id, &key.list_name, key.item_id, new_text)
            .await?;
        if found {
            Ok(())
        } else {
            Err(TodoError::NotFound)
        }
    }

    /// Attach a jump link to an item created without one. A link that is
    /// already present stays as-is.
    pub async fn attach_jump_link(&self, key: &ItemKey, url: &str) -> Result<(), TodoError> {
        match self
            .database
            .attach_jump_link(&key.user_id, &key.list_name, key.item_id, url)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(TodoError::NotFound),
        }
    }

    /// Delete one item, returning it.
    pub async fn delete_item(&self, key: &ItemKey) -> Result<TodoItem, TodoError> {
        self.database
            .delete_item(&key.user_id, &key.list_name, key.item_id)
            .await?
            .ok_or(TodoError::NotFound)
    }

    /// Delete the most recently added item of a list, returning it.
    ///
    /// "Most recent" follows insertion order, not the greatest ID: after ID
    /// reuse the newest item can carry a smaller ID than an older one.
    pub async fn delete_last(&self, user_id: &str, list_name: &str) -> Result<TodoItem, TodoError> {
        self.database
            .remove_newest(user_id, list_name)
            .await?
            .ok_or(TodoError::NotFound)
    }

    /// Delete a whole list, returning how many items went with it.
    pub async fn delete_list(&self, user_id: &str, list_name: &str) -> Result<usize, TodoError> {
        let removed = self.database.delete_list(user_id, list_name).await?;
        if removed == 0 {
            return Err(TodoError::NotFound);
        }
        debug!("Deleted list {user_id}/{list_name} ({removed} items)");
        Ok(removed)
    }

    /// Remove every item the user has; used for data-removal requests.
    pub async fn delete_all_for_user(&self, user_id: &str) -> Result<usize, TodoError> {
        let removed = self.database.delete_user(user_id).await?;
        info!("Purged all todo data for user {user_id} ({removed} items)");
        Ok(removed)
    }

    pub async fn max_items_per_list(&self) -> Result<i64, TodoError> {
        Ok(self
            .database
            .get_setting(KEY_MAX_ITEMS)
            .await?
            .unwrap_or(DEFAULT_MAX_ITEMS))
    }

    pub async fn set_max_items_per_list(&self, maximum: i64) -> Result<(), TodoError> {
        let maximum = maximum.max(0);
        self.database.set_setting(KEY_MAX_ITEMS, &maximum).await?;
        Ok(())
    }

    /// Read-only snapshot of global settings and counters.
    pub async fn settings(&self) -> Result<GlobalSettings, TodoError> {
        Ok(GlobalSettings {
            schema_version: self
                .database
                .get_setting(KEY_SCHEMA_VERSION)
                .await?
                .unwrap_or(0),
            total_items_created: self.database.get_setting(KEY_TOTAL).await?.unwrap_or(0),
            max_items_per_list: self.max_items_per_list().await?,
        })
    }

    pub async fn guild_settings(&self, guild_id: &str) -> Result<GuildSettings, TodoError> {
        Ok(GuildSettings {
            me_too_enabled: self.database.me_too_enabled(guild_id).await?,
        })
    }

    pub async fn set_me_too(&self, guild_id: &str, enabled: bool) -> Result<(), TodoError> {
        Ok(self.database.set_me_too(guild_id, enabled).await?)
    }
}
