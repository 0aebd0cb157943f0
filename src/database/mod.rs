//! # Database Module
//!
//! SQLite-backed persistence for todo items and settings. A single shared
//! connection lives behind an async mutex, so every public call is atomic
//! from the caller's point of view; multi-statement mutations additionally
//! run inside one transaction so a failure never leaves partial state.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with todo item and settings tables

use anyhow::Result;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlite::{Connection, State, Statement};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::todo::{SortOrder, TodoItem};

/// Outcome of an item insert attempt.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(TodoItem),
    /// The (user, list) pair already holds the configured maximum.
    AtCapacity,
}

/// Shared handle to the bot database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = sqlite::open(path)?;
        init_schema(&conn)?;
        debug!("Database ready at {path}");
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used by tests.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = sqlite::open(":memory:")?;
        init_schema(&conn)?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Read a global setting, deserialized from its stored JSON value.
    pub async fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let conn = self.conn.lock().await;
        get_setting_sync(&conn, key)
    }

    /// Write a global setting as a JSON value.
    pub async fn set_setting<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let conn = self.conn.lock().await;
        set_setting_sync(&conn, key, value)
    }

    /// Whether the me-too prompt is enabled for a guild (default false).
    pub async fn me_too_enabled(&self, guild_id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT me_too FROM guild_settings WHERE guild_id = ?")?;
        stmt.bind((1, guild_id))?;
        if let State::Row = stmt.next()? {
            Ok(stmt.read::<i64, _>(0)? != 0)
        } else {
            Ok(false)
        }
    }

    pub async fn set_me_too(&self, guild_id: &str, enabled: bool) -> Result<()> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO guild_settings (guild_id, me_too) VALUES (?, ?)
             ON CONFLICT(guild_id) DO UPDATE SET me_too = excluded.me_too",
        )?;
        stmt.bind((1, guild_id))?;
        stmt.bind((2, enabled as i64))?;
        stmt.next()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Insert a new item for `(user_id, list_name)`.
    ///
    /// Capacity check, ID assignment (smallest positive integer not in use,
    /// so deleted IDs are reused), the insert itself, and the global
    /// creation counter all commit in one transaction; a capacity rejection
    /// allocates nothing and bumps nothing.
    pub async fn insert_item(
        &self,
        user_id: &str,
        list_name: &str,
        text: &str,
        jump_link: Option<&str>,
        maximum: i64,
    ) -> Result<InsertOutcome> {
        let conn = self.conn.lock().await;
        with_transaction(&conn, |conn| {
            let used = item_ids_sync(conn, user_id, list_name)?;
            if used.len() as i64 >= maximum {
                return Ok(InsertOutcome::AtCapacity);
            }

            let mut item_id: i64 = 1;
            while used.contains(&item_id) {
                item_id += 1;
            }

            let mut stmt = conn.prepare(
                "INSERT INTO todo_items (user_id, list_name, item_id, text, jump_link, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            stmt.bind((1, user_id))?;
            stmt.bind((2, list_name))?;
            stmt.bind((3, item_id))?;
            stmt.bind((4, text))?;
            stmt.bind((5, jump_link))?;
            stmt.bind((6, chrono::Utc::now().to_rfc3339().as_str()))?;
            stmt.next()?;

            let total: i64 = get_setting_sync(conn, "total")?.unwrap_or(0);
            set_setting_sync(conn, "total", &(total + 1))?;

            Ok(InsertOutcome::Created(TodoItem {
                id: item_id,
                text: text.to_string(),
                jump_link: jump_link.map(|l| l.to_string()),
            }))
        })
    }

    pub async fn get_item(
        &self,
        user_id: &str,
        list_name: &str,
        item_id: i64,
    ) -> Result<Option<TodoItem>> {
        let conn = self.conn.lock().await;
        get_item_sync(&conn, user_id, list_name, item_id)
    }

    /// All items in a list, ordered by ID or by insertion.
    pub async fn get_items(
        &self,
        user_id: &str,
        list_name: &str,
        order: SortOrder,
    ) -> Result<Vec<TodoItem>> {
        let conn = self.conn.lock().await;
        // rowid only ever grows past the largest live row, so rowid order
        // is insertion order even when item IDs are reused.
        let query = match order {
            SortOrder::ById => {
                "SELECT item_id, text, jump_link FROM todo_items
                 WHERE user_id = ? AND list_name = ? ORDER BY item_id ASC"
            }
            SortOrder::ByInsertion => {
                "SELECT item_id, text, jump_link FROM todo_items
                 WHERE user_id = ? AND list_name = ? ORDER BY rowid ASC"
            }
        };
        let mut stmt = conn.prepare(query)?;
        stmt.bind((1, user_id))?;
        stmt.bind((2, list_name))?;
        let mut items = Vec::new();
        while let State::Row = stmt.next()? {
            items.push(read_item(&stmt)?);
        }
        Ok(items)
    }

    /// Every list name currently holding at least one item for the user.
    pub async fn list_names(&self, user_id: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT list_name FROM todo_items WHERE user_id = ? ORDER BY list_name ASC",
        )?;
        stmt.bind((1, user_id))?;
        let mut names = Vec::new();
        while let State::Row = stmt.next()? {
            names.push(stmt.read::<String, _>(0)?);
        }
        Ok(names)
    }

    /// Replace an item's text. Returns false when no such item exists.
    pub async fn update_text(
        &self,
        user_id: &str,
        list_name: &str,
        item_id: i64,
        text: &str,
    ) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "UPDATE todo_items SET text = ?
             WHERE user_id = ? AND list_name = ? AND item_id = ?",
        )?;
        stmt.bind((1, text))?;
        stmt.bind((2, user_id))?;
        stmt.bind((3, list_name))?;
        stmt.bind((4, item_id))?;
        stmt.next()?;
        Ok(conn.change_count() > 0)
    }

    /// Set an item's jump link if it has none yet.
    ///
    /// Returns `None` when the item does not exist, otherwise whether the
    /// link was applied (false means one was already set and stays as-is).
    pub async fn attach_jump_link(
        &self,
        user_id: &str,
        list_name: &str,
        item_id: i64,
        url: &str,
    ) -> Result<Option<bool>> {
        let conn = self.conn.lock().await;
        with_transaction(&conn, |conn| {
            if get_item_sync(conn, user_id, list_name, item_id)?.is_none() {
                return Ok(None);
            }
            let mut stmt = conn.prepare(
                "UPDATE todo_items SET jump_link = ?
                 WHERE user_id = ? AND list_name = ? AND item_id = ? AND jump_link IS NULL",
            )?;
            stmt.bind((1, url))?;
            stmt.bind((2, user_id))?;
            stmt.bind((3, list_name))?;
            stmt.bind((4, item_id))?;
            stmt.next()?;
            Ok(Some(conn.change_count() > 0))
        })
    }

    /// Delete one item, returning it when it existed.
    pub async fn delete_item(
        &self,
        user_id: &str,
        list_name: &str,
        item_id: i64,
    ) -> Result<Option<TodoItem>> {
        let conn = self.conn.lock().await;
        with_transaction(&conn, |conn| {
            let Some(item) = get_item_sync(conn, user_id, list_name, item_id)? else {
                return Ok(None);
            };
            delete_item_sync(conn, user_id, list_name, item_id)?;
            Ok(Some(item))
        })
    }

    /// Delete the most recently inserted item of a list, returning it.
    pub async fn remove_newest(&self, user_id: &str, list_name: &str) -> Result<Option<TodoItem>> {
        let conn = self.conn.lock().await;
        with_transaction(&conn, |conn| {
            let mut stmt = conn.prepare(
                "SELECT item_id, text, jump_link FROM todo_items
                 WHERE user_id = ? AND list_name = ? ORDER BY rowid DESC LIMIT 1",
            )?;
            stmt.bind((1, user_id))?;
            stmt.bind((2, list_name))?;
            if let State::Row = stmt.next()? {
                let item = read_item(&stmt)?;
                drop(stmt);
                delete_item_sync(conn, user_id, list_name, item.id)?;
                Ok(Some(item))
            } else {
                Ok(None)
            }
        })
    }

    /// Delete every item in a list, returning how many were removed.
    pub async fn delete_list(&self, user_id: &str, list_name: &str) -> Result<usize> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("DELETE FROM todo_items WHERE user_id = ? AND list_name = ?")?;
        stmt.bind((1, user_id))?;
        stmt.bind((2, list_name))?;
        stmt.next()?;
        Ok(conn.change_count())
    }

    /// Delete every item the user has, in any list.
    pub async fn delete_user(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("DELETE FROM todo_items WHERE user_id = ?")?;
        stmt.bind((1, user_id))?;
        stmt.next()?;
        Ok(conn.change_count())
    }
}

// ----------------------------------------------------------------------
// Connection-level helpers (callers hold the mutex)
// ----------------------------------------------------------------------

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "
        CREATE TABLE IF NOT EXISTS todo_items (
            user_id    TEXT NOT NULL,
            list_name  TEXT NOT NULL,
            item_id    INTEGER NOT NULL,
            text       TEXT NOT NULL,
            jump_link  TEXT,
            created_at TEXT NOT NULL,
            PRIMARY KEY (user_id, list_name, item_id)
        );

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS guild_settings (
            guild_id TEXT PRIMARY KEY,
            me_too   INTEGER NOT NULL DEFAULT 0
        );
        ",
    )?;
    Ok(())
}

fn with_transaction<T>(conn: &Connection, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    conn.execute("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute("COMMIT")?;
            Ok(value)
        }
        Err(err) => {
            let _ = conn.execute("ROLLBACK");
            Err(err)
        }
    }
}

fn get_setting_sync<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;
    stmt.bind((1, key))?;
    if let State::Row = stmt.next()? {
        let raw = stmt.read::<String, _>(0)?;
        Ok(Some(serde_json::from_str(&raw)?))
    } else {
        Ok(None)
    }
}

fn set_setting_sync<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    let mut stmt = conn.prepare(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )?;
    stmt.bind((1, key))?;
    stmt.bind((2, raw.as_str()))?;
    stmt.next()?;
    Ok(())
}

fn item_ids_sync(conn: &Connection, user_id: &str, list_name: &str) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT item_id FROM todo_items WHERE user_id = ? AND list_name = ? ORDER BY item_id ASC",
    )?;
    stmt.bind((1, user_id))?;
    stmt.bind((2, list_name))?;
    let mut ids = Vec::new();
    while let State::Row = stmt.next()? {
        ids.push(stmt.read::<i64, _>(0)?);
    }
    Ok(ids)
}

fn get_item_sync(
    conn: &Connection,
    user_id: &str,
    list_name: &str,
    item_id: i64,
) -> Result<Option<TodoItem>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, text, jump_link FROM todo_items
         WHERE user_id = ? AND list_name = ? AND item_id = ?",
    )?;
    stmt.bind((1, user_id))?;
    stmt.bind((2, list_name))?;
    stmt.bind((3, item_id))?;
    if let State::Row = stmt.next()? {
        Ok(Some(read_item(&stmt)?))
    } else {
        Ok(None)
    }
}

fn delete_item_sync(conn: &Connection, user_id: &str, list_name: &str, item_id: i64) -> Result<()> {
    let mut stmt = conn
        .prepare("DELETE FROM todo_items WHERE user_id = ? AND list_name = ? AND item_id = ?")?;
    stmt.bind((1, user_id))?;
    stmt.bind((2, list_name))?;
    stmt.bind((3, item_id))?;
    stmt.next()?;
    Ok(())
}

fn read_item(stmt: &Statement) -> Result<TodoItem> {
    Ok(TodoItem {
        id: stmt.read::<i64, _>("item_id")?,
        text: stmt.read::<String, _>("text")?,
        jump_link: stmt.read::<Option<String>, _>("jump_link")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(db.get_setting::<i64>("total").await.unwrap(), None);
        db.set_setting("total", &7i64).await.unwrap();
        assert_eq!(db.get_setting::<i64>("total").await.unwrap(), Some(7));
        db.set_setting("total", &8i64).await.unwrap();
        assert_eq!(db.get_setting::<i64>("total").await.unwrap(), Some(8));
    }

    #[tokio::test]
    async fn test_me_too_defaults_off() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(!db.me_too_enabled("1").await.unwrap());
        db.set_me_too("1", true).await.unwrap();
        assert!(db.me_too_enabled("1").await.unwrap());
        assert!(!db.me_too_enabled("2").await.unwrap());
        db.set_me_too("1", false).await.unwrap();
        assert!(!db.me_too_enabled("1").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_assigns_smallest_free_id() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..3 {
            db.insert_item("u", "main", "note", None, 20).await.unwrap();
        }
        db.delete_item("u", "main", 2).await.unwrap();
        let outcome = db.insert_item("u", "main", "again", None, 20).await.unwrap();
        match outcome {
            InsertOutcome::Created(item) => assert_eq!(item.id, 2),
            InsertOutcome::AtCapacity => panic!("unexpected capacity rejection"),
        }
    }

    #[tokio::test]
    async fn test_capacity_rejection_bumps_nothing() {
        let db = Database::open_in_memory().await.unwrap();
        db.insert_item("u", "main", "one", None, 1).await.unwrap();
        let outcome = db.insert_item("u", "main", "two", None, 1).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::AtCapacity));
        assert_eq!(db.get_setting::<i64>("total").await.unwrap(), Some(1));
        assert_eq!(
            db.get_items("u", "main", SortOrder::ById).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_attach_jump_link_only_once() {
        let db = Database::open_in_memory().await.unwrap();
        db.insert_item("u", "main", "note", None, 20).await.unwrap();
        assert_eq!(
            db.attach_jump_link("u", "main", 1, "https://a").await.unwrap(),
            Some(true)
        );
        assert_eq!(
            db.attach_jump_link("u", "main", 1, "https://b").await.unwrap(),
            Some(false)
        );
        let item = db.get_item("u", "main", 1).await.unwrap().unwrap();
        assert_eq!(item.jump_link.as_deref(), Some("https://a"));
        assert_eq!(db.attach_jump_link("u", "main", 9, "https://c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_newest_follows_insertion_order() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..3 {
            db.insert_item("u", "main", "note", None, 20).await.unwrap();
        }
        // Free ID 1, then insert again: the newest item carries the reused ID.
        db.delete_item("u", "main", 1).await.unwrap();
        db.insert_item("u", "main", "newest", None, 20).await.unwrap();
        let removed = db.remove_newest("u", "main").await.unwrap().unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(removed.text, "newest");
    }

    #[tokio::test]
    async fn test_delete_list_and_user() {
        let db = Database::open_in_memory().await.unwrap();
        db.insert_item("u", "main", "a", None, 20).await.unwrap();
        db.insert_item("u", "chores", "b", None, 20).await.unwrap();
        db.insert_item("v", "main", "c", None, 20).await.unwrap();

        assert_eq!(db.delete_list("u", "chores").await.unwrap(), 1);
        assert_eq!(db.delete_list("u", "chores").await.unwrap(), 0);
        assert_eq!(db.list_names("u").await.unwrap(), vec!["main"]);

        assert_eq!(db.delete_user("u").await.unwrap(), 1);
        assert!(db.list_names("u").await.unwrap().is_empty());
        assert_eq!(db.list_names("v").await.unwrap(), vec!["main"]);
    }
}
