//! # Feature: Me Too
//!
//! Short-lived broadcast windows that let other users copy a just-created
//! todo item into their own `main` list. Windows live in a process-scoped
//! DashMap keyed by the prompt message and are disposed of automatically
//! after [`WINDOW_SECONDS`]; claims are idempotent per user.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: true (per-guild, off by default)

use anyhow::{anyhow, Result};
use dashmap::DashMap;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::features::todo::{TodoError, TodoItem, TodoStore, DEFAULT_LIST};

/// How long a window accepts claims.
pub const WINDOW_SECONDS: u64 = 30;

/// Reaction users click to claim a copy.
pub const ME_TOO_EMOJI: &str = "🗒️";

/// Opaque handle to an open window (the prompt message ID underneath).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// The copied portion of the originating item.
#[derive(Clone, Debug)]
pub struct MeTooPayload {
    pub text: String,
    pub jump_link: Option<String>,
}

/// Result of a claim attempt.
#[derive(Debug)]
pub enum ClaimOutcome {
    /// Copy created in the claimant's `main` list.
    Added(TodoItem),
    /// The claimant's `main` list is full; the claim is still recorded.
    TooMany { maximum: i64 },
    /// This user already claimed (or originated) the item.
    AlreadyClaimed,
    /// No window is open under this handle.
    WindowExpired,
}

struct Window {
    payload: MeTooPayload,
    claimed_by: HashSet<String>,
    expiry: Option<JoinHandle<()>>,
}

/// Coordinates me-too windows and copies claimed items into the store.
#[derive(Clone)]
pub struct MeTooCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: TodoStore,
    windows: DashMap<WindowHandle, Window>,
    ttl: Duration,
}

impl MeTooCoordinator {
    pub fn new(store: TodoStore) -> Self {
        Self::with_ttl(store, Duration::from_secs(WINDOW_SECONDS))
    }

    /// Coordinator with a custom window lifetime (tests use short ones).
    pub fn with_ttl(store: TodoStore, ttl: Duration) -> Self {
        MeTooCoordinator {
            inner: Arc::new(Inner {
                store,
                windows: DashMap::new(),
                ttl,
            }),
        }
    }

    /// Open a window for the item behind `prompt_id`, seeding the claim set
    /// with the originator so they cannot copy their own item. The window
    /// disposes of itself after the configured lifetime unless
    /// [`close_window`](Self::close_window) gets there first.
    pub fn open_window(
        &self,
        prompt_id: u64,
        originator_id: &str,
        payload: MeTooPayload,
    ) -> WindowHandle {
        let handle = WindowHandle(prompt_id);
        let mut claimed_by = HashSet::new();
        claimed_by.insert(originator_id.to_string());

        let coordinator = self.clone();
        let expiry = tokio::spawn(async move {
            sleep(coordinator.inner.ttl).await;
            if coordinator.inner.windows.remove(&handle).is_some() {
                debug!("Me-too window {prompt_id} expired");
            }
        });

        self.inner.windows.insert(
            handle,
            Window {
                payload,
                claimed_by,
                expiry: Some(expiry),
            },
        );
        debug!("Opened me-too window {prompt_id}");
        handle
    }

    /// Claim a copy of the window's item for `user_id`.
    ///
    /// The membership check and insertion into the claim set happen under
    /// the map entry's exclusive lock, so two near-simultaneous claims by
    /// the same user cannot both pass. The copy goes into the claimant's
    /// `main` list and never opens a window of its own.
    pub async fn claim(&self, handle: WindowHandle, user_id: &str) -> Result<ClaimOutcome> {
        let payload = {
            let Some(mut window) = self.inner.windows.get_mut(&handle) else {
                return Ok(ClaimOutcome::WindowExpired);
            };
            if !window.claimed_by.insert(user_id.to_string()) {
                return Ok(ClaimOutcome::AlreadyClaimed);
            }
            window.payload.clone()
        };

        match self
            .inner
            .store
            .create_item(
                user_id,
                DEFAULT_LIST,
                &payload.text,
                payload.jump_link.as_deref(),
            )
            .await
        {
            Ok(item) => Ok(ClaimOutcome::Added(item)),
            Err(TodoError::TooMany { maximum }) => Ok(ClaimOutcome::TooMany { maximum }),
            Err(TodoError::Persistence(err)) => Err(err),
            Err(other) => Err(anyhow!("me-too copy rejected: {other}")),
        }
    }

    /// Dispose of a window right away, cancelling its expiry timer.
    /// Returns false when the window was already gone.
    pub fn close_window(&self, handle: WindowHandle) -> bool {
        match self.inner.windows.remove(&handle) {
            Some((_, window)) => {
                if let Some(expiry) = window.expiry {
                    expiry.abort();
                }
                debug!("Closed me-too window {}", handle.0);
                true
            }
            None => false,
        }
    }

    /// Number of currently open windows.
    pub fn open_count(&self) -> usize {
        self.inner.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn coordinator(ttl_ms: u64) -> MeTooCoordinator {
        let database = Database::open_in_memory().await.unwrap();
        let store = TodoStore::new(database);
        store.initialize().await.unwrap();
        MeTooCoordinator::with_ttl(store, Duration::from_millis(ttl_ms))
    }

    fn payload(text: &str, link: Option<&str>) -> MeTooPayload {
        MeTooPayload {
            text: text.to_string(),
            jump_link: link.map(|l| l.to_string()),
        }
    }

    async fn store_of(coordinator: &MeTooCoordinator) -> TodoStore {
        coordinator.inner.store.clone()
    }

    #[tokio::test]
    async fn test_claim_copies_item_with_link() {
        let coordinator = coordinator(5_000).await;
        let handle =
            coordinator.open_window(1, "alice", payload("buy milk", Some("https://jump")));

        let outcome = coordinator.claim(handle, "bob").await.unwrap();
        assert!(matches!(outcome, ClaimOutcome::Added(_)));

        let store = store_of(&coordinator).await;
        let items = store
            .list_items("bob", DEFAULT_LIST, Default::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "buy milk");
        assert_eq!(items[0].jump_link.as_deref(), Some("https://jump"));
    }

    #[tokio::test]
    async fn test_originator_cannot_claim() {
        let coordinator = coordinator(5_000).await;
        let handle = coordinator.open_window(1, "alice", payload("note", None));
        let outcome = coordinator.claim(handle, "alice").await.unwrap();
        assert!(matches!(outcome, ClaimOutcome::AlreadyClaimed));
    }

    #[tokio::test]
    async fn test_second_claim_is_idempotent() {
        let coordinator = coordinator(5_000).await;
        let handle = coordinator.open_window(1, "alice", payload("note", None));

        assert!(matches!(
            coordinator.claim(handle, "bob").await.unwrap(),
            ClaimOutcome::Added(_)
        ));
        assert!(matches!(
            coordinator.claim(handle, "bob").await.unwrap(),
            ClaimOutcome::AlreadyClaimed
        ));

        let store = store_of(&coordinator).await;
        let items = store
            .list_items("bob", DEFAULT_LIST, Default::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_window_expires() {
        let coordinator = coordinator(50).await;
        let handle = coordinator.open_window(1, "alice", payload("note", None));
        assert_eq!(coordinator.open_count(), 1);

        sleep(Duration::from_millis(120)).await;
        assert_eq!(coordinator.open_count(), 0);
        assert!(matches!(
            coordinator.claim(handle, "carol").await.unwrap(),
            ClaimOutcome::WindowExpired
        ));
    }

    #[tokio::test]
    async fn test_close_window_early() {
        let coordinator = coordinator(5_000).await;
        let handle = coordinator.open_window(1, "alice", payload("note", None));

        assert!(coordinator.close_window(handle));
        assert!(!coordinator.close_window(handle));
        assert!(matches!(
            coordinator.claim(handle, "bob").await.unwrap(),
            ClaimOutcome::WindowExpired
        ));
    }

    #[tokio::test]
    async fn test_claim_at_capacity_stays_claimed() {
        let coordinator = coordinator(5_000).await;
        let store = store_of(&coordinator).await;
        store.set_max_items_per_list(1).await.unwrap();
        store.create_item("bob", DEFAULT_LIST, "full", None).await.unwrap();

        let handle = coordinator.open_window(1, "alice", payload("note", None));
        assert!(matches!(
            coordinator.claim(handle, "bob").await.unwrap(),
            ClaimOutcome::TooMany { maximum: 1 }
        ));
        // No retry after a full list: the claim is kept
        assert!(matches!(
            coordinator.claim(handle, "bob").await.unwrap(),
            ClaimOutcome::AlreadyClaimed
        ));
    }

    #[tokio::test]
    async fn test_claims_count_toward_total() {
        let coordinator = coordinator(5_000).await;
        let store = store_of(&coordinator).await;
        store.create_item("alice", DEFAULT_LIST, "note", None).await.unwrap();

        let handle = coordinator.open_window(1, "alice", payload("note", None));
        coordinator.claim(handle, "bob").await.unwrap();

        assert_eq!(store.settings().await.unwrap().total_items_created, 2);
    }

    #[tokio::test]
    async fn test_windows_are_independent() {
        let coordinator = coordinator(5_000).await;
        let first = coordinator.open_window(1, "alice", payload("one", None));
        let second = coordinator.open_window(2, "alice", payload("two", None));

        coordinator.close_window(first);
        assert!(matches!(
            coordinator.claim(second, "bob").await.unwrap(),
            ClaimOutcome::Added(_)
        ));
    }
}
