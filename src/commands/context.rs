//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use crate::features::me_too::MeTooCoordinator;
use crate::features::todo::TodoStore;

/// Services shared by every command handler.
#[derive(Clone)]
pub struct CommandContext {
    pub store: TodoStore,
    pub me_too: MeTooCoordinator,
    /// Bot owner, when configured; gates global settings commands.
    pub owner_id: Option<u64>,
}

impl CommandContext {
    pub fn new(store: TodoStore, me_too: MeTooCoordinator, owner_id: Option<u64>) -> Self {
        Self {
            store,
            me_too,
            owner_id,
        }
    }

    /// Whether the given user is the configured bot owner.
    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }

    #[tokio::test]
    async fn test_is_owner() {
        let database = crate::database::Database::open_in_memory().await.unwrap();
        let store = TodoStore::new(database);
        let me_too = MeTooCoordinator::new(store.clone());

        let ctx = CommandContext::new(store.clone(), me_too.clone(), Some(42));
        assert!(ctx.is_owner(42));
        assert!(!ctx.is_owner(7));

        let ctx = CommandContext::new(store, me_too, None);
        assert!(!ctx.is_owner(42));
    }
}
