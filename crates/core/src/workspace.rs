//! Workspace - the named subtree a session operates on.

use crate::transaction::UserTransaction;
use parking_lot::RwLock;
use std::sync::Arc;

/// Workspace of a [`Session`](crate::Session).
///
/// Besides its name, the workspace carries the session's transaction manager
/// when the repository wired one in at login.
pub struct Workspace {
    name: String,
    transaction_manager: RwLock<Option<Arc<UserTransaction>>>,
}

impl Workspace {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transaction_manager: RwLock::new(None),
        }
    }

    /// Returns the workspace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches a transaction manager, replacing any previous one.
    pub fn set_transaction_manager(&self, transaction_manager: Arc<UserTransaction>) {
        *self.transaction_manager.write() = Some(transaction_manager);
    }

    /// Returns the transaction manager, if transactions are enabled for this session.
    pub fn transaction_manager(&self) -> Option<Arc<UserTransaction>> {
        self.transaction_manager.read().clone()
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("name", &self.name)
            .field(
                "transactions",
                &self.transaction_manager.read().is_some(),
            )
            .finish()
    }
}
