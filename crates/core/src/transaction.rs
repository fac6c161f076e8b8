// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// UserTransaction - Explicit transaction demarcation for a session
//
// The manager is a small state machine over the transport's transaction
// capability: idle -> active (begin) -> idle (commit or rollback). Nested
// transactions are rejected. State only moves once the transport call has
// succeeded, so a failed commit leaves the transaction active and a rollback
// can still be attempted.

use crate::session::{Session, WeakSession};
use jcr_runtime::{Error, Result, TransactionalTransport, Transport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Transaction manager attached to a session's [`Workspace`](crate::Workspace).
///
/// # Example
///
/// ```ignore
/// let tx = session.workspace().transaction_manager().unwrap();
/// tx.begin().await?;
/// // ... modify content through the transport ...
/// tx.commit().await?;
/// ```
pub struct UserTransaction {
    transport: Arc<dyn Transport>,
    session: WeakSession,
    /// Token of the active transaction, `None` when idle.
    active: Mutex<Option<String>>,
}

impl UserTransaction {
    /// Creates a manager for `session` over `transport`.
    ///
    /// Fails with [`Error::Unsupported`] when the transport has no
    /// transaction capability.
    pub fn new(transport: Arc<dyn Transport>, session: &Session) -> Result<Self> {
        if transport.transactional().is_none() {
            return Err(Error::Unsupported(
                "transport does not support transactions".to_string(),
            ));
        }

        Ok(Self {
            transport,
            session: session.downgrade(),
            active: Mutex::new(None),
        })
    }

    fn capability(&self) -> Result<&dyn TransactionalTransport> {
        self.transport.transactional().ok_or_else(|| {
            Error::Unsupported("transport no longer supports transactions".to_string())
        })
    }

    fn require_live_session(&self) -> Result<()> {
        match self.session.upgrade() {
            Some(session) if session.is_live() => Ok(()),
            _ => Err(Error::SessionClosed(
                "cannot begin a transaction on a closed session".to_string(),
            )),
        }
    }

    /// Starts a transaction.
    pub async fn begin(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(Error::InvalidTransactionState(
                "nested transactions are not supported".to_string(),
            ));
        }
        self.require_live_session()?;

        let token = self.capability()?.begin_transaction().await?;
        tracing::debug!(token = %token, "Transaction started");
        *active = Some(token);
        Ok(())
    }

    /// Commits the active transaction.
    pub async fn commit(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        let Some(token) = active.as_deref() else {
            return Err(Error::InvalidTransactionState(
                "no transaction is active".to_string(),
            ));
        };

        self.capability()?.commit_transaction().await?;
        tracing::debug!(token = %token, "Transaction committed");
        *active = None;
        Ok(())
    }

    /// Rolls back the active transaction.
    pub async fn rollback(&self) -> Result<()> {
        let mut active = self.active.lock().await;
        let Some(token) = active.as_deref() else {
            return Err(Error::InvalidTransactionState(
                "no transaction is active".to_string(),
            ));
        };

        self.capability()?.rollback_transaction().await?;
        tracing::debug!(token = %token, "Transaction rolled back");
        *active = None;
        Ok(())
    }

    /// Returns true between a successful `begin` and the matching `commit`
    /// or `rollback`.
    pub async fn in_transaction(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Token the transport assigned to the active transaction.
    pub async fn transaction_token(&self) -> Option<String> {
        self.active.lock().await.clone()
    }

    /// Sets the timeout for transactions started after this call.
    ///
    /// A zero duration restores the transport's default. Sub-second parts are
    /// rounded up to the next whole second.
    pub fn set_transaction_timeout(&self, timeout: Duration) -> Result<()> {
        let mut seconds = timeout.as_secs();
        if timeout.subsec_nanos() > 0 {
            seconds += 1;
        }
        self.capability()?.set_transaction_timeout(seconds);
        Ok(())
    }
}

impl Drop for UserTransaction {
    fn drop(&mut self) {
        if let Some(token) = self.active.get_mut().as_deref() {
            tracing::warn!(token = %token, "Transaction manager dropped with an active transaction");
        }
    }
}

impl std::fmt::Debug for UserTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self
            .active
            .try_lock()
            .map(|active| active.clone())
            .unwrap_or_default();
        f.debug_struct("UserTransaction")
            .field("active", &active)
            .finish()
    }
}
