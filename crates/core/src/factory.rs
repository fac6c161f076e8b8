// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Factory - Builds the objects a Repository hands out
//
// The repository never constructs sessions, transaction managers, or the
// binary stream handler itself. It asks its Factory, so an embedding
// application can substitute its own types for any of them while keeping
// the login flow intact.

use crate::Repository;
use crate::binary_stream::BinaryStreamWrapper;
use crate::session::Session;
use crate::transaction::UserTransaction;
use jcr_protocol::Credentials;
use jcr_runtime::{Result, Transport, stream};
use std::sync::Arc;

/// Object factory used by [`Repository`].
///
/// Every method has a default implementation building the stock types, so an
/// implementor only overrides what it wants to replace.
///
/// # Example
///
/// ```ignore
/// struct AuditingFactory;
///
/// impl Factory for AuditingFactory {
///     fn new_session(
///         &self,
///         repository: Repository,
///         workspace_name: String,
///         credentials: Option<Credentials>,
///         transport: Arc<dyn Transport>,
///     ) -> Result<Session> {
///         tracing::info!(workspace = %workspace_name, "login");
///         Ok(Session::new(repository, workspace_name, credentials, transport))
///     }
/// }
///
/// let repository = Repository::builder()
///     .factory(Arc::new(AuditingFactory))
///     .transport(transport)
///     .build();
/// ```
pub trait Factory: Send + Sync {
    /// Builds the session returned by a successful login.
    fn new_session(
        &self,
        repository: Repository,
        workspace_name: String,
        credentials: Option<Credentials>,
        transport: Arc<dyn Transport>,
    ) -> Result<Session> {
        Ok(Session::new(repository, workspace_name, credentials, transport))
    }

    /// Builds the transaction manager attached to a new session's workspace.
    fn new_transaction_manager(
        &self,
        transport: Arc<dyn Transport>,
        session: &Session,
    ) -> Result<UserTransaction> {
        UserTransaction::new(transport, session)
    }

    /// Registers the binary stream handler under `scheme`.
    ///
    /// Runs at most once per process, from the first repository constructed
    /// with the stream wrapper enabled.
    fn register_stream_wrapper(&self, scheme: &str) -> Result<()> {
        stream::register_handler(scheme, Arc::new(BinaryStreamWrapper))
    }
}

/// Factory building the stock [`Session`] and [`UserTransaction`] types.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl Factory for DefaultFactory {}
