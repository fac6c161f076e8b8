// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Session - Per-login handle bound to one workspace
//
// A Session is what Repository::login hands back. It keeps the credentials,
// the transport it was authenticated on, and its Workspace. Node and property
// access live in the transport; the session only carries identity and
// lifecycle.

use crate::Repository;
use crate::binary_stream;
use crate::workspace::Workspace;
use jcr_protocol::{Credentials, STREAM_SCHEME};
use jcr_runtime::stream::StreamUrl;
use jcr_runtime::{Result, Transport};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// A logged-in session against one workspace.
///
/// Cloning a `Session` yields another handle to the same session.
///
/// # Example
///
/// ```ignore
/// use jcr::{Credentials, Repository};
///
/// let session = repository
///     .login(Some(Credentials::simple("admin", "admin")), Some("default"))
///     .await?;
/// assert_eq!(session.workspace().name(), "default");
/// assert_eq!(session.user_id(), Some("admin"));
///
/// session.logout().await?;
/// assert!(!session.is_live());
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    token: String,
    repository: Repository,
    workspace: Workspace,
    credentials: Option<Credentials>,
    transport: Arc<dyn Transport>,
    auto_lastmodified: bool,
    live: AtomicBool,
}

impl Session {
    /// Creates a session bound to `transport`.
    ///
    /// Called by the [`Factory`](crate::Factory) after the transport accepted
    /// the login; the transport is not contacted again here. The session is
    /// indexed for [`BinaryStreamWrapper`](crate::BinaryStreamWrapper) even
    /// when the process did not register the wrapper.
    pub fn new(
        repository: Repository,
        workspace_name: impl Into<String>,
        credentials: Option<Credentials>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::SeqCst);
        let auto_lastmodified = repository.options().auto_lastmodified;

        let session = Self {
            inner: Arc::new(SessionInner {
                token: format!("session-{}", id),
                repository,
                workspace: Workspace::new(workspace_name),
                credentials,
                transport,
                auto_lastmodified,
                live: AtomicBool::new(true),
            }),
        };

        binary_stream::register_session(&session);
        tracing::debug!(
            token = %session.token(),
            workspace = %session.workspace().name(),
            "Session created"
        );

        session
    }

    /// Returns the repository this session was obtained from.
    pub fn repository(&self) -> &Repository {
        &self.inner.repository
    }

    /// Returns the session's workspace.
    pub fn workspace(&self) -> &Workspace {
        &self.inner.workspace
    }

    /// Shorthand for `self.workspace().name()`.
    pub fn workspace_name(&self) -> &str {
        self.inner.workspace.name()
    }

    /// Returns the credentials used at login.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.inner.credentials.as_ref()
    }

    /// Returns the user id from the login credentials.
    pub fn user_id(&self) -> Option<&str> {
        self.inner.credentials.as_ref().and_then(Credentials::user_id)
    }

    /// Returns the names of the attributes carried by the login credentials.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.inner
            .credentials
            .as_ref()
            .map(Credentials::attribute_names)
            .unwrap_or_default()
    }

    /// Returns a credentials attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.inner
            .credentials
            .as_ref()
            .and_then(|credentials| credentials.attribute(name))
    }

    /// Returns the transport this session talks through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Whether the session maintains last-modified information automatically.
    pub fn auto_lastmodified(&self) -> bool {
        self.inner.auto_lastmodified
    }

    /// Process-unique token identifying this session in binary stream URLs.
    pub fn token(&self) -> &str {
        &self.inner.token
    }

    /// Returns true until [`logout`](Self::logout) is called.
    pub fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Ends the session.
    ///
    /// The first call notifies the transport; later calls do nothing.
    pub async fn logout(&self) -> Result<()> {
        if !self.inner.live.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        binary_stream::unregister_session(&self.inner.token);
        tracing::debug!(token = %self.inner.token, "Logging out session");
        self.inner.transport.logout().await
    }

    /// Builds the stream URL for the binary property at absolute `path`.
    ///
    /// The URL resolves through [`jcr_runtime::stream::open`] while this
    /// session is live and the stream handler is registered.
    pub fn binary_url(&self, path: &str) -> Result<String> {
        Ok(StreamUrl::new(STREAM_SCHEME, self.inner.token.as_str(), path)?.to_string())
    }

    /// Returns a handle that does not keep the session alive.
    pub fn downgrade(&self) -> WeakSession {
        WeakSession {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        binary_stream::unregister_session(&self.token);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.inner.token)
            .field("workspace", &self.inner.workspace)
            .field("user_id", &self.user_id())
            .field("live", &self.is_live())
            .finish()
    }
}

/// Non-owning handle to a [`Session`].
#[derive(Clone)]
pub struct WeakSession {
    inner: Weak<SessionInner>,
}

impl WeakSession {
    /// Returns the session if it has not been dropped.
    pub fn upgrade(&self) -> Option<Session> {
        self.inner.upgrade().map(|inner| Session { inner })
    }
}

impl std::fmt::Debug for WeakSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakSession")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
