// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Repository - Entry point of the client
//
// A Repository binds a transport, a factory, and options. It authenticates
// sessions and exposes the server's descriptor table, loaded lazily and
// cached for the lifetime of the instance.

use crate::factory::{DefaultFactory, Factory};
use crate::session::Session;
use jcr_protocol::descriptor::{self, DescriptorValue, Descriptors};
use jcr_protocol::{Credentials, DEFAULT_WORKSPACE, RepositoryOptions, STREAM_SCHEME};
use jcr_runtime::stream::StreamWrapperLatch;
use jcr_runtime::{Error, LOGIN_FAILED_WITHOUT_REASON, Result, Transport};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Handle to a content repository.
///
/// Cloning a `Repository` yields another handle sharing the same transport
/// and descriptor cache.
///
/// # Example
///
/// ```ignore
/// use jcr::{Credentials, Repository};
///
/// let repository = Repository::builder().transport(transport).build();
///
/// let session = repository
///     .login(Some(Credentials::simple("user", "pw")), Some("ws1"))
///     .await?;
///
/// for key in repository.descriptor_keys().await? {
///     println!("{} = {:?}", key, repository.descriptor(&key).await?);
/// }
/// ```
#[derive(Clone)]
pub struct Repository {
    inner: Arc<RepositoryInner>,
}

struct RepositoryInner {
    factory: Arc<dyn Factory>,
    transport: Option<Arc<dyn Transport>>,
    options: RepositoryOptions,
    descriptors: OnceCell<Descriptors>,
}

impl Repository {
    /// Creates a repository.
    ///
    /// A missing factory falls back to [`DefaultFactory`], missing options to
    /// [`RepositoryOptions::default`]. Transactions are switched off when the
    /// transport cannot provide them. The first repository created in the
    /// process decides whether the binary stream handler gets registered.
    pub fn new(
        factory: Option<Arc<dyn Factory>>,
        transport: Option<Arc<dyn Transport>>,
        options: Option<RepositoryOptions>,
    ) -> Self {
        let mut builder = Self::builder();
        builder.factory = factory;
        builder.transport = transport;
        builder.options = options.unwrap_or_default();
        builder.build()
    }

    /// Creates a builder for configuring a repository.
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::default()
    }

    /// Effective options, after the transaction capability check.
    pub fn options(&self) -> RepositoryOptions {
        self.inner.options
    }

    /// Returns the transport, if one was configured.
    pub fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.inner.transport.as_ref()
    }

    /// Authenticates against `workspace_name`, or `"default"` when `None`.
    ///
    /// Credentials are passed to the transport as given; `None` lets the
    /// transport apply its own anonymous or preconfigured login.
    ///
    /// # Errors
    ///
    /// - [`Error::LoginFailed`] if the transport rejects the credentials
    /// - [`Error::NoSuchWorkspace`] if the workspace is unknown
    /// - [`Error::Repository`] if the transport refuses without a reason, or
    ///   no transport is configured
    /// - any other transport error as-is
    ///
    /// If the factory fails after the transport accepted the login, the
    /// transport is logged out again before the error is returned.
    pub async fn login(
        &self,
        credentials: Option<Credentials>,
        workspace_name: Option<&str>,
    ) -> Result<Session> {
        let workspace_name = workspace_name.unwrap_or(DEFAULT_WORKSPACE);
        let transport = self.require_transport()?;

        tracing::debug!(workspace = %workspace_name, "Logging in");
        if !transport.login(credentials.as_ref(), workspace_name).await? {
            return Err(Error::Repository(LOGIN_FAILED_WITHOUT_REASON.to_string()));
        }

        match self.open_session(transport, workspace_name, credentials) {
            Ok(session) => Ok(session),
            Err(e) => {
                // The server already accepted the login; release it.
                if let Err(logout_error) = transport.logout().await {
                    tracing::warn!(
                        "Logout after failed session setup also failed: {}",
                        logout_error
                    );
                }
                Err(e)
            }
        }
    }

    fn open_session(
        &self,
        transport: &Arc<dyn Transport>,
        workspace_name: &str,
        credentials: Option<Credentials>,
    ) -> Result<Session> {
        let session = self.inner.factory.new_session(
            self.clone(),
            workspace_name.to_string(),
            credentials,
            Arc::clone(transport),
        )?;

        if self.inner.options.transactions {
            let manager = self
                .inner
                .factory
                .new_transaction_manager(Arc::clone(transport), &session)?;
            session
                .workspace()
                .set_transaction_manager(Arc::new(manager));
        }

        Ok(session)
    }

    /// Returns the descriptor keys in the order the transport reported them.
    pub async fn descriptor_keys(&self) -> Result<Vec<String>> {
        Ok(self.load_descriptors().await?.keys().cloned().collect())
    }

    /// Returns the descriptor stored under `key`, or `None` if there is none.
    pub async fn descriptor(&self, key: &str) -> Result<Option<DescriptorValue>> {
        Ok(self.load_descriptors().await?.get(key).cloned())
    }

    /// Returns true if `key` is one of the standard descriptor keys.
    ///
    /// Does not consult the transport.
    pub fn is_standard_descriptor(&self, key: &str) -> bool {
        descriptor::is_standard_descriptor(key)
    }

    async fn load_descriptors(&self) -> Result<&Descriptors> {
        self.inner
            .descriptors
            .get_or_try_init(|| async {
                let transport = self.require_transport()?;
                tracing::debug!("Loading repository descriptors");
                let descriptors = transport.repository_descriptors().await?;
                tracing::debug!(count = descriptors.len(), "Repository descriptors loaded");
                Ok::<_, Error>(descriptors)
            })
            .await
    }

    fn require_transport(&self) -> Result<&Arc<dyn Transport>> {
        self.inner
            .transport
            .as_ref()
            .ok_or_else(|| Error::Repository("no transport configured".to_string()))
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("options", &self.inner.options)
            .field("has_transport", &self.inner.transport.is_some())
            .field("descriptors_loaded", &self.inner.descriptors.initialized())
            .finish()
    }
}

/// Builder for [`Repository`].
pub struct RepositoryBuilder {
    factory: Option<Arc<dyn Factory>>,
    transport: Option<Arc<dyn Transport>>,
    options: RepositoryOptions,
    latch: &'static StreamWrapperLatch,
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self {
            factory: None,
            transport: None,
            options: RepositoryOptions::default(),
            latch: StreamWrapperLatch::global(),
        }
    }
}

impl RepositoryBuilder {
    /// Sets the factory building sessions and transaction managers.
    pub fn factory(mut self, factory: Arc<dyn Factory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets the transport all sessions talk through.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the requested options.
    pub fn options(mut self, options: RepositoryOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses `latch` instead of the process-wide stream registration latch.
    pub fn stream_latch(mut self, latch: &'static StreamWrapperLatch) -> Self {
        self.latch = latch;
        self
    }

    /// Builds the repository, settling transactions and stream registration.
    pub fn build(self) -> Repository {
        let factory = self.factory.unwrap_or_else(|| Arc::new(DefaultFactory));
        let mut options = self.options;

        let transactional = self
            .transport
            .as_ref()
            .is_some_and(|transport| transport.transactional().is_some());
        if options.transactions && !transactional {
            tracing::debug!("Transport is not transactional, disabling transactions");
            options.transactions = false;
        }

        let registered = self.latch.latch(options.stream_wrapper, || {
            factory.register_stream_wrapper(STREAM_SCHEME)
        });
        tracing::debug!(registered, "Binary stream handler state");

        Repository {
            inner: Arc::new(RepositoryInner {
                factory,
                transport: self.transport,
                options,
                descriptors: OnceCell::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::UserTransaction;
    use jcr_runtime::{ErrorKind, FakeTransport, LoginBehavior};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static LATCH: StreamWrapperLatch = StreamWrapperLatch::new();

    fn repository(transport: Arc<FakeTransport>) -> Repository {
        Repository::builder()
            .transport(transport)
            .stream_latch(&LATCH)
            .build()
    }

    #[tokio::test]
    async fn test_login_uses_default_workspace() {
        let transport = FakeTransport::builder().build();
        let session = repository(transport.clone())
            .login(None, None)
            .await
            .unwrap();

        assert_eq!(session.workspace_name(), "default");
        let calls = transport.login_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].workspace, "default");
        assert!(calls[0].credentials.is_none());
    }

    #[tokio::test]
    async fn test_silent_refusal() {
        let transport = FakeTransport::builder()
            .login(LoginBehavior::RefuseSilently)
            .build();

        let err = repository(transport)
            .login(Some(Credentials::simple("user", "pw")), None)
            .await
            .unwrap_err();
        assert!(err.is_unexplained_login_failure());
        assert_eq!(err.kind(), ErrorKind::Repository);
    }

    #[tokio::test]
    async fn test_without_transport() {
        let repo = Repository::builder().stream_latch(&LATCH).build();

        assert!(!repo.options().transactions);
        assert!(matches!(
            repo.login(None, None).await.unwrap_err(),
            Error::Repository(_)
        ));
        assert!(matches!(
            repo.descriptor_keys().await.unwrap_err(),
            Error::Repository(_)
        ));
    }

    #[tokio::test]
    async fn test_transactions_downgraded() {
        let transport = FakeTransport::builder().build();
        let repo = repository(transport);
        assert!(!repo.options().transactions);

        let session = repo.login(None, None).await.unwrap();
        assert!(session.workspace().transaction_manager().is_none());
    }

    #[tokio::test]
    async fn test_disabled_transactions_stay_disabled() {
        let transport = FakeTransport::builder().transactional(true).build();
        let repo = Repository::builder()
            .transport(transport)
            .options(RepositoryOptions::builder().transactions(false).build())
            .stream_latch(&LATCH)
            .build();

        let session = repo.login(None, None).await.unwrap();
        assert!(session.workspace().transaction_manager().is_none());
    }

    #[tokio::test]
    async fn test_descriptor_failure_not_cached() {
        let transport = FakeTransport::builder()
            .descriptor("repository.vendor", "Acme")
            .fail_descriptors(1)
            .build();
        let repo = repository(transport.clone());

        assert!(repo.descriptor("repository.vendor").await.is_err());
        assert_eq!(
            repo.descriptor("repository.vendor").await.unwrap(),
            Some(DescriptorValue::from("Acme"))
        );
        assert_eq!(transport.descriptor_calls(), 2);

        repo.descriptor_keys().await.unwrap();
        assert_eq!(transport.descriptor_calls(), 2);
    }

    #[test]
    fn test_is_standard_descriptor_needs_no_transport() {
        let repo = Repository::builder().stream_latch(&LATCH).build();
        assert!(repo.is_standard_descriptor("jcr.specification.version"));
        assert!(!repo.is_standard_descriptor("JCR.SPECIFICATION.VERSION"));
        assert!(!repo.is_standard_descriptor(""));
    }

    struct FailingFactory {
        fail_session: bool,
    }

    impl Factory for FailingFactory {
        fn new_session(
            &self,
            repository: Repository,
            workspace_name: String,
            credentials: Option<Credentials>,
            transport: Arc<dyn Transport>,
        ) -> Result<Session> {
            if self.fail_session {
                return Err(Error::Repository("session build failed".to_string()));
            }
            Ok(Session::new(repository, workspace_name, credentials, transport))
        }

        fn new_transaction_manager(
            &self,
            _transport: Arc<dyn Transport>,
            _session: &Session,
        ) -> Result<UserTransaction> {
            Err(Error::Repository("transaction manager build failed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_session_setup_logs_out() {
        for fail_session in [true, false] {
            let transport = FakeTransport::builder().transactional(true).build();
            let repo = Repository::builder()
                .factory(Arc::new(FailingFactory { fail_session }))
                .transport(transport.clone())
                .stream_latch(&LATCH)
                .build();

            let err = repo.login(None, None).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Repository);
            assert_eq!(transport.login_calls().len(), 1);
            assert_eq!(transport.logout_calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_refused_login_does_not_log_out() {
        let transport = FakeTransport::builder()
            .login(LoginBehavior::RefuseSilently)
            .build();

        repository(transport.clone()).login(None, None).await.unwrap_err();
        assert_eq!(transport.logout_calls(), 0);
    }

    static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

    struct CountingFactory;

    impl Factory for CountingFactory {
        fn register_stream_wrapper(&self, _scheme: &str) -> Result<()> {
            REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_disabled_first_repository_decides_registration() {
        static DISABLED_FIRST: StreamWrapperLatch = StreamWrapperLatch::new();

        Repository::builder()
            .factory(Arc::new(CountingFactory))
            .options(RepositoryOptions::builder().stream_wrapper(false).build())
            .stream_latch(&DISABLED_FIRST)
            .build();
        Repository::builder()
            .factory(Arc::new(CountingFactory))
            .stream_latch(&DISABLED_FIRST)
            .build();

        assert_eq!(REGISTRATIONS.load(Ordering::SeqCst), 0);
        assert_eq!(DISABLED_FIRST.state(), Some(false));
    }
}
