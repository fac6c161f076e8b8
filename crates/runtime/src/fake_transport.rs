//! Fake transport for testing the repository core without a server.
//!
//! Provides an in-memory [`Transport`] whose answers are configured up front
//! and which records every call it receives.
//!
//! # Example
//!
//! ```ignore
//! let transport = FakeTransport::builder()
//!     .workspaces(["ws1"])
//!     .descriptor("identifier.stable", "true")
//!     .build();
//!
//! let repository = Repository::new(None, Some(transport.clone()), None);
//! let session = repository.login(Some(Credentials::simple("user", "pw")), Some("ws1")).await?;
//! assert_eq!(transport.login_calls()[0].workspace, "ws1");
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use jcr_protocol::{Credentials, DescriptorValue, Descriptors};
use parking_lot::Mutex;

use crate::error::Error;
use crate::transport::{TransactionalTransport, Transport, TransportFuture};

/// How the fake answers a login for a known workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginBehavior {
	/// Return `Ok(true)`.
	Accept,
	/// Return `Ok(false)` without an error.
	RefuseSilently,
	/// Return [`Error::LoginFailed`] with the message.
	RejectCredentials(String),
	/// Return [`Error::TransportError`] with the message.
	TransportFailure(String),
}

/// A login the fake received.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginCall {
	pub credentials: Option<Credentials>,
	pub workspace: String,
}

/// Builder for [`FakeTransport`].
#[derive(Debug, Clone)]
pub struct FakeTransportBuilder {
	login: LoginBehavior,
	workspaces: Option<BTreeSet<String>>,
	descriptors: Descriptors,
	descriptor_failures: usize,
	descriptor_delay: Option<Duration>,
	transactional: bool,
	binaries: HashMap<String, Vec<u8>>,
}

impl FakeTransportBuilder {
	pub fn new() -> Self {
		Self {
			login: LoginBehavior::Accept,
			workspaces: None,
			descriptors: Descriptors::new(),
			descriptor_failures: 0,
			descriptor_delay: None,
			transactional: false,
			binaries: HashMap::new(),
		}
	}

	/// Sets the login answer for known workspaces.
	pub fn login(mut self, behavior: LoginBehavior) -> Self {
		self.login = behavior;
		self
	}

	/// Restricts the known workspaces; others fail with [`Error::NoSuchWorkspace`].
	///
	/// Without this every workspace name is accepted.
	pub fn workspaces<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.workspaces = Some(names.into_iter().map(Into::into).collect());
		self
	}

	/// Adds a descriptor to the map returned by `repository_descriptors`.
	pub fn descriptor(mut self, key: impl Into<String>, value: impl Into<DescriptorValue>) -> Self {
		self.descriptors.insert(key.into(), value.into());
		self
	}

	/// Makes the first `count` descriptor fetches fail.
	pub fn fail_descriptors(mut self, count: usize) -> Self {
		self.descriptor_failures = count;
		self
	}

	/// Delays every descriptor fetch.
	pub fn descriptor_delay(mut self, delay: Duration) -> Self {
		self.descriptor_delay = Some(delay);
		self
	}

	/// Advertises the transaction capability.
	pub fn transactional(mut self, transactional: bool) -> Self {
		self.transactional = transactional;
		self
	}

	/// Serves `content` for the binary property at `path`.
	pub fn binary(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
		self.binaries.insert(path.into(), content.into());
		self
	}

	pub fn build(self) -> Arc<FakeTransport> {
		Arc::new(FakeTransport {
			config: self,
			login_calls: Mutex::new(Vec::new()),
			descriptor_calls: AtomicUsize::new(0),
			logout_calls: AtomicUsize::new(0),
			transaction_calls: Mutex::new(Vec::new()),
			transaction_timeout: AtomicU64::new(0),
			last_transaction_id: AtomicUsize::new(0),
		})
	}
}

impl Default for FakeTransportBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// In-memory transport with scripted answers and call recording.
pub struct FakeTransport {
	config: FakeTransportBuilder,
	login_calls: Mutex<Vec<LoginCall>>,
	descriptor_calls: AtomicUsize,
	logout_calls: AtomicUsize,
	transaction_calls: Mutex<Vec<&'static str>>,
	transaction_timeout: AtomicU64,
	last_transaction_id: AtomicUsize,
}

impl FakeTransport {
	pub fn builder() -> FakeTransportBuilder {
		FakeTransportBuilder::new()
	}

	/// Logins received so far, oldest first.
	pub fn login_calls(&self) -> Vec<LoginCall> {
		self.login_calls.lock().clone()
	}

	/// Number of `repository_descriptors` calls, failed ones included.
	pub fn descriptor_calls(&self) -> usize {
		self.descriptor_calls.load(Ordering::SeqCst)
	}

	pub fn logout_calls(&self) -> usize {
		self.logout_calls.load(Ordering::SeqCst)
	}

	/// Transaction operations received so far (`"begin"`, `"commit"`, `"rollback"`).
	pub fn transaction_calls(&self) -> Vec<&'static str> {
		self.transaction_calls.lock().clone()
	}

	/// Last timeout passed to `set_transaction_timeout`, 0 if never set.
	pub fn transaction_timeout(&self) -> u64 {
		self.transaction_timeout.load(Ordering::SeqCst)
	}
}

impl Transport for FakeTransport {
	fn login<'a>(
		&'a self,
		credentials: Option<&'a Credentials>,
		workspace_name: &'a str,
	) -> TransportFuture<'a, bool> {
		Box::pin(async move {
			self.login_calls.lock().push(LoginCall {
				credentials: credentials.cloned(),
				workspace: workspace_name.to_string(),
			});

			if let Some(known) = &self.config.workspaces {
				if !known.contains(workspace_name) {
					return Err(Error::NoSuchWorkspace(workspace_name.to_string()));
				}
			}

			match &self.config.login {
				LoginBehavior::Accept => Ok(true),
				LoginBehavior::RefuseSilently => Ok(false),
				LoginBehavior::RejectCredentials(message) => {
					Err(Error::LoginFailed(message.clone()))
				}
				LoginBehavior::TransportFailure(message) => {
					Err(Error::TransportError(message.clone()))
				}
			}
		})
	}

	fn repository_descriptors(&self) -> TransportFuture<'_, Descriptors> {
		Box::pin(async move {
			let call = self.descriptor_calls.fetch_add(1, Ordering::SeqCst);
			if let Some(delay) = self.config.descriptor_delay {
				tokio::time::sleep(delay).await;
			}
			if call < self.config.descriptor_failures {
				return Err(Error::TransportError(
					"descriptor request failed".to_string(),
				));
			}
			Ok(self.config.descriptors.clone())
		})
	}

	fn logout(&self) -> TransportFuture<'_, ()> {
		Box::pin(async move {
			self.logout_calls.fetch_add(1, Ordering::SeqCst);
			Ok(())
		})
	}

	fn binary_stream<'a>(&'a self, path: &'a str) -> TransportFuture<'a, Vec<u8>> {
		Box::pin(async move {
			self.config
				.binaries
				.get(path)
				.cloned()
				.ok_or_else(|| Error::Repository(format!("no binary property at {}", path)))
		})
	}

	fn transactional(&self) -> Option<&dyn TransactionalTransport> {
		if self.config.transactional {
			Some(self)
		} else {
			None
		}
	}
}

impl TransactionalTransport for FakeTransport {
	fn begin_transaction(&self) -> TransportFuture<'_, String> {
		Box::pin(async move {
			self.transaction_calls.lock().push("begin");
			let id = self.last_transaction_id.fetch_add(1, Ordering::SeqCst) + 1;
			Ok(format!("tx-{}", id))
		})
	}

	fn commit_transaction(&self) -> TransportFuture<'_, ()> {
		Box::pin(async move {
			self.transaction_calls.lock().push("commit");
			Ok(())
		})
	}

	fn rollback_transaction(&self) -> TransportFuture<'_, ()> {
		Box::pin(async move {
			self.transaction_calls.lock().push("rollback");
			Ok(())
		})
	}

	fn set_transaction_timeout(&self, seconds: u64) {
		self.transaction_timeout.store(seconds, Ordering::SeqCst);
	}
}
