//! Transport contracts.
//!
//! A transport carries out the actual communication with the remote
//! repository (HTTP/WebDAV calls, a database connection, ...). The repository
//! core only ever talks to a server through these traits.
//!
//! # Capabilities
//!
//! Every transport implements [`Transport`]. Transports that can run
//! server-side transactions also implement [`TransactionalTransport`] and
//! advertise it through [`Transport::transactional`]. The repository checks
//! that marker once, at construction.

use futures_util::future::BoxFuture;
use jcr_protocol::{Credentials, Descriptors};

use crate::error::{Error, Result};

/// Boxed future returned by transport methods.
pub type TransportFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// Connection to a content repository server.
///
/// Implementations map server failures onto [`Error`]:
/// [`Error::LoginFailed`] for rejected credentials,
/// [`Error::NoSuchWorkspace`] for an unknown workspace and
/// [`Error::TransportError`] or [`Error::Repository`] for anything else.
pub trait Transport: Send + Sync {
	/// Authenticates against `workspace_name`.
	///
	/// Returns `Ok(false)` if the login failed and the transport has no more
	/// specific error to report.
	fn login<'a>(
		&'a self,
		credentials: Option<&'a Credentials>,
		workspace_name: &'a str,
	) -> TransportFuture<'a, bool>;

	/// Fetches the repository descriptors.
	fn repository_descriptors(&self) -> TransportFuture<'_, Descriptors>;

	/// Releases server-side resources held for the logged-in user.
	fn logout(&self) -> TransportFuture<'_, ()> {
		Box::pin(async { Ok(()) })
	}

	/// Reads the full content of the binary property at `path`.
	fn binary_stream<'a>(&'a self, path: &'a str) -> TransportFuture<'a, Vec<u8>> {
		Box::pin(async move {
			Err(Error::Unsupported(format!(
				"transport cannot read binary property {}",
				path
			)))
		})
	}

	/// Returns the transaction capability, if this transport has one.
	fn transactional(&self) -> Option<&dyn TransactionalTransport> {
		None
	}
}

/// Transaction control offered by some transports.
pub trait TransactionalTransport: Send + Sync {
	/// Starts a transaction and returns the server's transaction token.
	fn begin_transaction(&self) -> TransportFuture<'_, String>;

	/// Commits the current transaction.
	fn commit_transaction(&self) -> TransportFuture<'_, ()>;

	/// Rolls back the current transaction.
	fn rollback_transaction(&self) -> TransportFuture<'_, ()>;

	/// Sets the timeout in seconds applied to transactions begun afterwards.
	fn set_transaction_timeout(&self, seconds: u64);
}

#[cfg(test)]
mod tests;
