//! Error types for the repository client.

use thiserror::Error;

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message used when a transport rejects a login without raising an error itself.
pub const LOGIN_FAILED_WITHOUT_REASON: &str = "transport failed to login without telling why";

/// Errors that can occur talking to a content repository.
#[derive(Debug, Error)]
pub enum Error {
	/// Credentials were rejected, or the user may not access the workspace.
	#[error("Login failed: {0}")]
	LoginFailed(String),

	/// The requested workspace does not exist.
	#[error("No such workspace: {0}")]
	NoSuchWorkspace(String),

	/// Generic repository failure.
	#[error("Repository error: {0}")]
	Repository(String),

	/// Transport-level failure (network, protocol, server response).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// The transport or repository does not support the operation.
	#[error("Unsupported repository operation: {0}")]
	Unsupported(String),

	/// Invalid argument provided to a method.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// Transaction method called in the wrong state.
	#[error("Invalid transaction state: {0}")]
	InvalidTransactionState(String),

	/// The session was logged out or dropped.
	#[error("Session is not live: {0}")]
	SessionClosed(String),

	/// A binary stream handler is already registered for the scheme.
	#[error("Stream scheme already registered: {0}")]
	SchemeAlreadyRegistered(String),

	/// URL could not be parsed as `scheme://authority/path`.
	#[error("Invalid stream URL: {0}")]
	InvalidStreamUrl(String),
}

/// The error kinds callers of `login` and descriptor access must distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Credentials or workspace access rejected.
	Authentication,
	/// Unrecognized workspace name.
	NoSuchWorkspace,
	/// Anything else.
	Repository,
}

impl Error {
	/// Folds this error into one of the three caller-facing kinds.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::LoginFailed(_) => ErrorKind::Authentication,
			Error::NoSuchWorkspace(_) => ErrorKind::NoSuchWorkspace,
			_ => ErrorKind::Repository,
		}
	}

	/// Returns true if credentials or workspace access were rejected.
	pub fn is_authentication(&self) -> bool {
		self.kind() == ErrorKind::Authentication
	}

	/// Returns true if the workspace was not found.
	pub fn is_no_such_workspace(&self) -> bool {
		self.kind() == ErrorKind::NoSuchWorkspace
	}

	/// Returns true if the transport reported a failed login without a reason.
	pub fn is_unexplained_login_failure(&self) -> bool {
		matches!(self, Error::Repository(message) if message == LOGIN_FAILED_WITHOUT_REASON)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_kinds() {
		assert_eq!(
			Error::LoginFailed("bad password".into()).kind(),
			ErrorKind::Authentication
		);
		assert_eq!(
			Error::NoSuchWorkspace("ws9".into()).kind(),
			ErrorKind::NoSuchWorkspace
		);
		assert_eq!(
			Error::TransportError("connection reset".into()).kind(),
			ErrorKind::Repository
		);
		assert_eq!(Error::Unsupported("x".into()).kind(), ErrorKind::Repository);
	}

	#[test]
	fn test_unexplained_login_failure() {
		let err = Error::Repository(LOGIN_FAILED_WITHOUT_REASON.to_string());
		assert!(err.is_unexplained_login_failure());
		assert_eq!(
			err.to_string(),
			"Repository error: transport failed to login without telling why"
		);
		assert!(!Error::Repository("other".into()).is_unexplained_login_failure());
	}
}
