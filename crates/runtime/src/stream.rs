//! Process-wide binary stream handlers.
//!
//! Binary property values can be large, so instead of loading them eagerly
//! the client hands out URLs of the form `scheme://authority/path` that are
//! resolved on demand by a [`BinaryStreamHandler`] registered for `scheme`.
//!
//! Registration is process-wide. [`StreamWrapperLatch`] guarantees the
//! repository attempts it at most once per process, whichever repository
//! instance is constructed first.

use std::sync::{Arc, LazyLock, OnceLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::future::BoxFuture;

use crate::error::{Error, Result};

/// Resolves stream URLs for one scheme.
pub trait BinaryStreamHandler: Send + Sync {
	/// Reads the full content addressed by `url`.
	fn open<'a>(&'a self, url: &'a StreamUrl) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// A parsed `scheme://authority/path` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUrl {
	scheme: String,
	authority: String,
	path: String,
}

impl StreamUrl {
	/// Builds a URL from its parts. `path` must be absolute.
	pub fn new(
		scheme: impl Into<String>,
		authority: impl Into<String>,
		path: impl Into<String>,
	) -> Result<Self> {
		let url = Self {
			scheme: scheme.into(),
			authority: authority.into(),
			path: path.into(),
		};
		if url.scheme.is_empty() || url.authority.is_empty() || !url.path.starts_with('/') {
			return Err(Error::InvalidStreamUrl(url.to_string()));
		}
		Ok(url)
	}

	/// Parses `scheme://authority/path`.
	pub fn parse(url: &str) -> Result<Self> {
		let (scheme, rest) = url
			.split_once("://")
			.ok_or_else(|| Error::InvalidStreamUrl(url.to_string()))?;
		let slash = rest
			.find('/')
			.ok_or_else(|| Error::InvalidStreamUrl(url.to_string()))?;
		let (authority, path) = rest.split_at(slash);
		Self::new(scheme, authority, path).map_err(|_| Error::InvalidStreamUrl(url.to_string()))
	}

	pub fn scheme(&self) -> &str {
		&self.scheme
	}

	pub fn authority(&self) -> &str {
		&self.authority
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

impl std::fmt::Display for StreamUrl {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
	}
}

static HANDLERS: LazyLock<DashMap<String, Arc<dyn BinaryStreamHandler>>> =
	LazyLock::new(DashMap::new);

/// Registers `handler` for `scheme`.
///
/// Fails with [`Error::SchemeAlreadyRegistered`] if the scheme is taken.
pub fn register_handler(scheme: &str, handler: Arc<dyn BinaryStreamHandler>) -> Result<()> {
	match HANDLERS.entry(scheme.to_string()) {
		Entry::Occupied(_) => Err(Error::SchemeAlreadyRegistered(scheme.to_string())),
		Entry::Vacant(slot) => {
			slot.insert(handler);
			tracing::debug!(scheme, "Registered binary stream handler");
			Ok(())
		}
	}
}

/// Removes the handler for `scheme`. Returns true if one was registered.
pub fn unregister_handler(scheme: &str) -> bool {
	HANDLERS.remove(scheme).is_some()
}

/// Returns the handler registered for `scheme`.
pub fn handler(scheme: &str) -> Option<Arc<dyn BinaryStreamHandler>> {
	HANDLERS.get(scheme).map(|entry| Arc::clone(entry.value()))
}

/// Returns true if a handler is registered for `scheme`.
pub fn is_registered(scheme: &str) -> bool {
	HANDLERS.contains_key(scheme)
}

/// Resolves `url` through the handler registered for its scheme.
pub async fn open(url: &str) -> Result<Vec<u8>> {
	let url = StreamUrl::parse(url)?;
	let handler = handler(url.scheme()).ok_or_else(|| {
		Error::Unsupported(format!("no stream handler registered for {}://", url.scheme()))
	})?;
	handler.open(&url).await
}

/// One-time latch deciding whether the stream handler gets registered.
///
/// The first call to [`StreamWrapperLatch::latch`] decides the outcome for
/// the lifetime of the latch; later calls return the recorded outcome without
/// running their registration closure. Concurrent first calls block until the
/// winner has finished.
pub struct StreamWrapperLatch {
	state: OnceLock<bool>,
}

static GLOBAL_LATCH: StreamWrapperLatch = StreamWrapperLatch::new();

impl StreamWrapperLatch {
	pub const fn new() -> Self {
		Self {
			state: OnceLock::new(),
		}
	}

	/// The latch shared by every repository in the process.
	pub fn global() -> &'static StreamWrapperLatch {
		&GLOBAL_LATCH
	}

	/// Decides the latch if still open, running `register` when `enabled`.
	///
	/// Returns whether the handler ended up registered. A failing `register`
	/// latches `false`.
	pub fn latch<F>(&self, enabled: bool, register: F) -> bool
	where
		F: FnOnce() -> Result<()>,
	{
		*self.state.get_or_init(|| {
			if !enabled {
				tracing::debug!("Binary stream handler disabled by configuration");
				return false;
			}
			match register() {
				Ok(()) => true,
				Err(e) => {
					tracing::warn!("Failed to register binary stream handler: {}", e);
					false
				}
			}
		})
	}

	/// Returns the latched outcome, or `None` if not decided yet.
	pub fn state(&self) -> Option<bool> {
		self.state.get().copied()
	}
}

impl Default for StreamWrapperLatch {
	fn default() -> Self {
		Self::new()
	}
}
