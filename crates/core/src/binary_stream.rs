//! Binary stream wrapper - resolves `jcr://<session-token>/<path>` URLs.
//!
//! Every live [`Session`] is indexed here by its token. The wrapper registered
//! under [`STREAM_SCHEME`](jcr_protocol::STREAM_SCHEME) looks the session up
//! from the URL authority and asks its transport for the property bytes.
//!
//! Sessions are indexed whether or not the process registered the wrapper:
//! an application may register [`BinaryStreamWrapper`] itself, under any
//! scheme, after repositories were created with the wrapper disabled.

use crate::session::{Session, WeakSession};
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use jcr_runtime::stream::{BinaryStreamHandler, StreamUrl};
use jcr_runtime::{Error, Result};
use std::sync::LazyLock;

static SESSIONS: LazyLock<DashMap<String, WeakSession>> = LazyLock::new(DashMap::new);

pub(crate) fn register_session(session: &Session) {
    SESSIONS.insert(session.token().to_string(), session.downgrade());
}

pub(crate) fn unregister_session(token: &str) {
    SESSIONS.remove(token);
}

/// Returns the live session registered under `token`.
pub fn session_for_token(token: &str) -> Option<Session> {
    // Clone out of the map before upgrading: dropping the upgraded session
    // may re-enter the map through `unregister_session`.
    let weak = SESSIONS.get(token).map(|entry| entry.value().clone())?;
    weak.upgrade().filter(Session::is_live)
}

/// Stream handler serving binary properties of live sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryStreamWrapper;

impl BinaryStreamHandler for BinaryStreamWrapper {
    fn open<'a>(&'a self, url: &'a StreamUrl) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let session = session_for_token(url.authority())
                .ok_or_else(|| Error::SessionClosed(format!("no live session for {}", url)))?;

            tracing::debug!(
                token = %session.token(),
                path = %url.path(),
                "Opening binary stream"
            );
            session.transport().binary_stream(url.path()).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repository;
    use jcr_runtime::FakeTransport;
    use jcr_runtime::stream::StreamWrapperLatch;

    static LATCH: StreamWrapperLatch = StreamWrapperLatch::new();

    fn session_over(transport: std::sync::Arc<FakeTransport>) -> Session {
        let repository = Repository::builder()
            .transport(transport.clone())
            .stream_latch(&LATCH)
            .build();
        Session::new(repository, "default", None, transport)
    }

    #[tokio::test]
    async fn test_open_through_session() {
        let transport = FakeTransport::builder()
            .binary("/content/file/jcr:data", b"hello".to_vec())
            .build();
        let session = session_over(transport);

        let url = StreamUrl::parse(&session.binary_url("/content/file/jcr:data").unwrap()).unwrap();
        let bytes = BinaryStreamWrapper.open(&url).await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn test_logged_out_session_not_resolved() {
        let transport = FakeTransport::builder()
            .binary("/a", b"x".to_vec())
            .build();
        let session = session_over(transport);
        let url = StreamUrl::parse(&session.binary_url("/a").unwrap()).unwrap();

        session.logout().await.unwrap();
        assert!(session_for_token(session.token()).is_none());
        assert!(matches!(
            BinaryStreamWrapper.open(&url).await.unwrap_err(),
            Error::SessionClosed(_)
        ));
    }

    #[tokio::test]
    async fn test_dropped_session_unregisters() {
        let transport = FakeTransport::builder().build();
        let session = session_over(transport);
        let token = session.token().to_string();
        assert!(session_for_token(&token).is_some());

        drop(session);
        assert!(!SESSIONS.contains_key(&token));
    }

    #[tokio::test]
    async fn test_sessions_indexed_with_wrapper_disabled() {
        static DISABLED: StreamWrapperLatch = StreamWrapperLatch::new();

        let transport = FakeTransport::builder()
            .binary("/doc/jcr:data", b"body".to_vec())
            .build();
        let repository = Repository::builder()
            .transport(transport.clone())
            .options(
                jcr_protocol::RepositoryOptions::builder()
                    .stream_wrapper(false)
                    .build(),
            )
            .stream_latch(&DISABLED)
            .build();
        let session = Session::new(repository, "default", None, transport);

        assert_eq!(DISABLED.state(), Some(false));
        assert!(session_for_token(session.token()).is_some());

        let url = StreamUrl::new("files", session.token(), "/doc/jcr:data").unwrap();
        assert_eq!(BinaryStreamWrapper.open(&url).await.unwrap(), b"body");
    }
}
