//! Repository client runtime - transports, errors, and stream handlers
//!
//! This crate provides the low-level infrastructure shared by the repository
//! core and the transports that talk to a server:
//!
//! - **Transport contracts**: the [`Transport`] trait every backend implements,
//!   plus the optional [`TransactionalTransport`] capability
//! - **Errors**: one [`Error`] type and the [`ErrorKind`] folding callers rely on
//! - **Binary streams**: the process-wide scheme registry and the once-per-process
//!   [`StreamWrapperLatch`]
//! - **Fake transport**: an in-memory transport for tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    jcr-rs    │  Repository, Session, Workspace, UserTransaction
//! └──────┬───────┘
//!        │ calls through Transport
//! ┌──────▼───────┐
//! │ jcr-runtime  │  This crate
//! │  ┌────────┐  │
//! │  │ Trans  │  │  Transport / TransactionalTransport
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Stream │  │  Scheme registry + latch
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod error;
pub mod fake_transport;
pub mod stream;
pub mod transport;

pub use error::{Error, ErrorKind, LOGIN_FAILED_WITHOUT_REASON, Result};
pub use fake_transport::{FakeTransport, FakeTransportBuilder, LoginBehavior, LoginCall};
pub use stream::{BinaryStreamHandler, StreamUrl, StreamWrapperLatch};
pub use transport::{TransactionalTransport, Transport, TransportFuture};
