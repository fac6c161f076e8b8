//! jcr: Rust client core for hierarchical content repositories
//!
//! This crate provides the entry point a client application talks to: a
//! [`Repository`] bound to a [`Transport`](jcr_runtime::Transport) hands out
//! authenticated [`Session`]s and exposes the server's descriptor table.
//!
//! # Examples
//!
//! ## Login and descriptors
//!
//! ```ignore
//! use jcr::{Credentials, Repository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = my_webdav_transport("http://localhost:8080/server/");
//!     let repository = Repository::builder().transport(transport).build();
//!
//!     let session = repository
//!         .login(Some(Credentials::simple("admin", "admin")), Some("ws1"))
//!         .await?;
//!     assert_eq!(session.workspace().name(), "ws1");
//!
//!     let vendor = repository.descriptor("jcr.repository.vendor").await?;
//!     println!("vendor: {:?}", vendor);
//!
//!     session.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions
//!
//! ```ignore
//! let session = repository.login(credentials, None).await?;
//! if let Some(tx) = session.workspace().transaction_manager() {
//!     tx.begin().await?;
//!     // ... write through the transport ...
//!     tx.commit().await?;
//! }
//! ```
//!
//! ## Binary streams
//!
//! ```ignore
//! let url = session.binary_url("/content/report.pdf/jcr:content/jcr:data")?;
//! let bytes = jcr::jcr_runtime::stream::open(&url).await?;
//! ```

pub mod binary_stream;
pub mod factory;
pub mod parameters;
pub mod repository;
pub mod session;
pub mod transaction;
pub mod workspace;

pub use binary_stream::BinaryStreamWrapper;
pub use factory::{DefaultFactory, Factory};
pub use repository::{Repository, RepositoryBuilder};
pub use session::{Session, WeakSession};
pub use transaction::UserTransaction;
pub use workspace::Workspace;

pub use jcr_protocol::{
    Credentials, DEFAULT_WORKSPACE, DescriptorValue, Descriptors, RepositoryOptions,
    RepositoryOptionsBuilder, STREAM_SCHEME, SimpleCredentials,
};
pub use jcr_runtime::{Error, ErrorKind, Result, TransactionalTransport, Transport};

pub use jcr_protocol;
pub use jcr_runtime;
