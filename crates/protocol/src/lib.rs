//! Data types for the content repository client.
//!
//! This crate contains the serde-serializable types exchanged between the
//! repository core and its transports. These types represent the "data layer"
//! of the client: what a transport returns and what a caller passes in.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization and simple accessors
//! - **Transport-neutral**: Nothing here knows about HTTP or WebDAV
//! - **Stable**: Changes only when the repository contract changes
//!
//! The session and repository objects are built on top of these types in `jcr-rs`.

pub mod credentials;
pub mod descriptor;
pub mod options;

pub use credentials::*;
pub use descriptor::*;
pub use options::*;
