//! SyncKit OT - operational transformation for collaborative text editing
//!
//! This crate is compiled to both native and WASM.
//! It implements:
//! - A line-indexed document addressed by a single linear index
//! - Edit scripts (retain / delete / insert) with compose and transform
//! - A client state machine keeping one revision in flight
//! - A server that orders revisions into a linear history
//!
//! # Examples
//!
//! ```rust
//! use synckit_ot::{Document, OperationSequence, Server};
//!
//! let mut server = Server::new(Document::from("hello"));
//!
//! // two clients edit revision 0 concurrently
//! let first = OperationSequence::new().retain(5).insert(" world");
//! let second = OperationSequence::new().insert("> ").retain(5);
//!
//! server.receive(0, first).unwrap();
//! let (rebased, revision) = server.receive(0, second).unwrap();
//!
//! assert_eq!(rebased, OperationSequence::new().insert("> ").retain(11));
//! assert_eq!(revision, 2);
//! assert_eq!(server.document().to_string(), "> hello world");
//! ```

pub mod document;
pub mod error;
pub mod ops;
pub mod sync;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use document::{Document, Position};
pub use error::{OtError, Result};
pub use ops::{compose, transform, Operation, OperationSequence};
pub use sync::{Client, ClientState, Server};

/// Number of revisions accepted by the server
pub type Revision = usize;
