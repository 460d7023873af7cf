//! Error types for document, algebra and synchronization failures
//!
//! Every failure is local to a single call and leaves the receiver in the
//! state it had before the call.

use thiserror::Error;

/// Errors produced by the OT engine
#[derive(Debug, Error)]
pub enum OtError {
    /// An index or position lies outside the current document
    #[error("invalid document index {index} (document size {size})")]
    Index { index: usize, size: usize },

    /// An operation sequence does not exactly cover its target document
    #[error("operation sequence covers {covered} units, target has {expected}")]
    Coverage { expected: usize, covered: usize },

    /// The server received an unknown or future base revision
    #[error("revision {revision} not in history (current revision {current})")]
    Revision { revision: usize, current: usize },

    /// The client was acknowledged with nothing outstanding
    #[error("no pending operation to acknowledge")]
    Ack,

    /// Operation counts add up to more than `usize` can hold
    #[error("operation counts exceed the addressable range")]
    Overflow,

    /// Text input is not valid UTF-8
    #[error("invalid UTF-8 at {line}:{column}")]
    Decode { line: usize, column: usize },

    /// The underlying reader failed during ingestion
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OT operations
pub type Result<T> = std::result::Result<T, OtError>;
