//! Client: local replica with one revision in flight
//!
//! The client has three states:
//!
//! 1. **Synced**: nothing in flight; local edits are sent immediately.
//! 2. **Awaiting**: one sent revision awaits acknowledgement; the next local
//!    edit starts a buffer.
//! 3. **Buffering**: further local edits are composed into the buffer,
//!    which is sent as soon as the pending acknowledgement arrives.

use crate::document::Document;
use crate::error::{OtError, Result};
use crate::ops::{compose, transform, OperationSequence};
use crate::Revision;
use std::fmt;

/// Synchronization state of a [`Client`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientState {
    /// No revision in flight
    Synced,

    /// One revision sent, no local edits since
    Awaiting,

    /// One revision sent, later local edits buffered
    Buffering,
}

/// Client-side synchronization around a local document
///
/// `send` is called with the base revision and the operations whenever a
/// new revision can go to the server. It is fire-and-forget; the caller
/// reports the server's acknowledgement through [`Client::ack`].
///
/// # Example
///
/// ```rust
/// use synckit_ot::{Client, ClientState, Document, OperationSequence, Revision};
///
/// let mut sent = Vec::new();
/// let mut client = Client::new(Document::from("old!"), |rev: Revision, ops: &OperationSequence| {
///     sent.push((rev, ops.clone()));
/// });
///
/// client.apply(OperationSequence::new().insert("g").retain(4)).unwrap();
/// assert_eq!(client.document().to_string(), "gold!");
/// assert_eq!(client.state(), ClientState::Awaiting);
///
/// client.ack().unwrap();
/// assert_eq!(client.state(), ClientState::Synced);
/// assert_eq!(client.revision(), 1);
///
/// drop(client);
/// assert_eq!(sent.len(), 1);
/// ```
pub struct Client<S> {
    /// Local replica
    document: Document,

    /// Last acknowledged revision
    revision: Revision,

    /// Sent, not yet acknowledged
    outstanding: Option<OperationSequence>,

    /// Applied locally since the outstanding revision was sent
    buffer: Option<OperationSequence>,

    send: S,
}

impl<S> Client<S>
where
    S: FnMut(Revision, &OperationSequence),
{
    /// Create a synced client for a document at revision 0
    pub fn new(document: Document, send: S) -> Self {
        Self::with_revision(document, 0, send)
    }

    /// Create a synced client joining at a known revision
    pub fn with_revision(document: Document, revision: Revision, send: S) -> Self {
        Self {
            document,
            revision,
            outstanding: None,
            buffer: None,
            send,
        }
    }

    /// Apply a local edit and send or buffer it
    ///
    /// # Errors
    ///
    /// Propagates `OtError::Index` / `OtError::Coverage` from the document;
    /// the client is unchanged on error.
    pub fn apply(&mut self, ops: OperationSequence) -> Result<()> {
        self.document.apply(&ops)?;

        match self.state() {
            ClientState::Buffering => {
                if let Some(buffer) = &self.buffer {
                    // buffer output is the text ops was just applied to, so
                    // composition cannot fail here
                    self.buffer = Some(compose(buffer, &ops)?);
                }
            }
            ClientState::Awaiting => self.buffer = Some(ops),
            ClientState::Synced => {
                log::debug!("Sending revision {} ({} ops)", self.revision, ops.len());
                (self.send)(self.revision, &ops);
                self.outstanding = Some(ops);
            }
        }

        Ok(())
    }

    /// Acknowledge the outstanding revision
    ///
    /// Sends the buffer, if any, as the next revision.
    ///
    /// # Errors
    ///
    /// Returns `OtError::Ack` if nothing is outstanding.
    pub fn ack(&mut self) -> Result<()> {
        match self.state() {
            ClientState::Synced => return Err(OtError::Ack),
            ClientState::Awaiting => self.outstanding = None,
            ClientState::Buffering => {
                if let Some(buffer) = self.buffer.take() {
                    log::debug!("Flushing buffer as revision {}", self.revision + 1);
                    (self.send)(self.revision + 1, &buffer);
                    self.outstanding = Some(buffer);
                }
            }
        }

        self.revision += 1;
        log::debug!("Acknowledged revision {}", self.revision);
        Ok(())
    }

    /// Integrate a revision from another participant
    ///
    /// The remote operations are transformed against the outstanding
    /// revision and the buffer, which are rewritten to apply after them.
    /// Returns the operations that were applied to the local document.
    ///
    /// # Errors
    ///
    /// Propagates transform and apply failures; the client is unchanged on
    /// error.
    pub fn recv(&mut self, ops: OperationSequence) -> Result<OperationSequence> {
        let mut remote = ops;

        let outstanding = match &self.outstanding {
            Some(outstanding) => {
                // local ops go first, as they will on the server
                let (rebased, transformed) = transform(outstanding, &remote)?;
                remote = transformed;
                Some(rebased)
            }
            None => None,
        };

        let buffer = match &self.buffer {
            Some(buffer) => {
                let (rebased, transformed) = transform(buffer, &remote)?;
                remote = transformed;
                Some(rebased)
            }
            None => None,
        };

        self.document.apply(&remote)?;
        self.outstanding = outstanding;
        self.buffer = buffer;
        self.revision += 1;

        log::debug!("Integrated remote revision {}", self.revision);
        Ok(remote)
    }
}

impl<S> Client<S> {
    /// Current synchronization state
    pub fn state(&self) -> ClientState {
        match (&self.outstanding, &self.buffer) {
            (None, _) => ClientState::Synced,
            (Some(_), None) => ClientState::Awaiting,
            (Some(_), Some(_)) => ClientState::Buffering,
        }
    }

    /// Local document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Last acknowledged revision
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Revision in flight, if any
    pub fn outstanding(&self) -> Option<&OperationSequence> {
        self.outstanding.as_ref()
    }

    /// Buffered local edits, if any
    pub fn buffer(&self) -> Option<&OperationSequence> {
        self.buffer.as_ref()
    }
}

impl<S> fmt::Debug for Client<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("document", &self.document)
            .field("revision", &self.revision)
            .field("outstanding", &self.outstanding)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}
