//! Server: authoritative document and revision history

use crate::document::Document;
use crate::error::{OtError, Result};
use crate::ops::{transform, OperationSequence};
use crate::Revision;

/// Authoritative copy of a document
///
/// Every accepted revision is kept in `history`; its length is the current
/// revision. Clients submit operations together with the revision they were
/// based on and the server transforms them past everything accepted since.
///
/// # Example
///
/// ```rust
/// use synckit_ot::{Document, OperationSequence, Server};
///
/// let mut server = Server::new(Document::from("abc"));
/// server.receive(0, OperationSequence::new().retain(1).insert("tag").retain(2)).unwrap();
///
/// // based on revision 0, so it is moved past the earlier insert
/// let (ops, revision) = server
///     .receive(0, OperationSequence::new().retain(1).delete(2))
///     .unwrap();
/// assert_eq!(ops, OperationSequence::new().retain(4).delete(2));
/// assert_eq!(revision, 2);
/// assert_eq!(server.document().to_string(), "atag");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Server {
    document: Document,
    history: Vec<OperationSequence>,
}

impl Server {
    /// Create a server at revision 0
    pub fn new(document: Document) -> Self {
        Self {
            document,
            history: Vec::new(),
        }
    }

    /// Accept operations based on revision `base`
    ///
    /// Returns the operations as applied, to be broadcast to the other
    /// clients, and the new revision number.
    ///
    /// # Errors
    ///
    /// - `OtError::Revision` if `base` is newer than the current revision
    /// - `OtError::Coverage` / `OtError::Index` if the operations do not fit
    ///   the document at `base`
    /// - `OtError::Overflow` if the operation counts do not fit in `usize`
    ///
    /// On error nothing is recorded.
    pub fn receive(&mut self, base: Revision, ops: OperationSequence) -> Result<(OperationSequence, Revision)> {
        let concurrent = self.history_since(base).inspect_err(|_| {
            log::warn!("Rejected ops based on unknown revision {} (at {})", base, self.history.len());
        })?;

        let mut ops = ops;
        for accepted in concurrent {
            ops = transform(&ops, accepted)?.0;
        }

        self.document.apply(&ops)?;
        self.history.push(ops.clone());

        log::debug!(
            "Accepted revision {} (base {}, transformed past {})",
            self.history.len(),
            base,
            self.history.len() - 1 - base
        );
        Ok((ops, self.history.len()))
    }

    /// Current revision
    pub fn revision(&self) -> Revision {
        self.history.len()
    }

    /// Authoritative document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All accepted revisions, oldest first
    pub fn history(&self) -> &[OperationSequence] {
        &self.history
    }

    /// Revisions accepted after `base`, for catching up a client
    ///
    /// # Errors
    ///
    /// Returns `OtError::Revision` if `base` is newer than the current
    /// revision.
    pub fn history_since(&self, base: Revision) -> Result<&[OperationSequence]> {
        self.history.get(base..).ok_or(OtError::Revision {
            revision: base,
            current: self.history.len(),
        })
    }
}
