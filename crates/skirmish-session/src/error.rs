//! Error types for the session layer.

use crate::SessionOp;

/// Errors returned by [`SessionDirectory`](crate::SessionDirectory).
///
/// The same message is also stored in the directory state under the
/// operation's key, so callers that only render state can ignore the
/// returned value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The backend refused or failed the request.
    #[error("{op} failed: {message}")]
    Rejected { op: SessionOp, message: String },
}

impl SessionError {
    /// The normalized message, as stored under the operation's key.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
        }
    }
}
