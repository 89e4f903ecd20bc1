//! Error types for the protocol layer.
//!
//! Each crate in Skirmish defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization, not in
//! networking, combat rules or session bookkeeping.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, or an
    /// event `type` tag this client doesn't know.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
