//! Shared vocabulary for Skirmish.
//!
//! This crate defines what every other layer agrees on:
//!
//! - **Types** ([`PlayerId`], [`RoomId`], [`SessionId`], [`Envelope`], etc.) —
//!   identities and the wrapper that travels on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to/from bytes.
//! - **Status** ([`OpTracker`]) — per-operation loading/error bookkeeping
//!   shared by the combat store and the session directory.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope<Event>) → Room / Session reducers
//! ```

mod codec;
mod error;
mod status;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use status::OpTracker;
pub use types::{
    CampaignId, Envelope, ParticipantId, PlayerId, RoomId, SessionId, now_millis,
};
