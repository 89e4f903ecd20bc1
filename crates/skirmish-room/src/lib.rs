//! Room connectivity for Skirmish.
//!
//! Tracks which real-time rooms this client is connected to and who is
//! in them. Rooms are independent of game sessions.
//!
//! # Key types
//!
//! - [`ConnectionManager`] — synchronous reducer over rooms and link state
//! - [`RoomEvent`] — transport events, applied 1:1 to the manager
//! - [`RoomFeed`] — async pump from a [`Connection`](skirmish_transport::Connection)
//!   into a shared manager
//! - [`Room`] — one room's local view

mod error;
mod event;
mod feed;
mod manager;
mod room;

pub use error::RoomError;
pub use event::RoomEvent;
pub use feed::RoomFeed;
pub use manager::ConnectionManager;
pub use room::Room;
