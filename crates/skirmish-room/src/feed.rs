//! Room feed: pumps transport frames into the connection manager.
//!
//! Each connection gets one feed task. The feed owns the receive side of
//! the connection and holds the manager lock only while applying a
//! single event, so readers (the UI) never wait on the network.

use std::sync::Arc;

use skirmish_protocol::{Codec, Envelope};
use skirmish_transport::Connection;
use tokio::sync::Mutex;

use crate::{ConnectionManager, RoomError, RoomEvent};

/// Reads `Envelope<RoomEvent>` frames from a connection and applies them.
pub struct RoomFeed<C: Connection, K: Codec> {
    conn: C,
    codec: K,
    manager: Arc<Mutex<ConnectionManager>>,
}

impl<C: Connection, K: Codec> RoomFeed<C, K> {
    /// Creates a feed that applies events to `manager`.
    pub fn new(conn: C, codec: K, manager: Arc<Mutex<ConnectionManager>>) -> Self {
        Self {
            conn,
            codec,
            manager,
        }
    }

    /// Runs until the connection closes.
    ///
    /// - A clean close marks every room disconnected and returns `Ok(())`.
    /// - A receive failure marks every room disconnected and returns
    ///   [`RoomError::ConnectionLost`].
    /// - A frame that doesn't decode is recorded as an advisory error on
    ///   the manager and skipped; the feed keeps running.
    pub async fn run(self) -> Result<(), RoomError> {
        let conn_id = self.conn.id();
        tracing::debug!(%conn_id, "room feed started");

        loop {
            let data = match self.conn.recv().await {
                Ok(Some(data)) => data,
                Ok(None) => {
                    tracing::info!(%conn_id, "room feed closed cleanly");
                    self.manager.lock().await.disconnected();
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "room feed recv error");
                    self.manager.lock().await.disconnected();
                    return Err(RoomError::ConnectionLost(e.to_string()));
                }
            };

            let envelope: Envelope<RoomEvent> = match self.codec.decode(&data) {
                Ok(env) => env,
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "failed to decode room event");
                    self.manager.lock().await.error(e.to_string());
                    continue;
                }
            };

            tracing::trace!(%conn_id, seq = envelope.seq, "room event");
            self.manager.lock().await.apply(envelope.payload);
        }
    }
}
