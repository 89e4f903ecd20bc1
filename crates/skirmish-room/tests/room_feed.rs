//! Integration tests for the room feed using scripted connections.

use std::collections::VecDeque;
use std::sync::Arc;

use skirmish_protocol::{Codec, Envelope, JsonCodec, PlayerId, RoomId};
use skirmish_room::{ConnectionManager, RoomError, RoomEvent, RoomFeed};
use skirmish_transport::{Connection, ConnectionId};
use tokio::sync::Mutex;

// =========================================================================
// Scripted connection: replays a fixed list of receive results.
// =========================================================================

type Frame = Result<Option<Vec<u8>>, std::io::Error>;

struct ScriptedConnection {
    frames: std::sync::Mutex<VecDeque<Frame>>,
}

impl ScriptedConnection {
    fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: std::sync::Mutex::new(frames.into()),
        }
    }
}

impl Connection for ScriptedConnection {
    type Error = std::io::Error;

    async fn send(&self, _data: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        // An exhausted script behaves like a clean close.
        self.frames.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(1)
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn frame(seq: u64, event: RoomEvent) -> Frame {
    let envelope = Envelope::new(seq, event);
    Ok(Some(JsonCodec.encode(&envelope).unwrap()))
}

fn shared_manager() -> Arc<Mutex<ConnectionManager>> {
    Arc::new(Mutex::new(ConnectionManager::new()))
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_feed_applies_events_in_order() {
    let manager = shared_manager();
    let conn = ScriptedConnection::new(vec![
        frame(1, RoomEvent::Connected { room_id: RoomId(1) }),
        frame(
            2,
            RoomEvent::Participants {
                room_id: RoomId(1),
                participants: vec![PlayerId(10), PlayerId(11)],
            },
        ),
    ]);

    RoomFeed::new(conn, JsonCodec, Arc::clone(&manager))
        .run()
        .await
        .expect("clean close should be Ok");

    let mgr = manager.lock().await;
    let room = mgr.room(RoomId(1)).expect("room should exist");
    assert_eq!(room.participants, vec![PlayerId(10), PlayerId(11)]);
    // Script ended with a clean close, so the room went offline.
    assert!(!room.connected);
    assert!(mgr.is_reconnecting());
}

#[tokio::test]
async fn test_feed_records_decode_errors_and_continues() {
    let manager = shared_manager();
    let conn = ScriptedConnection::new(vec![
        Ok(Some(b"{ not json".to_vec())),
        frame(2, RoomEvent::Connected { room_id: RoomId(7) }),
        Ok(Some(br#"{"seq":3,"timestamp":0,"payload":{"type":"Nope"}}"#.to_vec())),
    ]);

    RoomFeed::new(conn, JsonCodec, Arc::clone(&manager))
        .run()
        .await
        .unwrap();

    let mgr = manager.lock().await;
    assert!(mgr.room(RoomId(7)).is_some(), "valid frame still applied");
    assert!(
        mgr.last_error().is_some_and(|e| e.contains("decode")),
        "decode failure should be recorded, got {:?}",
        mgr.last_error()
    );
}

#[tokio::test]
async fn test_feed_recv_failure_disconnects_and_returns_error() {
    let manager = shared_manager();
    let conn = ScriptedConnection::new(vec![
        frame(1, RoomEvent::Connected { room_id: RoomId(1) }),
        frame(
            2,
            RoomEvent::Participants {
                room_id: RoomId(1),
                participants: vec![PlayerId(1)],
            },
        ),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
    ]);

    let result = RoomFeed::new(conn, JsonCodec, Arc::clone(&manager))
        .run()
        .await;

    assert!(matches!(result, Err(RoomError::ConnectionLost(_))));
    let mgr = manager.lock().await;
    assert!(!mgr.is_connected());
    assert_eq!(mgr.participant_count(RoomId(1)), 1, "roster survives the drop");
}

#[tokio::test]
async fn test_feed_over_websocket() {
    use futures_util::SinkExt;
    use skirmish_transport::WebSocketConnection;
    use tokio_tungstenite::tungstenite::Message;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let events = [
            RoomEvent::Connected { room_id: RoomId(2) },
            RoomEvent::Participants {
                room_id: RoomId(2),
                participants: vec![PlayerId(5)],
            },
        ];
        for (seq, event) in events.into_iter().enumerate() {
            let bytes = JsonCodec.encode(&Envelope::new(seq as u64, event)).unwrap();
            ws.send(Message::Binary(bytes.into())).await.unwrap();
        }
        ws.close(None).await.unwrap();
    });

    let conn = WebSocketConnection::connect(&url).await.unwrap();
    let manager = shared_manager();
    RoomFeed::new(conn, JsonCodec, Arc::clone(&manager))
        .run()
        .await
        .unwrap();
    server.await.unwrap();

    let mgr = manager.lock().await;
    assert_eq!(mgr.participant_count(RoomId(2)), 1);
}
