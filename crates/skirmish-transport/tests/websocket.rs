//! Integration tests for the WebSocket client connection.
//!
//! Each test binds a throwaway tokio-tungstenite server on an
//! OS-assigned port and drives it from the test body, so the client
//! is exercised over a real socket.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use skirmish_transport::{Connection, TransportError, WebSocketConnection};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on `127.0.0.1:0` and returns it with its URL.
    async fn bind_server() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}"))
    }

    async fn accept(listener: TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("upgrade should succeed")
    }

    #[tokio::test]
    async fn test_connect_send_and_receive() {
        let (listener, url) = bind_server().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnection::connect(&url).await.expect("should connect");
        let mut server_ws = server.await.expect("task should complete");

        assert!(conn.id().into_inner() > 0);

        // --- Server sends, client receives ---
        server_ws
            .send(Message::Text(r#"{"hello":"client"}"#.into()))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"hello":"client"}"#);

        // --- Client sends, server receives ---
        conn.send(b"hello from client").await.expect("send should succeed");
        let msg = server_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"hello from client");

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_server_close() {
        let (listener, url) = bind_server().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        // Bind then drop so the port is (almost certainly) unused.
        let (listener, url) = bind_server().await;
        drop(listener);

        let result = WebSocketConnection::connect(&url).await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }
}
