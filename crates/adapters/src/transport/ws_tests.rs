use super::*;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message as WsMessage;

#[tokio::test]
async fn broadcast_reaches_a_connected_peer() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let fanout = TungsteniteFanout::new();
    tokio::spawn(fanout.clone().accept_loop(listener));

    let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}")).await.unwrap();

    // Give the server task time to register the peer.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(fanout.connection_count(), 1);

    fanout.broadcast("hello".to_string()).await;

    let msg = tokio::time::timeout(std::time::Duration::from_secs(2), client.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(msg, WsMessage::Text("hello".to_string()));
    let _ = client.close(None).await;
}
