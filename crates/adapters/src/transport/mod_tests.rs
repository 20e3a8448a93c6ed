use super::*;

#[tokio::test]
async fn fake_transport_satisfies_the_trait_object_shape() {
    let fanout: FakeFanoutTransport = FakeFanoutTransport::new();
    fanout.broadcast("ping".to_string()).await;
    assert_eq!(fanout.connection_count(), 0);
}
