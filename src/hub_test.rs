use super::*;
use crate::signal::{SIGNAL_CHAT, signal_event_name};
use tokio::time::{Duration, timeout};

/// Register a handler that forwards every `signal:chat` event into a channel.
fn capture(conn: &HubConnection) -> mpsc::UnboundedReceiver<SignalEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    conn.on(
        &signal_event_name(SIGNAL_CHAT),
        Arc::new(move |event: &SignalEvent| {
            let _ = tx.send(event.clone());
        }),
    );
    rx
}

async fn assert_has_event(rx: &mut mpsc::UnboundedReceiver<SignalEvent>) -> SignalEvent {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("event receive timed out")
        .expect("channel closed")
}

async fn assert_no_event(rx: &mut mpsc::UnboundedReceiver<SignalEvent>) {
    assert!(
        timeout(Duration::from_millis(80), rx.recv()).await.is_err(),
        "expected no event"
    );
}

fn chat(data: &str) -> OutboundSignal {
    OutboundSignal { signal_type: SIGNAL_CHAT.into(), to: Vec::new(), data: data.into() }
}

// =============================================================================
// connection ids
// =============================================================================

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

#[test]
fn generate_connection_id_has_prefix_and_hex_body() {
    let id = generate_connection_id();
    let body = id.strip_prefix("con_").expect("con_ prefix");
    assert_eq!(body.len(), 16);
    assert!(body.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_connection_id_two_calls_differ() {
    assert_ne!(generate_connection_id(), generate_connection_id());
}

// =============================================================================
// delivery
// =============================================================================

#[tokio::test]
async fn broadcast_reaches_all_connections_including_sender() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let b = hub.connect();
    let mut rx_a = capture(&a);
    let mut rx_b = capture(&b);

    a.send_signal(chat("hello")).expect("send");

    let at_a = assert_has_event(&mut rx_a).await;
    let at_b = assert_has_event(&mut rx_b).await;
    assert_eq!(at_a.sender_id(), Some(a.connection_id()));
    assert_eq!(at_b.sender_id(), Some(a.connection_id()));
    assert_eq!(at_b.data, "hello");
}

#[tokio::test]
async fn targeted_signal_skips_other_connections() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let b = hub.connect();
    let c = hub.connect();
    let mut rx_a = capture(&a);
    let mut rx_b = capture(&b);
    let mut rx_c = capture(&c);

    a.send_signal(chat("psst").with_to([b.connection_id()])).expect("send");

    assert_eq!(assert_has_event(&mut rx_b).await.data, "psst");
    assert_no_event(&mut rx_a).await;
    assert_no_event(&mut rx_c).await;
}

#[tokio::test]
async fn events_arrive_in_send_order_at_every_connection() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let b = hub.connect();
    let mut rx_a = capture(&a);
    let mut rx_b = capture(&b);

    for i in 0..20 {
        let sender = if i % 2 == 0 { &a } else { &b };
        sender.send_signal(chat(&i.to_string())).expect("send");
    }

    for i in 0..20 {
        assert_eq!(assert_has_event(&mut rx_a).await.data, i.to_string());
        assert_eq!(assert_has_event(&mut rx_b).await.data, i.to_string());
    }
}

#[tokio::test]
async fn handlers_only_see_their_event_name() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let mut rx = capture(&a);

    a.send_signal(OutboundSignal { signal_type: "other".into(), to: Vec::new(), data: "x".into() })
        .expect("send");
    a.send_signal(chat("y")).expect("send");

    assert_eq!(assert_has_event(&mut rx).await.data, "y");
}

// =============================================================================
// membership
// =============================================================================

#[tokio::test]
async fn connect_and_drop_track_membership() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let b = hub.connect();
    assert_eq!(hub.connection_count(), 2);
    assert!(hub.is_connected(a.connection_id()));

    drop(b);
    assert_eq!(hub.connection_count(), 1);
    drop(a);
    assert_eq!(hub.connection_count(), 0);
}

#[tokio::test]
async fn disconnected_connection_cannot_send() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let b = hub.connect();
    let mut rx_b = capture(&b);

    a.disconnect();
    let err = a.send_signal(chat("late")).expect_err("send should fail");
    assert!(matches!(err, SignalError::Closed(id) if id == a.connection_id()));
    assert_no_event(&mut rx_b).await;
}

#[tokio::test]
async fn disconnected_connection_no_longer_receives() {
    let hub = SignalHub::new();
    let a = hub.connect();
    let b = hub.connect();
    let mut rx_b = capture(&b);

    b.disconnect();
    a.send_signal(chat("after")).expect("send");
    assert!(
        timeout(Duration::from_millis(80), rx_b.recv())
            .await
            .map_or(true, |event| event.is_none()),
        "disconnected connection should not receive"
    );
}
