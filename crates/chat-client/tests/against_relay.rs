// crates/chat-client/tests/against_relay.rs
//
// Client halves talking to a real relay on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use chat_client::app::{handshake, run_send_loop, ShutdownSignal};
use chat_client::network::{self, FrameReceiver, FrameSender};
use chat_protocol::{MAX_FRAME_LEN, MAX_NAME_LEN};
use chat_server::config::Config;
use chat_server::server;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

async fn next(frames: &mut FrameReceiver<OwnedReadHalf>) -> Option<String> {
    timeout(WAIT, frames.next_frame())
        .await
        .expect("timed out")
        .unwrap()
}

async fn start_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(server::serve(listener, Config::default(), std::future::pending::<()>()));
    addr
}

async fn join(
    addr: &str,
    name: &str,
) -> (FrameReceiver<OwnedReadHalf>, Arc<Mutex<FrameSender<OwnedWriteHalf>>>) {
    let (mut frames, writer) = network::connect(addr).await.unwrap();
    let sender = Arc::new(Mutex::new(writer));
    handshake(&mut frames, &sender, name, &mut Vec::<u8>::new())
        .await
        .unwrap();
    (frames, sender)
}

#[tokio::test]
async fn shout_and_quit_through_the_relay() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(server::serve(listener, Config::default(), std::future::pending::<()>()));

    // bob joins first and watches.
    let (mut bob_frames, bob_writer) = network::connect(&addr).await.unwrap();
    let bob_sender = Arc::new(Mutex::new(bob_writer));
    handshake(&mut bob_frames, &bob_sender, "bob", &mut Vec::<u8>::new())
        .await
        .unwrap();
    assert_eq!(next(&mut bob_frames).await.as_deref(), Some("bob joined the chat!"));

    let (mut alice_frames, alice_writer) = network::connect(&addr).await.unwrap();
    let alice_sender = Arc::new(Mutex::new(alice_writer));
    handshake(&mut alice_frames, &alice_sender, "alice", &mut Vec::<u8>::new())
        .await
        .unwrap();
    assert_eq!(next(&mut bob_frames).await.as_deref(), Some("alice joined the chat!"));

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    input_tx.send("/shout go team".to_string()).unwrap();
    input_tx.send("/quit".to_string()).unwrap();

    let shutdown = ShutdownSignal::new();
    timeout(
        WAIT,
        run_send_loop(
            input_rx,
            alice_sender,
            "alice".to_string(),
            Vec::<u8>::new(),
            shutdown.clone(),
        ),
    )
    .await
    .expect("send loop did not stop")
    .unwrap();
    assert!(shutdown.is_triggered());

    assert_eq!(next(&mut bob_frames).await.as_deref(), Some("alice: GO TEAM!! 🔊"));

    // alice's quit closed her session, so the relay closes its side too.
    assert_eq!(
        next(&mut alice_frames).await.as_deref(),
        Some("alice joined the chat!")
    );
    assert_eq!(next(&mut alice_frames).await, None);
}

#[tokio::test]
async fn largest_envelopes_stay_readable_for_other_clients() {
    let addr = start_relay().await;

    let (mut bob_frames, _bob_sender) = join(&addr, "bob").await;
    assert_eq!(next(&mut bob_frames).await.as_deref(), Some("bob joined the chat!"));

    // A name past the limit is refused; bob never hears of it.
    let long_name = "x".repeat(4090);
    let (mut long_frames, _long_sender) = join(&addr, &long_name).await;
    assert_eq!(
        next(&mut long_frames).await.as_deref(),
        Some("System: Display name too long.")
    );
    assert_eq!(next(&mut long_frames).await, None);

    // The longest accepted name sending the longest private message.
    let sender_name = "s".repeat(MAX_NAME_LEN);
    let (_sender_frames, sender) = join(&addr, &sender_name).await;
    assert_eq!(
        next(&mut bob_frames).await,
        Some(format!("{} joined the chat!", sender_name))
    );

    let prefix = "/msg bob ";
    let content = "c".repeat(MAX_FRAME_LEN - prefix.len());
    sender
        .lock()
        .await
        .send(&format!("{}{}", prefix, content))
        .await
        .unwrap();

    let expected = format!("[PM from {}]: {}", sender_name, content);
    assert!(expected.len() > MAX_FRAME_LEN);
    assert_eq!(next(&mut bob_frames).await, Some(expected));
}
