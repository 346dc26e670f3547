//! End-to-end channel tests — echo round trips, target-path derivation,
//! clean and unclean closure, all against an in-process websocket server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, accept_hdr_async};

use rba_login_client::channel;
use rba_login_client::{ClientConfig, PageLocation};

/// Route channel logs to the test output when RUST_LOG is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn bind() -> (TcpListener, std::net::SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

// ---------------------------------------------------------------------------
// Echo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_client_echoes_every_server_message() {
    init_tracing();
    let (listener, addr) = bind().await;

    // Server side of the round-trip measurement: send five tokens, read
    // each echo back, then close cleanly.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let mut echoes = Vec::new();
        for i in 0..5 {
            let token = format!("rtt-token-{i}");
            ws.send(Message::Text(token)).await.unwrap();
            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => {
                        echoes.push(text);
                        break;
                    }
                    Some(Ok(_)) => continue,
                    other => panic!("unexpected frame: {other:?}"),
                }
            }
        }
        ws.close(None).await.unwrap();
        echoes
    });

    let location = PageLocation::new(false, addr.to_string(), "/auth/login/");
    let url = location.channel_url("/ws");
    tokio::time::timeout(Duration::from_secs(5), channel::run(&url))
        .await
        .expect("channel should end after the server closes");

    let echoes = server.await.unwrap();
    let expected: Vec<String> = (0..5).map(|i| format!("rtt-token-{i}")).collect();
    assert_eq!(echoes, expected);
}

#[tokio::test]
async fn test_binary_payloads_are_echoed_unmodified() {
    init_tracing();
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let payload = vec![0u8, 1, 2, 254, 255];
        ws.send(Message::Binary(payload.clone())).await.unwrap();
        let echoed = loop {
            match ws.next().await {
                Some(Ok(Message::Binary(bytes))) => break bytes,
                Some(Ok(_)) => continue,
                other => panic!("unexpected frame: {other:?}"),
            }
        };
        ws.close(None).await.unwrap();
        (payload, echoed)
    });

    let url = format!("ws://{addr}/ws/auth/login/");
    tokio::time::timeout(Duration::from_secs(5), channel::run(&url)).await.unwrap();

    let (sent, echoed) = server.await.unwrap();
    assert_eq!(sent, echoed);
}

// ---------------------------------------------------------------------------
// Target derivation through open()
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_open_targets_ws_prefix_plus_page_path() {
    init_tracing();
    let (listener, addr) = bind().await;
    let (path_tx, path_rx) = tokio::sync::oneshot::channel();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_hdr_async(stream, move |req: &tokio_tungstenite::tungstenite::handshake::server::Request, resp| {
            let _ = path_tx.send(req.uri().path().to_string());
            Ok(resp)
        })
        .await
        .unwrap();
        let _ = ws.close(None).await;
    });

    // Fire-and-forget: open() returns immediately, nothing to consume.
    let location = PageLocation::new(false, addr.to_string(), "/auth/login/");
    channel::open(&location, &ClientConfig::default());

    let path = tokio::time::timeout(Duration::from_secs(5), path_rx).await.unwrap().unwrap();
    assert_eq!(path, "/ws/auth/login/");
    server.await.unwrap();
}

// ---------------------------------------------------------------------------
// Closure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unclean_drop_terminates_channel() {
    init_tracing();
    let (listener, addr) = bind().await;

    // Send one probe, read the echo, then drop the TCP stream with no
    // close handshake — the client must end its run without panicking.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text("probe".to_string())).await.unwrap();
        let _ = ws.next().await;
        drop(ws);
    });

    let url = format!("ws://{addr}/ws/auth/login/");
    tokio::time::timeout(Duration::from_secs(5), channel::run(&url))
        .await
        .expect("channel should end after the transport drops");
    server.await.unwrap();
}

#[tokio::test]
async fn test_connect_failure_ends_quietly() {
    init_tracing();
    // Bind then drop, so the port is very likely unoccupied.
    let (listener, addr) = bind().await;
    drop(listener);

    let url = format!("ws://{addr}/ws/auth/login/");
    tokio::time::timeout(Duration::from_secs(5), channel::run(&url))
        .await
        .expect("a refused connection must not hang the channel");
}
