//! Channel Keeper — one full-duplex echo channel per page load.
//!
//! ## Design
//! - The transport delivers a closed set of [`ChannelEvent`]s to a
//!   [`ChannelSupervisor`]; the supervisor logs and answers with a
//!   [`ChannelAction`]. Each handler is unit-testable with a synthetic
//!   event, no socket required.
//! - [`open`] is fire-and-forget: it spawns the transport task and
//!   returns nothing. All failure signaling is via logging — there is no
//!   consumer of a result.
//! - No retry, no heartbeat, no reconnect. A dropped channel stays
//!   dropped until the page reloads.
//!
//! The message-handling policy is echo, in its entirety: every inbound
//! text or binary payload goes straight back out on the same channel,
//! unmodified. The server uses the round trips for its own risk scoring;
//! the client neither parses nor originates messages.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::location::PageLocation;

/// Close code synthesized when the transport drops without a close
/// handshake (mirrors the abnormal-closure status code 1006).
pub const ABNORMAL_CLOSE_CODE: u16 = 1006;

/// Readiness of the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Connecting,
    Open,
    Closed,
}

/// The closed set of events the transport can deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The connection handshake completed.
    Opened,
    /// A payload arrived from the server.
    Inbound(WsMessage),
    /// A transport-level fault. Non-fatal by itself; a `Closed` event
    /// follows if the connection is lost.
    TransportError { detail: String },
    /// The channel ended. `clean` means the close handshake completed;
    /// otherwise `code` is [`ABNORMAL_CLOSE_CODE`] and `reason` carries
    /// the transport's description of the failure.
    Closed { clean: bool, code: u16, reason: String },
}

/// What the supervisor instructs the transport to do in response.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelAction {
    None,
    /// Send this payload back on the same channel.
    Echo(WsMessage),
}

/// Supervises one channel: tracks readiness, logs lifecycle events, and
/// decides the echo. Counts its own reports so tests can assert exactly
/// what was logged without capturing subscriber output.
#[derive(Debug)]
pub struct ChannelSupervisor {
    readiness: Readiness,
    info_reports: usize,
    error_reports: usize,
}

impl Default for ChannelSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSupervisor {
    pub fn new() -> Self {
        ChannelSupervisor { readiness: Readiness::Connecting, info_reports: 0, error_reports: 0 }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Informational lifecycle reports emitted so far.
    pub fn info_reports(&self) -> usize {
        self.info_reports
    }

    /// Error reports emitted so far.
    pub fn error_reports(&self) -> usize {
        self.error_reports
    }

    /// Handle one transport event.
    ///
    /// Logging is the only side effect; the returned action tells the
    /// transport what, if anything, to send. Never panics, never blocks.
    pub fn on_event(&mut self, event: ChannelEvent) -> ChannelAction {
        match event {
            ChannelEvent::Opened => {
                self.readiness = Readiness::Open;
                self.info_reports += 1;
                info!("connection open and established");
                ChannelAction::None
            }
            ChannelEvent::Inbound(payload) => ChannelAction::Echo(payload),
            ChannelEvent::TransportError { detail } => {
                // An error on a channel that is not open is teardown
                // noise; the Closed event carries the real report.
                if self.readiness == Readiness::Open {
                    self.error_reports += 1;
                    error!(%detail, "error occurred on channel");
                }
                ChannelAction::None
            }
            ChannelEvent::Closed { clean, code, reason } => {
                self.readiness = Readiness::Closed;
                if clean {
                    self.info_reports += 1;
                    info!(code, "connection closed");
                } else {
                    self.error_reports += 1;
                    error!(code, %reason, "connection closed uncleanly");
                }
                ChannelAction::None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Open the channel for `location`, detached.
///
/// Derives the target URL from the page's own transport security, host,
/// and path, then spawns [`run`] on the ambient tokio runtime. Nothing is
/// returned; the channel's lifecycle is observable only through logs.
/// Must be called from within a tokio runtime.
pub fn open(location: &PageLocation, config: &ClientConfig) {
    let url = location.channel_url(&config.channel_path_prefix);
    tokio::spawn(async move {
        run(&url).await;
    });
}

/// Connect to `url` and echo every inbound payload until the channel
/// ends, feeding each transport event through a [`ChannelSupervisor`].
///
/// Public so hosts and tests can drive the channel to completion
/// themselves instead of detaching it via [`open`].
pub async fn run(url: &str) {
    let mut supervisor = ChannelSupervisor::new();

    let ws_stream = match connect_async(url).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(err) => {
            // Never reached the open state, so the error itself is
            // suppressed; the unclean close carries the report.
            let detail = err.to_string();
            supervisor.on_event(ChannelEvent::TransportError { detail: detail.clone() });
            supervisor.on_event(ChannelEvent::Closed {
                clean: false,
                code: ABNORMAL_CLOSE_CODE,
                reason: detail,
            });
            return;
        }
    };

    supervisor.on_event(ChannelEvent::Opened);
    let (mut sink, mut stream) = ws_stream.split();

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Close(close_frame)) => {
                let (code, reason) = match close_frame {
                    Some(frame) => (u16::from(frame.code), frame.reason.into_owned()),
                    None => (u16::from(CloseCode::Normal), String::new()),
                };
                supervisor.on_event(ChannelEvent::Closed { clean: true, code, reason });
                return;
            }
            Ok(payload @ (WsMessage::Text(_) | WsMessage::Binary(_))) => {
                if let ChannelAction::Echo(payload) =
                    supervisor.on_event(ChannelEvent::Inbound(payload))
                {
                    if let Err(err) = sink.send(payload).await {
                        supervisor
                            .on_event(ChannelEvent::TransportError { detail: err.to_string() });
                    }
                }
            }
            // Ping/Pong and raw frames are handled by the protocol layer.
            Ok(_) => {}
            Err(err) => {
                let detail = err.to_string();
                supervisor.on_event(ChannelEvent::TransportError { detail: detail.clone() });
                supervisor.on_event(ChannelEvent::Closed {
                    clean: false,
                    code: ABNORMAL_CLOSE_CODE,
                    reason: detail,
                });
                return;
            }
        }
    }

    // Stream ended without a close frame.
    supervisor.on_event(ChannelEvent::Closed {
        clean: false,
        code: ABNORMAL_CLOSE_CODE,
        reason: "connection dropped".to_string(),
    });
}
