//! The realtime channel: one full-duplex WebSocket per session.
//!
//! The connector is a trait so the orchestrator can run against an
//! in-memory channel in tests. The channel handle owns an explicit
//! cancellation scope — closing it tears the socket down on every exit
//! path, there is no ambient global state to clean up.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use vv_domain::error::{Error, Result};
use vv_domain::event::ProviderEvent;
use vv_domain::interview::SessionHandle;

use crate::wire;

/// Raw audio bytes forwarded to the provider. Codec handling is not this
/// subsystem's concern; frames pass through opaque.
pub type AudioFrame = Vec<u8>;

/// An open realtime channel, exclusively owned by one session.
pub struct RealtimeChannelHandle {
    /// Normalized inbound events. Closed when the socket closes.
    pub events: mpsc::Receiver<ProviderEvent>,
    /// Outbound audio. Dropped frames are acceptable during drain.
    pub audio_tx: mpsc::Sender<AudioFrame>,
    /// Cancelling this token closes the socket and ends both pumps.
    pub cancel: CancellationToken,
}

impl RealtimeChannelHandle {
    /// Signal teardown. Idempotent.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

/// Opens realtime channels. One live channel per session at a time; the
/// orchestrator tears down any previous channel before provisioning anew.
#[async_trait]
pub trait RealtimeConnector: Send + Sync {
    async fn open(&self, handle: &SessionHandle) -> Result<RealtimeChannelHandle>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WebSocket implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// tokio-tungstenite connector against the provider's realtime endpoint.
pub struct WsRealtimeConnector {
    realtime_url: String,
}

impl WsRealtimeConnector {
    pub fn new(realtime_url: impl Into<String>) -> Self {
        Self {
            realtime_url: realtime_url.into(),
        }
    }
}

#[async_trait]
impl RealtimeConnector for WsRealtimeConnector {
    async fn open(&self, handle: &SessionHandle) -> Result<RealtimeChannelHandle> {
        let url = format!(
            "{}/{}?token={}",
            self.realtime_url.trim_end_matches('/'),
            handle.external_session_id,
            handle.access_token
        );

        let (ws, _) = connect_async(&url)
            .await
            .map_err(|e| Error::Channel(format!("connect: {e}")))?;
        let (mut ws_tx, mut ws_rx) = ws.split();

        let (event_tx, event_rx) = mpsc::channel::<ProviderEvent>(256);
        let (audio_tx, mut audio_rx) = mpsc::channel::<AudioFrame>(64);
        let cancel = CancellationToken::new();

        let session_id = handle.session_id.clone();
        // Raw-role speaker attribution depends on who the AI is playing
        // in this interview kind.
        let ai_plays_subject = handle.kind.ai_plays_subject();

        // Inbound pump: socket → normalized events.
        let inbound_cancel = cancel.clone();
        let inbound_session = session_id.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = inbound_cancel.cancelled() => break,
                    msg = ws_rx.next() => match msg {
                        Some(Ok(Message::Text(raw))) => {
                            if let Some(event) = wire::parse_frame(&raw, ai_plays_subject) {
                                if event_tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                        }
                        // Inbound audio is forwarded elsewhere in the stack;
                        // the orchestrator only consumes structured events.
                        Some(Ok(Message::Binary(_))) => {}
                        Some(Ok(Message::Close(_))) | None => {
                            let _ = event_tx.send(ProviderEvent::ChannelClosed).await;
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            let _ = event_tx
                                .send(ProviderEvent::ChannelError {
                                    message: e.to_string(),
                                })
                                .await;
                            break;
                        }
                    },
                }
            }
            tracing::debug!(session_id = %inbound_session, "realtime inbound pump ended");
        });

        // Outbound pump: audio frames → socket. Ends on cancellation and
        // sends a close frame so the provider flushes cleanly.
        let outbound_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = outbound_cancel.cancelled() => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    frame = audio_rx.recv() => match frame {
                        Some(bytes) => {
                            if ws_tx.send(Message::Binary(bytes)).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = ws_tx.send(Message::Close(None)).await;
                            break;
                        }
                    },
                }
            }
            tracing::debug!(session_id = %session_id, "realtime outbound pump ended");
        });

        Ok(RealtimeChannelHandle {
            events: event_rx,
            audio_tx,
            cancel,
        })
    }
}
