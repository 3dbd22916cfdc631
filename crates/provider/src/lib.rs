//! Adapters for the external voice-AI provider and the extraction LLM.
//!
//! Three surfaces: the [`SessionProvisioner`] (blocking HTTP exchange that
//! creates a remote session configuration and access credential), the
//! [`RealtimeConnector`] (full-duplex WebSocket channel normalizing
//! provider notifications), and the [`ExtractionClient`] (one-shot
//! structured summarization call).

pub mod extraction;
pub mod provision;
pub mod realtime;
pub mod util;
pub mod wire;

pub use extraction::ExtractionClient;
pub use provision::SessionProvisioner;
pub use realtime::{RealtimeChannelHandle, RealtimeConnector, WsRealtimeConnector};
