use appkit_common::SurfaceId;
use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::OutboundMessage;

/// Where messages for surfaces go. Must not block.
pub trait ResponseSink: Send + Sync {
    fn deliver(&self, surface: SurfaceId, message: OutboundMessage);
}

/// Forwards every delivery onto an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<(SurfaceId, OutboundMessage)>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(SurfaceId, OutboundMessage)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResponseSink for ChannelSink {
    fn deliver(&self, surface: SurfaceId, message: OutboundMessage) {
        if self.tx.send((surface, message)).is_err() {
            debug!(surface = %surface, "outbound receiver gone, message dropped");
        }
    }
}
