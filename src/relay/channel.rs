use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::slot::CapturedPayload;
use crate::workout::short_id_label;

/// Tag carried by relayed workout payloads
pub const WORKOUT_MESSAGE_TAG: &str = "HEVY_WORKOUT_DATA_FOUND";

const CHANNEL_CAPACITY: usize = 16;

/// Identity of the context that owns a relay channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message on the shared channel. Anyone holding the channel can
/// broadcast one, with any source and tag.
#[derive(Debug, Clone)]
pub struct RelayMessage {
    pub source: WindowId,
    pub tag: String,
    pub payload: Arc<Value>,
}

/// Broadcast channel shared by everything running in one window.
#[derive(Debug, Clone)]
pub struct RelayChannel {
    window: WindowId,
    tx: broadcast::Sender<RelayMessage>,
}

impl RelayChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            window: WindowId::new(),
            tx,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Send side stamped with this channel's own window id
    pub fn sender(&self) -> RelaySender {
        RelaySender {
            window: self.window,
            tx: self.tx.clone(),
        }
    }

    /// Put an arbitrary message on the channel.
    ///
    /// Returns false when nobody is listening.
    pub fn broadcast(&self, message: RelayMessage) -> bool {
        self.tx.send(message).is_ok()
    }

    /// Subscribe a receiver that stores accepted payloads in `slot`.
    ///
    /// Only messages broadcast after this call are seen.
    pub fn receiver(&self, slot: Arc<CapturedPayload>) -> RelayReceiver {
        RelayReceiver {
            window: self.window,
            rx: self.tx.subscribe(),
            slot,
        }
    }
}

impl Default for RelayChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct RelaySender {
    window: WindowId,
    tx: broadcast::Sender<RelayMessage>,
}

impl RelaySender {
    /// Post a tagged payload. Returns false when nobody is listening.
    pub fn post(&self, tag: &str, payload: Value) -> bool {
        let delivered = self
            .tx
            .send(RelayMessage {
                source: self.window,
                tag: tag.to_string(),
                payload: Arc::new(payload),
            })
            .is_ok();
        if !delivered {
            tracing::debug!(tag, "Relay message dropped, no receiver");
        }
        delivered
    }
}

/// Privileged end of the relay.
pub struct RelayReceiver {
    window: WindowId,
    rx: broadcast::Receiver<RelayMessage>,
    slot: Arc<CapturedPayload>,
}

impl RelayReceiver {
    /// A message is trusted only if it was sent from this receiver's own
    /// window and carries the workout tag.
    pub fn authenticate(&self, message: &RelayMessage) -> bool {
        message.source == self.window && message.tag == WORKOUT_MESSAGE_TAG
    }

    /// Store the payload of an authenticated message. Others are dropped
    /// without surfacing anything to the user.
    pub fn accept(&self, message: RelayMessage) -> bool {
        if !self.authenticate(&message) {
            tracing::trace!(
                source = %message.source,
                tag = %message.tag,
                "Ignoring unauthenticated relay message"
            );
            return false;
        }

        let short_id = message
            .payload
            .get("short_id")
            .and_then(short_id_label)
            .unwrap_or_else(|| "<none>".to_string());
        self.slot.set(message.payload);
        tracing::info!(short_id = %short_id, "Workout data captured");
        true
    }

    /// Process every message already queued, without waiting.
    ///
    /// Returns how many were accepted.
    pub fn drain(&mut self) -> usize {
        let mut accepted = 0;
        loop {
            match self.rx.try_recv() {
                Ok(message) => {
                    if self.accept(message) {
                        accepted += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Relay receiver lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        accepted
    }

    /// Receive until the channel closes or `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = self.rx.recv() => match received {
                    Ok(message) => {
                        self.accept(message);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Relay receiver lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        tracing::debug!("Relay receiver stopped");
    }
}
