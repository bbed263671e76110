use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::workout::short_id_label;

/// Single-slot holder for the most recently captured workout payload.
///
/// Starts empty. Every [`set`](Self::set) replaces the previous payload;
/// reads never clear it.
#[derive(Debug, Default)]
pub struct CapturedPayload {
    slot: RwLock<Option<Arc<Value>>>,
}

impl CapturedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held payload (last write wins).
    pub fn set(&self, payload: Arc<Value>) {
        *self.slot.write() = Some(payload);
    }

    pub fn get(&self) -> Option<Arc<Value>> {
        self.slot.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }

    /// `short_id` of the held payload as text, when present and truthy
    pub fn short_id(&self) -> Option<String> {
        self.slot
            .read()
            .as_ref()
            .and_then(|payload| payload.get("short_id"))
            .and_then(short_id_label)
    }
}
