//! Export control visibility
//!
//! The export control is only offered while the user looks at a workout
//! detail page and a workout has been captured. A [`LocationWatcher`] polls
//! the current location and shows or hides the control accordingly.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::relay::CapturedPayload;

/// Substring of the location that identifies a workout detail page
pub const DEFAULT_WORKOUT_PATH_MARKER: &str = "hevy.com/workout/";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Provider of the location the user is currently viewing.
pub trait LocationSource: Send + Sync {
    fn current(&self) -> String;
}

/// Location reported from outside (e.g. over HTTP), readable by the watcher.
#[derive(Debug, Default)]
pub struct SharedLocation {
    location: RwLock<String>,
}

impl SharedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, location: impl Into<String>) {
        *self.location.write() = location.into();
    }

    pub fn get(&self) -> String {
        self.location.read().clone()
    }
}

impl LocationSource for SharedLocation {
    fn current(&self) -> String {
        self.get()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlState {
    /// Never created
    #[default]
    Absent,
    Visible,
    Hidden,
}

/// The export control offered to the user
#[derive(Debug, Default)]
pub struct ExportControl {
    state: ControlState,
}

impl ExportControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Create the control if needed and show it.
    pub fn ensure_visible(&mut self) {
        if self.state == ControlState::Absent {
            tracing::debug!("Creating export control");
        }
        self.state = ControlState::Visible;
    }

    /// Hide the control if it exists.
    pub fn hide(&mut self) {
        if self.state == ControlState::Visible {
            self.state = ControlState::Hidden;
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisibilityPolicy {
    marker: String,
}

impl VisibilityPolicy {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn is_workout_page(&self, location: &str) -> bool {
        location.contains(&self.marker)
    }

    pub fn should_show(&self, location: &str, has_payload: bool) -> bool {
        has_payload && self.is_workout_page(location)
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WORKOUT_PATH_MARKER)
    }
}

/// Polls a [`LocationSource`] and keeps the [`ExportControl`] in line with
/// the [`VisibilityPolicy`].
pub struct LocationWatcher {
    source: Arc<dyn LocationSource>,
    policy: VisibilityPolicy,
    slot: Arc<CapturedPayload>,
    control: Arc<Mutex<ExportControl>>,
    interval: Duration,
    last_seen: Option<(String, bool)>,
}

impl LocationWatcher {
    pub fn new(
        source: Arc<dyn LocationSource>,
        policy: VisibilityPolicy,
        slot: Arc<CapturedPayload>,
        control: Arc<Mutex<ExportControl>>,
    ) -> Self {
        Self {
            source,
            policy,
            slot,
            control,
            interval: DEFAULT_POLL_INTERVAL,
            last_seen: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Re-evaluate visibility if the location or capture state changed.
    pub fn tick(&mut self) -> ControlState {
        let location = self.source.current();
        let has_payload = !self.slot.is_empty();
        let observed = (location, has_payload);

        let mut control = self.control.lock();
        if self.last_seen.as_ref() == Some(&observed) {
            return control.state();
        }

        if self.policy.should_show(&observed.0, observed.1) {
            control.ensure_visible();
        } else {
            control.hide();
        }
        tracing::debug!(
            location = %observed.0,
            captured = observed.1,
            state = ?control.state(),
            "Export control visibility updated"
        );
        self.last_seen = Some(observed);
        control.state()
    }

    /// Poll until `cancel` fires. The first check happens immediately.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    self.tick();
                }
            }
        }
    }
}
