use serde_json::Value;

use super::{Exchange, ResponseHook};
use crate::relay::{RelaySender, WORKOUT_MESSAGE_TAG};
use crate::workout::is_workout_record;

/// Prefix of the workout detail endpoint of the Hevy API
pub const DEFAULT_TARGET_PREFIX: &str = "https://api.hevyapp.com/workout/";

/// What happened to an inspected response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectOutcome {
    /// URL outside the target prefix
    Ignored,
    /// Body is not JSON
    Unparsable,
    /// JSON, but not workout-shaped
    NotWorkout,
    /// Posted on the relay
    Relayed,
}

/// Hook that relays workout-shaped responses from the workout API.
#[derive(Debug, Clone)]
pub struct WorkoutInterceptor {
    target_prefix: String,
    relay: RelaySender,
}

impl WorkoutInterceptor {
    pub fn new(target_prefix: impl Into<String>, relay: RelaySender) -> Self {
        Self {
            target_prefix: target_prefix.into(),
            relay,
        }
    }

    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    pub fn matches(&self, url: &str) -> bool {
        url.starts_with(&self.target_prefix)
    }

    /// Inspect one response body. Never fails; bad JSON is ignored.
    pub fn inspect(&self, url: &str, body: &[u8]) -> InspectOutcome {
        if !self.matches(url) {
            return InspectOutcome::Ignored;
        }

        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(url, error = %e, "Ignoring non-JSON workout API response");
                return InspectOutcome::Unparsable;
            }
        };

        if !is_workout_record(&value) {
            tracing::debug!(url, "Workout API response is not a workout record");
            return InspectOutcome::NotWorkout;
        }

        self.relay.post(WORKOUT_MESSAGE_TAG, value);
        tracing::info!(url, "Relayed workout response");
        InspectOutcome::Relayed
    }
}

impl ResponseHook for WorkoutInterceptor {
    fn on_response(&self, exchange: &Exchange) {
        self.inspect(&exchange.url, &exchange.body);
    }
}
