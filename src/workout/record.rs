use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::short_id_label;

/// A workout as delivered by the workout API (or a saved copy of it).
///
/// Only the fields needed for TCX export are modelled; anything else in the
/// payload is ignored. Absent and `null` fields decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutRecord {
    /// Short identifier used to name the exported file. Kept untyped so an
    /// unexpected id type never blocks serialization.
    pub short_id: Option<Value>,
    /// Start of the workout, seconds since the Unix epoch
    pub start_time: Option<i64>,
    /// End of the workout, seconds since the Unix epoch
    pub end_time: Option<i64>,
    pub biometrics: Option<Biometrics>,
    /// Only checked for presence
    pub exercises: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biometrics {
    pub total_calories: Option<f64>,
    pub heart_rate_samples: Option<Vec<HeartRateSample>>,
}

/// One heart-rate reading. Either field may be missing in real payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartRateSample {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: Option<i64>,
    pub bpm: Option<f64>,
}

impl WorkoutRecord {
    /// Decode a record from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    pub fn start_seconds(&self) -> i64 {
        self.start_time.unwrap_or(0)
    }

    pub fn end_seconds(&self) -> i64 {
        self.end_time.unwrap_or(0)
    }

    /// Total calories, with absent, zero and NaN all mapping to 0.
    pub fn calories(&self) -> f64 {
        self.biometrics
            .as_ref()
            .and_then(|b| b.total_calories)
            .filter(|c| *c != 0.0 && !c.is_nan())
            .unwrap_or(0.0)
    }

    /// Heart-rate samples in payload order.
    pub fn heart_rate_samples(&self) -> &[HeartRateSample] {
        self.biometrics
            .as_ref()
            .and_then(|b| b.heart_rate_samples.as_deref())
            .unwrap_or(&[])
    }

    /// Short id as text, if present and truthy
    pub fn short_id(&self) -> Option<String> {
        self.short_id.as_ref().and_then(short_id_label)
    }
}

impl HeartRateSample {
    pub fn new(timestamp_ms: i64, bpm: f64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            bpm: Some(bpm),
        }
    }

    /// Timestamp and bpm when both are present and non-zero.
    pub fn reading(&self) -> Option<(i64, f64)> {
        let timestamp_ms = self.timestamp_ms.filter(|ts| *ts != 0)?;
        let bpm = self.bpm.filter(|b| *b != 0.0 && !b.is_nan())?;
        Some((timestamp_ms, bpm))
    }

    /// Bpm rounded half away from zero; a missing bpm counts as 0.
    pub fn rounded_bpm(&self) -> i64 {
        round_bpm(self.bpm.unwrap_or(0.0))
    }
}

pub(crate) fn round_bpm(bpm: f64) -> i64 {
    // `as` saturates at the i64 bounds and maps NaN to 0
    bpm.round() as i64
}
