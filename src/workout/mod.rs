//! Workout records as returned by the Hevy workout API
//!
//! Records come out of untrusted traffic, so decoding is lenient about
//! missing fields and strict about field types.

mod record;
mod validate;

pub use record::{Biometrics, HeartRateSample, WorkoutRecord};
pub use validate::{is_truthy, is_workout_record, short_id_label};
