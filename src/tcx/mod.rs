//! TCX (Training Center XML) serialization
//!
//! Turns a [`WorkoutRecord`] into a single-activity, single-lap TCX document
//! whose track carries the heart-rate series. Serialization is a pure
//! function of the record and the [`TcxOptions`].

mod format;

use std::fmt;

use thiserror::Error;

use crate::workout::{HeartRateSample, WorkoutRecord};

pub use format::{escape_xml, format_iso_millis, format_number};

pub const DEFAULT_SPORT: &str = "Other";
pub const DEFAULT_CREATOR: &str = "Hevy";
pub const DEFAULT_AUTHOR: &str = "hevy-tcx";

const TCX_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase
  xsi:schemaLocation="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd"
  xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2"
  xmlns:x="http://www.garmin.com/xmlschemas/ActivityExtension/v2"
  xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
"#;

#[derive(Debug, Error)]
pub enum TcxError {
    #[error("Malformed workout record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    #[error("{field} ({value}) is outside the supported date range")]
    TimestampOutOfRange { field: &'static str, value: i64 },

    #[error("Workout duration overflows (start {start_time}, end {end_time})")]
    DurationOverflow { start_time: i64, end_time: i64 },
}

/// Non-fatal conditions noticed while serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcxWarning {
    /// No heart-rate samples; the track is emitted empty.
    NoHeartRateSamples,
}

impl fmt::Display for TcxWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcxWarning::NoHeartRateSamples => write!(
                f,
                "No heart rate samples found in 'biometrics.heart_rate_samples'."
            ),
        }
    }
}

/// Free-text labels placed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcxOptions {
    /// `Sport` attribute of the activity
    pub sport: String,
    /// Device name in the `Creator` block
    pub creator: String,
    /// Application name in the `Author` block
    pub author: String,
}

impl Default for TcxOptions {
    fn default() -> Self {
        Self {
            sport: DEFAULT_SPORT.to_string(),
            creator: DEFAULT_CREATOR.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// Result of a successful serialization
#[derive(Debug, Clone, PartialEq)]
pub struct TcxExport {
    pub xml: String,
    /// Samples that produced a trackpoint, boundary points excluded
    pub sample_count: usize,
    /// Workout start as an ISO timestamp (also the activity `Id`)
    pub start_time: String,
    pub warnings: Vec<TcxWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct TcxSerializer {
    options: TcxOptions,
}

impl TcxSerializer {
    pub fn new(options: TcxOptions) -> Self {
        Self { options }
    }

    /// Decode a raw payload and serialize it.
    pub fn serialize_value(&self, value: &serde_json::Value) -> Result<TcxExport, TcxError> {
        let record = WorkoutRecord::from_value(value)?;
        self.serialize(&record)
    }

    /// Serialize a workout into a TCX document.
    ///
    /// Samples are ordered by timestamp. A sample becomes a trackpoint only
    /// when both its timestamp and bpm are non-zero, but the synthetic start
    /// and end trackpoints take their bpm from the first and last sorted
    /// sample unconditionally. Without samples the track is left empty.
    pub fn serialize(&self, record: &WorkoutRecord) -> Result<TcxExport, TcxError> {
        let start_time = record.start_seconds();
        let end_time = record.end_seconds();
        let total_seconds =
            end_time
                .checked_sub(start_time)
                .ok_or(TcxError::DurationOverflow {
                    start_time,
                    end_time,
                })?;
        let start_iso = iso_from_seconds("start_time", start_time)?;
        let end_iso = iso_from_seconds("end_time", end_time)?;
        let calories = format_number(record.calories());

        let mut samples: Vec<&HeartRateSample> = record.heart_rate_samples().iter().collect();
        // Stable; samples without a timestamp sort first
        samples.sort_by_key(|sample| sample.timestamp_ms);

        let mut warnings = Vec::new();
        if samples.is_empty() {
            warnings.push(TcxWarning::NoHeartRateSamples);
        }

        let mut track = String::new();
        if let Some(first) = samples.first() {
            push_trackpoint(&mut track, &start_iso, first.rounded_bpm());
        }
        let mut sample_count = 0;
        for sample in &samples {
            let Some((timestamp_ms, _)) = sample.reading() else {
                continue;
            };
            let time = format_iso_millis(timestamp_ms).ok_or(TcxError::TimestampOutOfRange {
                field: "timestamp_ms",
                value: timestamp_ms,
            })?;
            push_trackpoint(&mut track, &time, sample.rounded_bpm());
            sample_count += 1;
        }
        if let Some(last) = samples.last() {
            push_trackpoint(&mut track, &end_iso, last.rounded_bpm());
        }

        let sport = escape_xml(&self.options.sport);
        let creator = escape_xml(&self.options.creator);
        let author = escape_xml(&self.options.author);

        let mut xml = String::with_capacity(TCX_HEADER.len() + track.len() + 1024);
        xml.push_str(TCX_HEADER);
        xml.push_str(&format!(
            r#"  <Activities>
    <Activity Sport="{sport}">
      <Id>{start_iso}</Id>
      <Lap StartTime="{start_iso}">
        <TotalTimeSeconds>{total_seconds}</TotalTimeSeconds>
        <DistanceMeters>0.0</DistanceMeters>
        <Calories>{calories}</Calories>
        <Intensity>Active</Intensity>
        <TriggerMethod>Manual</TriggerMethod>
        <Track>
"#
        ));
        xml.push_str(&track);
        xml.push_str(&format!(
            r#"        </Track>
      </Lap>
      <Creator xsi:type="Device_t">
        <Name>{creator}</Name>
      </Creator>
      <Extensions>
        <x:LX>
          <ActiveSeconds>{total_seconds}</ActiveSeconds>
          <ElapsedSeconds>{total_seconds}</ElapsedSeconds>
          <DistanceMeters>0</DistanceMeters>
          <KiloCalories>{calories}</KiloCalories>
        </x:LX>
      </Extensions>
    </Activity>
  </Activities>
  <Author xsi:type="Application_t">
    <Name>{author}</Name>
  </Author>
</TrainingCenterDatabase>
"#
        ));

        Ok(TcxExport {
            xml,
            sample_count,
            start_time: start_iso,
            warnings,
        })
    }
}

fn iso_from_seconds(field: &'static str, seconds: i64) -> Result<String, TcxError> {
    seconds
        .checked_mul(1000)
        .and_then(format_iso_millis)
        .ok_or(TcxError::TimestampOutOfRange {
            field,
            value: seconds,
        })
}

fn push_trackpoint(track: &mut String, time: &str, bpm: i64) {
    track.push_str(&format!(
        r#"          <Trackpoint>
            <Time>{time}</Time>
            <HeartRateBpm>
              <Value>{bpm}</Value>
            </HeartRateBpm>
          </Trackpoint>
"#
    ));
}
