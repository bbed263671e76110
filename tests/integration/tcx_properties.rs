//! Property tests for the TCX serializer

use hevy_tcx::workout::{Biometrics, HeartRateSample, WorkoutRecord};
use hevy_tcx::{TcxOptions, TcxSerializer};
use proptest::prelude::*;

fn sample_strategy() -> impl Strategy<Value = HeartRateSample> {
    let timestamp = prop_oneof![
        1 => Just(None),
        1 => Just(Some(0_i64)),
        8 => (1_500_000_000_000_i64..1_900_000_000_000_i64).prop_map(Some),
    ];
    let bpm = prop_oneof![
        1 => Just(None),
        1 => Just(Some(0.0_f64)),
        8 => (30.0_f64..220.0).prop_map(Some),
    ];
    (timestamp, bpm).prop_map(|(timestamp_ms, bpm)| HeartRateSample { timestamp_ms, bpm })
}

fn record_strategy() -> impl Strategy<Value = WorkoutRecord> {
    (
        1_500_000_000_i64..1_900_000_000_i64,
        -7_200_i64..14_400,
        prop::collection::vec(sample_strategy(), 0..40),
        prop::option::of(0.0_f64..2_000.0),
    )
        .prop_map(|(start, duration, samples, calories)| WorkoutRecord {
            short_id: Some(serde_json::json!("prop")),
            start_time: Some(start),
            end_time: Some(start + duration),
            biometrics: Some(Biometrics {
                total_calories: calories,
                heart_rate_samples: Some(samples),
            }),
            exercises: None,
        })
}

fn trackpoint_times(xml: &str) -> Vec<String> {
    xml.split("<Time>")
        .skip(1)
        .filter_map(|rest| rest.split("</Time>").next())
        .map(str::to_string)
        .collect()
}

proptest! {
    #[test]
    fn test_sample_trackpoints_are_chronological(record in record_strategy()) {
        let export = TcxSerializer::default().serialize(&record).unwrap();
        let times = trackpoint_times(&export.xml);
        if times.len() > 2 {
            // Same fixed-width format throughout, so string order is time order
            let inner = &times[1..times.len() - 1];
            prop_assert!(inner.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn test_trackpoint_count_matches_valid_samples(record in record_strategy()) {
        let export = TcxSerializer::default().serialize(&record).unwrap();
        let samples = record.heart_rate_samples();
        let valid = samples.iter().filter(|s| s.reading().is_some()).count();
        let trackpoints = export.xml.matches("<Trackpoint>").count();

        prop_assert_eq!(export.sample_count, valid);
        if samples.is_empty() {
            prop_assert_eq!(trackpoints, 0);
            prop_assert_eq!(export.warnings.len(), 1);
        } else {
            prop_assert_eq!(trackpoints, valid + 2);
            prop_assert!(export.warnings.is_empty());
        }
    }

    #[test]
    fn test_total_seconds_is_signed_duration(record in record_strategy()) {
        let export = TcxSerializer::default().serialize(&record).unwrap();
        let expected = record.end_seconds() - record.start_seconds();
        let tag = format!("<TotalTimeSeconds>{}</TotalTimeSeconds>", expected);
        prop_assert!(export.xml.contains(&tag));
    }

    #[test]
    fn test_serialization_is_pure(record in record_strategy(), sport in "[A-Za-z<&>]{1,12}") {
        let serializer = TcxSerializer::new(TcxOptions {
            sport,
            ..TcxOptions::default()
        });
        let before = record.clone();
        let first = serializer.serialize(&record).unwrap();
        let second = serializer.serialize(&record).unwrap();

        prop_assert_eq!(&record, &before);
        prop_assert_eq!(first.xml, second.xml);
        prop_assert_eq!(first.sample_count, second.sample_count);
    }
}
