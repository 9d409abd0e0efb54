//! The data path around the core: geodesy, CSV ingestion, the expert
//! labeler, splitting, validation metrics, and the synthetic track.

use skyfis::analysis::{self, calculate_metrics, CLASSIFICATION_THRESHOLD};
use skyfis::chromosome::Chromosome;
use skyfis::data::load_states;
use skyfis::error::Error;
use skyfis::features::{extract, haversine, heading_delta};
use skyfis::fuzzy::adsb::default_system;
use skyfis::fuzzy::InputRow;
use skyfis::preprocess::{
    expert_score, into_batches, split, summarize, PreprocessConfig, Preprocessor,
};
use skyfis::synth::write_track_csv;
use std::fs::write;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("skyfis-test-{}-{name}", std::process::id()));
    path
}

#[test]
fn haversine_is_symmetric_and_zero_on_identity() {
    assert_eq!(haversine(51.0, 4.0, 51.0, 4.0), 0.0);
    let forward = haversine(51.0, 4.0, 52.0, 5.0);
    let backward = haversine(52.0, 5.0, 51.0, 4.0);
    assert!((forward - backward).abs() < 1e-6);
    // Brussels to Amsterdam is roughly 170 km
    let brussels_amsterdam = haversine(50.85, 4.35, 52.37, 4.90);
    assert!((150_000.0..200_000.0).contains(&brussels_amsterdam));
}

#[test]
fn heading_delta_wraps_into_half_open_interval() {
    assert_eq!(heading_delta(350.0, 10.0), 20.0);
    assert_eq!(heading_delta(10.0, 350.0), -20.0);
    assert_eq!(heading_delta(0.0, 180.0), 180.0);
    assert_eq!(heading_delta(180.0, 0.0), 180.0);
    assert_eq!(heading_delta(90.0, 90.0), 0.0);
}

#[test]
fn expert_labeler_applies_rules_in_order() {
    assert_eq!(expert_score(0.0, 0.0, 0.0, 0.0, 1.0), 0.0);
    assert_eq!(expert_score(9.0, 0.0, 0.0, 0.0, 1.0), 1.0);
    assert_eq!(expert_score(0.0, 0.0, 16.0, 0.0, 1.0), 1.0);
    assert_eq!(expert_score(0.0, 0.0, 0.0, 900.0, 1.0), 1.0);
    assert_eq!(expert_score(0.0, 95.0, 0.0, 0.0, 1.0), 0.9);
    assert_eq!(expert_score(6.0, 50.0, 0.0, 0.0, 1.0), 0.8);
    assert_eq!(expert_score(0.0, 60.0, 0.0, 0.0, 1.0), 0.5);
    assert_eq!(expert_score(2.0, 0.0, 0.0, 0.0, 1.0), 0.2);
    assert_eq!(expert_score(0.0, 0.0, 0.0, 0.0, 31.0), 0.1);
    assert_eq!(expert_score(0.0, 0.0, 0.0, 0.0, 30.0), 0.0);
}

#[test]
fn nominal_flight_is_labeled_and_scored_low() {
    assert!(expert_score(0.0, 0.0, 0.0, 0.0, 1.0) < 0.4);
    let fis = default_system().unwrap();
    let mut row = InputRow::default();
    for (name, value) in [
        ("SpeedChange", 0.0),
        ("HeadingChange", 0.0),
        ("VerticalRateChange", 0.0),
        ("AltitudeChange", 0.0),
        ("TimeGap", 1.0),
    ] {
        row.insert(name.to_string(), value);
    }
    assert!(fis.evaluate(&row).unwrap() < 0.4);
}

#[test]
fn moderate_heading_anomaly_scores_medium() {
    let score = expert_score(0.0, 60.0, 0.0, 0.0, 1.0);
    assert!((0.4..=0.8).contains(&score));
}

#[test]
fn coupled_large_maneuver_scores_high() {
    let score = expert_score(8.0, 0.0, 10.0, 0.0, 1.0);
    assert!(score >= 0.5);
}

#[test]
fn csv_loader_skips_bad_rows_and_ground_traffic() {
    let path = temp_path("loader.csv");
    let content = "\
time,icao24,lat,lon,velocity,heading,vertrate,callsign,onground,alert,spi,squawk,baroaltitude,geoaltitude,lastposupdate,lastcontact,target_score
1000,4ca765,51.0,4.0,230.0,90.0,0.0,TEST,false,false,false,0100,10000,10050,999.5,1000,0.0
1002,4ca765,51.01,4.01,231.0,90.0,0.0,TEST,false,false,false,0100,10000,10050,1001.5,1002,0.0
1004,4ca765,51.02,4.02,not_a_number,90.0,0.0,TEST,false,false,false,0100,10000,10050,1003.5,1004,0.0
1006,4ca765,51.03,4.03,230.0,90.0,0.0,TEST,true,false,false,0100,10000,10050,1005.5,1006,0.0
1008,4ca765,,4.04,230.0,90.0,0.0,TEST,false,false,false,0100,10000,10050,1007.5,1008,0.0
1010,4ca765,51.05,4.05,,90.0,0.0,TEST,0,1,0,0100,10000,10050,1009.5,1010,0.0
";
    write(&path, content).unwrap();
    let (states, skipped) = load_states(&path).unwrap();
    // the unparsable row is counted; ground and positionless rows are
    // silently dropped; the empty-velocity row survives as NaN
    assert_eq!(skipped, 1);
    assert_eq!(states.len(), 3);
    assert!(states[2].velocity.is_nan());
    assert!(!states[2].onground);
    assert!(states[2].alert);
    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_fatal() {
    let result = load_states(&temp_path("does-not-exist.csv"));
    assert!(result.is_err());
}

#[test]
fn preprocessing_clamps_and_filters() {
    let path = temp_path("clamp.csv");
    // second row jumps 400 m/s in 2 s, far past the ±10 domain
    let content = "\
time,icao24,lat,lon,velocity,heading,vertrate,callsign,onground,alert,spi,squawk,baroaltitude,geoaltitude,lastposupdate,lastcontact,target_score
1000,4ca765,51.0,4.0,230.0,90.0,0.0,TEST,false,false,false,0100,10000,10050,999.5,1000,0.0
1002,4ca765,51.01,4.01,630.0,90.0,0.0,TEST,false,false,false,0100,10000,10050,1001.5,1002,0.0
";
    write(&path, content).unwrap();
    let (states, _) = load_states(&path).unwrap();
    let features = extract(&states);
    let samples = Preprocessor::new(PreprocessConfig::default()).prepare(&features);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].inputs["SpeedChange"], 10.0);
    assert_eq!(samples[0].target, 1.0);
    std::fs::remove_file(&path).ok();
}

#[test]
fn split_is_ordered_and_ratio_sized() {
    let path = temp_path("split.csv");
    write_track_csv(&path, 100, 5).unwrap();
    let (states, _) = load_states(&path).unwrap();
    let features = extract(&states);
    let samples = Preprocessor::new(PreprocessConfig::default()).prepare(&features);
    let total = samples.len();
    let first_index = samples[0].index;
    let (train, val) = split(samples, 0.8);
    assert_eq!(train.len() + val.len(), total);
    assert_eq!(train.len(), ((total as f64) * 0.8).round() as usize);
    assert_eq!(train[0].index, first_index);
    assert!(train.last().unwrap().index < val[0].index);
    std::fs::remove_file(&path).ok();
}

#[test]
fn perfect_predictions_make_perfect_metrics() {
    let expected = vec![0.8, 0.2, 0.9, 0.1];
    let metrics = calculate_metrics(&expected, &expected, CLASSIFICATION_THRESHOLD).unwrap();
    assert_eq!(metrics.mse, 0.0);
    assert_eq!(metrics.mae, 0.0);
    assert_eq!(metrics.rmse, 0.0);
    assert_eq!(metrics.r_squared, 1.0);
    assert_eq!(metrics.f1_score(), 1.0);
    assert_eq!(metrics.accuracy(), 1.0);
}

#[test]
fn metrics_reject_mismatched_or_empty_batches() {
    assert!(matches!(
        calculate_metrics(&[0.1, 0.2], &[0.1], 0.5),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(
        calculate_metrics(&[], &[], 0.5),
        Err(Error::EmptyBatch)
    ));
}

#[test]
fn error_report_ranks_by_absolute_error() {
    let (inputs, targets) = skyfis::synth::scenario_batch(20, 23);
    let chromosome = Chromosome::new();
    let predicted = analysis::predict(&chromosome, &inputs).unwrap();
    let records = analysis::prediction_records(&inputs, &targets, &predicted);
    let worst = analysis::top_errors(&records, 5);
    assert_eq!(worst.len(), 5);
    for pair in worst.windows(2) {
        assert!(pair[0].abs_error >= pair[1].abs_error);
    }
    let global_max = records
        .iter()
        .map(|r| r.abs_error)
        .fold(f64::MIN, f64::max);
    assert_eq!(worst[0].abs_error, global_max);
}

#[test]
fn synthetic_track_flows_through_the_whole_pipeline() {
    let path = temp_path("track.csv");
    write_track_csv(&path, 600, 9).unwrap();
    let (states, skipped) = load_states(&path).unwrap();
    assert_eq!(skipped, 0);
    assert_eq!(states.len(), 600);

    let features = extract(&states);
    assert_eq!(features.len(), 599);

    let samples = Preprocessor::new(PreprocessConfig::default()).prepare(&features);
    assert!(!samples.is_empty());
    let summary = summarize(&samples);
    assert_eq!(summary.total, samples.len());
    assert_eq!(summary.total, summary.low + summary.medium + summary.high);

    let (inputs, targets) = into_batches(&samples);
    let metrics = analysis::validate(
        &Chromosome::new(),
        &inputs,
        &targets,
        CLASSIFICATION_THRESHOLD,
    )
    .unwrap();
    assert!(metrics.mse.is_finite());
    assert!((0.0..=1.0).contains(&metrics.accuracy()));
    std::fs::remove_file(&path).ok();
}

#[test]
fn labels_stay_in_the_unit_interval() {
    let path = temp_path("labels.csv");
    write_track_csv(&path, 600, 13).unwrap();
    let (states, _) = load_states(&path).unwrap();
    let samples =
        Preprocessor::new(PreprocessConfig::default()).prepare(&extract(&states));
    for sample in &samples {
        assert!((0.0..=1.0).contains(&sample.target));
    }
    std::fs::remove_file(&path).ok();
}
