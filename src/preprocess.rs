//! Turns kinematic deltas into labeled training samples: clamp to the
//! variable domains, drop unusable rows, score with the expert rules.

use crate::features::FeatureVector;
use crate::fuzzy::adsb::{
    ALTITUDE_CHANGE, HEADING_CHANGE, INPUT_NAMES, SPEED_CHANGE, TIME_GAP, VERTICAL_RATE_CHANGE,
};
use crate::fuzzy::system::InputRow;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Display;

/// Clamp ranges; these mirror the variable domains of the inference
/// system so the core never sees out-of-domain values.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub speed_change_range: f64,
    pub heading_change_range: f64,
    pub vert_rate_change_range: f64,
    pub altitude_change_range: f64,
    pub max_time_gap: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            speed_change_range: 10.0,
            heading_change_range: 180.0,
            vert_rate_change_range: 20.0,
            altitude_change_range: 1000.0,
            max_time_gap: 60.0,
        }
    }
}

/// One labeled sample; `index` points back at the source feature row.
#[derive(Debug, Clone)]
pub struct TrainingSample {
    pub index: usize,
    pub inputs: InputRow,
    pub target: f64,
}

pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Convert, filter, label.
    pub fn prepare(&self, features: &[FeatureVector]) -> Vec<TrainingSample> {
        let converted = self.convert(features);
        let filtered = self.filter_outliers(converted);
        self.label(filtered)
    }

    fn convert(&self, features: &[FeatureVector]) -> Vec<TrainingSample> {
        let c = &self.config;
        features
            .iter()
            .enumerate()
            .map(|(index, fv)| {
                let mut inputs = InputRow::default();
                inputs.insert(
                    SPEED_CHANGE.to_string(),
                    fv.d_speed.clamp(-c.speed_change_range, c.speed_change_range),
                );
                inputs.insert(
                    HEADING_CHANGE.to_string(),
                    fv.d_heading
                        .clamp(-c.heading_change_range, c.heading_change_range),
                );
                inputs.insert(
                    VERTICAL_RATE_CHANGE.to_string(),
                    fv.d_vert_rate
                        .clamp(-c.vert_rate_change_range, c.vert_rate_change_range),
                );
                inputs.insert(
                    ALTITUDE_CHANGE.to_string(),
                    fv.d_altitude
                        .clamp(-c.altitude_change_range, c.altitude_change_range),
                );
                inputs.insert(TIME_GAP.to_string(), fv.dt.clamp(0.0, c.max_time_gap));
                TrainingSample {
                    index,
                    inputs,
                    target: 0.0,
                }
            })
            .collect()
    }

    /// NaN and Inf never reach the core; the range checks are a guard for
    /// configurations where clamping and filtering diverge.
    fn filter_outliers(&self, samples: Vec<TrainingSample>) -> Vec<TrainingSample> {
        let c = &self.config;
        samples
            .into_iter()
            .filter(|sample| {
                let get = |key: &str| sample.inputs.get(key).copied().unwrap_or(f64::NAN);
                sample.inputs.values().all(|v| v.is_finite())
                    && get(SPEED_CHANGE).abs() <= c.speed_change_range
                    && get(HEADING_CHANGE).abs() <= c.heading_change_range
                    && get(VERTICAL_RATE_CHANGE).abs() <= c.vert_rate_change_range
                    && get(ALTITUDE_CHANGE).abs() <= c.altitude_change_range
                    && get(TIME_GAP) <= c.max_time_gap
            })
            .collect()
    }

    fn label(&self, mut samples: Vec<TrainingSample>) -> Vec<TrainingSample> {
        for sample in &mut samples {
            let value = |key: &str| sample.inputs.get(key).copied().unwrap_or(0.0);
            let target = expert_score(
                value(SPEED_CHANGE),
                value(HEADING_CHANGE),
                value(VERTICAL_RATE_CHANGE),
                value(ALTITUDE_CHANGE),
                value(TIME_GAP),
            );
            sample.target = target;
        }
        samples
    }
}

/// The expert threshold rules. First match wins; the ordering is part of
/// the labeler.
pub fn expert_score(speed: f64, heading: f64, vert_rate: f64, altitude: f64, time_gap: f64) -> f64 {
    let score: f64 = if speed.abs() > 8.0 || vert_rate.abs() > 15.0 || altitude.abs() > 800.0 {
        // at or beyond the physical envelope
        1.0
    } else if heading.abs() > 90.0 {
        // a >90° turn in one update is impossible for a jet
        0.9
    } else if speed.abs() > 5.0 && heading.abs() > 45.0 {
        // aggressive compound maneuver
        0.8
    } else if speed.abs() > 4.0 || vert_rate.abs() > 8.0 || heading.abs() > 30.0 {
        // performance edge, unlikely for commercial traffic
        0.5
    } else if speed.abs() > 1.0 || heading.abs() > 10.0 || vert_rate.abs() > 2.0 {
        // coordinated turns and normal corrections
        0.2
    } else if time_gap > 30.0 {
        // long silence alone adds mild uncertainty
        0.1
    } else {
        0.0
    };
    score.clamp(0.0, 1.0)
}

/// Ordered split: the first `ratio` of samples train, the rest validate.
pub fn split(
    samples: Vec<TrainingSample>,
    ratio: f64,
) -> (Vec<TrainingSample>, Vec<TrainingSample>) {
    let cut = ((samples.len() as f64) * ratio.clamp(0.0, 1.0)).round() as usize;
    let cut = cut.min(samples.len());
    let mut train = samples;
    let val = train.split_off(cut);
    (train, val)
}

/// Detach inputs and targets for batch consumers.
pub fn into_batches(samples: &[TrainingSample]) -> (Vec<InputRow>, Vec<f64>) {
    let inputs = samples.iter().map(|s| s.inputs.clone()).collect();
    let targets = samples.iter().map(|s| s.target).collect();
    (inputs, targets)
}

/// Class balance and per-feature ranges of a labeled dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub ranges: Vec<FeatureRange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

pub fn summarize(samples: &[TrainingSample]) -> DatasetSummary {
    let mut low = 0;
    let mut medium = 0;
    let mut high = 0;
    for sample in samples {
        if sample.target < 0.4 {
            low += 1;
        } else if sample.target < 0.7 {
            medium += 1;
        } else {
            high += 1;
        }
    }
    let ranges = INPUT_NAMES
        .iter()
        .map(|name| {
            let mut min = f64::MAX;
            let mut max = f64::MIN;
            let mut sum = 0.0;
            for sample in samples {
                let value = sample.inputs.get(*name).copied().unwrap_or(f64::NAN);
                min = min.min(value);
                max = max.max(value);
                sum += value;
            }
            FeatureRange {
                name: name.to_string(),
                min,
                max,
                mean: sum / samples.len().max(1) as f64,
            }
        })
        .collect();
    DatasetSummary {
        total: samples.len(),
        low,
        medium,
        high,
        ranges,
    }
}

impl Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.total.max(1) as f64;
        writeln!(f, "samples: {}", self.total)?;
        writeln!(
            f,
            "anomaly distribution: low {} ({:.1}%), medium {} ({:.1}%), high {} ({:.1}%)",
            self.low,
            100.0 * self.low as f64 / total,
            self.medium,
            100.0 * self.medium as f64 / total,
            self.high,
            100.0 * self.high as f64 / total,
        )?;
        for range in &self.ranges {
            writeln!(
                f,
                "{}: [{:.3}, {:.3}] mean {:.3}",
                range.name, range.min, range.max, range.mean
            )?;
        }
        Ok(())
    }
}
