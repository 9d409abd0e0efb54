//! Validation of a chromosome against a labeled split: regression and
//! classification metrics, prediction records, and the ranked error
//! report.

use crate::chromosome::Chromosome;
use crate::error::Error;
use crate::fuzzy::adsb::{
    fis_from_chromosome, ALTITUDE_CHANGE, HEADING_CHANGE, SPEED_CHANGE, TIME_GAP,
    VERTICAL_RATE_CHANGE,
};
use crate::fuzzy::system::InputRow;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

/// Scores above this count as "anomaly" for the confusion matrix.
pub const CLASSIFICATION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ValidationMetrics {
    pub mse: f64,
    pub mae: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ValidationMetrics {
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }

    pub fn accuracy(&self) -> f64 {
        ratio(
            self.true_positives + self.true_negatives,
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives,
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

impl Display for ValidationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "MSE {:.4}  MAE {:.4}  RMSE {:.4}  R² {:.4}",
            self.mse, self.mae, self.rmse, self.r_squared
        )?;
        writeln!(
            f,
            "accuracy {:.4}  precision {:.4}  recall {:.4}  F1 {:.4}",
            self.accuracy(),
            self.precision(),
            self.recall(),
            self.f1_score()
        )?;
        writeln!(
            f,
            "confusion: tn {} fp {} / fn {} tp {}",
            self.true_negatives, self.false_positives, self.false_negatives, self.true_positives
        )
    }
}

/// FIS outputs for a batch, using the given chromosome's shapes.
pub fn predict(chromosome: &Chromosome, inputs: &[InputRow]) -> Result<Vec<f64>, Error> {
    let fis = fis_from_chromosome(chromosome)?;
    inputs.iter().map(|row| fis.evaluate(row)).collect()
}

pub fn calculate_metrics(
    expected: &[f64],
    predicted: &[f64],
    threshold: f64,
) -> Result<ValidationMetrics, Error> {
    if expected.len() != predicted.len() {
        return Err(Error::ShapeMismatch {
            inputs: predicted.len(),
            labels: expected.len(),
        });
    }
    if expected.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let mut metrics = ValidationMetrics::default();
    let mut sum_squared = 0.0;
    let mut sum_abs = 0.0;
    for (&e, &p) in expected.iter().zip(predicted) {
        let error = p - e;
        sum_squared += error * error;
        sum_abs += error.abs();
        match (p > threshold, e > threshold) {
            (true, true) => metrics.true_positives += 1,
            (true, false) => metrics.false_positives += 1,
            (false, false) => metrics.true_negatives += 1,
            (false, true) => metrics.false_negatives += 1,
        }
    }
    let n = expected.len() as f64;
    metrics.mse = sum_squared / n;
    metrics.mae = sum_abs / n;
    metrics.rmse = metrics.mse.sqrt();

    let mean = expected.iter().sum::<f64>() / n;
    let total_variance: f64 = expected.iter().map(|e| (e - mean) * (e - mean)).sum();
    metrics.r_squared = if total_variance > 0.0 {
        1.0 - sum_squared / total_variance
    } else {
        0.0
    };
    Ok(metrics)
}

/// Evaluate and score a chromosome on one split.
pub fn validate(
    chromosome: &Chromosome,
    inputs: &[InputRow],
    expected: &[f64],
    threshold: f64,
) -> Result<ValidationMetrics, Error> {
    let predicted = predict(chromosome, inputs)?;
    calculate_metrics(expected, &predicted, threshold)
}

/// One row of the predictions artifact; field names become the CSV
/// header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictionRecord {
    pub index: usize,
    pub expected: f64,
    pub predicted: f64,
    pub error: f64,
    pub abs_error: f64,
    pub speed_change: f64,
    pub heading_change: f64,
    pub vertical_rate_change: f64,
    pub altitude_change: f64,
    pub time_gap: f64,
}

pub fn prediction_records(
    inputs: &[InputRow],
    expected: &[f64],
    predicted: &[f64],
) -> Vec<PredictionRecord> {
    let get = |row: &InputRow, key: &str| row.get(key).copied().unwrap_or(f64::NAN);
    inputs
        .iter()
        .zip(expected.iter().zip(predicted))
        .enumerate()
        .map(|(index, (row, (&e, &p)))| PredictionRecord {
            index,
            expected: e,
            predicted: p,
            error: p - e,
            abs_error: (p - e).abs(),
            speed_change: get(row, SPEED_CHANGE),
            heading_change: get(row, HEADING_CHANGE),
            vertical_rate_change: get(row, VERTICAL_RATE_CHANGE),
            altitude_change: get(row, ALTITUDE_CHANGE),
            time_gap: get(row, TIME_GAP),
        })
        .collect()
}

/// The `k` worst predictions, largest absolute error first.
pub fn top_errors(records: &[PredictionRecord], k: usize) -> Vec<PredictionRecord> {
    records
        .iter()
        .sorted_by(|a, b| b.abs_error.total_cmp(&a.abs_error))
        .take(k)
        .cloned()
        .collect()
}

/// Baseline vs optimized, on both splits.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub baseline_train: ValidationMetrics,
    pub baseline_val: ValidationMetrics,
    pub optimized_train: ValidationMetrics,
    pub optimized_val: ValidationMetrics,
}

impl Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<12} {:>14} {:>14} {:>14} {:>14}",
            "metric", "baseline/train", "baseline/val", "opt/train", "opt/val"
        )?;
        let rows: [(&str, fn(&ValidationMetrics) -> f64); 3] = [
            ("F1", ValidationMetrics::f1_score),
            ("accuracy", ValidationMetrics::accuracy),
            ("MSE", |m| m.mse),
        ];
        for (name, value) in rows {
            writeln!(
                f,
                "{:<12} {:>14.4} {:>14.4} {:>14.4} {:>14.4}",
                name,
                value(&self.baseline_train),
                value(&self.baseline_val),
                value(&self.optimized_train),
                value(&self.optimized_val)
            )?;
        }
        Ok(())
    }
}
