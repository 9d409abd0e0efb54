use crate::chromosome::Chromosome;
use crate::error::Error;
use crate::fuzzy::adsb::fis_from_chromosome;
use crate::fuzzy::system::InputRow;

/// Scores a chromosome against a labeled batch.
///
/// The evaluator owns the batch; the FIS is rebuilt per evaluation from
/// the chromosome's gene slices and dropped afterwards.
pub struct FitnessEvaluator {
    inputs: Vec<InputRow>,
    targets: Vec<f64>,
}

/// Samples labeled as anomalous are rare, so errors on them count more.
fn sample_weight(target: f64) -> f64 {
    if target >= 0.8 {
        10.0
    } else if target >= 0.4 {
        5.0
    } else if target > 0.0 {
        2.0
    } else {
        1.0
    }
}

impl FitnessEvaluator {
    pub fn new(inputs: Vec<InputRow>, targets: Vec<f64>) -> Result<Self, Error> {
        if inputs.len() != targets.len() {
            return Err(Error::ShapeMismatch {
                inputs: inputs.len(),
                labels: targets.len(),
            });
        }
        if inputs.is_empty() {
            return Err(Error::EmptyBatch);
        }
        Ok(Self { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Weighted-MSE fitness, 1 / (1 + wMSE), always in (0, 1].
    pub fn evaluate(&self, chromosome: &Chromosome) -> Result<f64, Error> {
        let fis = fis_from_chromosome(chromosome)?;
        let mut weighted_error = 0.0;
        let mut total_weight = 0.0;
        for (row, &target) in self.inputs.iter().zip(&self.targets) {
            let predicted = fis.evaluate(row)?;
            let weight = sample_weight(target);
            let err = predicted - target;
            weighted_error += weight * err * err;
            total_weight += weight;
        }
        Ok(1.0 / (1.0 + weighted_error / total_weight))
    }
}
