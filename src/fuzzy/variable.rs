use crate::error::Error;
use crate::fuzzy::membership::MembershipFunction;
use serde::{Deserialize, Serialize};

/// A named linguistic variable: a domain and an ordered list of
/// membership functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyVariable {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mfs: Vec<MembershipFunction>,
}

impl FuzzyVariable {
    /// Every MF parameter must lie inside the domain.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        mfs: Vec<MembershipFunction>,
    ) -> Result<Self, Error> {
        let name = name.into();
        for mf in &mfs {
            if mf.params.iter().any(|&p| p < min || p > max) {
                return Err(Error::malformed_mf(
                    &mf.label,
                    format!(
                        "parameters {:?} outside the domain [{}, {}] of `{}`",
                        mf.params, min, max, name
                    ),
                ));
            }
        }
        Ok(Self {
            name,
            min,
            max,
            mfs,
        })
    }

    /// Out-of-domain inputs are clamped, not rejected.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    pub fn membership(&self, label: &str, x: f64) -> Result<f64, Error> {
        self.mfs
            .iter()
            .find(|mf| mf.label == label)
            .map(|mf| mf.evaluate(x))
            .ok_or_else(|| Error::unknown_term(&self.name, label))
    }

    pub fn has_term(&self, label: &str) -> bool {
        self.mfs.iter().any(|mf| mf.label == label)
    }

    /// µ values in MF order.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        self.mfs.iter().map(|mf| mf.evaluate(x)).collect()
    }
}
