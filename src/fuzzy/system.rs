use crate::error::Error;
use crate::fuzzy::rule::FuzzyRule;
use crate::fuzzy::variable::FuzzyVariable;
use rustc_hash::FxHashMap;

/// An input sample: variable name → crisp value.
pub type InputRow = FxHashMap<String, f64>;

/// Number of samples on the output discretization grid.
pub const OUTPUT_GRID_POINTS: usize = 101;

/// Mamdani inference: min for AND, clipping for implication, max for
/// aggregation, centroid defuzzification on a fixed grid.
#[derive(Debug, Clone)]
pub struct FuzzyInferenceSystem {
    inputs: FxHashMap<String, FuzzyVariable>,
    output: FuzzyVariable,
    rules: Vec<FuzzyRule>,
}

impl FuzzyInferenceSystem {
    pub fn new(output: FuzzyVariable) -> Self {
        Self {
            inputs: FxHashMap::default(),
            output,
            rules: Vec::new(),
        }
    }

    pub fn add_input_variable(&mut self, var: FuzzyVariable) {
        self.inputs.insert(var.name.clone(), var);
    }

    /// Rules are checked against the registered variables up front so a
    /// typo fails at assembly rather than mid-evaluation.
    pub fn add_rule(&mut self, rule: FuzzyRule) -> Result<(), Error> {
        for ant in &rule.antecedents {
            let var = self
                .inputs
                .get(&ant.variable)
                .ok_or_else(|| Error::missing_input(&ant.variable))?;
            if !var.has_term(&ant.term) {
                return Err(Error::unknown_term(&ant.variable, &ant.term));
            }
        }
        if !self.output.has_term(&rule.consequent.term) {
            return Err(Error::unknown_term(
                &self.output.name,
                &rule.consequent.term,
            ));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn output_variable(&self) -> &FuzzyVariable {
        &self.output
    }

    /// Evaluate one input row to a crisp output in the output domain.
    ///
    /// Inputs outside a variable's domain are clamped. A missing key for
    /// a variable referenced by some rule is an error.
    pub fn evaluate(&self, row: &InputRow) -> Result<f64, Error> {
        let mut aggregated = [0.0f64; OUTPUT_GRID_POINTS];
        let span = self.output.max - self.output.min;

        for rule in &self.rules {
            let mut strength = 1.0f64;
            for ant in &rule.antecedents {
                let var = self
                    .inputs
                    .get(&ant.variable)
                    .ok_or_else(|| Error::missing_input(&ant.variable))?;
                let x = row
                    .get(&ant.variable)
                    .copied()
                    .ok_or_else(|| Error::missing_input(&ant.variable))?;
                let mu = var.membership(&ant.term, var.clamp(x))?;
                strength = strength.min(mu);
            }
            if strength <= 0.0 {
                continue;
            }
            for (i, slot) in aggregated.iter_mut().enumerate() {
                let x = self.output.min + span * i as f64 / (OUTPUT_GRID_POINTS - 1) as f64;
                let mu = self.output.membership(&rule.consequent.term, x)?.min(strength);
                *slot = slot.max(mu);
            }
        }

        Ok(Self::centroid(&aggregated, self.output.min, span))
    }

    fn centroid(aggregated: &[f64], min: f64, span: f64) -> f64 {
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, &mu) in aggregated.iter().enumerate() {
            let x = min + span * i as f64 / (aggregated.len() - 1) as f64;
            num += x * mu;
            den += mu;
        }
        if den > 0.0 {
            num / den
        } else {
            0.0
        }
    }
}
