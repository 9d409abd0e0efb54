//! The fixed ADS-B linguistic inventory: six variables whose shapes come
//! from a chromosome (or the expert defaults), and the eleven-rule
//! surveillance rule base.

use crate::chromosome::{Chromosome, VariableLayout, LAYOUT};
use crate::error::Error;
use crate::fuzzy::membership::MembershipFunction;
use crate::fuzzy::rule::{Antecedent, FuzzyRule};
use crate::fuzzy::system::FuzzyInferenceSystem;
use crate::fuzzy::variable::FuzzyVariable;

pub const SPEED_CHANGE: &str = "SpeedChange";
pub const HEADING_CHANGE: &str = "HeadingChange";
pub const VERTICAL_RATE_CHANGE: &str = "VerticalRateChange";
pub const ALTITUDE_CHANGE: &str = "AltitudeChange";
pub const TIME_GAP: &str = "TimeGap";
pub const ANOMALY_LEVEL: &str = "AnomalyLevel";

/// The five input names, in chromosome layout order.
pub const INPUT_NAMES: [&str; 5] = [
    SPEED_CHANGE,
    HEADING_CHANGE,
    VERTICAL_RATE_CHANGE,
    ALTITUDE_CHANGE,
    TIME_GAP,
];

/// Build one variable from its gene block (`genes.len()` must equal the
/// layout's gene count).
pub fn variable_from_genes(layout: &VariableLayout, genes: &[f64]) -> Result<FuzzyVariable, Error> {
    let mut mfs = Vec::with_capacity(layout.mfs.len());
    let mut offset = 0;
    for slot in layout.mfs {
        mfs.push(MembershipFunction::new(
            slot.term,
            slot.shape,
            genes[offset..offset + slot.len].to_vec(),
        )?);
        offset += slot.len;
    }
    FuzzyVariable::new(layout.name, layout.min, layout.max, mfs)
}

fn rule(antecedents: &[(&str, &str)], consequent: &str) -> FuzzyRule {
    FuzzyRule::new(
        antecedents
            .iter()
            .map(|(variable, term)| Antecedent::new(variable, term))
            .collect(),
        Antecedent::new(ANOMALY_LEVEL, consequent),
    )
}

fn normal_behavior_rules() -> Vec<FuzzyRule> {
    vec![
        rule(
            &[
                (SPEED_CHANGE, "Zero"),
                (HEADING_CHANGE, "Zero"),
                (VERTICAL_RATE_CHANGE, "Zero"),
                (TIME_GAP, "Small"),
            ],
            "Low",
        ),
        rule(
            &[
                (SPEED_CHANGE, "Negative"),
                (HEADING_CHANGE, "Zero"),
                (TIME_GAP, "Small"),
            ],
            "Low",
        ),
        rule(
            &[
                (SPEED_CHANGE, "Positive"),
                (VERTICAL_RATE_CHANGE, "Positive"),
                (TIME_GAP, "Small"),
            ],
            "Low",
        ),
    ]
}

fn strong_anomaly_rules() -> Vec<FuzzyRule> {
    vec![
        rule(
            &[
                (SPEED_CHANGE, "Positive_Large"),
                (HEADING_CHANGE, "Positive_Large"),
                (TIME_GAP, "Small"),
            ],
            "High",
        ),
        rule(
            &[
                (HEADING_CHANGE, "Positive"),
                (VERTICAL_RATE_CHANGE, "Negative_Large"),
                (TIME_GAP, "Small"),
            ],
            "High",
        ),
        rule(
            &[
                (ALTITUDE_CHANGE, "Positive_Large"),
                (VERTICAL_RATE_CHANGE, "Zero"),
                (TIME_GAP, "Small"),
            ],
            "High",
        ),
    ]
}

/// A long silence makes large deltas expected, so these down-modulate.
fn time_gap_rules() -> Vec<FuzzyRule> {
    vec![
        rule(
            &[(TIME_GAP, "Large"), (SPEED_CHANGE, "Positive_Large")],
            "Medium",
        ),
        rule(
            &[(TIME_GAP, "Large"), (HEADING_CHANGE, "Positive_Large")],
            "Low",
        ),
        rule(&[(TIME_GAP, "Large"), (SPEED_CHANGE, "Zero")], "Low"),
    ]
}

fn compound_anomaly_rules() -> Vec<FuzzyRule> {
    vec![
        rule(
            &[
                (SPEED_CHANGE, "Positive"),
                (HEADING_CHANGE, "Negative"),
                (VERTICAL_RATE_CHANGE, "Positive_Large"),
                (TIME_GAP, "Small"),
            ],
            "High",
        ),
        rule(
            &[
                (SPEED_CHANGE, "Negative"),
                (ALTITUDE_CHANGE, "Positive_Large"),
                (TIME_GAP, "Small"),
            ],
            "High",
        ),
    ]
}

/// The full rule base, in insertion order.
pub fn rule_base() -> Vec<FuzzyRule> {
    let mut rules = normal_behavior_rules();
    rules.extend(strong_anomaly_rules());
    rules.extend(time_gap_rules());
    rules.extend(compound_anomaly_rules());
    rules
}

/// Assemble the full inference system with shapes taken from a
/// chromosome. The layout table drives the slicing; the last layout entry
/// is the output variable.
pub fn fis_from_chromosome(chromosome: &Chromosome) -> Result<FuzzyInferenceSystem, Error> {
    let (output_layout, input_layouts) = LAYOUT.split_last().expect("layout is non-empty");
    let output = variable_from_genes(output_layout, chromosome.variable_genes(output_layout))?;
    let mut fis = FuzzyInferenceSystem::new(output);
    for layout in input_layouts {
        fis.add_input_variable(variable_from_genes(layout, chromosome.variable_genes(layout))?);
    }
    for rule in rule_base() {
        fis.add_rule(rule)?;
    }
    Ok(fis)
}

/// The system with the expert default shapes.
pub fn default_system() -> Result<FuzzyInferenceSystem, Error> {
    fis_from_chromosome(&Chromosome::new())
}
