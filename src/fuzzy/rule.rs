/// One `variable IS term` clause; used for both antecedents and the
/// consequent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Antecedent {
    pub variable: String,
    pub term: String,
}

impl Antecedent {
    pub fn new(variable: &str, term: &str) -> Self {
        Self {
            variable: variable.to_string(),
            term: term.to_string(),
        }
    }
}

/// AND-combined antecedents with a single consequent.
#[derive(Debug, Clone)]
pub struct FuzzyRule {
    pub antecedents: Vec<Antecedent>,
    pub consequent: Antecedent,
}

impl FuzzyRule {
    pub fn new(antecedents: Vec<Antecedent>, consequent: Antecedent) -> Self {
        Self {
            antecedents,
            consequent,
        }
    }
}
