//! Membership function and inference system behavior, including domain
//! boundaries and the nominal flight scenarios.

use skyfis::chromosome::{Chromosome, DEFAULT_GENES, LAYOUT};
use skyfis::error::Error;
use skyfis::fuzzy::adsb::{default_system, variable_from_genes, ALTITUDE_CHANGE, ANOMALY_LEVEL,
    HEADING_CHANGE, SPEED_CHANGE, TIME_GAP, VERTICAL_RATE_CHANGE};
use skyfis::fuzzy::{
    Antecedent, FuzzyInferenceSystem, FuzzyRule, FuzzyVariable, InputRow, MembershipFunction,
    MfShape,
};

fn row(speed: f64, heading: f64, vert_rate: f64, altitude: f64, time_gap: f64) -> InputRow {
    let mut inputs = InputRow::default();
    inputs.insert(SPEED_CHANGE.to_string(), speed);
    inputs.insert(HEADING_CHANGE.to_string(), heading);
    inputs.insert(VERTICAL_RATE_CHANGE.to_string(), vert_rate);
    inputs.insert(ALTITUDE_CHANGE.to_string(), altitude);
    inputs.insert(TIME_GAP.to_string(), time_gap);
    inputs
}

#[test]
fn triangle_evaluates_linearly() {
    let mf = MembershipFunction::new("t", MfShape::Triangle, vec![0.0, 5.0, 10.0]).unwrap();
    assert_eq!(mf.evaluate(0.0), 0.0);
    assert_eq!(mf.evaluate(2.5), 0.5);
    assert_eq!(mf.evaluate(5.0), 1.0);
    assert_eq!(mf.evaluate(7.5), 0.5);
    assert_eq!(mf.evaluate(10.0), 0.0);
    assert_eq!(mf.evaluate(-1.0), 0.0);
    assert_eq!(mf.evaluate(11.0), 0.0);
}

#[test]
fn degenerate_triangle_is_a_spike() {
    let mf = MembershipFunction::new("spike", MfShape::Triangle, vec![1.0, 1.0, 1.0]).unwrap();
    assert_eq!(mf.evaluate(1.0), 1.0);
    assert_eq!(mf.evaluate(0.999), 0.0);
    assert_eq!(mf.evaluate(1.001), 0.0);
    assert!(!mf.evaluate(1.0).is_nan());
}

#[test]
fn degenerate_z_shape_is_a_step() {
    let mf = MembershipFunction::new("step", MfShape::ZShape, vec![2.0, 2.0]).unwrap();
    assert_eq!(mf.evaluate(1.9), 1.0);
    assert_eq!(mf.evaluate(2.0), 1.0);
    assert_eq!(mf.evaluate(2.1), 0.0);
}

#[test]
fn s_shape_rises_quadratically() {
    let mf = MembershipFunction::new("s", MfShape::SShape, vec![3.0, 6.0]).unwrap();
    assert_eq!(mf.evaluate(3.0), 0.0);
    assert_eq!(mf.evaluate(6.0), 1.0);
    assert_eq!(mf.evaluate(10.0), 1.0);
    assert!((mf.evaluate(4.5) - 0.5).abs() < 1e-12);
}

#[test]
fn trapezoid_has_a_flat_top() {
    let mf = MembershipFunction::new("trap", MfShape::Trapezoid, vec![0.0, 2.0, 4.0, 6.0]).unwrap();
    assert_eq!(mf.evaluate(0.0), 0.0);
    assert_eq!(mf.evaluate(1.0), 0.5);
    assert_eq!(mf.evaluate(3.0), 1.0);
    assert_eq!(mf.evaluate(5.0), 0.5);
    assert_eq!(mf.evaluate(6.0), 0.0);
}

#[test]
fn membership_stays_in_unit_interval() {
    let z = MembershipFunction::new("z", MfShape::ZShape, vec![-1.0, 1.0]).unwrap();
    let s = MembershipFunction::new("s", MfShape::SShape, vec![-1.0, 1.0]).unwrap();
    for i in -40..=40 {
        let x = i as f64 / 10.0;
        for mf in [&z, &s] {
            let mu = mf.evaluate(x);
            assert!((0.0..=1.0).contains(&mu), "µ({x}) = {mu} out of range");
        }
    }
}

#[test]
fn wrong_parameter_count_is_malformed() {
    let result = MembershipFunction::new("bad", MfShape::Triangle, vec![0.0, 1.0]);
    assert!(matches!(result, Err(Error::MalformedMf { .. })));
}

#[test]
fn decreasing_parameters_are_malformed() {
    let result = MembershipFunction::new("bad", MfShape::ZShape, vec![1.0, 0.0]);
    assert!(matches!(result, Err(Error::MalformedMf { .. })));
}

#[test]
fn unknown_term_is_reported() {
    let chromosome = Chromosome::new();
    let variable = variable_from_genes(&LAYOUT[0], chromosome.variable_genes(&LAYOUT[0])).unwrap();
    let result = variable.membership("Huge", 0.0);
    assert!(matches!(result, Err(Error::UnknownTerm { .. })));
}

#[test]
fn fuzzify_returns_memberships_in_order() {
    let variable = variable_from_genes(&LAYOUT[0], &DEFAULT_GENES[0..13]).unwrap();
    assert_eq!(variable.fuzzify(0.0), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn domain_endpoints_never_produce_nan() {
    let chromosome = Chromosome::new();
    for layout in &LAYOUT {
        let variable = variable_from_genes(layout, chromosome.variable_genes(layout)).unwrap();
        for x in [layout.min, layout.max] {
            for mu in variable.fuzzify(x) {
                assert!(mu.is_finite(), "{}({x}) not finite", layout.name);
                assert!((0.0..=1.0).contains(&mu));
            }
        }
    }
}

#[test]
fn speed_endpoints_hit_the_outer_terms() {
    let variable = variable_from_genes(&LAYOUT[0], &DEFAULT_GENES[0..13]).unwrap();
    assert_eq!(variable.membership("Negative_Large", -10.0).unwrap(), 1.0);
    assert_eq!(variable.membership("Positive_Large", 10.0).unwrap(), 1.0);
    assert_eq!(variable.membership("Zero", -10.0).unwrap(), 0.0);
}

#[test]
fn nominal_flight_falls_into_low() {
    let fis = default_system().unwrap();
    let score = fis.evaluate(&row(0.0, 0.0, 0.0, 0.0, 1.0)).unwrap();
    assert!(score < 0.4, "nominal flight scored {score}");
    assert!(score >= 0.0);
}

#[test]
fn large_gap_alone_activates_only_modulators() {
    let fis = default_system().unwrap();
    let score = fis.evaluate(&row(0.0, 0.0, 0.0, 0.0, 30.0)).unwrap();
    // the (Large gap ∧ Zero speed) → Low rule fires with full strength
    assert!(score > 0.0);
    assert!(score < 0.4, "quiet large gap scored {score}");
}

#[test]
fn no_firing_rule_means_zero_output() {
    let fis = default_system().unwrap();
    // an isolated heading excursion reaches no rule of the fixed base
    let score = fis.evaluate(&row(0.0, 60.0, 0.0, 0.0, 1.0)).unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn out_of_domain_input_is_clamped() {
    let fis = default_system().unwrap();
    let extreme = fis.evaluate(&row(50.0, 120.0, 40.0, 2000.0, 90.0)).unwrap();
    let clamped = fis.evaluate(&row(10.0, 120.0, 20.0, 1000.0, 60.0)).unwrap();
    assert!(extreme.is_finite());
    assert!((0.0..=1.0).contains(&extreme));
    assert_eq!(extreme.to_bits(), clamped.to_bits());
}

#[test]
fn evaluation_is_bit_reproducible() {
    let fis = default_system().unwrap();
    let input = row(2.5, -14.0, 1.0, 120.0, 4.0);
    let first = fis.evaluate(&input).unwrap();
    let second = fis.evaluate(&input).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn missing_input_is_reported() {
    let fis = default_system().unwrap();
    let result = fis.evaluate(&InputRow::default());
    assert!(matches!(result, Err(Error::MissingInput { .. })));
}

#[test]
fn zero_strength_rule_contributes_nothing() {
    let output = FuzzyVariable::new(
        ANOMALY_LEVEL,
        0.0,
        1.0,
        vec![
            MembershipFunction::new("Low", MfShape::ZShape, vec![0.2, 0.4]).unwrap(),
            MembershipFunction::new("High", MfShape::SShape, vec![0.6, 0.8]).unwrap(),
        ],
    )
    .unwrap();
    let input = FuzzyVariable::new(
        "x",
        0.0,
        10.0,
        vec![
            MembershipFunction::new("small", MfShape::ZShape, vec![2.0, 4.0]).unwrap(),
            MembershipFunction::new("big", MfShape::SShape, vec![6.0, 8.0]).unwrap(),
        ],
    )
    .unwrap();

    let mut with_dead_rule = FuzzyInferenceSystem::new(output.clone());
    with_dead_rule.add_input_variable(input.clone());
    with_dead_rule
        .add_rule(FuzzyRule::new(
            vec![Antecedent::new("x", "small")],
            Antecedent::new(ANOMALY_LEVEL, "Low"),
        ))
        .unwrap();
    with_dead_rule
        .add_rule(FuzzyRule::new(
            vec![Antecedent::new("x", "big")],
            Antecedent::new(ANOMALY_LEVEL, "High"),
        ))
        .unwrap();

    let mut without = FuzzyInferenceSystem::new(output);
    without.add_input_variable(input);
    without
        .add_rule(FuzzyRule::new(
            vec![Antecedent::new("x", "small")],
            Antecedent::new(ANOMALY_LEVEL, "Low"),
        ))
        .unwrap();

    // at x = 1 the "big" rule has strength 0 and must not move the output
    let mut sample = InputRow::default();
    sample.insert("x".to_string(), 1.0);
    let a = with_dead_rule.evaluate(&sample).unwrap();
    let b = without.evaluate(&sample).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn rule_with_unknown_term_is_rejected_at_assembly() {
    let mut fis = default_system().unwrap();
    let result = fis.add_rule(FuzzyRule::new(
        vec![Antecedent::new(SPEED_CHANGE, "Gigantic")],
        Antecedent::new(ANOMALY_LEVEL, "Low"),
    ));
    assert!(matches!(result, Err(Error::UnknownTerm { .. })));
}
