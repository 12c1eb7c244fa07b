//! Property tests for the derived quantities, the flow field and the
//! per-subject integrator.
//!
//! Each test pins one observable guarantee of the public API; none of them
//! depends on solver internals beyond "two output points per unit span".

use sentiment_flow::flow::{flow, flow_checked, RATE_CLAMP};
use sentiment_flow::quantities::{
    external_contextual_force, sentiment_density, sentiment_pressure, sentiment_viscosity,
};
use sentiment_flow::{
    integrate_subject, DimensionSet, FlowError, FlowStage, KeywordSet, SegmentRecord,
    SimulationConfig, Subject,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn dims() -> DimensionSet {
    DimensionSet::from_names(["ATTITUDE", "INTROSPECTION", "SENSITIVITY", "TEMPER"])
}

fn segment(ordinal: usize, text: &str, polarity: f64, values: [f64; 4]) -> SegmentRecord {
    SegmentRecord::new("speaker", "session", ordinal, text, polarity)
        .with_emotion("ATTITUDE", values[0])
        .with_emotion("INTROSPECTION", values[1])
        .with_emotion("SENSITIVITY", values[2])
        .with_emotion("TEMPER", values[3])
}

fn vectors() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0, 0.0],
        vec![0.5],
        vec![-0.3, 0.0, 0.7, -0.1],
        vec![1e-9, -1e-9],
        vec![12.0, -40.0, 3.5, 0.0, 0.25],
    ]
}

// ─── derived quantities ──────────────────────────────────────────────────────

#[test]
fn density_is_non_negative_and_zero_only_for_zero_vectors() {
    for v in vectors() {
        let d = sentiment_density(&v);
        assert!(d >= 0.0, "density {d} for {v:?}");
        assert_eq!(d == 0.0, v.iter().all(|x| *x == 0.0), "{v:?}");
    }
}

#[test]
fn pressure_is_exactly_score_or_zero() {
    let keywords = KeywordSet::new(["Hope", "fear"]);
    assert_eq!(sentiment_pressure(0.37, &keywords, "We HOPE for better"), 0.37);
    assert_eq!(sentiment_pressure(-2.5, &keywords, "fearless"), -2.5);
    assert_eq!(sentiment_pressure(0.37, &keywords, "nothing charged here"), 0.0);
}

#[test]
fn pressure_with_no_keywords_is_always_zero() {
    let keywords = KeywordSet::empty();
    for text in ["", "hope", "fear and anger"] {
        assert_eq!(sentiment_pressure(0.9, &keywords, text), 0.0);
    }
}

#[test]
fn viscosity_of_constant_vector_is_exactly_zero() {
    for c in [0.0, 0.1, -3.0, 1e6] {
        assert_eq!(sentiment_viscosity(&[c; 7]), 0.0);
    }
}

#[test]
fn contextual_force_is_identity() {
    for x in [0.0, -0.0, 0.5, -1.0, 1e300, f64::MIN_POSITIVE] {
        assert_eq!(external_contextual_force(x), x);
    }
}

// ─── flow field ──────────────────────────────────────────────────────────────

#[test]
fn zero_density_gives_finite_rate() {
    let state = [0.0, 0.0, 0.0, 0.0];
    let pressure = [0.1, -0.2, 0.3, 0.0];
    let rate = flow(0.0, &pressure, 0.0, 0.05, &state).expect("finite rate");
    assert_eq!(rate.len(), 4);
    assert!(rate.iter().all(|r| r.is_finite()));
    // Only the contextual force remains.
    assert!(rate.iter().all(|r| (r - 0.05).abs() < 1e-15));
}

#[test]
fn nan_state_short_circuits_before_clamp() {
    let state = [0.1, f64::NAN, 0.2];
    let pressure = [0.0; 3];
    assert!(flow(0.3, &pressure, 0.1, 0.0, &state).is_none());
    assert_eq!(
        flow_checked(0.3, &pressure, 0.1, 0.0, &state),
        Err(FlowError::InvalidFlowState { stage: FlowStage::State })
    );
}

#[test]
fn infinite_state_is_rejected() {
    let state = [f64::INFINITY, 0.0];
    assert!(flow(1.0, &[0.0, 0.0], 0.0, 0.0, &state).is_none());
}

#[test]
fn overflowing_gradient_is_rejected_before_the_rate() {
    // Both components are finite; their difference is not.
    let state = [1e308, -1e308];
    assert_eq!(
        flow_checked(1.0, &[0.0, 0.0], 0.0, 0.0, &state),
        Err(FlowError::InvalidFlowState { stage: FlowStage::Gradient })
    );
}

#[test]
fn huge_rates_are_clamped() {
    let state = [1e8, -1e8, 1e8];
    let rate = flow(3e8, &[0.0; 3], 0.0, 0.0, &state).expect("finite after clamp");
    assert!(rate.iter().all(|r| r.abs() <= RATE_CLAMP));
    assert!(rate.iter().any(|r| r.abs() == RATE_CLAMP));
}

// ─── integrator ──────────────────────────────────────────────────────────────

#[test]
fn single_segment_subject_has_empty_matrix_and_no_error() {
    let subject = Subject::new("speaker", vec![segment(0, "alone", 0.4, [0.1, 0.2, 0.3, 0.4])])
        .expect("non-empty subject");
    let result = integrate_subject(&subject, &dims(), &SimulationConfig::default());
    assert_eq!(result.simulation.nrows(), 0);
    assert_eq!(result.simulation.ncols(), 4);
    assert!(result.failure.is_none());
}

#[test]
fn constant_two_segment_subject_runs_one_step() {
    let values = [0.3, 0.3, 0.3, 0.3];
    let subject = Subject::new(
        "speaker",
        vec![segment(0, "first", 0.0, values), segment(1, "second", 0.0, values)],
    )
    .expect("non-empty subject");
    let result = integrate_subject(&subject, &dims(), &SimulationConfig::default());

    // One unit span: start and end points.
    assert_eq!(result.simulation.nrows(), 2);
    assert_eq!(result.texts.len(), 2);
    assert!(result.simulation.iter().all(|v| v.is_finite()));
    assert!(result.is_complete());
}

#[test]
fn rows_grow_two_per_transition() {
    for n in 2..6 {
        let segments = (0..n)
            .map(|i| segment(i, "text", 0.01, [0.1, 0.05 * i as f64, 0.0, -0.1]))
            .collect();
        let subject = Subject::new("speaker", segments).expect("non-empty subject");
        let result = integrate_subject(&subject, &dims(), &SimulationConfig::default());
        assert!(result.is_complete(), "{:?}", result.failure);
        assert_eq!(result.len(), 2 * (n - 1));
    }
}

#[test]
fn non_numeric_values_integrate_as_zero() {
    let first = SegmentRecord::new("speaker", "session", 0, "a", 0.0)
        .with_emotion("ATTITUDE", "n/a")
        .with_emotion("TEMPER", "0.5");
    let second = SegmentRecord::new("speaker", "session", 1, "b", 0.0);
    let subject = Subject::new("speaker", vec![first, second]).expect("non-empty subject");
    let result = integrate_subject(&subject, &dims(), &SimulationConfig::default());

    let start = result.simulation.row(0);
    assert_eq!(start.to_vec(), vec![0.0, 0.0, 0.0, 0.5]);
}
