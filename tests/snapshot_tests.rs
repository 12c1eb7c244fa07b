//! Snapshot round-trip tests.
//!
//! A simulated corpus is captured as a `CorpusSnapshot`, serialised to JSON,
//! read back, and checked against the live result.

#![cfg(feature = "serde")]

use sentiment_flow::snapshot::{CorpusSnapshot, SNAPSHOT_VERSION};
use sentiment_flow::{simulate_corpus, CorpusResult, DimensionSet, SegmentRecord, SimulationConfig};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn rec(subject: &str, label: &str, ordinal: usize, polarity: f64, v: [f64; 3]) -> SegmentRecord {
    SegmentRecord::new(subject, label, ordinal, format!("{subject} says hope {ordinal}"), polarity)
        .with_emotion("ATTITUDE", v[0])
        .with_emotion("SENSITIVITY", v[1])
        .with_emotion("TEMPER", v[2])
}

/// Two labels, three subjects, one of them failing on its second step.
fn make_result() -> CorpusResult {
    let dims = DimensionSet::from_names(["ATTITUDE", "SENSITIVITY", "TEMPER"]);
    let records = vec![
        rec("ann", "monday", 0, 0.1, [0.2, 0.0, 0.1]),
        rec("ann", "monday", 1, -0.1, [0.1, 0.3, 0.0]),
        rec("ann", "monday", 2, 0.2, [0.0, 0.1, 0.2]),
        rec("bo", "monday", 0, 0.3, [0.4, 0.1, 0.1]),
        rec("cy", "tuesday", 0, 0.0, [0.1, 0.1, 0.1]),
        rec("cy", "tuesday", 1, 0.0, [0.1, 0.1, 0.1]),
        rec("cy", "tuesday", 2, f64::NAN, [0.1, 0.1, 0.1]),
    ];
    simulate_corpus(records, &dims, &SimulationConfig::default())
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn snapshot_mirrors_result() {
    let result = make_result();
    let snapshot = CorpusSnapshot::from_result(&result);

    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    assert_eq!(snapshot.trajectory_count(), result.trajectory_count());
    let labels: Vec<&str> = snapshot.labels.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["monday", "tuesday"]);

    for (label, trajectories) in result.iter() {
        let record = snapshot
            .labels
            .iter()
            .find(|l| l.label == label)
            .expect("label captured");
        assert_eq!(record.subjects.len(), trajectories.len());
        for (subject, trajectory) in record.subjects.iter().zip(trajectories) {
            assert_eq!(subject.subject, trajectory.subject);
            assert_eq!(subject.texts, trajectory.texts);
            assert_eq!(subject.matrix().as_ref(), Some(&trajectory.simulation));
        }
    }
}

#[test]
fn json_round_trip_preserves_everything() {
    let snapshot = CorpusSnapshot::from_result(&make_result());
    let json = serde_json::to_string(&snapshot).expect("serialise");
    let restored: CorpusSnapshot = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(restored, snapshot);
}

#[test]
fn failures_are_flattened_to_text() {
    let snapshot = CorpusSnapshot::from_result(&make_result());

    let cy = snapshot.find_subject("cy").expect("cy captured");
    let failure = cy.failure.as_deref().expect("cy failed");
    assert!(failure.contains("invalid sentiment flow"), "{failure}");
    assert_eq!(cy.rows.len(), 2);

    let ann = snapshot.find_subject("ann").expect("ann captured");
    assert!(ann.failure.is_none());
    assert_eq!(ann.rows.len(), 4);
}

#[test]
fn empty_trajectory_keeps_its_width() {
    let snapshot = CorpusSnapshot::from_result(&make_result());
    let bo = snapshot.find_subject("bo").expect("bo captured");
    assert!(bo.rows.is_empty());
    let matrix = bo.matrix().expect("well-formed");
    assert_eq!(matrix.dim(), (0, 3));
}

#[test]
fn ragged_rows_do_not_rebuild() {
    let mut snapshot = CorpusSnapshot::from_result(&make_result());
    let ann = snapshot.labels[0]
        .subjects
        .iter_mut()
        .find(|s| s.subject == "ann")
        .expect("ann captured");
    ann.rows[1].pop();
    assert!(ann.matrix().is_none());
}

#[test]
fn unknown_subject_is_none() {
    let snapshot = CorpusSnapshot::from_result(&make_result());
    assert!(snapshot.find_subject("nobody").is_none());
}
