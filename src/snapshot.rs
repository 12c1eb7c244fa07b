//! Portable snapshot of a [`CorpusResult`] for persistence and export.
//!
//! # Layout
//!
//! ```text
//! CorpusSnapshot
//!   version: u16 = 1
//!   labels:  [LabelRecord]          (discovery order)
//!     label:    String
//!     subjects: [SubjectRecord]     (discovery order)
//!       subject:    String
//!       dimensions: [String]        (column order)
//!       texts:      [String]        (one per row)
//!       rows:       [[f64]]         (time points × dimensions, may be empty)
//!       failure:    Option<String>
//! ```
//!
//! Matrices are stored row-major as nested lists so any JSON/CSV consumer can
//! read them without an array library. Failures are flattened to their
//! display text.

use ndarray::Array2;

use crate::corpus::CorpusResult;
use crate::trajectory::TrajectoryResult;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Serialisable form of a whole corpus result.
///
/// ```rust,ignore
/// let snapshot = CorpusSnapshot::from_result(&result);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// let restored: CorpusSnapshot = serde_json::from_str(&json).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct CorpusSnapshot {
    /// Format version, [`SNAPSHOT_VERSION`] for new snapshots.
    pub version: u16,
    /// Labels with their subjects, in discovery order.
    pub labels: Vec<LabelRecord>,
}

/// One grouping label and the subjects filed under it.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct LabelRecord {
    /// Grouping label.
    pub label: String,
    /// Per-subject trajectories.
    pub subjects: Vec<SubjectRecord>,
}

/// Serialisable form of a [`TrajectoryResult`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct SubjectRecord {
    /// Subject identifier.
    pub subject: String,
    /// Dimension names in column order.
    pub dimensions: Vec<String>,
    /// Driving text per row.
    pub texts: Vec<String>,
    /// Simulated states, row-major.
    pub rows: Vec<Vec<f64>>,
    /// Display text of the failure that stopped integration, if any.
    pub failure: Option<String>,
}

impl From<&TrajectoryResult> for SubjectRecord {
    fn from(t: &TrajectoryResult) -> Self {
        Self {
            subject: t.subject.clone(),
            dimensions: t.dimensions.names().to_vec(),
            texts: t.texts.clone(),
            rows: t.simulation.outer_iter().map(|row| row.to_vec()).collect(),
            failure: t.failure.as_ref().map(ToString::to_string),
        }
    }
}

impl SubjectRecord {
    /// Rebuild the simulation matrix.
    ///
    /// Returns `None` if the rows are ragged or do not match the dimension
    /// count.
    pub fn matrix(&self) -> Option<Array2<f64>> {
        let width = self.dimensions.len();
        if self.rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let flat: Vec<f64> = self.rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.rows.len(), width), flat).ok()
    }
}

impl CorpusSnapshot {
    /// Capture a corpus result.
    pub fn from_result(result: &CorpusResult) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            labels: result
                .iter()
                .map(|(label, trajectories)| LabelRecord {
                    label: label.to_owned(),
                    subjects: trajectories.iter().map(SubjectRecord::from).collect(),
                })
                .collect(),
        }
    }

    /// Total number of subject records.
    pub fn trajectory_count(&self) -> usize {
        self.labels.iter().map(|l| l.subjects.len()).sum()
    }

    /// Look up a subject record by identifier.
    pub fn find_subject(&self, subject: &str) -> Option<&SubjectRecord> {
        self.labels
            .iter()
            .flat_map(|l| l.subjects.iter())
            .find(|s| s.subject == subject)
    }
}
