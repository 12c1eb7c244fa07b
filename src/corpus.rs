/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Corpus orchestration: group records into subjects, integrate each, file
//! the results under their labels.
//!
//! Grouping is by subject identity only. Segments keep their occurrence
//! order, so interleaved input for several subjects never reorders any one
//! subject's sequence. Subjects and labels are reported in first-discovery
//! order.
//!
//! With the `parallel` feature, subjects are integrated on the rayon pool and
//! merged back in discovery order; the result is identical to the sequential
//! path.

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::dimensions::DimensionSet;
use crate::segment::{SegmentRecord, Subject};
use crate::trajectory::{integrate_subject, SimulationConfig, TrajectoryResult};

/// Simulation results keyed by grouping label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorpusResult {
    entries: Vec<(String, Vec<TrajectoryResult>)>,
    index: HashMap<String, usize>,
}

impl CorpusResult {
    /// An empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `trajectory` under `label`, creating the label if unseen.
    pub fn push(&mut self, label: &str, trajectory: TrajectoryResult) {
        let slot = match self.index.get(label) {
            Some(&i) => i,
            None => {
                self.entries.push((label.to_owned(), Vec::new()));
                self.index.insert(label.to_owned(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[slot].1.push(trajectory);
    }

    /// Trajectories filed under `label`.
    pub fn get(&self, label: &str) -> Option<&[TrajectoryResult]> {
        self.index.get(label).map(|&i| self.entries[i].1.as_slice())
    }

    /// Labels in first-discovery order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// `(label, trajectories)` pairs in first-discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TrajectoryResult])> {
        self.entries.iter().map(|(label, t)| (label.as_str(), t.as_slice()))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no label is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of trajectories across all labels.
    pub fn trajectory_count(&self) -> usize {
        self.entries.iter().map(|(_, t)| t.len()).sum()
    }

    /// Find a subject's trajectory by identifier.
    pub fn find_subject(&self, subject: &str) -> Option<&TrajectoryResult> {
        self.entries
            .iter()
            .flat_map(|(_, t)| t.iter())
            .find(|t| t.subject == subject)
    }
}

/// Group records into subjects by identifier.
///
/// Subjects are returned in order of their first record; each subject's
/// segments keep their input order. Records are not re-sorted by ordinal.
pub fn group_subjects<I>(records: I) -> Vec<Subject>
where
    I: IntoIterator<Item = SegmentRecord>,
{
    let mut order: Vec<(String, Vec<SegmentRecord>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.subject) {
            Some(&i) => order[i].1.push(record),
            None => {
                index.insert(record.subject.clone(), order.len());
                order.push((record.subject.clone(), vec![record]));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|(id, segments)| Subject::new(id, segments).ok())
        .collect()
}

/// Integrate every subject and file the results by label.
pub fn simulate_subjects(
    subjects: &[Subject],
    dimensions: &DimensionSet,
    config: &SimulationConfig,
) -> CorpusResult {
    info!(subjects = subjects.len(), dimensions = dimensions.len(), "simulating corpus");

    #[cfg(feature = "parallel")]
    let trajectories: Vec<TrajectoryResult> = {
        use rayon::prelude::*;
        subjects
            .par_iter()
            .map(|subject| integrate_subject(subject, dimensions, config))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let trajectories: Vec<TrajectoryResult> = subjects
        .iter()
        .map(|subject| integrate_subject(subject, dimensions, config))
        .collect();

    let mut result = CorpusResult::new();
    for (subject, trajectory) in subjects.iter().zip(trajectories) {
        result.push(subject.label(), trajectory);
    }

    let failed = result
        .iter()
        .flat_map(|(_, t)| t.iter())
        .filter(|t| !t.is_complete())
        .count();
    debug!(labels = result.len(), failed, "corpus simulated");
    result
}

/// Group `records` by subject and simulate the whole corpus.
pub fn simulate_corpus<I>(records: I, dimensions: &DimensionSet, config: &SimulationConfig) -> CorpusResult
where
    I: IntoIterator<Item = SegmentRecord>,
{
    simulate_subjects(&group_subjects(records), dimensions, config)
}
