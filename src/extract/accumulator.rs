/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Running-mean accumulators for per-segment emotion scores.
//!
//! - [`RunningMean`]: explicit sum/count pair; finalised once.
//! - [`SegmentAccumulator`]: one running mean per emotion label plus one for
//!   polarity, filled token by token and finalised at the end of a segment.
//!
//! A fresh [`SegmentAccumulator`] is built for every segment, so no label set
//! grows across segments or subjects.

use hashbrown::HashMap;

// ─── Running mean ───────────────────────────────────────────────────────────

/// Sum and count of the values seen so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningMean {
    /// Sum of all pushed values.
    pub sum: f64,
    /// Number of pushed values.
    pub count: u32,
}

impl RunningMean {
    /// Start empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one value.
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count = self.count.saturating_add(1);
    }

    /// Mean of the values seen, or `0.0` if none were.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

// ─── Segment accumulator ────────────────────────────────────────────────────

/// Finalised scores of one segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentScores {
    /// Mean score per emotion label registered in the segment.
    pub emotions: HashMap<String, f64>,
    /// Mean polarity intensity over lexicon hits, `0.0` without hits.
    pub polarity: f64,
}

/// Per-segment accumulation state.
#[derive(Clone, Debug, Default)]
pub struct SegmentAccumulator {
    emotions: HashMap<String, RunningMean>,
    polarity: RunningMean,
}

impl SegmentAccumulator {
    /// Start an empty segment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `label` is reported even if it never receives a value.
    pub fn register(&mut self, label: &str) {
        if !self.emotions.contains_key(label) {
            self.emotions.insert(label.to_owned(), RunningMean::new());
        }
    }

    /// Add one score to `label`.
    pub fn add(&mut self, label: &str, score: f64) {
        self.register(label);
        if let Some(acc) = self.emotions.get_mut(label) {
            acc.push(score);
        }
    }

    /// Add one polarity intensity.
    pub fn add_polarity(&mut self, intensity: f64) {
        self.polarity.push(intensity);
    }

    /// Number of labels registered so far.
    pub fn label_count(&self) -> usize {
        self.emotions.len()
    }

    /// Collapse every running mean into the segment's scores.
    pub fn finish(self) -> SegmentScores {
        SegmentScores {
            emotions: self
                .emotions
                .into_iter()
                .map(|(label, acc)| (label, acc.mean()))
                .collect(),
            polarity: self.polarity.mean(),
        }
    }
}
