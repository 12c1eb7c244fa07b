/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Lexicon-based emotion extraction: raw segments in, [`SegmentRecord`]s and
//! the corpus [`DimensionSet`] out.
//!
//! ```text
//! SegmentInput ─▶ Tokenizer ─▶ Lexicon hits ─▶ SegmentAccumulator ─▶ SegmentRecord
//!                                                                      │
//!                                  non-zero labels across the corpus ──┴─▶ DimensionSet
//! ```
//!
//! For each token found in the lexicon the strongest category's score is
//! added under its primary label and, when the labels differ, the weakest
//! category's score under its secondary label. Both labels are registered
//! either way. The segment's polarity is the mean polarity intensity of its
//! hits.
//!
//! The dimension set is computed once here: every label with a non-zero
//! score in at least one segment of the corpus.

pub mod accumulator;
pub mod lexicon;
pub mod tokenizer;

use std::collections::BTreeSet;

use hashbrown::HashMap;
use tracing::debug;

pub use accumulator::{RunningMean, SegmentAccumulator, SegmentScores};
pub use lexicon::{Category, Lexicon, LexiconEntry};
pub use tokenizer::{Tokenizer, WordTokenizer};

use crate::dimensions::DimensionSet;
use crate::segment::{DimensionValue, SegmentRecord};

/// One raw segment awaiting extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentInput {
    /// Subject identity.
    pub subject: String,
    /// Grouping label (document title).
    pub label: String,
    /// Segment text.
    pub text: String,
}

impl SegmentInput {
    /// Create an input segment.
    pub fn new(subject: impl Into<String>, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Output of the extraction stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    /// Corpus-wide dimension ordering.
    pub dimensions: DimensionSet,
    /// One record per input segment, in input order.
    pub records: Vec<SegmentRecord>,
}

/// Turns raw segments into scored records using a lexicon.
#[derive(Clone, Debug)]
pub struct Extractor<T = WordTokenizer> {
    lexicon: Lexicon,
    tokenizer: T,
}

impl Extractor<WordTokenizer> {
    /// Extractor with the default word tokenizer.
    pub fn new(lexicon: Lexicon) -> Self {
        Self::with_tokenizer(lexicon, WordTokenizer)
    }
}

impl<T: Tokenizer> Extractor<T> {
    /// Extractor with a custom tokenizer.
    pub fn with_tokenizer(lexicon: Lexicon, tokenizer: T) -> Self {
        Self { lexicon, tokenizer }
    }

    /// The lexicon in use.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score a single text.
    pub fn score(&self, text: &str) -> SegmentScores {
        let mut acc = SegmentAccumulator::new();
        for token in self.tokenizer.tokens(text) {
            let Some(entry) = self.lexicon.get(&token) else {
                continue;
            };
            let (Some((max_cat, max_score)), Some((min_cat, min_score))) =
                (entry.strongest(), entry.weakest())
            else {
                continue;
            };
            let max_label = entry.primary_label(max_cat);
            let min_label = entry.secondary_label(min_cat);

            acc.register(&min_label);
            acc.add(&max_label, max_score);
            if max_label != min_label {
                acc.add(&min_label, min_score);
            }
            acc.add_polarity(entry.polarity_intensity);
        }
        acc.finish()
    }

    /// Score every input and compute the corpus dimension set.
    ///
    /// Ordinals are assigned per subject in input order.
    pub fn extract<I>(&self, inputs: I) -> Extraction
    where
        I: IntoIterator<Item = SegmentInput>,
    {
        let mut ordinals: HashMap<String, usize> = HashMap::new();
        let mut nonzero: BTreeSet<String> = BTreeSet::new();
        let mut records = Vec::new();

        for input in inputs {
            let scores = self.score(&input.text);
            let ordinal = ordinals.entry(input.subject.clone()).or_insert(0);

            let mut record = SegmentRecord::new(input.subject, input.label, *ordinal, input.text, scores.polarity);
            *ordinal += 1;

            for (label, value) in scores.emotions {
                if value != 0.0 {
                    nonzero.insert(label.clone());
                }
                record.emotions.insert(label, DimensionValue::Number(value));
            }
            records.push(record);
        }

        let dimensions = DimensionSet::from_names(nonzero);
        debug!(segments = records.len(), dimensions = %dimensions, "extraction done");
        Extraction { dimensions, records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        [
            LexiconEntry::new("hope", [0.8, 0.2, 0.5, 0.1], 0.7).with_emotions(Some("#joy"), Some("#calmness")),
            LexiconEntry::new("fear", [-0.3, -0.1, -0.2, -0.9], -0.6).with_emotions(Some("#anger"), Some("#fear")),
            LexiconEntry::new("meh", [0.0, 0.0, 0.0, 0.0], 0.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn score_accumulates_labels_and_polarity() {
        let extractor = Extractor::new(lexicon());
        let scores = extractor.score("Hope beats fear, hope wins.");
        // hope ×2: INTROSPECTION#joy 0.8, SENSITIVITY#calmness 0.1
        // fear ×1: TEMPER#anger -0.1 (max), SENSITIVITY#fear -0.9 (min)
        assert!((scores.emotions["INTROSPECTION#joy"] - 0.8).abs() < 1e-12);
        assert!((scores.emotions["SENSITIVITY#calmness"] - 0.1).abs() < 1e-12);
        assert!((scores.emotions["TEMPER#anger"] + 0.1).abs() < 1e-12);
        assert!((scores.emotions["SENSITIVITY#fear"] + 0.9).abs() < 1e-12);
        assert!((scores.polarity - (0.7 + 0.7 - 0.6) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn text_without_hits_scores_nothing() {
        let scores = Extractor::new(lexicon()).score("nothing to see");
        assert!(scores.emotions.is_empty());
        assert_eq!(scores.polarity, 0.0);
    }

    #[test]
    fn identical_labels_count_once() {
        // All-equal scores: max and min are both INTROSPECTION with no tags.
        let scores = Extractor::new(lexicon()).score("meh");
        assert_eq!(scores.emotions.len(), 1);
        assert_eq!(scores.emotions["INTROSPECTION"], 0.0);
    }

    #[test]
    fn extract_builds_dimensions_from_nonzero_labels() {
        let extraction = Extractor::new(lexicon()).extract(vec![
            SegmentInput::new("alice", "debate", "hope"),
            SegmentInput::new("bob", "debate", "meh"),
            SegmentInput::new("alice", "debate", "fear"),
        ]);
        assert_eq!(
            extraction.dimensions.names(),
            &["INTROSPECTION#joy", "SENSITIVITY#calmness", "SENSITIVITY#fear", "TEMPER#anger"]
        );
        let ordinals: Vec<(&str, usize)> = extraction
            .records
            .iter()
            .map(|r| (r.subject.as_str(), r.ordinal))
            .collect();
        assert_eq!(ordinals, vec![("alice", 0), ("bob", 0), ("alice", 1)]);
        // bob's only label is all-zero and is not a dimension.
        let bob = extraction.records[1].emotion_vector(&extraction.dimensions);
        assert_eq!(bob, vec![0.0; 4]);
    }
}
