/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Concept-level emotion lexicon (SenticNet-shaped).
//!
//! Each entry scores a concept on four affective categories and may carry a
//! primary and a secondary emotion tag (e.g. `#joy`). The extraction stage
//! turns a lexicon hit into two labelled scores:
//!
//! - the strongest category, labelled `CATEGORY` + primary tag;
//! - the weakest category, labelled `CATEGORY` + secondary tag.

use core::fmt;

use hashbrown::HashMap;

/// The four affective categories, in column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Joy ↔ sadness axis.
    Introspection,
    /// Calmness ↔ anger axis.
    Temper,
    /// Pleasantness ↔ disgust axis.
    Attitude,
    /// Eagerness ↔ fear axis.
    Sensitivity,
}

impl Category {
    /// All categories in column order. Ties resolve to the earlier one.
    pub const ALL: [Category; 4] = [
        Category::Introspection,
        Category::Temper,
        Category::Attitude,
        Category::Sensitivity,
    ];

    /// Upper-case column name used as the label stem.
    pub fn name(self) -> &'static str {
        match self {
            Self::Introspection => "INTROSPECTION",
            Self::Temper => "TEMPER",
            Self::Attitude => "ATTITUDE",
            Self::Sensitivity => "SENSITIVITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One lexicon concept.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LexiconEntry {
    /// Lower-case concept text matched against tokens.
    pub concept: String,
    /// Scores in [`Category::ALL`] order.
    pub scores: [f64; 4],
    /// Tag appended to the strongest category's label.
    pub primary_emotion: Option<String>,
    /// Tag appended to the weakest category's label.
    pub secondary_emotion: Option<String>,
    /// Signed polarity intensity of the concept.
    pub polarity_intensity: f64,
}

impl LexiconEntry {
    /// Create an entry with no emotion tags.
    pub fn new(concept: impl Into<String>, scores: [f64; 4], polarity_intensity: f64) -> Self {
        Self {
            concept: concept.into().to_lowercase(),
            scores,
            primary_emotion: None,
            secondary_emotion: None,
            polarity_intensity,
        }
    }

    /// Builder-style helper: set both emotion tags.
    pub fn with_emotions(mut self, primary: Option<&str>, secondary: Option<&str>) -> Self {
        self.primary_emotion = primary.map(str::to_owned);
        self.secondary_emotion = secondary.map(str::to_owned);
        self
    }

    /// Score for one category.
    pub fn score(&self, category: Category) -> f64 {
        self.scores[category as usize]
    }

    /// Category with the highest score; first wins on ties. NaN scores are skipped.
    pub fn strongest(&self) -> Option<(Category, f64)> {
        self.pick(|candidate, best| candidate > best)
    }

    /// Category with the lowest score; first wins on ties. NaN scores are skipped.
    pub fn weakest(&self) -> Option<(Category, f64)> {
        self.pick(|candidate, best| candidate < best)
    }

    fn pick(&self, better: impl Fn(f64, f64) -> bool) -> Option<(Category, f64)> {
        let mut best: Option<(Category, f64)> = None;
        for category in Category::ALL {
            let score = self.score(category);
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if !better(score, b) => {}
                _ => best = Some((category, score)),
            }
        }
        best
    }

    /// Label for the strongest category, e.g. `INTROSPECTION#joy`.
    pub fn primary_label(&self, category: Category) -> String {
        label(category, self.primary_emotion.as_deref())
    }

    /// Label for the weakest category, e.g. `TEMPER#anger`.
    pub fn secondary_label(&self, category: Category) -> String {
        label(category, self.secondary_emotion.as_deref())
    }
}

fn label(category: Category, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{}{}", category.name(), tag),
        None => category.name().to_owned(),
    }
}

/// Concept lookup table.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    /// An empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, entry: LexiconEntry) {
        self.entries.insert(entry.concept.clone(), entry);
    }

    /// Look up a lower-case token.
    pub fn get(&self, token: &str) -> Option<&LexiconEntry> {
        self.entries.get(token)
    }

    /// Number of concepts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the lexicon has no concepts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LexiconEntry> for Lexicon {
    fn from_iter<I: IntoIterator<Item = LexiconEntry>>(iter: I) -> Self {
        let mut lexicon = Self::new();
        for entry in iter {
            lexicon.insert(entry);
        }
        lexicon
    }
}
