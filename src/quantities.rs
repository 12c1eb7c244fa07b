/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Derived quantities: the fluid-mechanics terms computed from a segment.
//!
//! | Quantity | Function | Definition |
//! |----------|----------|------------|
//! | density | [`sentiment_density`] | Σ\|sᵢ\| |
//! | pressure | [`sentiment_pressure`] | score if the text mentions a keyword, else 0 |
//! | viscosity | [`sentiment_viscosity`] | population standard deviation of s |
//! | contextual force | [`external_contextual_force`] | the polarity, unchanged |
//!
//! [`FlowParams::derive`] bundles all four for one integration step.
//!
//! All functions are pure.

/// Built-in emotive keyword list used when no corpus-specific list is supplied.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "happy", "joy", "delight", "hope", "proud", "love", "trust", "grateful",
    "sad", "grief", "fear", "afraid", "anxious", "angry", "hate", "shame",
    "crisis", "threat", "disaster", "victory",
];

// ─── Keyword set ────────────────────────────────────────────────────────────

/// Lower-cased keyword list consulted by [`sentiment_pressure`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a keyword set. Keywords are lower-cased; empty strings are kept
    /// out because they would match every text.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// A set with no keywords; pressure is then always zero.
    pub fn empty() -> Self {
        Self { keywords: Vec::new() }
    }

    /// `true` if the lower-cased `text` contains any keyword as a substring.
    ///
    /// No word boundaries: "joy" matches inside "enjoyed".
    pub fn contains_any(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// `true` if there are no keywords.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

// ─── Calculators ────────────────────────────────────────────────────────────

/// Sentiment density: sum of absolute component values.
///
/// Zero exactly when every component is zero, which switches the flow field
/// onto its zero-density branch.
pub fn sentiment_density(vector: &[f64]) -> f64 {
    vector.iter().map(|v| v.abs()).sum()
}

/// Sentiment pressure for one dimension.
///
/// Returns `score` when `text` mentions any keyword (case-insensitive
/// substring), otherwise `0.0`.
pub fn sentiment_pressure(score: f64, keywords: &KeywordSet, text: &str) -> f64 {
    if keywords.contains_any(text) {
        score
    } else {
        0.0
    }
}

/// Pressure vector: [`sentiment_pressure`] applied to every component.
pub fn pressure_vector(vector: &[f64], keywords: &KeywordSet, text: &str) -> Vec<f64> {
    // The keyword test does not depend on the score, so run it once.
    if keywords.contains_any(text) {
        vector.to_vec()
    } else {
        vec![0.0; vector.len()]
    }
}

/// Sentiment viscosity: population standard deviation of the components.
///
/// An empty vector has viscosity `0.0`, and so does a constant one (exactly,
/// regardless of rounding in the mean).
pub fn sentiment_viscosity(vector: &[f64]) -> f64 {
    let Some(&first) = vector.first() else {
        return 0.0;
    };
    if vector.iter().all(|&v| v == first) {
        return 0.0;
    }
    let n = vector.len() as f64;
    let mean = vector.iter().sum::<f64>() / n;
    let variance = vector.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}

/// External contextual force: the polarity, used unchanged.
#[inline]
pub fn external_contextual_force(polarity: f64) -> f64 {
    polarity
}

// ─── Parameter bundle ───────────────────────────────────────────────────────

/// The four derived quantities, held fixed for one integration step.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowParams {
    /// Sentiment density of the step's starting state.
    pub density: f64,
    /// Per-dimension pressure; same length as the state.
    pub pressure: Vec<f64>,
    /// Sentiment viscosity of the step's starting state.
    pub viscosity: f64,
    /// External forcing term added to every dimension.
    pub context_force: f64,
}

impl FlowParams {
    /// Derive the step parameters from the current state and the segment
    /// chosen to drive this step.
    pub fn derive(state: &[f64], text: &str, polarity: f64, keywords: &KeywordSet) -> Self {
        Self {
            density: sentiment_density(state),
            pressure: pressure_vector(state, keywords, text),
            viscosity: sentiment_viscosity(state),
            context_force: external_contextual_force(polarity),
        }
    }
}
