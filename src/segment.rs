//! Input records consumed by the simulation core.
//!
//! - [`SegmentRecord`]: one text segment with its extracted emotion scores and polarity.
//! - [`DimensionValue`]: a raw emotion score as the extraction stage produced it.
//! - [`Subject`]: a non-empty, occurrence-ordered run of segments sharing one identity.
//!
//! Records are immutable once produced; the core reads them and never writes back.

use hashbrown::HashMap;
use tracing::trace;

use crate::dimensions::DimensionSet;
use crate::error::{FlowError, Result};

/// A raw per-dimension score.
///
/// Extraction output is not guaranteed to be clean numbers, so coercion
/// happens when the emotion vector is built rather than at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum DimensionValue {
    /// A numeric score.
    Number(f64),
    /// A textual score, parsed as a float on coercion.
    Text(String),
}

impl DimensionValue {
    /// Numeric value of this score.
    ///
    /// Unparseable text and NaN both coerce to `0.0`. Infinities are kept;
    /// the flow guards reject them later.
    pub fn coerce(&self) -> f64 {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        };
        if value.is_nan() {
            0.0
        } else {
            value
        }
    }
}

impl From<f64> for DimensionValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for DimensionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// One unit of sequential input: a text segment attributed to a subject.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentRecord {
    /// Subject identity (speaker, or document id for segmented documents).
    pub subject: String,
    /// Grouping label the subject's result is filed under (e.g. document title).
    pub label: String,
    /// Position of this segment within its subject's sequence.
    pub ordinal: usize,
    /// Raw segment text.
    pub text: String,
    /// Emotion scores keyed by dimension name.
    pub emotions: HashMap<String, DimensionValue>,
    /// Polarity scalar; not range-checked.
    pub polarity: f64,
}

impl SegmentRecord {
    /// Create a record with no emotion scores.
    pub fn new(
        subject: impl Into<String>,
        label: impl Into<String>,
        ordinal: usize,
        text: impl Into<String>,
        polarity: f64,
    ) -> Self {
        Self {
            subject: subject.into(),
            label: label.into(),
            ordinal,
            text: text.into(),
            emotions: HashMap::new(),
            polarity,
        }
    }

    /// Builder-style helper: set one emotion score.
    pub fn with_emotion(mut self, name: impl Into<String>, value: impl Into<DimensionValue>) -> Self {
        self.emotions.insert(name.into(), value.into());
        self
    }

    /// The emotion vector of this segment aligned to `dimensions`.
    ///
    /// Dimensions without a score, and scores that fail to coerce, are `0.0`.
    pub fn emotion_vector(&self, dimensions: &DimensionSet) -> Vec<f64> {
        dimensions
            .iter()
            .map(|name| match self.emotions.get(name) {
                Some(value) => value.coerce(),
                None => {
                    trace!(subject = %self.subject, ordinal = self.ordinal, dimension = name, "missing dimension, using 0.0");
                    0.0
                }
            })
            .collect()
    }
}

/// A subject: identity plus its non-empty, occurrence-ordered segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Subject {
    id: String,
    label: String,
    segments: Vec<SegmentRecord>,
}

impl Subject {
    /// Build a subject from its segments in occurrence order.
    ///
    /// The label is taken from the first segment. Returns
    /// [`FlowError::EmptySubject`] if `segments` is empty.
    pub fn new(id: impl Into<String>, segments: Vec<SegmentRecord>) -> Result<Self> {
        let id = id.into();
        let label = match segments.first() {
            Some(first) => first.label.clone(),
            None => return Err(FlowError::EmptySubject { subject: id }),
        };
        Ok(Self { id, label, segments })
    }

    /// Subject identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Grouping label (the first segment's label).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Segments in occurrence order. Never empty.
    pub fn segments(&self) -> &[SegmentRecord] {
        &self.segments
    }

    /// The initial segment, which seeds the simulation.
    pub fn first(&self) -> &SegmentRecord {
        &self.segments[0]
    }

    /// Number of segments (at least 1).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
