/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Per-subject sequential integration.
//!
//! One subject's segments drive one solver call each, over consecutive unit
//! time spans:
//!
//! ```text
//! segment:   s₀        s₁         s₂         s₃
//! time:      0 ──────▶ 1 ───────▶ 2 ───────▶ 3
//! driver:      (s₀)       (s₂)       (s₃)          SeedFromInitial
//! driver:      (s₁)       (s₂)       (s₃)          CurrentSegment
//! ```
//!
//! The first segment's emotion vector is the initial condition. Each step
//! derives its parameters from the state it starts from plus the driving
//! segment's text and polarity, and the step's last output point seeds the
//! next step.
//!
//! # Invariants
//!
//! - Steps are strictly sequential; step *i+1* starts from step *i*'s end state.
//! - A single-segment subject yields a zero-row matrix and no failure.
//! - A solver failure stops the subject; earlier points are kept.

use ndarray::{Array2, ArrayView1, Axis};
use tracing::{debug, warn};

use crate::dimensions::DimensionSet;
use crate::error::FlowError;
use crate::quantities::{FlowParams, KeywordSet};
use crate::segment::Subject;
use crate::solver::{FlowSystem, SolverConfig};

// ─── Configuration ──────────────────────────────────────────────────────────

/// Which segment drives each transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPolicy {
    /// The first transition reuses the initial segment's text and polarity;
    /// later transitions use their own segment. Used for speeches.
    #[default]
    SeedFromInitial,
    /// Every transition uses its own segment's text and polarity. Used for
    /// documents split into segments.
    CurrentSegment,
}

/// Everything the integrator needs besides the data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    /// Keywords that switch pressure on.
    pub keywords: KeywordSet,
    /// Adaptive solver settings.
    pub solver: SolverConfig,
    /// Which segment drives each transition.
    pub transition: TransitionPolicy,
}

impl SimulationConfig {
    /// Default configuration with a custom keyword list.
    pub fn with_keywords(keywords: KeywordSet) -> Self {
        Self { keywords, ..Self::default() }
    }
}

// ─── Result ─────────────────────────────────────────────────────────────────

/// Simulated trajectory of one subject.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryResult {
    /// Subject identifier.
    pub subject: String,
    /// Driving text for each retained point (one per matrix row).
    pub texts: Vec<String>,
    /// Retained states: rows are time points, columns follow `dimensions`.
    pub simulation: Array2<f64>,
    /// Column ordering of `simulation`.
    pub dimensions: DimensionSet,
    /// Why integration stopped early, if it did.
    pub failure: Option<FlowError>,
}

impl TrajectoryResult {
    /// Number of retained time points.
    pub fn len(&self) -> usize {
        self.simulation.nrows()
    }

    /// `true` if no point was retained (single-segment subject, or failure on
    /// the first step).
    pub fn is_empty(&self) -> bool {
        self.simulation.nrows() == 0
    }

    /// `true` if every transition integrated.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// The simulated series of one dimension, by name.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.dimensions
            .index_of(name)
            .map(|i| self.simulation.index_axis(Axis(1), i))
    }

    /// The last retained state, if any.
    pub fn final_state(&self) -> Option<ArrayView1<'_, f64>> {
        self.len()
            .checked_sub(1)
            .map(|last| self.simulation.index_axis(Axis(0), last))
    }
}

fn stack(points: &[Vec<f64>], width: usize) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), width), |(i, j)| points[i][j])
}

// ─── Integrator ─────────────────────────────────────────────────────────────

/// Integrate one subject's segments into its trajectory.
///
/// Never fails as a whole: a solver failure ends the subject early and is
/// recorded in [`TrajectoryResult::failure`].
pub fn integrate_subject(
    subject: &Subject,
    dimensions: &DimensionSet,
    config: &SimulationConfig,
) -> TrajectoryResult {
    let first = subject.first();
    let mut state = first.emotion_vector(dimensions);
    let mut time = 0.0_f64;
    let mut points: Vec<Vec<f64>> = Vec::new();
    let mut texts: Vec<String> = Vec::new();
    let mut failure = None;

    debug!(subject = subject.id(), segments = subject.len(), "integrating subject");

    for (i, segment) in subject.segments().iter().enumerate().skip(1) {
        let driver = match config.transition {
            TransitionPolicy::SeedFromInitial if i == 1 => first,
            _ => segment,
        };
        let params = FlowParams::derive(&state, &driver.text, driver.polarity, &config.keywords);

        match FlowSystem::new(&params).advance(&state, time, &config.solver) {
            Ok(step_points) => {
                if let Some(end) = step_points.last() {
                    state = end.clone();
                }
                for point in step_points {
                    points.push(point);
                    texts.push(driver.text.clone());
                }
            }
            Err(err) => {
                warn!(subject = subject.id(), step = i, error = %err, "subject integration stopped");
                failure = Some(err);
                break;
            }
        }
        time += 1.0;
    }

    debug!(subject = subject.id(), points = points.len(), complete = failure.is_none(), "subject done");

    TrajectoryResult {
        subject: subject.id().to_owned(),
        texts,
        simulation: stack(&points, dimensions.len()),
        dimensions: dimensions.clone(),
        failure,
    }
}
