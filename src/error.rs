/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Error taxonomy for the simulation engine.
//!
//! Numeric failures are subject-scoped: the trajectory integrator catches them
//! at the subject boundary and records them on the affected
//! [`TrajectoryResult`](crate::trajectory::TrajectoryResult). A corpus run never
//! aborts because one subject's flow became invalid.
//!
//! Missing or non-numeric dimension values are not errors at all; they are
//! coerced to `0.0` where the vector is built (see [`crate::segment`]).

use core::fmt;

/// Which validity guard of the flow field tripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStage {
    /// The incoming state held a NaN or infinite component.
    State,
    /// The finite-difference gradient of the state was not finite.
    Gradient,
    /// The clamped right-hand side was still not finite.
    Rate,
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::State => "state",
            Self::Gradient => "state gradient",
            Self::Rate => "clamped rate",
        })
    }
}

/// Errors raised while simulating sentiment flow.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FlowError {
    /// The flow field guards rejected the current state or its rate of change.
    ///
    /// Not retried: the differential system is considered inapplicable for
    /// the step once this occurs.
    #[error("invalid sentiment flow: non-finite value in {stage}")]
    InvalidFlowState {
        /// The guard that tripped.
        stage: FlowStage,
    },

    /// The solver call for one integration step did not complete.
    ///
    /// Terminates the current subject's integration; other subjects continue.
    #[error("solver failed on step starting at t={time}: {source}")]
    SolverFailure {
        /// Start of the unit time span being integrated.
        time: f64,
        /// What stopped the solver.
        #[source]
        source: Box<FlowError>,
    },

    /// The adaptive solver needed more internal steps than allowed.
    #[error("solver exceeded {max_steps} internal steps before reaching t={target}")]
    StepBudgetExhausted {
        /// Configured budget per output interval.
        max_steps: usize,
        /// Output time that could not be reached.
        target: f64,
    },

    /// The adaptive step size shrank below the configured minimum.
    #[error("solver step size {step:e} fell below the minimum at t={time}")]
    StepSizeUnderflow {
        /// The rejected step size.
        step: f64,
        /// Solver time when the step collapsed.
        time: f64,
    },

    /// Two vectors that must align to the same dimensions did not.
    #[error("dimension mismatch: expected {expected} components, found {found}")]
    DimensionMismatch {
        /// Length of the state.
        expected: usize,
        /// Length of the offending vector.
        found: usize,
    },

    /// A subject was constructed without any segments.
    #[error("subject `{subject}` has no segments")]
    EmptySubject {
        /// Identifier of the offending subject.
        subject: String,
    },
}

impl FlowError {
    /// `true` if this error (or the error it wraps) came from a flow guard.
    pub fn is_invalid_flow(&self) -> bool {
        match self {
            Self::InvalidFlowState { .. } => true,
            Self::SolverFailure { source, .. } => source.is_invalid_flow(),
            _ => false,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_failure_reports_wrapped_flow_state() {
        let err = FlowError::SolverFailure {
            time: 2.0,
            source: Box::new(FlowError::InvalidFlowState { stage: FlowStage::Rate }),
        };
        assert!(err.is_invalid_flow());
        let msg = err.to_string();
        assert!(msg.contains("t=2"), "{msg}");
        assert!(msg.contains("clamped rate"), "{msg}");
    }

    #[test]
    fn budget_errors_are_not_flow_errors() {
        let err = FlowError::StepBudgetExhausted { max_steps: 500, target: 1.0 };
        assert!(!err.is_invalid_flow());
    }

    #[test]
    fn dimension_mismatch_names_both_lengths() {
        let err = FlowError::DimensionMismatch { expected: 4, found: 3 };
        assert!(!err.is_invalid_flow());
        assert_eq!(err.to_string(), "dimension mismatch: expected 4 components, found 3");
    }
}
