/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The sentiment flow field: a Navier–Stokes-shaped right-hand side.
//!
//! ```text
//! ds/dt = s ⊙ ∇s  −  (1/ρ) ∇p  +  ν ∇²s  +  g
//!         ───────    ─────────    ───────    ─
//!         convective  pressure    viscous    context force
//! ```
//!
//! # The spatial axis is the dimension axis
//!
//! `∇` here is a finite difference taken across neighbouring *emotion
//! dimensions*, not across time. The dimensions are laid out as if on a 1-D
//! grid in [`DimensionSet`](crate::dimensions::DimensionSet) order, so the
//! result depends on that (lexicographic) ordering. This is part of the model
//! and is reproduced as is.
//!
//! # Guards
//!
//! - **Zero density**: the pressure term is the zero vector; nothing divides by ρ.
//! - **Pre-check**: a NaN or infinite component in `s` or `∇s` aborts before
//!   the right-hand side is formed, so the clamp can never mask it.
//! - **Clamp**: each rate component is clamped into `[-RATE_CLAMP, RATE_CLAMP]`.
//! - **Post-check**: a rate that is still not finite aborts.

use crate::error::{FlowError, FlowStage};
use crate::quantities::FlowParams;

/// Magnitude bound applied to every component of the rate.
pub const RATE_CLAMP: f64 = 1e10;

/// First-order finite-difference gradient over a 1-D grid with unit spacing.
///
/// Central differences `(x[i+1] − x[i−1]) / 2` in the interior, one-sided
/// differences at both edges. A single point has gradient `0.0`; an empty
/// slice has an empty gradient.
pub fn gradient(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut out = Vec::with_capacity(n);
            out.push(values[1] - values[0]);
            for i in 1..n - 1 {
                out.push((values[i + 1] - values[i - 1]) / 2.0);
            }
            out.push(values[n - 1] - values[n - 2]);
            out
        }
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Evaluate the flow field, reporting which guard tripped on failure.
///
/// A `pressure` vector whose length differs from `state` is rejected with
/// [`FlowError::DimensionMismatch`].
pub fn flow_checked(
    density: f64,
    pressure: &[f64],
    viscosity: f64,
    context_force: f64,
    state: &[f64],
) -> Result<Vec<f64>, FlowError> {
    if pressure.len() != state.len() {
        return Err(FlowError::DimensionMismatch {
            expected: state.len(),
            found: pressure.len(),
        });
    }

    let pressure_term: Vec<f64> = if density == 0.0 {
        vec![0.0; state.len()]
    } else {
        let inv = -1.0 / density;
        gradient(pressure).into_iter().map(|g| inv * g).collect()
    };

    let grad_state = gradient(state);
    let laplacian_state = gradient(&grad_state);

    if !all_finite(state) {
        return Err(FlowError::InvalidFlowState { stage: FlowStage::State });
    }
    if !all_finite(&grad_state) {
        return Err(FlowError::InvalidFlowState { stage: FlowStage::Gradient });
    }

    let mut rate: Vec<f64> = state
        .iter()
        .zip(&grad_state)
        .zip(&laplacian_state)
        .zip(&pressure_term)
        .map(|(((s, g), lap), p)| s * g + p + viscosity * lap + context_force)
        .collect();

    for r in rate.iter_mut() {
        *r = r.clamp(-RATE_CLAMP, RATE_CLAMP);
    }

    if !all_finite(&rate) {
        return Err(FlowError::InvalidFlowState { stage: FlowStage::Rate });
    }
    Ok(rate)
}

/// Evaluate the flow field.
///
/// Returns `None` when a validity guard trips; see the module docs.
pub fn flow(
    density: f64,
    pressure: &[f64],
    viscosity: f64,
    context_force: f64,
    state: &[f64],
) -> Option<Vec<f64>> {
    flow_checked(density, pressure, viscosity, context_force, state).ok()
}

impl FlowParams {
    /// Evaluate the flow field for `state` under these parameters.
    pub fn rate(&self, state: &[f64]) -> Result<Vec<f64>, FlowError> {
        flow_checked(self.density, &self.pressure, self.viscosity, self.context_force, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn gradient_matches_central_and_edge_differences() {
        assert!(approx(&gradient(&[1.0, 2.0, 4.0, 7.0]), &[1.0, 1.5, 2.5, 3.0]));
        assert!(approx(&gradient(&[1.0, 3.0]), &[2.0, 2.0]));
        assert!(approx(&gradient(&[5.0]), &[0.0]));
        assert!(gradient(&[]).is_empty());
    }

    #[test]
    fn constant_state_without_force_is_at_rest() {
        let s = [0.4, 0.4, 0.4];
        let rate = flow(1.2, &s, 0.0, 0.0, &s).unwrap();
        assert!(approx(&rate, &[0.0, 0.0, 0.0]));
    }

    #[test]
    fn context_force_broadcasts() {
        let s = [0.4, 0.4, 0.4];
        let rate = flow(1.2, &[0.0; 3], 0.0, -0.25, &s).unwrap();
        assert!(approx(&rate, &[-0.25, -0.25, -0.25]));
    }

    #[test]
    fn terms_combine() {
        let s = [0.0, 1.0, 4.0];
        // ∇s = [1, 2, 3], ∇²s = [1, 1, 1]
        // convective = [0, 2, 12]
        // pressure p = [1, 0, 0] → ∇p = [-1, -0.5, 0], term = -(1/2)∇p = [0.5, 0.25, 0]
        // viscous = 0.5 * [1, 1, 1]
        let rate = flow(2.0, &[1.0, 0.0, 0.0], 0.5, 0.1, &s).unwrap();
        assert!(approx(&rate, &[1.1, 2.85, 12.6]), "{rate:?}");
    }

    #[test]
    fn zero_density_skips_pressure() {
        let rate = flow(0.0, &[1.0, -5.0, 3.0], 0.0, 0.0, &[0.0, 0.0, 0.0]).unwrap();
        assert!(approx(&rate, &[0.0, 0.0, 0.0]));
    }

    #[test]
    fn nan_state_short_circuits_before_clamp() {
        let err = flow_checked(1.0, &[0.0; 3], 0.1, 0.0, &[0.1, f64::NAN, 0.2]).unwrap_err();
        assert_eq!(err, FlowError::InvalidFlowState { stage: FlowStage::State });
    }

    #[test]
    fn large_rates_are_clamped() {
        let s = [0.0, 1e8, 4e8];
        let rate = flow(1.0, &[0.0; 3], 0.0, 0.0, &s).unwrap();
        assert_eq!(rate[2], RATE_CLAMP);
    }

    #[test]
    fn pressure_length_must_match_state() {
        let err = flow_checked(1.0, &[0.1, 0.2], 0.0, 0.0, &[0.1, 0.2, 0.3]).unwrap_err();
        assert_eq!(err, FlowError::DimensionMismatch { expected: 3, found: 2 });
        assert!(flow(1.0, &[0.1; 4], 0.0, 0.0, &[0.1, 0.2, 0.3]).is_none());
    }

    #[test]
    fn overflowing_gradient_is_rejected() {
        let err = flow_checked(1.0, &[0.0; 2], 0.0, 0.0, &[1e308, -1e308]).unwrap_err();
        assert_eq!(err, FlowError::InvalidFlowState { stage: FlowStage::Gradient });
    }

    #[test]
    fn nan_rate_fails_post_clamp_check() {
        // ±inf survives the clamp as ±1e10, so only NaN reaches the post-check.
        let err = flow_checked(1.0, &[0.0; 2], f64::NAN, 0.0, &[0.1, 0.2]).unwrap_err();
        assert_eq!(err, FlowError::InvalidFlowState { stage: FlowStage::Rate });
    }
}
