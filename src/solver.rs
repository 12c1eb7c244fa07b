/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Initial-value-problem solver and the flow-field adapter.
//!
//! - [`OdeSystem`]: the seam any right-hand side plugs into.
//! - [`solve`]: adaptive Dormand–Prince 5(4) integration, reporting the state
//!   at each requested output time (the first row is the initial value).
//! - [`FlowSystem`]: the flow field with its step parameters held fixed,
//!   advanced one unit of simulated time per call.
//!
//! A derivative error aborts the whole call. Partially integrated states are
//! never returned.

use tracing::warn;

use crate::error::{FlowError, Result};
use crate::quantities::FlowParams;

// ─── Configuration ──────────────────────────────────────────────────────────

/// Tolerances and limits for the adaptive solver.
///
/// Defaults follow the classic LSODA driver: `rtol = atol = 1.49012e-8`,
/// 500 internal steps per output interval.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Relative error tolerance per component.
    pub rtol: f64,
    /// Absolute error tolerance per component.
    pub atol: f64,
    /// Maximum accepted + rejected steps per output interval.
    pub max_steps: usize,
    /// First trial step; estimated from the system when `None`.
    pub initial_step: Option<f64>,
    /// Smallest step the controller may shrink to before giving up.
    pub min_step: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            max_steps: 500,
            initial_step: None,
            min_step: 1e-12,
        }
    }
}

// ─── System seam ────────────────────────────────────────────────────────────

/// A first-order system `dy/dt = f(t, y)`.
pub trait OdeSystem {
    /// Rate of change of `state` at time `t`.
    fn derivative(&self, t: f64, state: &[f64]) -> Result<Vec<f64>>;
}

// ─── Dormand–Prince 5(4) tableau ────────────────────────────────────────────

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
// Fifth-order weights (also the seventh stage, FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;
// Fifth minus fourth order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// `y + h Σ aᵢ kᵢ` for the stages given.
fn stage(y: &[f64], h: f64, terms: &[(f64, &[f64])]) -> Vec<f64> {
    let mut out = y.to_vec();
    for &(a, k) in terms {
        if a == 0.0 {
            continue;
        }
        for (o, ki) in out.iter_mut().zip(k) {
            *o += h * a * ki;
        }
    }
    out
}

/// Evaluate the system, rejecting a derivative that does not match the state.
fn eval<S: OdeSystem + ?Sized>(system: &S, t: f64, state: &[f64]) -> Result<Vec<f64>> {
    let rate = system.derivative(t, state)?;
    if rate.len() != state.len() {
        return Err(FlowError::DimensionMismatch {
            expected: state.len(),
            found: rate.len(),
        });
    }
    Ok(rate)
}

/// Weighted RMS norm used for step-size control.
fn rms_norm(values: &[f64], scale: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values
        .iter()
        .zip(scale)
        .map(|(v, s)| (v / s) * (v / s))
        .sum();
    (sum / values.len() as f64).sqrt()
}

/// Starting step estimate (Hairer, Nørsett & Wanner, II.4).
fn initial_step<S: OdeSystem + ?Sized>(
    system: &S,
    t0: f64,
    y0: &[f64],
    f0: &[f64],
    span: f64,
    config: &SolverConfig,
) -> Result<f64> {
    let scale: Vec<f64> = y0.iter().map(|y| config.atol + config.rtol * y.abs()).collect();
    let d0 = rms_norm(y0, &scale);
    let d1 = rms_norm(f0, &scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };
    let h0 = h0.min(span);

    let y1 = stage(y0, h0, &[(1.0, f0)]);
    let f1 = eval(system, t0 + h0, &y1)?;
    let diff: Vec<f64> = f1.iter().zip(f0).map(|(a, b)| a - b).collect();
    let d2 = rms_norm(&diff, &scale) / h0;

    let dmax = d1.max(d2);
    let h1 = if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(1.0 / 5.0)
    };
    Ok((100.0 * h0).min(h1).min(span))
}

/// Integrate `system` from `times[0]` through each later time in `times`.
///
/// Returns one state per entry of `times`; the first is `y0` itself.
/// `times` must be strictly increasing. Fewer than two times returns just the
/// initial value (or nothing for an empty slice).
pub fn solve<S: OdeSystem + ?Sized>(
    system: &S,
    y0: &[f64],
    times: &[f64],
    config: &SolverConfig,
) -> Result<Vec<Vec<f64>>> {
    let Some(&t_start) = times.first() else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(times.len());
    out.push(y0.to_vec());
    if times.len() < 2 {
        return Ok(out);
    }

    let mut t = t_start;
    let mut y = y0.to_vec();
    let mut k1 = eval(system, t, &y)?;
    let mut h = match config.initial_step {
        Some(h) => h,
        None => initial_step(system, t, &y, &k1, times[1] - t, config)?,
    };

    for &target in &times[1..] {
        let mut steps = 0usize;
        while t < target {
            if steps >= config.max_steps {
                return Err(FlowError::StepBudgetExhausted {
                    max_steps: config.max_steps,
                    target,
                });
            }
            steps += 1;

            let remaining = target - t;
            let last = h >= remaining;
            let step = if last { remaining } else { h };
            if step < config.min_step && !last {
                return Err(FlowError::StepSizeUnderflow { step, time: t });
            }

            let k2 = eval(system, t + C2 * step, &stage(&y, step, &[(A21, &k1[..])]))?;
            let k3 = eval(system, t + C3 * step, &stage(&y, step, &[(A31, &k1[..]), (A32, &k2[..])]))?;
            let k4 = eval(system, 
                t + C4 * step,
                &stage(&y, step, &[(A41, &k1[..]), (A42, &k2[..]), (A43, &k3[..])]),
            )?;
            let k5 = eval(system, 
                t + C5 * step,
                &stage(&y, step, &[(A51, &k1[..]), (A52, &k2[..]), (A53, &k3[..]), (A54, &k4[..])]),
            )?;
            let k6 = eval(system, 
                t + step,
                &stage(&y, step, &[(A61, &k1[..]), (A62, &k2[..]), (A63, &k3[..]), (A64, &k4[..]), (A65, &k5[..])]),
            )?;
            let y_new = stage(&y, step, &[(B1, &k1[..]), (B3, &k3[..]), (B4, &k4[..]), (B5, &k5[..]), (B6, &k6[..])]);
            let k7 = eval(system, t + step, &y_new)?;

            let err_vec: Vec<f64> = (0..y.len())
                .map(|i| {
                    step * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i])
                })
                .collect();
            let scale: Vec<f64> = y
                .iter()
                .zip(&y_new)
                .map(|(a, b)| config.atol + config.rtol * a.abs().max(b.abs()))
                .collect();
            let err = rms_norm(&err_vec, &scale);

            if !err.is_finite() {
                h = step * MIN_FACTOR;
                continue;
            }

            let factor = if err == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * err.powf(-1.0 / 5.0)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if err <= 1.0 {
                t = if last { target } else { t + step };
                y = y_new;
                k1 = k7;
                // Do not let a short final step shrink the next interval's step.
                h = if last { h.max(step * factor) } else { step * factor };
            } else {
                h = step * factor.min(1.0);
            }
        }
        out.push(y.clone());
    }
    Ok(out)
}

// ─── Flow adapter ───────────────────────────────────────────────────────────

/// The flow field as an [`OdeSystem`], with one step's parameters held fixed.
///
/// Time is ignored: given its parameters the system is autonomous.
#[derive(Clone, Copy, Debug)]
pub struct FlowSystem<'a> {
    params: &'a FlowParams,
}

impl<'a> FlowSystem<'a> {
    /// Wrap a parameter bundle.
    pub fn new(params: &'a FlowParams) -> Self {
        Self { params }
    }

    /// The parameters this system was built with.
    pub fn params(&self) -> &FlowParams {
        self.params
    }

    /// Advance `state` over `[time, time + 1]`.
    ///
    /// Returns the solver's output points for the span (start and end). Any
    /// failure is reported as [`FlowError::SolverFailure`]; nothing is
    /// substituted for the missing state.
    pub fn advance(&self, state: &[f64], time: f64, config: &SolverConfig) -> Result<Vec<Vec<f64>>> {
        solve(self, state, &[time, time + 1.0], config).map_err(|source| FlowError::SolverFailure {
            time,
            source: Box::new(source),
        })
    }
}

impl OdeSystem for FlowSystem<'_> {
    fn derivative(&self, _t: f64, state: &[f64]) -> Result<Vec<f64>> {
        self.params.rate(state).map_err(|err| {
            warn!(error = %err, "sentiment flow rejected state");
            err
        })
    }
}
