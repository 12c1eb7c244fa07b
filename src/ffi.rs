//! Python FFI bindings via PyO3.
//!
//! Exposes corpus simulation and the derived-quantity functions to Python.
//! Records are plain dicts so the bindings slot in behind any dataframe-based
//! extraction step.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import sentiment_flow
//!
//! records = [
//!     {"subject": "alice", "label": "debate", "text": "We hope.",  "polarity": 0.4,
//!      "emotions": {"ATTITUDE": 0.2, "TEMPER": 0.1}},
//!     {"subject": "alice", "label": "debate", "text": "We fear.",  "polarity": -0.3,
//!      "emotions": {"ATTITUDE": -0.1, "TEMPER": "0.3"}},
//! ]
//! result = sentiment_flow.simulate(records, keywords=["hope", "fear"])
//! for entry in result["debate"]:
//!     print(entry["subject"], len(entry["simulation"]))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::corpus::simulate_corpus;
use crate::dimensions::DimensionSet;
use crate::flow;
use crate::quantities::{self, KeywordSet};
use crate::segment::{DimensionValue, SegmentRecord};
use crate::trajectory::{SimulationConfig, TransitionPolicy};

// ── Record conversion ────────────────────────────────────────────────────────

fn optional_string(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<String>> {
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract::<String>()?)),
        _ => Ok(None),
    }
}

fn dimension_value(value: &Bound<'_, PyAny>) -> DimensionValue {
    if let Ok(v) = value.extract::<f64>() {
        DimensionValue::Number(v)
    } else if let Ok(s) = value.extract::<String>() {
        DimensionValue::Text(s)
    } else {
        DimensionValue::Text(String::new())
    }
}

fn record_from_dict(dict: &Bound<'_, PyDict>, position: usize) -> PyResult<SegmentRecord> {
    let subject = optional_string(dict, "subject")?
        .ok_or_else(|| PyValueError::new_err(format!("record {position} is missing `subject`")))?;
    let label = optional_string(dict, "label")?.unwrap_or_else(|| subject.clone());
    let text = optional_string(dict, "text")?.unwrap_or_default();
    let polarity = match dict.get_item("polarity")? {
        Some(value) if !value.is_none() => value.extract::<f64>()?,
        _ => 0.0,
    };
    let ordinal = match dict.get_item("ordinal")? {
        Some(value) if !value.is_none() => value.extract::<usize>()?,
        _ => position,
    };

    let mut record = SegmentRecord::new(subject, label, ordinal, text, polarity);
    if let Some(emotions) = dict.get_item("emotions")? {
        let emotions = emotions.downcast::<PyDict>()?;
        for (name, value) in emotions.iter() {
            record
                .emotions
                .insert(name.extract::<String>()?, dimension_value(&value));
        }
    }
    Ok(record)
}

/// Every dimension with a non-zero coerced score somewhere in `records`.
fn discover_dimensions(records: &[SegmentRecord]) -> DimensionSet {
    DimensionSet::from_names(records.iter().flat_map(|r| {
        r.emotions
            .iter()
            .filter(|(_, v)| v.coerce() != 0.0)
            .map(|(name, _)| name.clone())
    }))
}

// ── Functions ────────────────────────────────────────────────────────────────

/// Simulate sentiment flow for a list of record dicts.
///
/// Args:
///     records:    dicts with `subject`, `label`, `text`, `polarity`, `emotions`
///     keywords:   pressure keywords (default: built-in list)
///     dimensions: dimension ordering, kept as given (default: every non-zero
///                 emotion name, sorted)
///     mode:       "speech" (first transition reuses the opening segment) or "text"
///
/// Returns:
///     {label: [{subject, texts, simulation, dimensions, failure}]}
#[pyfunction]
#[pyo3(signature = (records, keywords=None, dimensions=None, mode="speech"))]
fn simulate<'py>(
    py: Python<'py>,
    records: Vec<Bound<'py, PyDict>>,
    keywords: Option<Vec<String>>,
    dimensions: Option<Vec<String>>,
    mode: &str,
) -> PyResult<Bound<'py, PyDict>> {
    let transition = match mode {
        "speech" => TransitionPolicy::SeedFromInitial,
        "text" => TransitionPolicy::CurrentSegment,
        other => {
            return Err(PyValueError::new_err(format!(
                "mode must be \"speech\" or \"text\", got {other:?}"
            )))
        }
    };
    let records = records
        .iter()
        .enumerate()
        .map(|(i, dict)| record_from_dict(dict, i))
        .collect::<PyResult<Vec<_>>>()?;
    let dimensions = match dimensions {
        Some(names) => DimensionSet::in_order(names),
        None => discover_dimensions(&records),
    };
    let config = SimulationConfig {
        keywords: keywords.map(KeywordSet::new).unwrap_or_default(),
        transition,
        ..SimulationConfig::default()
    };

    let result = py.allow_threads(|| simulate_corpus(records, &dimensions, &config));

    let out = PyDict::new_bound(py);
    for (label, trajectories) in result.iter() {
        let list = PyList::empty_bound(py);
        for t in trajectories {
            let item = PyDict::new_bound(py);
            item.set_item("subject", &t.subject)?;
            item.set_item("texts", t.texts.clone())?;
            let rows: Vec<Vec<f64>> = t.simulation.outer_iter().map(|row| row.to_vec()).collect();
            item.set_item("simulation", rows)?;
            item.set_item("dimensions", t.dimensions.names().to_vec())?;
            item.set_item("failure", t.failure.as_ref().map(ToString::to_string))?;
            list.append(item)?;
        }
        out.set_item(label, list)?;
    }
    Ok(out)
}

/// Sum of absolute emotion scores.
#[pyfunction]
#[pyo3(name = "sentiment_density")]
fn py_sentiment_density(vector: Vec<f64>) -> f64 {
    quantities::sentiment_density(&vector)
}

/// `score` if `text` mentions any keyword (case-insensitive), else 0.
#[pyfunction]
#[pyo3(name = "sentiment_pressure")]
fn py_sentiment_pressure(score: f64, keywords: Vec<String>, text: &str) -> f64 {
    quantities::sentiment_pressure(score, &KeywordSet::new(keywords), text)
}

/// Population standard deviation of the emotion scores.
#[pyfunction]
#[pyo3(name = "sentiment_viscosity")]
fn py_sentiment_viscosity(vector: Vec<f64>) -> f64 {
    quantities::sentiment_viscosity(&vector)
}

/// The polarity, unchanged.
#[pyfunction]
#[pyo3(name = "external_contextual_force")]
fn py_external_contextual_force(polarity: f64) -> f64 {
    quantities::external_contextual_force(polarity)
}

/// Flow field rate of change; None when a validity guard trips.
#[pyfunction]
#[pyo3(name = "flow")]
fn py_flow(
    density: f64,
    pressure: Vec<f64>,
    viscosity: f64,
    context_force: f64,
    state: Vec<f64>,
) -> PyResult<Option<Vec<f64>>> {
    if pressure.len() != state.len() {
        return Err(PyValueError::new_err(format!(
            "pressure has {} components but state has {}",
            pressure.len(),
            state.len()
        )));
    }
    Ok(flow::flow(density, &pressure, viscosity, context_force, &state))
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Sentiment Flow Python bindings.
///
/// Simulates emotional trajectories of speakers and documents as a
/// fluid-dynamics field.
#[pymodule]
pub fn sentiment_flow(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(py_sentiment_density, m)?)?;
    m.add_function(wrap_pyfunction!(py_sentiment_pressure, m)?)?;
    m.add_function(wrap_pyfunction!(py_sentiment_viscosity, m)?)?;
    m.add_function(wrap_pyfunction!(py_external_contextual_force, m)?)?;
    m.add_function(wrap_pyfunction!(py_flow, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("RATE_CLAMP", flow::RATE_CLAMP)?;
    Ok(())
}
