//! # sentiment-flow
//!
//! Emotional trajectories of speakers and documents, simulated as a
//! fluid-dynamics field.
//!
//! ---
//!
//! ## This is not a classifier. It is a dynamical system.
//!
//! A subject (a speaker across successive speeches, or one document split
//! into segments) carries an emotion vector over named dimensions. Each
//! segment perturbs that vector through four quantities borrowed from fluid
//! mechanics, and an ODE solver advances it one unit of simulated time per
//! segment:
//!
//! **Density** — how much emotion the state carries at all (Σ|sᵢ|).
//!
//! **Pressure** — the state's scores, switched on when the segment mentions
//! a charged keyword.
//!
//! **Viscosity** — how uneven the state is across dimensions (its standard
//! deviation).
//!
//! **Contextual force** — the segment's polarity, pushing every dimension.
//!
//! The simulated trajectory can then be set against the raw lexicon scores.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! SegmentInput → Extractor → SegmentRecord → group_subjects → integrate_subject → CorpusResult
//!                   ↓                                               ↑
//!              DimensionSet ──────────────────────────────▶ FlowParams → FlowSystem → solve
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`dimensions`] | [`DimensionSet`] | Corpus-wide dimension ordering |
//! | [`segment`] | [`SegmentRecord`], [`Subject`] | Input records and subjects |
//! | [`quantities`] | [`FlowParams`], [`KeywordSet`] | Density, pressure, viscosity, contextual force |
//! | [`flow`] | [`flow::flow`] | Flow-field right-hand side with stability guards |
//! | [`solver`] | [`SolverConfig`], [`FlowSystem`] | Adaptive Dormand–Prince solver and the flow adapter |
//! | [`trajectory`] | [`TrajectoryResult`], [`SimulationConfig`] | Per-subject sequential integration |
//! | [`corpus`] | [`CorpusResult`] | Grouping and corpus-level orchestration |
//! | [`extract`] | [`extract::Extractor`], [`extract::Lexicon`] | Lexicon-based emotion extraction |
//! | [`analysis`] | [`analysis::DominantDimension`] | Plot preparation helpers |
//! | `snapshot` | `snapshot::CorpusSnapshot` | Serialisable result snapshot (requires `serde` feature) |
//!
//! ## Example
//!
//! ```rust
//! use sentiment_flow::{simulate_corpus, DimensionSet, SegmentRecord, SimulationConfig};
//!
//! let dims = DimensionSet::from_names(["ATTITUDE", "TEMPER"]);
//! let records = vec![
//!     SegmentRecord::new("alice", "debate", 0, "We have hope.", 0.2)
//!         .with_emotion("ATTITUDE", 0.3)
//!         .with_emotion("TEMPER", 0.1),
//!     SegmentRecord::new("alice", "debate", 1, "Yet fear remains.", -0.1)
//!         .with_emotion("ATTITUDE", -0.2),
//! ];
//! let result = simulate_corpus(records, &dims, &SimulationConfig::default());
//! let alice = &result.get("debate").unwrap()[0];
//! assert_eq!(alice.simulation.ncols(), 2);
//! ```
//!
//! ## Features
//!
//! - `serde` — serde derives on configs, plus the `snapshot` module.
//! - `parallel` — integrate subjects on the rayon pool.
//! - `python-ffi` — PyO3 bindings.
//!
//! ## License
//!
//! Business Source License 1.1.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod dimensions;
pub mod segment;
pub mod quantities;
pub mod flow;
pub mod solver;
pub mod trajectory;
pub mod corpus;
pub mod extract;
pub mod analysis;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use corpus::{group_subjects, simulate_corpus, simulate_subjects, CorpusResult};
pub use dimensions::DimensionSet;
pub use error::{FlowError, FlowStage, Result};
pub use quantities::{FlowParams, KeywordSet};
pub use segment::{DimensionValue, SegmentRecord, Subject};
pub use solver::{FlowSystem, SolverConfig};
pub use trajectory::{integrate_subject, SimulationConfig, TrajectoryResult, TransitionPolicy};
