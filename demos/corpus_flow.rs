//! # Two Speakers, One Debate
//!
//! Runs the whole pipeline on a small in-memory corpus: a handful of lexicon
//! concepts, two speakers taking turns, and a third who speaks only once.
//!
//! ```text
//! cargo run --example corpus_flow
//! RUST_LOG=sentiment_flow=debug cargo run --example corpus_flow
//! ```
//!
//! For each speaker the demo prints the raw lexicon scores of the opening
//! segment, the simulated final state, and the dimension whose normalised
//! trajectory sits highest on average.

use sentiment_flow::analysis::highest_average_dimension;
use sentiment_flow::extract::{Extractor, Lexicon, LexiconEntry, SegmentInput};
use sentiment_flow::{simulate_corpus, KeywordSet, SimulationConfig, TrajectoryResult};
use tracing_subscriber::EnvFilter;

// ── Lexicon ───────────────────────────────────────────────────────────────────

fn lexicon() -> Lexicon {
    //                      INTRO  TEMPER ATTIT  SENSIT  polarity
    [
        LexiconEntry::new("hope",     [0.62, 0.10, 0.45, 0.20], 0.78).with_emotions(Some("#joy"), Some("#calmness")),
        LexiconEntry::new("future",   [0.30, 0.05, 0.40, 0.10], 0.41).with_emotions(Some("#pleasantness"), Some("#calmness")),
        LexiconEntry::new("fear",     [-0.20, -0.55, -0.10, -0.74], -0.66).with_emotions(Some("#pleasantness"), Some("#fear")),
        LexiconEntry::new("crisis",   [-0.40, -0.62, -0.30, -0.50], -0.71).with_emotions(Some("#disgust"), Some("#anger")),
        LexiconEntry::new("work",     [0.10, 0.28, 0.21, 0.00], 0.22).with_emotions(Some("#calmness"), Some("#interest")),
        LexiconEntry::new("families", [0.44, 0.12, 0.35, 0.30], 0.55).with_emotions(Some("#joy"), Some("#calmness")),
        LexiconEntry::new("failed",   [-0.51, -0.20, -0.44, -0.18], -0.63).with_emotions(Some("#sadness"), Some("#disgust")),
    ]
    .into_iter()
    .collect()
}

// ── Corpus ────────────────────────────────────────────────────────────────────

fn debate() -> Vec<SegmentInput> {
    let turns = [
        ("ortiz", "We meet in a crisis, but I have hope for working families."),
        ("lang", "Hope is not a plan. The last plan failed."),
        ("ortiz", "The work ahead is hard and the future is ours to build."),
        ("lang", "Families live in fear of the next crisis."),
        ("ortiz", "Fear has never built anything. Hope and work will."),
        ("lang", "Then show the work, not the hope."),
        ("moderator", "Thank you both."),
    ];
    turns
        .into_iter()
        .map(|(speaker, text)| SegmentInput::new(speaker, "budget debate", text))
        .collect()
}

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(v: f64) -> String {
    let filled = ((v.clamp(-1.0, 1.0) + 1.0) * 10.0).round() as usize;
    let empty = 20usize.saturating_sub(filled);
    format!("[{}{}] {:+.3}", "█".repeat(filled), "░".repeat(empty), v)
}

fn report(t: &TrajectoryResult) {
    println!("  ── {} ({} points)", t.subject, t.len());
    let Some(last) = t.final_state() else {
        println!("     single segment, nothing to integrate\n");
        return;
    };
    for (name, value) in t.dimensions.iter().zip(last.iter()) {
        println!("     {:<28} {}", name, bar(*value));
    }
    if let Some(dominant) = highest_average_dimension(t) {
        println!("     dominant: {} (mean {:+.3})", dominant.name, dominant.mean);
    }
    if let Some(err) = &t.failure {
        println!("     stopped early: {err}");
    }
    println!();
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Sentiment flow: two speakers, one debate                           ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let extraction = Extractor::new(lexicon()).extract(debate());
    println!("Dimensions ({}): {}\n", extraction.dimensions.len(), extraction.dimensions);

    for record in extraction.records.iter().filter(|r| r.ordinal == 0) {
        let opening = record.emotion_vector(&extraction.dimensions);
        let total: f64 = opening.iter().map(|v| v.abs()).sum();
        println!("  {:<10} opens with density {:.3}, polarity {:+.3}", record.subject, total, record.polarity);
    }
    println!();

    let config = SimulationConfig::with_keywords(KeywordSet::new(["hope", "fear", "crisis"]));
    let dimensions = extraction.dimensions.clone();
    let result = simulate_corpus(extraction.records, &dimensions, &config);

    for (label, trajectories) in result.iter() {
        println!("{label}");
        for t in trajectories {
            report(t);
        }
    }
}
