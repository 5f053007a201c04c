//! Local deterministic advice engine.
//!
//! classify → prioritize → compose. No I/O, no randomness.

pub mod candidates;
pub mod classify;
pub mod compose;
pub mod headings;
pub mod rules;
pub mod tips;

pub use candidates::{CandidateList, CandidateSet};
pub use classify::{classify, Classification};
pub use compose::{compose, local_preface, AdviceDocument};
pub use headings::{empty_skeleton, normalize_headings, CANONICAL_HEADINGS};
pub use tips::{prioritize, render_tips, RankedTip, TipPool};

use crate::models::SymptomRecord;

/// Build the full local document for a record.
///
/// `caution` is the note carried when the user proceeds past a red flag.
/// `profile` only feeds the quote preface.
pub fn generate_local_advice(
    record: &SymptomRecord,
    caution: Option<&str>,
    profile: &str,
) -> AdviceDocument {
    let classification = classify(record, caution);
    let tips = prioritize(&classification.tips);
    let preface = local_preface(profile, &record.free_text);
    compose(&classification.candidates, tips, caution, preface)
}
