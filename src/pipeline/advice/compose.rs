use serde::Serialize;

use super::candidates::CandidateSet;
use super::headings::{
    HEADING_AVOIDANCES, HEADING_CAUSES, HEADING_DIFFERENTIALS, HEADING_REFERRAL, HEADING_TIPS,
};
use super::tips::{render_tips, RankedTip};

pub const MAX_CAUSES: usize = 6;
pub const MAX_DIFFERENTIALS: usize = 6;
pub const MAX_AVOIDANCES: usize = 5;

/// Fixed baseline of the referral section.
pub const REFERRAL_BASELINE: [&str; 2] = [
    "発熱・外傷後・排尿排便障害・急な麻痺/広範なしびれがある場合は早急に受診",
    "改善が数週間以上乏しい/夜間増悪/歩行困難が続く場合は医療機関へ相談",
];

const PROFILE_PREFACE_CHARS: usize = 40;
const FREE_TEXT_PREFACE_CHARS: usize = 80;

/// Finished five-section recommendation. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceDocument {
    preface: Vec<String>,
    causes: Vec<String>,
    differentials: Vec<String>,
    tips: Vec<RankedTip>,
    avoidances: Vec<String>,
    referral: Vec<String>,
}

impl AdviceDocument {
    pub fn preface(&self) -> &[String] {
        &self.preface
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn differentials(&self) -> &[String] {
        &self.differentials
    }

    pub fn tips(&self) -> &[RankedTip] {
        &self.tips
    }

    pub fn avoidances(&self) -> &[String] {
        &self.avoidances
    }

    pub fn referral(&self) -> &[String] {
        &self.referral
    }

    /// Render as Markdown: optional quote preface, then the five sections.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if !self.preface.is_empty() {
            let quoted: Vec<String> = self.preface.iter().map(|l| format!("> {l}")).collect();
            out.push_str(&quoted.join("\n"));
            out.push_str("\n\n");
        }

        push_section(&mut out, HEADING_CAUSES, &bullets(&self.causes));
        out.push('\n');
        push_section(&mut out, HEADING_DIFFERENTIALS, &bullets(&self.differentials));
        out.push('\n');
        push_section(&mut out, HEADING_TIPS, &render_tips(&self.tips));
        out.push('\n');
        push_section(&mut out, HEADING_AVOIDANCES, &bullets(&self.avoidances));
        out.push('\n');
        push_section(&mut out, HEADING_REFERRAL, &bullets(&self.referral));

        out
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_section(out: &mut String, heading: &str, body: &str) {
    out.push_str(heading);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
}

/// Strip one pair of enclosing brackets (`（）`, `()`, `【】`) from a note.
pub fn strip_enclosing_brackets(note: &str) -> &str {
    let trimmed = note.trim();
    for (open, close) in [('（', '）'), ('(', ')'), ('【', '】')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    trimmed
}

/// Quote lines acknowledging the practitioner profile and the free text.
pub fn local_preface(profile: &str, free_text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let first_profile_line = profile.lines().map(str::trim).find(|l| !l.is_empty());
    if let Some(line) = first_profile_line {
        lines.push(format!(
            "制作者の方針に配慮：{} …",
            truncate_chars(line, PROFILE_PREFACE_CHARS)
        ));
    }
    let free_text = free_text.trim();
    if !free_text.is_empty() {
        let one_line = free_text.replace('\n', " ");
        lines.push(format!(
            "自由記載の要点：{} …",
            truncate_chars(&one_line, FREE_TEXT_PREFACE_CHARS)
        ));
    }
    lines
}

/// First `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Assemble the document from classifier and prioritizer output.
pub fn compose(
    candidates: &CandidateSet,
    tips: Vec<RankedTip>,
    caution: Option<&str>,
    preface: Vec<String>,
) -> AdviceDocument {
    let take = |items: &[String], max: usize| items.iter().take(max).cloned().collect::<Vec<_>>();

    let mut referral = Vec::with_capacity(REFERRAL_BASELINE.len() + 1);
    if let Some(note) = caution {
        let stripped = strip_enclosing_brackets(note);
        if !stripped.is_empty() {
            referral.push(stripped.to_string());
        }
    }
    referral.extend(REFERRAL_BASELINE.iter().map(|s| s.to_string()));

    AdviceDocument {
        preface,
        causes: take(candidates.causes.as_slice(), MAX_CAUSES),
        differentials: take(candidates.differentials.as_slice(), MAX_DIFFERENTIALS),
        tips,
        avoidances: take(candidates.avoidances.as_slice(), MAX_AVOIDANCES),
        referral,
    }
}
