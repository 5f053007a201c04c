//! Tip prioritizer.
//!
//! Turns tiered tip candidates into the final numbered list in three stages:
//! merge (tier order, first occurrence wins), pad up to [`MIN_TIPS`], then cap
//! at [`MAX_TIPS`]. Each stage is a standalone function so the bounds can be
//! checked independently.

use serde::Serialize;

use crate::models::Tier;

pub const MIN_TIPS: usize = 3;
pub const MAX_TIPS: usize = 5;

/// Generic tips used for padding, all medium tier, in padding order.
pub const DEFAULT_TIP_POOL: [&str; 5] = [
    "30–60分ごとに立って1–2分歩く（タイマー推奨）",
    "楽な範囲で5–10分の歩行を1日2回",
    "痛みが増える動きは無理をせず、楽な姿勢で休む",
    "入浴などで体を温めて筋の緊張をゆるめる",
    "睡眠と水分補給を十分にとる",
];

/// Last-resort set applied when the default pool could not reach the minimum.
pub const BASE_TIPS: [(&str, Tier); 3] = [
    ("痛みが増える動作は中止し、楽な姿勢をとる", Tier::High),
    ("症状の変化（強さ・範囲・時間帯）を毎日記録する", Tier::High),
    ("無理のない範囲で日常生活の動作を続ける", Tier::Medium),
];

// ═══════════════════════════════════════════
// Types
// ═══════════════════════════════════════════

/// Tip candidates grouped by tier, each group in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TipPool {
    high: Vec<String>,
    medium: Vec<String>,
    low: Vec<String>,
}

impl TipPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tier: Tier, text: impl Into<String>) {
        let text = text.into();
        match tier {
            Tier::High => self.high.push(text),
            Tier::Medium => self.medium.push(text),
            Tier::Low => self.low.push(text),
        }
    }

    pub fn tier(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Low => &self.low,
        }
    }

    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One selected tip with its tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTip {
    pub text: String,
    pub tier: Tier,
}

impl RankedTip {
    pub fn new(text: impl Into<String>, tier: Tier) -> Self {
        Self {
            text: text.into(),
            tier,
        }
    }

    /// `"{index}. {text}（優先度★…）"`, index 1-based.
    pub fn render(&self, index: usize) -> String {
        format!("{index}. {}（優先度{}）", self.text, self.tier.stars())
    }
}

// ═══════════════════════════════════════════
// Pipeline stages
// ═══════════════════════════════════════════

/// Stage 1: high, then medium, then low. Earliest occurrence wins.
pub fn merge_tiers(pool: &TipPool) -> Vec<RankedTip> {
    let mut merged: Vec<RankedTip> = Vec::with_capacity(pool.len());
    for tier in [Tier::High, Tier::Medium, Tier::Low] {
        for text in pool.tier(tier) {
            push_unique(&mut merged, text, tier);
        }
    }
    merged
}

/// Stage 2: pad from the default pool, then from the base set, until
/// [`MIN_TIPS`] is reached or both sources are exhausted.
pub fn pad_to_minimum(tips: Vec<RankedTip>) -> Vec<RankedTip> {
    pad_with(tips, &DEFAULT_TIP_POOL, &BASE_TIPS)
}

fn pad_with(
    mut tips: Vec<RankedTip>,
    pool: &[&str],
    base: &[(&str, Tier)],
) -> Vec<RankedTip> {
    for text in pool {
        if tips.len() >= MIN_TIPS {
            break;
        }
        push_unique(&mut tips, text, Tier::Medium);
    }
    for (text, tier) in base {
        if tips.len() >= MIN_TIPS {
            break;
        }
        push_unique(&mut tips, text, *tier);
    }
    tips
}

/// Stage 3: keep the first [`MAX_TIPS`].
pub fn cap_to_maximum(mut tips: Vec<RankedTip>) -> Vec<RankedTip> {
    tips.truncate(MAX_TIPS);
    tips
}

/// Full pipeline: merge, pad, cap.
pub fn prioritize(pool: &TipPool) -> Vec<RankedTip> {
    let merged = merge_tiers(pool);
    let candidate_count = merged.len();
    let tips = cap_to_maximum(pad_to_minimum(merged));
    tracing::debug!(
        candidates = candidate_count,
        selected = tips.len(),
        top_tier = tips.first().map(|t| t.tier.as_str()),
        "Tips prioritized"
    );
    tips
}

/// Numbered block, one tip per line, no trailing newline.
pub fn render_tips(tips: &[RankedTip]) -> String {
    tips.iter()
        .enumerate()
        .map(|(i, tip)| tip.render(i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_unique(tips: &mut Vec<RankedTip>, text: &str, tier: Tier) {
    if !tips.iter().any(|t| t.text == text) {
        tips.push(RankedTip::new(text, tier));
    }
}
