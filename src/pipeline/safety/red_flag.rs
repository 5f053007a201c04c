//! Red-flag detector and generation gate.
//!
//! Manual flags come from the safety checklist; the free-text scan looks for
//! danger signs the user described without ticking a box. Detection is a pure
//! predicate: the gate decides whether generation halts or proceeds with the
//! caution note.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{
    DangerSign, GateDecision, ManualFlags, RedFlagState, AUTO_DETECTED_REASON, CAUTION_NOTE,
};

/// A compiled danger-sign pattern.
struct SignPattern {
    regex: Regex,
    sign: DangerSign,
}

/// Danger-sign patterns in reporting priority order. Case-sensitive.
static DANGER_PATTERNS: LazyLock<Vec<SignPattern>> = LazyLock::new(|| {
    vec![
        pattern(
            r"排尿(?:障害|困難)|尿が出(?:ない|にくい)|尿漏れ|失禁|排便(?:障害|困難)|便が出(?:ない|にくい)|incontinence|bladder|bowel",
            DangerSign::BladderBowel,
        ),
        pattern(
            r"会陰|サドル|saddle|(?:股間|肛門|陰部)(?:周囲)?(?:が|の)?(?:しびれ|痺れ|感覚がな)",
            DangerSign::SaddleNumbness,
        ),
        pattern(
            r"つま先(?:立ち)?が(?:でき|出来)ない|かかと(?:立ち|歩き)が(?:でき|出来)ない|(?:足|脚)に力が入らな|力が入らなくな|筋肉が(?:急に)?(?:痩せ|やせ)|筋(?:肉)?萎縮|足が上がらな|foot drop",
            DangerSign::ProgressiveWeakness,
        ),
        pattern(
            r"発熱|熱が(?:ある|出)|3[89](?:\.\d)?\s*(?:℃|度)|悪寒|体重が(?:急に)?減|体重減少|癌|悪性|腫瘍|がん(?:の既往|治療|と診断)|fever|weight loss|cancer",
            DangerSign::SystemicIllness,
        ),
        pattern(
            r"交通事故|転(?:倒|落)(?:し|後|で)|高所から|骨折|強打|trauma|accident",
            DangerSign::MajorTrauma,
        ),
    ]
});

fn pattern(regex_str: &str, sign: DangerSign) -> SignPattern {
    SignPattern {
        regex: Regex::new(regex_str).expect("Invalid danger-sign regex pattern"),
        sign,
    }
}

/// Scan free text for danger signs. Returns matched groups in priority order.
pub fn scan_danger_signs(free_text: &str) -> Vec<DangerSign> {
    if free_text.trim().is_empty() {
        return Vec::new();
    }
    DANGER_PATTERNS
        .iter()
        .filter(|sp| sp.regex.is_match(free_text))
        .map(|sp| sp.sign)
        .collect()
}

/// Evaluate manual flags and free text into a red-flag verdict.
///
/// Manual reasons are listed first in fixed order. One synthetic
/// auto-detected reason follows when at least one matched sign is not
/// already covered by a ticked flag.
pub fn detect_red_flags(manual: ManualFlags, free_text: &str) -> RedFlagState {
    let matched_signs = scan_danger_signs(free_text);
    let auto_detected = !matched_signs.is_empty();

    let mut triggered_reasons: Vec<String> = manual
        .active()
        .iter()
        .map(|flag| flag.reason().to_string())
        .collect();

    let uncovered = matched_signs
        .iter()
        .any(|sign| !manual.is_set(sign.covered_by()));
    if uncovered && !triggered_reasons.iter().any(|r| r == AUTO_DETECTED_REASON) {
        triggered_reasons.push(AUTO_DETECTED_REASON.to_string());
    }

    let state = RedFlagState {
        manual_flags: manual,
        auto_detected,
        matched_signs,
        triggered_reasons,
    };

    tracing::debug!(
        manual = manual.any(),
        auto_detected = state.auto_detected,
        signs = state.matched_signs.len(),
        "Red-flag check complete"
    );

    state
}

/// Decide whether generation may proceed.
pub fn evaluate_gate(state: &RedFlagState, override_granted: bool) -> GateDecision {
    if !state.has_red_flag() {
        return GateDecision::Clear;
    }

    if override_granted {
        tracing::info!(
            reasons = state.triggered_reasons.len(),
            "Red flag overridden: proceeding with caution"
        );
        GateDecision::ProceedWithCaution {
            note: CAUTION_NOTE.to_string(),
            warning: state.warning(),
        }
    } else {
        tracing::info!(
            reasons = state.triggered_reasons.len(),
            "Red flag: generation halted"
        );
        GateDecision::Halt {
            reasons: state.triggered_reasons.clone(),
            warning: state.warning(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::safety::types::{ManualFlag, RED_FLAG_WARNING_PREFIX};

    fn flags(trauma: bool, fever: bool, cauda: bool, weakness: bool) -> ManualFlags {
        ManualFlags {
            trauma,
            fever,
            cauda_equina: cauda,
            progressive_weakness: weakness,
        }
    }

    // =================================================================
    // FREE-TEXT SCAN
    // =================================================================

    #[test]
    fn bladder_dysfunction_phrase_is_detected() {
        let state = detect_red_flags(ManualFlags::default(), "3日前から尿が出にくい感じがある");
        assert!(state.auto_detected);
        assert!(state.has_red_flag());
        assert_eq!(state.matched_signs, vec![DangerSign::BladderBowel]);
        assert_eq!(state.triggered_reasons, vec![AUTO_DETECTED_REASON.to_string()]);
    }

    #[test]
    fn saddle_numbness_is_detected() {
        let signs = scan_danger_signs("会陰部のしびれが続く");
        assert_eq!(signs, vec![DangerSign::SaddleNumbness]);
    }

    #[test]
    fn progressive_weakness_is_detected() {
        for text in ["右足のつま先立ちができない", "ふくらはぎの筋肉が急に痩せてきた", "足に力が入らない日がある"] {
            let signs = scan_danger_signs(text);
            assert!(
                signs.contains(&DangerSign::ProgressiveWeakness),
                "Should detect weakness: {text}"
            );
        }
    }

    #[test]
    fn systemic_illness_is_detected() {
        for text in ["昨日から38.5℃の熱", "体重が減ってきた", "以前に癌の手術", "発熱あり"] {
            let signs = scan_danger_signs(text);
            assert!(
                signs.contains(&DangerSign::SystemicIllness),
                "Should detect systemic sign: {text}"
            );
        }
    }

    #[test]
    fn trauma_is_detected() {
        let signs = scan_danger_signs("先週交通事故にあった");
        assert_eq!(signs, vec![DangerSign::MajorTrauma]);
    }

    #[test]
    fn fall_event_is_trauma() {
        for text in ["先週転倒して腰を打った", "階段から転落した", "転倒後から痛む", "転倒で膝をついた"] {
            assert_eq!(scan_danger_signs(text), vec![DangerSign::MajorTrauma], "{text}");
        }
    }

    #[test]
    fn fear_of_falling_is_not_trauma() {
        assert!(scan_danger_signs("転倒が怖くて歩けない").is_empty());
        assert!(scan_danger_signs("転倒予防の体操をしている").is_empty());
        let state = detect_red_flags(ManualFlags::default(), "転倒が怖くて外出を控えている");
        assert!(!state.has_red_flag());
    }

    #[test]
    fn multiple_signs_report_single_reason() {
        let state = detect_red_flags(ManualFlags::default(), "転倒してから失禁があり、発熱もある");
        assert_eq!(
            state.matched_signs,
            vec![
                DangerSign::BladderBowel,
                DangerSign::SystemicIllness,
                DangerSign::MajorTrauma
            ]
        );
        assert_eq!(state.triggered_reasons.len(), 1);
        assert_eq!(state.triggered_reasons[0], AUTO_DETECTED_REASON);
    }

    #[test]
    fn neutral_text_without_flags_is_clear() {
        let state = detect_red_flags(
            ManualFlags::default(),
            "3週間前に重い荷物を持ってから悪化。朝はこわばり、前かがみで強くなる。",
        );
        assert!(!state.auto_detected);
        assert!(!state.has_red_flag());
        assert!(state.triggered_reasons.is_empty());
    }

    #[test]
    fn encouragement_wording_is_not_cancer() {
        let state = detect_red_flags(ManualFlags::default(), "仕事をがんばっているが腰がつらい");
        assert!(!state.auto_detected);
    }

    #[test]
    fn empty_text_never_detects() {
        assert!(!detect_red_flags(ManualFlags::default(), "").auto_detected);
        assert!(!detect_red_flags(ManualFlags::default(), "   \n").auto_detected);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(scan_danger_signs("history of cancer").contains(&DangerSign::SystemicIllness));
        assert!(scan_danger_signs("History Of CANCER").is_empty());
    }

    // =================================================================
    // REASON ORDERING
    // =================================================================

    #[test]
    fn manual_reasons_in_fixed_order() {
        let state = detect_red_flags(flags(true, true, true, true), "");
        assert_eq!(
            state.triggered_reasons,
            ManualFlag::ORDER
                .iter()
                .map(|f| f.reason().to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn auto_reason_comes_after_manual() {
        let state = detect_red_flags(flags(true, false, false, false), "尿漏れがある");
        assert_eq!(
            state.triggered_reasons,
            vec!["強い外傷".to_string(), AUTO_DETECTED_REASON.to_string()]
        );
    }

    #[test]
    fn auto_reason_skipped_when_already_covered() {
        let state = detect_red_flags(flags(false, true, false, false), "発熱が続いている");
        assert!(state.auto_detected);
        assert_eq!(state.triggered_reasons, vec!["発熱/感染疑い".to_string()]);
    }

    #[test]
    fn auto_reason_kept_when_any_sign_uncovered() {
        let state = detect_red_flags(flags(false, true, false, false), "発熱と排尿困難がある");
        assert_eq!(
            state.triggered_reasons,
            vec!["発熱/感染疑い".to_string(), AUTO_DETECTED_REASON.to_string()]
        );
    }

    // =================================================================
    // GATE
    // =================================================================

    #[test]
    fn clear_state_passes_gate() {
        let state = detect_red_flags(ManualFlags::default(), "");
        assert_eq!(evaluate_gate(&state, false), GateDecision::Clear);
        assert_eq!(evaluate_gate(&state, true), GateDecision::Clear);
    }

    #[test]
    fn weakness_without_override_halts() {
        let state = detect_red_flags(flags(false, false, false, true), "");
        match evaluate_gate(&state, false) {
            GateDecision::Halt { reasons, warning } => {
                assert_eq!(reasons, vec!["進行する神経症状".to_string()]);
                assert!(warning.starts_with(RED_FLAG_WARNING_PREFIX));
                assert!(warning.contains("進行する神経症状"));
            }
            other => panic!("Expected halt, got {other:?}"),
        }
    }

    #[test]
    fn override_proceeds_with_caution_note() {
        let state = detect_red_flags(flags(true, false, false, false), "");
        let decision = evaluate_gate(&state, true);
        assert_eq!(decision.caution(), Some(CAUTION_NOTE));
    }
}
