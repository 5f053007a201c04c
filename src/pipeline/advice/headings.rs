//! Canonical headings and repair of externally generated documents.
//!
//! Remote output sometimes uses synonym headings, another heading level, a
//! numbered prefix or bold text instead of `##`. Known variants are rewritten
//! to the canonical set. A document that still lacks the causes heading is
//! discarded in favour of the empty skeleton.

pub const HEADING_CAUSES: &str = "## 可能性のある原因（メカニズム・生活要因）";
pub const HEADING_DIFFERENTIALS: &str = "## 考えられること（鑑別の方向性：断定しない）";
pub const HEADING_TIPS: &str = "## セルフケアの提案（手順は短く）";
pub const HEADING_AVOIDANCES: &str = "## 避ける動き";
pub const HEADING_REFERRAL: &str = "## 受診の目安";

/// The five canonical headings in document order.
pub const CANONICAL_HEADINGS: [&str; 5] = [
    HEADING_CAUSES,
    HEADING_DIFFERENTIALS,
    HEADING_TIPS,
    HEADING_AVOIDANCES,
    HEADING_REFERRAL,
];

/// Known heading synonyms (title text without markers) → canonical heading.
static HEADING_SYNONYMS: &[(&str, &str)] = &[
    // Causes
    ("可能性のある原因", HEADING_CAUSES),
    ("考えられる原因", HEADING_CAUSES),
    ("原因", HEADING_CAUSES),
    ("痛みの原因", HEADING_CAUSES),
    ("原因（メカニズム・生活要因）", HEADING_CAUSES),
    ("Possible causes", HEADING_CAUSES),
    ("Causes", HEADING_CAUSES),
    // Differentials
    ("考えられること", HEADING_DIFFERENTIALS),
    ("鑑別", HEADING_DIFFERENTIALS),
    ("鑑別の方向性", HEADING_DIFFERENTIALS),
    ("考えられる状態", HEADING_DIFFERENTIALS),
    ("Differential considerations", HEADING_DIFFERENTIALS),
    ("Differentials", HEADING_DIFFERENTIALS),
    // Tips
    ("セルフケア", HEADING_TIPS),
    ("セルフケアの提案", HEADING_TIPS),
    ("セルフケアの方法", HEADING_TIPS),
    ("自宅でできること", HEADING_TIPS),
    ("おすすめのセルフケア", HEADING_TIPS),
    ("Self-care tips", HEADING_TIPS),
    ("Self-care", HEADING_TIPS),
    // Avoidances
    ("避けるべき動き", HEADING_AVOIDANCES),
    ("避けたほうがよい動き", HEADING_AVOIDANCES),
    ("避けた方が良い動き", HEADING_AVOIDANCES),
    ("控える動き", HEADING_AVOIDANCES),
    ("注意する動き", HEADING_AVOIDANCES),
    ("NG動作", HEADING_AVOIDANCES),
    ("Movements to avoid", HEADING_AVOIDANCES),
    ("What to avoid", HEADING_AVOIDANCES),
    // Referral
    ("受診の目安（赤旗）", HEADING_REFERRAL),
    ("受診のタイミング", HEADING_REFERRAL),
    ("受診の目安・注意点", HEADING_REFERRAL),
    ("医療機関への相談", HEADING_REFERRAL),
    ("医療機関を受診する目安", HEADING_REFERRAL),
    ("When to seek care", HEADING_REFERRAL),
    ("When to see a doctor", HEADING_REFERRAL),
];

/// Title text of a canonical heading (without the `## ` marker).
fn canonical_title(heading: &str) -> &str {
    heading.trim_start_matches('#').trim()
}

/// Extract the title of a heading-like line, or `None` for body lines.
///
/// Accepts `#`–`####` headings and bold-only lines, strips a leading
/// `1.`/`1)` number and a trailing colon.
fn heading_title(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let title = if trimmed.starts_with('#') {
        let level = trimmed.chars().take_while(|c| *c == '#').count();
        if level > 4 {
            return None;
        }
        trimmed[level..].trim()
    } else if trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
        trimmed[2..trimmed.len() - 2].trim()
    } else {
        return None;
    };

    let title = strip_number_prefix(title);
    let title = title.trim_end_matches([':', '：']).trim();
    let title = title.trim_start_matches("**").trim_end_matches("**").trim();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn strip_number_prefix(title: &str) -> &str {
    let digits = title.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return title;
    }
    let rest = &title[digits..];
    match rest.strip_prefix(['.', ')', '．', '、']) {
        Some(after) => after.trim_start(),
        None => title,
    }
}

/// Canonical heading for a line, if it is a recognised heading.
pub fn canonical_heading_for(line: &str) -> Option<&'static str> {
    let title = heading_title(line)?;
    if let Some(canonical) = CANONICAL_HEADINGS
        .iter()
        .find(|h| canonical_title(h) == title)
    {
        return Some(*canonical);
    }
    HEADING_SYNONYMS
        .iter()
        .find(|(synonym, _)| synonym.eq_ignore_ascii_case(title))
        .map(|(_, canonical)| *canonical)
}

/// Five headings with empty bodies.
pub fn empty_skeleton() -> String {
    let mut out = CANONICAL_HEADINGS.join("\n\n");
    out.push('\n');
    out
}

/// Rewrite known heading variants to canonical headings.
///
/// If the causes heading is absent afterwards the whole document is replaced
/// by [`empty_skeleton`].
pub fn normalize_headings(text: &str) -> String {
    let mut rewritten = 0usize;
    let lines: Vec<String> = text
        .lines()
        .map(|line| match canonical_heading_for(line) {
            Some(canonical) => {
                if line.trim() != canonical {
                    rewritten += 1;
                }
                canonical.to_string()
            }
            None => line.to_string(),
        })
        .collect();

    if !lines.iter().any(|l| l == HEADING_CAUSES) {
        tracing::warn!(
            lines = lines.len(),
            "Causes heading missing after normalization: replacing with skeleton"
        );
        return empty_skeleton();
    }

    if rewritten > 0 {
        tracing::debug!(rewritten, "Headings normalized");
    }

    let mut out = lines.join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Canonical headings present in a document, in the order they appear.
pub fn heading_sequence(text: &str) -> Vec<&'static str> {
    text.lines()
        .filter_map(|line| {
            CANONICAL_HEADINGS
                .iter()
                .find(|h| line.trim_end() == **h)
                .copied()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_document_is_unchanged() {
        let doc = format!(
            "{HEADING_CAUSES}\n- a\n\n{HEADING_DIFFERENTIALS}\n- b\n\n{HEADING_TIPS}\n1. c\n\n{HEADING_AVOIDANCES}\n- d\n\n{HEADING_REFERRAL}\n- e\n"
        );
        assert_eq!(normalize_headings(&doc), doc);
    }

    #[test]
    fn avoidance_synonym_is_rewritten() {
        let doc = format!("{HEADING_CAUSES}\n- a\n\n## 避けるべき動き\n- 深い前かがみ\n");
        let out = normalize_headings(&doc);
        assert!(out.contains(&format!("{HEADING_AVOIDANCES}\n- 深い前かがみ")));
        assert!(!out.contains("避けるべき動き"));
    }

    #[test]
    fn heading_level_and_numbering_are_normalized() {
        let doc = "### 1. 可能性のある原因\n- a\n#### 2) 受診のタイミング：\n- b";
        let out = normalize_headings(doc);
        assert_eq!(out, format!("{HEADING_CAUSES}\n- a\n{HEADING_REFERRAL}\n- b"));
    }

    #[test]
    fn bold_heading_is_recognised() {
        assert_eq!(canonical_heading_for("**セルフケア**"), Some(HEADING_TIPS));
        assert_eq!(canonical_heading_for("**強調だけの行**"), None);
    }

    #[test]
    fn english_synonyms_are_case_insensitive() {
        assert_eq!(canonical_heading_for("## movements to avoid"), Some(HEADING_AVOIDANCES));
        assert_eq!(canonical_heading_for("## Possible Causes"), Some(HEADING_CAUSES));
    }

    #[test]
    fn body_lines_are_not_headings() {
        assert_eq!(canonical_heading_for("- 原因"), None);
        assert_eq!(canonical_heading_for("原因"), None);
        assert_eq!(canonical_heading_for("##### 原因"), None);
    }

    #[test]
    fn missing_causes_heading_yields_skeleton() {
        let doc = "## 避ける動き\n- a\n## 受診の目安\n- b\n";
        assert_eq!(normalize_headings(doc), empty_skeleton());
    }

    #[test]
    fn unrecognised_text_yields_skeleton() {
        assert_eq!(normalize_headings("ごめんなさい、お答えできません。"), empty_skeleton());
        assert_eq!(normalize_headings(""), empty_skeleton());
    }

    #[test]
    fn skeleton_has_all_headings_once_in_order() {
        let skeleton = empty_skeleton();
        assert_eq!(heading_sequence(&skeleton), CANONICAL_HEADINGS.to_vec());
        assert!(!skeleton.contains("- "));
    }

    #[test]
    fn normalization_is_idempotent() {
        let doc = "## 原因\n- a\n## NG動作\n- b\n";
        let once = normalize_headings(doc);
        assert_eq!(normalize_headings(&once), once);
    }
}
