//! Symptom questionnaire record and its option catalogue.
//!
//! The catalogue mirrors the guided questionnaire: each body part offers its
//! own symptom-type options, and every question ends with a free-text
//! "other" option whose blank answer falls back to a fixed placeholder.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════
// Option labels
// ═══════════════════════════════════════════

/// Option that switches a question to free-text input.
pub const OTHER_OPTION: &str = "その他（自由入力）";

/// Stored when the free-text "other" answer is left blank.
pub const OTHER_PLACEHOLDER: &str = "その他（詳細未入力）";

pub const INTENSITY_OPTIONS: &[&str] = &[
    "0〜3（軽い）",
    "4〜6（中等度）",
    "7〜10（強い〜最強）",
    OTHER_OPTION,
];

pub const ONSET_OPTIONS: &[&str] = &[
    "急性（〜6週間）",
    "亜急性（6〜12週間）",
    "慢性（3か月〜）",
    OTHER_OPTION,
];

pub const DIURNAL_OPTIONS: &[&str] = &[
    "朝に強い",
    "夕方〜夜に強い",
    "変わらない",
    OTHER_OPTION,
];

pub const FACTOR_OPTIONS: &[&str] = &[
    "長時間座りっぱなし",
    "前かがみや重い物で悪化",
    "朝より夕方に悪化/歩くと楽",
    OTHER_OPTION,
];

// Answers used when a question is skipped. None of them trigger a keyword rule.
pub const DEFAULT_INTENSITY: &str = INTENSITY_OPTIONS[1];
pub const DEFAULT_ONSET: &str = ONSET_OPTIONS[1];
pub const DEFAULT_DIURNAL: &str = DIURNAL_OPTIONS[2];
pub const DEFAULT_FACTOR: &str = OTHER_PLACEHOLDER;

pub const DETAIL_LEVEL_MIN: u8 = 1;
pub const DETAIL_LEVEL_MAX: u8 = 5;
pub const DETAIL_LEVEL_DEFAULT: u8 = 4;

// ═══════════════════════════════════════════
// Body part
// ═══════════════════════════════════════════

/// Closed set of body regions, plus a free-text escape hatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    ShoulderNeck,
    LowerBack,
    HipThigh,
    HipJoint,
    Knee,
    CalfFoot,
    Elbow,
    Wrist,
    Ankle,
    Other(String),
}

impl BodyPart {
    /// All enumerated regions in questionnaire order (without `Other`).
    pub const REGIONS: [BodyPart; 9] = [
        BodyPart::ShoulderNeck,
        BodyPart::LowerBack,
        BodyPart::HipThigh,
        BodyPart::HipJoint,
        BodyPart::Knee,
        BodyPart::CalfFoot,
        BodyPart::Elbow,
        BodyPart::Wrist,
        BodyPart::Ankle,
    ];

    /// Display label, as logged and sent to the remote backend.
    pub fn label(&self) -> &str {
        match self {
            Self::ShoulderNeck => "肩・首",
            Self::LowerBack => "腰",
            Self::HipThigh => "お尻・太もも",
            Self::HipJoint => "股関節",
            Self::Knee => "膝",
            Self::CalfFoot => "ふくらはぎ/足",
            Self::Elbow => "肘",
            Self::Wrist => "手首",
            Self::Ankle => "足首",
            Self::Other(text) if text.trim().is_empty() => OTHER_PLACEHOLDER,
            Self::Other(text) => text.as_str(),
        }
    }

    /// Parse a label or English alias. Unknown input becomes `Other`.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let alias = trimmed.to_ascii_lowercase().replace(['_', '-'], " ");
        match (trimmed, alias.as_str()) {
            ("肩・首" | "肩" | "首", _) | (_, "shoulder/neck" | "shoulder neck" | "neck" | "shoulder") => {
                Self::ShoulderNeck
            }
            ("腰", _) | (_, "lower back" | "low back" | "back") => Self::LowerBack,
            ("お尻・太もも" | "お尻" | "太もも", _) | (_, "hip/thigh" | "hip thigh" | "buttock" | "thigh") => {
                Self::HipThigh
            }
            ("股関節", _) | (_, "hip joint" | "hip") => Self::HipJoint,
            ("膝", _) | (_, "knee") => Self::Knee,
            ("ふくらはぎ/足" | "ふくらはぎ" | "足", _) | (_, "calf/foot" | "calf foot" | "calf" | "foot") => {
                Self::CalfFoot
            }
            ("肘", _) | (_, "elbow") => Self::Elbow,
            ("手首", _) | (_, "wrist") => Self::Wrist,
            ("足首", _) | (_, "ankle") => Self::Ankle,
            (OTHER_OPTION, _) | (_, "other") => Self::Other(String::new()),
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

/// Symptom-type options offered for a body part.
pub fn symptom_type_options(part: &BodyPart) -> Vec<&'static str> {
    match part {
        BodyPart::LowerBack => vec![
            "慢性的な鈍痛",
            "急に出た鋭い痛み（ギクッと）",
            "お尻や足に広がる/しびれる",
            OTHER_OPTION,
        ],
        BodyPart::HipThigh => vec![
            "慢性的な痛み",
            "鋭い痛み/ピリッと走る",
            "足先まで広がる/しびれ",
            OTHER_OPTION,
        ],
        BodyPart::CalfFoot => vec![
            "しびれがある",
            "鋭い痛み",
            "筋肉が張る・つりやすい",
            OTHER_OPTION,
        ],
        BodyPart::ShoulderNeck => vec![
            "こり・重だるさ",
            "寝違えのような鋭い痛み",
            "腕や手にしびれが広がる",
            OTHER_OPTION,
        ],
        BodyPart::HipJoint => vec![
            "動き始めのこわばり",
            "鋭い痛み（深く曲げると痛む）",
            "歩くと痛む",
            OTHER_OPTION,
        ],
        BodyPart::Knee => vec![
            "慢性的な鈍痛",
            "鋭い痛み/引っかかる感じ",
            "腫れ・熱感がある",
            OTHER_OPTION,
        ],
        BodyPart::Elbow => vec![
            "物を持つと痛む",
            "鋭い痛み",
            "小指側がしびれる",
            OTHER_OPTION,
        ],
        BodyPart::Wrist => vec![
            "使いすぎの痛み",
            "鋭い痛み・腫れ",
            "指先がしびれる",
            OTHER_OPTION,
        ],
        BodyPart::Ankle => vec![
            "ひねった後の鋭い痛み・腫れ",
            "こわばり・動かしにくい",
            "不安定感がある",
            OTHER_OPTION,
        ],
        BodyPart::Other(_) => vec!["痛み中心", "しびれ中心", "こわばり/張り中心", OTHER_OPTION],
    }
}

/// Resolve a questionnaire answer: a blank free-text "other" answer becomes
/// the placeholder, everything else is kept trimmed.
pub fn resolve_answer(answer: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() || trimmed == OTHER_OPTION {
        OTHER_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

// ═══════════════════════════════════════════
// Record
// ═══════════════════════════════════════════

/// One completed questionnaire. Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub body_part: BodyPart,
    pub symptom_type: String,
    pub intensity: String,
    pub onset: String,
    pub diurnal_pattern: String,
    pub aggravating_factor: String,
    pub free_text: String,
    pub detail_level: u8,
}

impl SymptomRecord {
    /// Build a record, resolving blank answers and clamping the detail level.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        body_part: BodyPart,
        symptom_type: &str,
        intensity: &str,
        onset: &str,
        diurnal_pattern: &str,
        aggravating_factor: &str,
        free_text: &str,
        detail_level: u8,
    ) -> Self {
        Self {
            body_part,
            symptom_type: resolve_answer(symptom_type),
            intensity: resolve_answer(intensity),
            onset: resolve_answer(onset),
            diurnal_pattern: resolve_answer(diurnal_pattern),
            aggravating_factor: resolve_answer(aggravating_factor),
            free_text: free_text.trim().to_string(),
            detail_level: detail_level.clamp(DETAIL_LEVEL_MIN, DETAIL_LEVEL_MAX),
        }
    }

    /// Build a record from a partly answered questionnaire. Skipped
    /// questions take the default answers; the symptom type defaults to the
    /// first option for the body part.
    pub fn from_answers(
        body_part: BodyPart,
        answers: &Answers<'_>,
        free_text: &str,
        detail_level: u8,
    ) -> Self {
        let symptom_type = answers
            .symptom_type
            .unwrap_or(symptom_type_options(&body_part)[0]);
        Self::new(
            body_part,
            symptom_type,
            answers.intensity.unwrap_or(DEFAULT_INTENSITY),
            answers.onset.unwrap_or(DEFAULT_ONSET),
            answers.diurnal_pattern.unwrap_or(DEFAULT_DIURNAL),
            answers.aggravating_factor.unwrap_or(DEFAULT_FACTOR),
            free_text,
            detail_level,
        )
    }

    /// Every question skipped, no free text.
    pub fn neutral(body_part: BodyPart) -> Self {
        Self::from_answers(body_part, &Answers::default(), "", DETAIL_LEVEL_DEFAULT)
    }
}

/// Chosen options of one questionnaire. `None` means the question was skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Answers<'a> {
    pub symptom_type: Option<&'a str>,
    pub intensity: Option<&'a str>,
    pub onset: Option<&'a str>,
    pub diurnal_pattern: Option<&'a str>,
    pub aggravating_factor: Option<&'a str>,
}
