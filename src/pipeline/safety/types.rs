use serde::{Deserialize, Serialize};

/// Caution clause attached to advice emitted despite a red flag.
pub const CAUTION_NOTE: &str = "（赤旗該当のため運動は控えめ。痛みが増す動きは避け、受診を最優先）";

/// Single synthetic reason appended when the free-text scan matches.
pub const AUTO_DETECTED_REASON: &str = "自由記載から危険サインを自動検出";

/// Prefix of the warning shown when the gate halts generation.
pub const RED_FLAG_WARNING_PREFIX: &str = "⚠️ 赤旗に該当する可能性があります： ";

/// Separator used for reason lists in warnings and session logs.
pub const REASON_SEPARATOR: &str = " / ";

/// Checkbox-equivalent red flags answered by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualFlags {
    /// Recent major trauma (fall, traffic accident).
    pub trauma: bool,
    /// Fever of 38℃ or more, chills.
    pub fever: bool,
    /// Bladder/bowel dysfunction or saddle numbness.
    pub cauda_equina: bool,
    /// Progressive leg weakness.
    pub progressive_weakness: bool,
}

/// Manual flag identity, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManualFlag {
    Trauma,
    Fever,
    CaudaEquina,
    ProgressiveWeakness,
}

impl ManualFlag {
    /// Fixed reporting order.
    pub const ORDER: [ManualFlag; 4] = [
        ManualFlag::Trauma,
        ManualFlag::Fever,
        ManualFlag::CaudaEquina,
        ManualFlag::ProgressiveWeakness,
    ];

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Trauma => "強い外傷",
            Self::Fever => "発熱/感染疑い",
            Self::CaudaEquina => "排尿排便障害/馬尾症状疑い",
            Self::ProgressiveWeakness => "進行する神経症状",
        }
    }
}

impl ManualFlags {
    pub fn is_set(&self, flag: ManualFlag) -> bool {
        match flag {
            ManualFlag::Trauma => self.trauma,
            ManualFlag::Fever => self.fever,
            ManualFlag::CaudaEquina => self.cauda_equina,
            ManualFlag::ProgressiveWeakness => self.progressive_weakness,
        }
    }

    pub fn any(&self) -> bool {
        ManualFlag::ORDER.iter().any(|f| self.is_set(*f))
    }

    /// Set flags in reporting order.
    pub fn active(&self) -> Vec<ManualFlag> {
        ManualFlag::ORDER
            .iter()
            .copied()
            .filter(|f| self.is_set(*f))
            .collect()
    }
}

/// Danger-sign pattern group found in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DangerSign {
    BladderBowel,
    SaddleNumbness,
    ProgressiveWeakness,
    SystemicIllness,
    MajorTrauma,
}

impl DangerSign {
    /// Manual flag that already covers this sign.
    pub fn covered_by(&self) -> ManualFlag {
        match self {
            Self::BladderBowel | Self::SaddleNumbness => ManualFlag::CaudaEquina,
            Self::ProgressiveWeakness => ManualFlag::ProgressiveWeakness,
            Self::SystemicIllness => ManualFlag::Fever,
            Self::MajorTrauma => ManualFlag::Trauma,
        }
    }
}

/// Verdict of the red-flag detector for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlagState {
    pub manual_flags: ManualFlags,
    pub auto_detected: bool,
    /// Matched sign groups, in fixed priority order.
    pub matched_signs: Vec<DangerSign>,
    /// Manual reasons in fixed order, then the auto-detected reason.
    pub triggered_reasons: Vec<String>,
}

impl RedFlagState {
    pub fn has_red_flag(&self) -> bool {
        self.manual_flags.any() || self.auto_detected
    }

    /// Reasons joined for display and logging.
    pub fn reason_list(&self) -> String {
        self.triggered_reasons.join(REASON_SEPARATOR)
    }

    /// Warning line listing every triggered reason.
    pub fn warning(&self) -> String {
        format!("{RED_FLAG_WARNING_PREFIX}{}", self.reason_list())
    }
}

/// What the caller must do after the red-flag check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    /// No red flag: generate normally.
    Clear,
    /// Red flag without override: generate nothing.
    Halt {
        reasons: Vec<String>,
        warning: String,
    },
    /// Red flag with override: generate, carrying the caution note.
    ProceedWithCaution { note: String, warning: String },
}

impl GateDecision {
    /// Caution note to thread into generation, if any.
    pub fn caution(&self) -> Option<&str> {
        match self {
            Self::ProceedWithCaution { note, .. } => Some(note.as_str()),
            _ => None,
        }
    }
}
