//! Decision table for the symptom classifier.
//!
//! Each body region has one `*_rules` function mapping `(symptom_type,
//! free_text)` to a [`RuleDelta`]. The cross-cutting rules inspect the
//! remaining questionnaire fields and apply to every region. All rules are
//! additive: several may fire for one record.
//!
//! Keyword sets hold the Japanese questionnaire vocabulary plus English
//! aliases so that free-text answers in either language refine the same way.

use crate::models::{SymptomRecord, Tier};

// ── Keyword sets ────────────────────────────────────────────

pub(crate) static SHARP_KEYWORDS: &[&str] = &[
    "鋭い", "急に", "ギクッ", "ぎくっ", "ピリッ", "激痛", "寝違え",
    "sharp", "sudden", "stabbing",
];

pub(crate) static NUMB_KEYWORDS: &[&str] = &[
    "しびれ", "痺れ", "広がる", "放散", "ジンジン",
    "numb", "tingl", "spreading", "radiat",
];

pub(crate) static DULL_KEYWORDS: &[&str] = &[
    "鈍痛", "慢性", "重だる", "こり", "使いすぎ",
    "dull", "chronic", "ache", "overuse",
];

pub(crate) static STIFF_KEYWORDS: &[&str] = &[
    "こわばり", "張り", "張る", "つり", "動かしにくい", "動き始め",
    "stiff", "tight", "cramp",
];

pub(crate) static SWELLING_KEYWORDS: &[&str] = &[
    "腫れ", "熱感", "ひねった", "捻挫",
    "swelling", "swollen", "sprain",
];

pub(crate) static LOCKING_KEYWORDS: &[&str] = &[
    "引っかかる", "ひっかかる", "ロッキング", "ガクッ", "膝崩れ", "不安定",
    "locking", "giving way", "unstable",
];

static SITTING_KEYWORDS: &[&str] = &[
    "座りっぱなし", "座位", "長時間座", "デスク",
    "sitting", "desk",
];

static FORWARD_BEND_KEYWORDS: &[&str] = &[
    "前かがみ", "前屈", "重い物", "持ち上げ",
    "forward bend", "bending", "lifting",
];

static EVENING_WORSE_KEYWORDS: &[&str] = &[
    "夕方に悪化", "歩くと楽",
    "worse in the evening", "walking helps",
];

static MORNING_KEYWORDS: &[&str] = &["朝", "起床", "morning"];

static EVENING_KEYWORDS: &[&str] = &["夕方", "夜", "evening", "night"];

static ACUTE_KEYWORDS: &[&str] = &["急性", "〜6週", "acute"];

static SUBACUTE_KEYWORDS: &[&str] = &["亜急性", "subacute"];

static CHRONIC_KEYWORDS: &[&str] = &["慢性", "3か月", "3ヶ月", "chronic"];

static STRONG_INTENSITY_KEYWORDS: &[&str] = &["7〜10", "強い", "最強", "severe"];

static MILD_INTENSITY_KEYWORDS: &[&str] = &["0〜3", "軽い", "mild"];

static RUNNING_KEYWORDS: &[&str] = &[
    "ランニング", "ジョギング", "マラソン", "走る", "走っ",
    "running", "jogging", "marathon",
];

static DESK_WORK_KEYWORDS: &[&str] = &[
    "デスクワーク", "パソコン", "PC作業", "在宅勤務", "事務仕事",
    "desk work", "computer",
];

// ── Shared statements ───────────────────────────────────────

pub const TIP_HIP_HINGE: &str = "前かがみ作業は股関節から曲げる練習（ヒップヒンジ）を1日3回×3分";
pub const TIP_STAY_ACTIVE: &str = "痛みの強い数日も、無理のない範囲で日常動作を続ける（安静にしすぎない）";
pub const TIP_TRACK_NUMBNESS: &str = "しびれの範囲と強さを毎日記録し、広がる場合は受診する";
pub const TIP_WALK_BREAK: &str = "30–60分ごとに立って1–2分歩く（タイマー推奨）";
pub const TIP_GENTLE_WALK: &str = "楽な範囲で5–10分の歩行を1日2回";
pub const TIP_CALF_STRETCH: &str = "ふくらはぎストレッチ20秒×3を朝夕";
pub const TIP_CAUTION: &str = "受診を最優先し、運動は痛みの出ない日常動作の範囲にとどめる";

pub const AVOID_DEEP_FORWARD_BEND: &str = "深い前かがみ";
pub const AVOID_SUDDEN_LIFT: &str = "急に重い物を持ち上げる";
pub const AVOID_PAINFUL_REPETITION: &str = "痛みが増える動作の反復";
pub const AVOID_CAUTION: &str = "筋トレや強いストレッチなど負荷の高い運動";

pub const DIFF_DISC_LIGAMENT: &str = "椎間板や靱帯へのストレスの関与（ぎっくり腰様の急性腰痛）";

// ═══════════════════════════════════════════
// RuleDelta
// ═══════════════════════════════════════════

/// Statements contributed by one rule, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDelta {
    pub causes: Vec<&'static str>,
    pub differentials: Vec<&'static str>,
    pub avoidances: Vec<&'static str>,
    pub tips: Vec<(Tier, &'static str)>,
}

impl RuleDelta {
    fn cause(&mut self, s: &'static str) {
        self.causes.push(s);
    }

    fn differential(&mut self, s: &'static str) {
        self.differentials.push(s);
    }

    fn avoid(&mut self, s: &'static str) {
        self.avoidances.push(s);
    }

    fn tip(&mut self, tier: Tier, s: &'static str) {
        self.tips.push((tier, s));
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
            && self.differentials.is_empty()
            && self.avoidances.is_empty()
            && self.tips.is_empty()
    }
}

/// Substring containment against any keyword.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    !text.is_empty() && keywords.iter().any(|k| text.contains(k))
}

// ═══════════════════════════════════════════
// Region rules
// ═══════════════════════════════════════════

pub fn shoulder_neck_rules(symptom_type: &str, free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("長時間のうつむき姿勢や巻き肩による首・肩周囲の筋緊張");
    d.differential("筋・筋膜性の首肩こりの傾向");
    d.avoid("長時間のうつむき姿勢（スマホ・読書）");

    if contains_any(symptom_type, SHARP_KEYWORDS) {
        d.cause("寝違えなど急な負荷による筋の防御性収縮");
        d.tip(Tier::High, "痛みの出ない範囲で首をゆっくり動かし、急な動きを避ける");
        d.avoid("首を勢いよく回す・強く反らす");
    }
    if contains_any(symptom_type, NUMB_KEYWORDS) || contains_any(free_text, NUMB_KEYWORDS) {
        d.differential("頸部の神経根への刺激（腕や手にしびれが広がる場合）");
        d.tip(Tier::High, TIP_TRACK_NUMBNESS);
        d.avoid("首を強く後ろに反らす姿勢を続ける");
    }
    if contains_any(symptom_type, DULL_KEYWORDS) || contains_any(symptom_type, STIFF_KEYWORDS) {
        d.tip(Tier::Medium, "肩甲骨回し 前後各10回を1日3回");
    }
    d.tip(Tier::Medium, "画面の高さを目線に合わせ、あごを軽く引いた姿勢をとる");
    d.tip(Tier::Low, "蒸しタオルで首肩を5分温める");
    d
}

pub fn lower_back_rules(symptom_type: &str, free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("姿勢や活動量の偏りによる筋・筋膜の過緊張");
    d.differential("筋・筋膜性の腰痛の傾向");

    let sharp = contains_any(symptom_type, SHARP_KEYWORDS);
    let numb = contains_any(symptom_type, NUMB_KEYWORDS);

    if sharp {
        d.cause("急な前屈やひねりによる腰部組織への過負荷");
        d.differential(DIFF_DISC_LIGAMENT);
        d.tip(Tier::High, TIP_HIP_HINGE);
        d.tip(Tier::High, TIP_STAY_ACTIVE);
        d.avoid(AVOID_DEEP_FORWARD_BEND);
        d.avoid(AVOID_SUDDEN_LIFT);
    }
    if numb {
        d.differential("坐骨神経への刺激（お尻や足にしびれが広がる場合）");
        d.differential("椎間板ヘルニアや脊柱管狭窄など神経由来の可能性の検討");
        d.tip(Tier::High, TIP_TRACK_NUMBNESS);
        d.tip(Tier::Medium, "仰向けで膝を立て、腰を休める姿勢を1回5分");
        d.avoid("しびれが強まる姿勢を長く続ける");
    }
    if !sharp && !numb {
        d.cause("座位や前かがみ作業の増加による負担");
        d.tip(Tier::Medium, TIP_GENTLE_WALK);
        d.tip(Tier::Low, "骨盤を前後にゆっくり動かす体操を10回");
    }
    if contains_any(free_text, &["重い荷物", "重い物", "lifting"]) {
        d.cause("重い物の持ち上げによる腰部への急な負荷");
        d.avoid(AVOID_SUDDEN_LIFT);
    }
    d.tip(Tier::Low, "入浴やカイロで腰を温め、血流を促す");
    d.avoid(AVOID_PAINFUL_REPETITION);
    d
}

pub fn hip_thigh_rules(symptom_type: &str, free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("お尻周囲の筋（梨状筋・中殿筋）の緊張");
    d.differential("お尻周囲の筋・筋膜性の痛み");
    d.avoid("硬い座面に長時間座る");

    if contains_any(symptom_type, SHARP_KEYWORDS) {
        d.differential("坐骨神経の一時的な刺激");
        d.tip(Tier::High, "ピリッと走る痛みが出る姿勢を避け、座面にクッションを使う");
    }
    if contains_any(symptom_type, NUMB_KEYWORDS) || contains_any(free_text, NUMB_KEYWORDS) {
        d.differential("坐骨神経への刺激（足先まで広がる場合）");
        d.differential("腰部由来の神経症状の可能性");
        d.tip(Tier::High, TIP_TRACK_NUMBNESS);
        d.avoid("足を組んで座る");
    }
    d.tip(Tier::Medium, "仰向けで片膝を胸に引き寄せるお尻のストレッチ20秒×3を朝夕");
    d.tip(Tier::Low, "テニスボールでお尻を1分ほど軽くほぐす");
    d
}

pub fn hip_joint_rules(symptom_type: &str, _free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("股関節周囲の可動域低下と筋力のアンバランス");
    d.differential("股関節周囲の筋・腱への負担");
    d.avoid("深くしゃがみ込む動作の反復");

    if contains_any(symptom_type, SHARP_KEYWORDS) {
        d.differential("股関節前面の組織（関節唇など）へのストレス");
        d.tip(Tier::High, "痛みの出ない範囲での小さな股関節の曲げ伸ばしにとどめる");
        d.avoid("股関節を深く曲げてひねる動き");
    }
    if contains_any(symptom_type, STIFF_KEYWORDS) {
        d.cause("安静後・動き始めのこわばり");
        d.differential("変形性股関節症など関節由来の痛みの可能性（歩き始めの痛みが続く場合）");
        d.tip(Tier::Medium, "仰向けで膝を左右にゆっくり倒す運動を10回");
    }
    if contains_any(symptom_type, &["歩くと", "walking"]) {
        d.cause("歩行時の股関節への荷重ストレス");
        d.tip(Tier::High, "歩幅を小さくし、痛みの出ない距離で歩行を区切る");
    }
    d.tip(Tier::Medium, "お尻の筋力を保つブリッジ運動10回×2");
    d.tip(Tier::Low, "長時間の立ちっぱなしを避け、適度に座って休む");
    d
}

pub fn knee_rules(symptom_type: &str, free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("太もも前後の筋の柔軟性・筋力低下による膝への負担");
    d.differential("膝蓋大腿関節（お皿の裏）へのストレス");
    d.avoid("深くしゃがむ・正座");

    if contains_any(symptom_type, SHARP_KEYWORDS) || contains_any(symptom_type, LOCKING_KEYWORDS) {
        d.differential("半月板や靱帯への負担の可能性（引っかかり・ガクッと感がある場合）");
        d.tip(Tier::High, "階段は手すりを使い、下りでは痛い側の脚を後から出す");
        d.avoid("膝をひねる動き（急な方向転換）");
    }
    if contains_any(symptom_type, SWELLING_KEYWORDS) || contains_any(free_text, SWELLING_KEYWORDS) {
        d.differential("関節内の炎症（腫れ・熱感がある場合）");
        d.tip(Tier::High, "腫れや熱感がある日は15分ほど冷やし、歩く量を減らす");
    }
    if contains_any(symptom_type, DULL_KEYWORDS) {
        d.differential("変形性膝関節症の傾向（中高年で動き始めに痛む場合）");
    }
    if contains_any(free_text, &["階段", "stairs"]) {
        d.cause("階段昇降での膝への繰り返し負荷");
    }
    d.tip(Tier::Medium, "椅子に座って膝を伸ばす運動（太もも前）10回×2");
    d.tip(Tier::Low, "クッション性のある靴を選ぶ");
    d
}

pub fn calf_foot_rules(symptom_type: &str, free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("ふくらはぎの筋疲労や柔軟性の低下");
    d.differential("ふくらはぎの筋・筋膜性の痛み");
    d.avoid("つま先立ちや坂道歩行の反復");

    if contains_any(symptom_type, NUMB_KEYWORDS) || contains_any(free_text, NUMB_KEYWORDS) {
        d.differential("腰部からの神経症状の可能性（しびれが足に広がる場合）");
        d.differential("末梢の循環や神経の問題の可能性");
        d.tip(Tier::High, TIP_TRACK_NUMBNESS);
    }
    if contains_any(symptom_type, SHARP_KEYWORDS) {
        d.differential("肉離れなど筋の損傷の可能性（急な痛みの場合）");
        d.tip(Tier::High, "急な痛みの直後は無理に伸ばさず、冷却と安静を優先する");
        d.avoid("痛む筋を強く伸ばす・強く揉む");
    }
    if contains_any(symptom_type, STIFF_KEYWORDS) {
        d.cause("水分・ミネラル不足や冷えによる筋のつりやすさ");
        d.tip(Tier::Medium, "就寝前にふくらはぎを20秒×3伸ばす");
        d.tip(Tier::Low, "こまめに水分を補給する");
    }
    d.tip(Tier::Medium, TIP_CALF_STRETCH);
    d
}

pub fn elbow_rules(symptom_type: &str, _free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("手首や指の使いすぎによる肘周囲の腱への負担");
    d.differential("テニス肘（上腕骨外側上顆炎）様の腱の負担");
    d.avoid("手のひらを下に向けて重い物を持つ");

    if contains_any(symptom_type, NUMB_KEYWORDS) {
        d.differential("肘の内側での尺骨神経への刺激（小指側がしびれる場合）");
        d.tip(Tier::High, "肘を長時間深く曲げたままにしない（スマホ操作・就寝時）");
        d.avoid("肘をついた姿勢での長時間作業");
    }
    if contains_any(symptom_type, SHARP_KEYWORDS) || contains_any(symptom_type, &["持つと", "gripping"]) {
        d.tip(Tier::High, "痛む動作を一時的に減らし、物は手のひらを上に向けて持つ");
    }
    d.tip(Tier::Medium, "前腕のストレッチ20秒×3を1日3回");
    d.tip(Tier::Low, "作業の合間に手首と指を休める");
    d
}

pub fn wrist_rules(symptom_type: &str, free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("タイピングやスマホ操作など手首の反復動作による負担");
    d.differential("腱鞘炎の傾向（親指側の痛みなど）");
    d.avoid("手首を反らした状態での長時間作業");

    if contains_any(symptom_type, NUMB_KEYWORDS) {
        d.differential("手根管での正中神経への刺激（親指〜薬指のしびれ）");
        d.tip(Tier::High, "夜間は手首をまっすぐに保つ（タオルで軽く固定）");
    }
    if contains_any(symptom_type, SHARP_KEYWORDS) || contains_any(symptom_type, SWELLING_KEYWORDS) {
        d.differential("転倒後や腫れが強い場合は捻挫・骨折の確認が必要");
        d.tip(Tier::High, "腫れがある日は冷やし、手首の負荷を減らす");
    }
    if contains_any(free_text, &["スマホ", "smartphone"]) {
        d.cause("片手でのスマホ操作の長時間化");
    }
    d.tip(Tier::Medium, "指と手首の曲げ伸ばしストレッチ20秒×3");
    d.tip(Tier::Low, "キーボードやマウスの位置を見直す");
    d
}

pub fn ankle_rules(symptom_type: &str, _free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    d.cause("足首周囲の靱帯・腱への負担");
    d.differential("足関節周囲の腱・靱帯のストレス");
    d.avoid("不安定な路面での運動");

    if contains_any(symptom_type, SHARP_KEYWORDS) || contains_any(symptom_type, SWELLING_KEYWORDS) {
        d.differential("捻挫（靱帯損傷）の可能性（ひねった後の腫れ）");
        d.tip(Tier::High, "受傷直後は安静・冷却・圧迫・挙上を意識する");
        d.avoid("腫れている間の走行・ジャンプ");
    }
    if contains_any(symptom_type, STIFF_KEYWORDS) {
        d.cause("過去の捻挫後の可動域低下");
        d.tip(Tier::Medium, "足首回しを各方向10回、1日2回");
    }
    if contains_any(symptom_type, LOCKING_KEYWORDS) {
        d.differential("繰り返す捻挫による足首の不安定性");
    }
    d.tip(Tier::Medium, "壁につかまって片脚立ちのバランス練習30秒×2");
    d.tip(Tier::Low, "足首を支える靴を選ぶ");
    d
}

/// Free-text body part: only symptom-type refinement applies.
pub fn other_rules(symptom_type: &str, _free_text: &str) -> RuleDelta {
    let mut d = RuleDelta::default();
    if contains_any(symptom_type, NUMB_KEYWORDS) {
        d.differential("神経への刺激の可能性（しびれが続く・広がる場合）");
        d.tip(Tier::High, TIP_TRACK_NUMBNESS);
    }
    if contains_any(symptom_type, STIFF_KEYWORDS) {
        d.cause("筋の柔軟性低下や冷えによるこわばり");
        d.tip(Tier::Medium, "痛みのない範囲で患部周囲をゆっくり動かす（1日3回）");
    }
    if contains_any(symptom_type, SHARP_KEYWORDS) {
        d.differential("急な負荷による組織の損傷の可能性");
        d.avoid("痛む部位に急な負荷をかける動作");
    }
    d
}

// ═══════════════════════════════════════════
// Cross-cutting rules
// ═══════════════════════════════════════════

/// Factor, timing, onset, intensity and free-text rules. Runs for every
/// record regardless of region.
pub fn cross_cutting_rules(record: &SymptomRecord) -> RuleDelta {
    let mut d = RuleDelta::default();
    let factor = record.aggravating_factor.as_str();
    let diurnal = record.diurnal_pattern.as_str();
    let onset = record.onset.as_str();
    let intensity = record.intensity.as_str();
    let free_text = record.free_text.as_str();

    // Aggravating factor
    if contains_any(factor, SITTING_KEYWORDS) {
        d.cause("長時間の座位による腰部・股関節への持続的な負担");
        d.tip(Tier::High, TIP_WALK_BREAK);
        d.avoid("1時間以上同じ姿勢で座り続ける");
    }
    if contains_any(factor, FORWARD_BEND_KEYWORDS) {
        d.cause("前屈や持ち上げ動作の繰り返しによる腰部への負担");
        d.differential(DIFF_DISC_LIGAMENT);
        d.tip(Tier::High, TIP_HIP_HINGE);
        d.avoid(AVOID_DEEP_FORWARD_BEND);
        d.avoid(AVOID_SUDDEN_LIFT);
    }
    if contains_any(factor, EVENING_WORSE_KEYWORDS) {
        d.cause("日中の活動や姿勢による筋疲労の蓄積");
        d.tip(Tier::Medium, "夕方前に5分のストレッチ休憩を入れる");
    }

    // Diurnal pattern
    if contains_any(diurnal, MORNING_KEYWORDS) {
        d.cause("就寝中の不動による朝のこわばり");
        d.differential("炎症性の要素の確認（朝のこわばりが30分以上続く場合）");
        d.tip(Tier::Medium, "起床後にベッドの上で膝抱え・骨盤ゆらしを各10回");
    }
    if contains_any(diurnal, EVENING_KEYWORDS) {
        d.cause("日中の負荷の蓄積による夕方以降の悪化");
        d.tip(Tier::Low, "入浴で温めてから就寝前に軽いストレッチ");
    }

    // Onset
    if contains_any(onset, ACUTE_KEYWORDS) && !contains_any(onset, SUBACUTE_KEYWORDS) {
        d.cause("急な負荷による組織の一時的な炎症");
        d.tip(Tier::High, TIP_STAY_ACTIVE);
    }
    if contains_any(onset, CHRONIC_KEYWORDS) {
        d.cause("痛みへの不安や活動量低下による悪循環");
        d.differential("慢性化に伴う痛みの感じやすさ（感作）の関与");
        d.tip(Tier::Medium, TIP_GENTLE_WALK);
    }

    // Intensity
    if contains_any(intensity, STRONG_INTENSITY_KEYWORDS) {
        d.tip(Tier::High, "痛みが強い間は動作を小さく分け、こまめに休憩する");
        d.avoid("痛みを我慢しての運動・ストレッチ");
    }
    if contains_any(intensity, MILD_INTENSITY_KEYWORDS) {
        d.tip(Tier::Low, "痛みの出た時間帯と動作を1日1回メモする");
    }

    // Free-text keywords
    if contains_any(free_text, RUNNING_KEYWORDS) {
        d.cause("走行量の急な増加によるオーバーユース");
        d.tip(Tier::Medium, "走行距離・時間を一時的に半分程度に減らす");
        d.avoid("痛みを感じながらのランニング継続");
    }
    if contains_any(free_text, DESK_WORK_KEYWORDS) {
        d.cause("デスクワーク姿勢（前傾・猫背）の持続");
        d.tip(Tier::Medium, "椅子に深く座り、画面を目線の高さに合わせる");
    }

    d
}

/// Extra statements when advice is emitted despite a red flag.
pub fn caution_rules() -> RuleDelta {
    let mut d = RuleDelta::default();
    d.tip(Tier::High, TIP_CAUTION);
    d.avoid(AVOID_CAUTION);
    d
}
