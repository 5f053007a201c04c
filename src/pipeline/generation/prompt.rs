use crate::models::SymptomRecord;
use crate::pipeline::advice::compose::truncate_chars;
use crate::pipeline::advice::CANONICAL_HEADINGS;
use crate::pipeline::session::SessionContext;

pub const PROFILE_EXCERPT_CHARS: usize = 1500;
pub const REFERENCE_EXCERPT_CHARS: usize = 2000;

/// Fixed instruction sent as the system message.
pub const SYSTEM_PROMPT: &str = "あなたは腰痛・坐骨神経痛などの一般向けセルフケアを案内する理学療法の専門家です。\
・“赤旗”症状（外傷/発熱/排尿排便障害/急な麻痺 など）があれば受診を最優先するよう促す。\
・自宅でできる安全なセルフケア（姿勢/生活習慣/軽い運動）を短く具体的に、箇条書き中心で示す。\
・専門用語は控えめ、断定的診断は避ける、痛みが増える動きは無理しないと明記する。\
出力は必ず次のMarkdown見出しの順で、各セクション3〜6項目にまとめる：\
## 可能性のある原因（メカニズム・生活要因）\
## 考えられること（鑑別の方向性：断定しない）\
## セルフケアの提案（手順は短く）\
## 避ける動き\
## 受診の目安";

/// User message for the remote backend.
///
/// Optional blocks (profile, history, reference, free text) are omitted
/// when empty. Profile and reference are cut to their excerpt limits.
pub fn build_user_summary(
    record: &SymptomRecord,
    caution: Option<&str>,
    context: &SessionContext,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("【安全注記】{}\n", caution.unwrap_or("")));
    out.push_str(&format!("部位: {}\n", record.body_part.label()));
    out.push_str(&format!("タイプ: {}\n", record.symptom_type));
    out.push_str(&format!("痛み強度: {}\n", record.intensity));
    out.push_str(&format!("発症期間: {}\n", record.onset));
    out.push_str(&format!("日内変動: {}\n", record.diurnal_pattern));
    out.push_str(&format!("増悪因子/背景: {}\n", record.aggravating_factor));
    out.push_str(&format!(
        "【具体性の指示】レベル{}。具体例（1日のルーティン/回数/頻度/所要時間）を入れる。\n",
        record.detail_level
    ));

    if !context.profile.is_empty() {
        out.push_str(&format!(
            "\n【制作者の発信・方針】\n{}\n",
            truncate_chars(&context.profile, PROFILE_EXCERPT_CHARS)
        ));
    }
    if !context.history.is_empty() {
        out.push_str(&format!("\n【直近の相談と出力の要旨】\n{}\n", context.history));
    }
    if !context.reference.is_empty() {
        out.push_str(&format!(
            "\n【参考資料の抜粋】\n{}\n",
            truncate_chars(&context.reference, REFERENCE_EXCERPT_CHARS)
        ));
    }
    if !record.free_text.is_empty() {
        out.push_str(&format!("\n【症状の自由記載】\n{}\n", record.free_text));
    }

    out.push_str("以下の見出し・順番・分量でMarkdown出力：\n");
    for heading in CANONICAL_HEADINGS {
        out.push_str(heading);
        out.push('\n');
    }
    out
}
