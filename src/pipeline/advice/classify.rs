use crate::models::{BodyPart, SymptomRecord};

use super::candidates::CandidateSet;
use super::rules::{
    ankle_rules, calf_foot_rules, caution_rules, cross_cutting_rules, elbow_rules,
    hip_joint_rules, hip_thigh_rules, knee_rules, lower_back_rules, other_rules,
    shoulder_neck_rules, wrist_rules, RuleDelta,
};
use super::tips::TipPool;

/// Classifier output: deduplicated statement sets plus tiered tip candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub candidates: CandidateSet,
    pub tips: TipPool,
}

impl Classification {
    fn apply(&mut self, delta: RuleDelta) {
        for s in delta.causes {
            self.candidates.causes.push(s);
        }
        for s in delta.differentials {
            self.candidates.differentials.push(s);
        }
        for s in delta.avoidances {
            self.candidates.avoidances.push(s);
        }
        for (tier, s) in delta.tips {
            self.tips.push(tier, s);
        }
    }
}

/// Region arm for a body part.
pub fn region_rules(record: &SymptomRecord) -> RuleDelta {
    let symptom_type = record.symptom_type.as_str();
    let free_text = record.free_text.as_str();
    match &record.body_part {
        BodyPart::ShoulderNeck => shoulder_neck_rules(symptom_type, free_text),
        BodyPart::LowerBack => lower_back_rules(symptom_type, free_text),
        BodyPart::HipThigh => hip_thigh_rules(symptom_type, free_text),
        BodyPart::HipJoint => hip_joint_rules(symptom_type, free_text),
        BodyPart::Knee => knee_rules(symptom_type, free_text),
        BodyPart::CalfFoot => calf_foot_rules(symptom_type, free_text),
        BodyPart::Elbow => elbow_rules(symptom_type, free_text),
        BodyPart::Wrist => wrist_rules(symptom_type, free_text),
        BodyPart::Ankle => ankle_rules(symptom_type, free_text),
        BodyPart::Other(_) => other_rules(symptom_type, free_text),
    }
}

/// Classify a record into candidate statements and tiered tips.
///
/// Order of application: caution (when proceeding past a red flag), region
/// arm, cross-cutting pass, then the generic fallbacks for empty sections.
pub fn classify(record: &SymptomRecord, caution: Option<&str>) -> Classification {
    let mut result = Classification::default();

    if caution.is_some() {
        result.apply(caution_rules());
    }
    result.apply(region_rules(record));
    result.apply(cross_cutting_rules(record));
    result.candidates.apply_fallbacks();

    tracing::debug!(
        body_part = record.body_part.label(),
        causes = result.candidates.causes.len(),
        differentials = result.candidates.differentials.len(),
        avoidances = result.candidates.avoidances.len(),
        tip_candidates = result.tips.len(),
        "Symptom classified"
    );

    result
}
