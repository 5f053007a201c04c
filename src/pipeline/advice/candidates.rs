use serde::Serialize;

/// Injected when classification produced no cause.
pub const GENERIC_CAUSE: &str = "姿勢や活動量の偏りによる筋・筋膜への負担";
/// Injected when classification produced no differential.
pub const GENERIC_DIFFERENTIAL: &str = "筋・筋膜性の痛みの傾向（断定はできません）";
/// Injected when classification produced no avoidance.
pub const GENERIC_AVOIDANCE: &str = "痛みが増える動作の反復";

/// Insertion-ordered list that drops exact duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    /// Append unless an identical statement is already present.
    /// Returns whether the statement was added.
    pub fn push(&mut self, statement: impl Into<String>) -> bool {
        let statement = statement.into();
        if self.0.iter().any(|s| *s == statement) {
            return false;
        }
        self.0.push(statement);
        true
    }

    pub fn contains(&self, statement: &str) -> bool {
        self.0.iter().any(|s| s == statement)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    fn fill_if_empty(&mut self, fallback: &str) {
        if self.0.is_empty() {
            self.0.push(fallback.to_string());
        }
    }
}

/// Working state of the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateSet {
    pub causes: CandidateList,
    pub differentials: CandidateList,
    pub avoidances: CandidateList,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarantee at least one entry per section.
    pub fn apply_fallbacks(&mut self) {
        self.causes.fill_if_empty(GENERIC_CAUSE);
        self.differentials.fill_if_empty(GENERIC_DIFFERENTIAL);
        self.avoidances.fill_if_empty(GENERIC_AVOIDANCE);
    }
}
