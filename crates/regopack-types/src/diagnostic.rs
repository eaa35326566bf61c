use crate::EnforcementLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One reported violation or warning, attributable to a rule, a pack and the
/// resource under analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub policy_name: String,
    pub policy_pack_name: String,
    pub policy_pack_version: String,
    pub message: String,
    /// Identifier of the subject resource. Empty for stack-level results.
    #[serde(default)]
    pub urn: String,
    pub enforcement_level: EnforcementLevel,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeResponse {
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalyzeResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count_at(&self, level: EnforcementLevel) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.enforcement_level == level)
            .count()
    }
}
