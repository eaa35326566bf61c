use regopack_types::{AnalyzerInfo, EnforcementLevel, ModuleId, PolicyInfo};
use std::collections::BTreeMap;

/// Rule declarations found in one compiled module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDecl {
    pub id: ModuleId,
    /// Declared package path without the `package` keyword, e.g. `aws.s3`.
    pub package: String,
    /// Rule names in declaration order, each listed once.
    pub rules: Vec<String>,
}

/// Identity and catalog of one loaded rule collection. Built once, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyPack {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub policies: Vec<PolicyRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyRule {
    pub name: String,
    /// Source module identifier the rule was first declared in.
    pub display_name: String,
    pub description: String,
    pub message: String,
    pub level: EnforcementLevel,
}

/// Human-facing metadata for a single policy, supplied by the pack manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyText {
    pub description: String,
    pub message: String,
}

/// Pack-level metadata that does not come from the rule sources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackMetadata {
    pub display_name: String,
    pub version: String,
    /// Keyed by rule name.
    pub policies: BTreeMap<String, PolicyText>,
}

impl PolicyPack {
    pub fn policy(&self, name: &str) -> Option<&PolicyRule> {
        self.policies.iter().find(|p| p.name == name)
    }

    pub fn to_info(&self) -> AnalyzerInfo {
        AnalyzerInfo {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            policies: self
                .policies
                .iter()
                .map(|p| PolicyInfo {
                    name: p.name.clone(),
                    display_name: p.display_name.clone(),
                    description: p.description.clone(),
                    message: p.message.clone(),
                    enforcement_level: p.level,
                })
                .collect(),
        }
    }
}
