use crate::EnforcementLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Catalog document for a loaded pack.
///
/// This is both the `--get-plugin-info` dump written to stdout and the body of
/// the analyzer-info service response, so field names are fixed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerInfo {
    pub name: String,
    pub display_name: String,
    pub policies: Vec<PolicyInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub message: String,
    pub enforcement_level: EnforcementLevel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PluginInfo {
    pub version: String,
}

/// Per-policy runtime configuration sent by the orchestration engine.
///
/// Accepted for protocol compatibility; rules are not configurable today.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_level: Option<EnforcementLevel>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, JsonValue>,
}
