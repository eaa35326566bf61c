use regopack_types::RegoVersion;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `policy-pack.toml` schema v1.
///
/// Every field is optional; a rules directory without a manifest behaves as if
/// it had an empty one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PackManifestV1 {
    /// Optional schema string for tooling (`regopack.manifest.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Human label reported as the analyzer display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Pack version (`MAJOR.MINOR.PATCH`) attached to every diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Rego dialect of the rule sources: `v0` (default) or `v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rego_version: Option<RegoVersion>,

    /// Rule-source file extension without the leading dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Globs over rules-relative paths that are never loaded.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Map of rule name -> human-facing text.
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyManifest>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remediation hint shown next to violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
