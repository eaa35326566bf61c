//! Request bodies of the analyzer service.

use crate::{PolicyConfig, PropertyMap};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Analyze one resource.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Resource type token, e.g. `aws:s3/bucket:Bucket`. Informational only.
    #[serde(default, rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeStackRequest {
    #[serde(default)]
    pub resources: Vec<AnalyzeRequest>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRequest {
    #[serde(default)]
    pub policy_config: BTreeMap<String, PolicyConfig>,
}
