use anyhow::Context;
use regopack_types::AnalyzerInfo;

/// Render the catalog document written by `--get-plugin-info`.
pub fn serialize_analyzer_info(info: &AnalyzerInfo) -> anyhow::Result<String> {
    serde_json::to_string(info).context("serialize analyzer info")
}
