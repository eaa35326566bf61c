use camino::Utf8Path;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one rule-source module: its path relative to the scan root,
/// with the file extension removed.
///
/// Normalization rules are simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - only the final extension is stripped (`a/b.v1.rego` -> `a/b.v1`)
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        Self(v)
    }

    /// Derive the identifier from a file path relative to the scan root.
    pub fn from_relative_path(rel: &Utf8Path) -> Self {
        let normalized = rel.as_str().replace('\\', "/");
        let stripped = match Utf8Path::new(&normalized).extension() {
            Some(ext) => normalized[..normalized.len() - ext.len() - 1].to_string(),
            None => normalized,
        };
        ModuleId::new(stripped)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        ModuleId::new(value)
    }
}
