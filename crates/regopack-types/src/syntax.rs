use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rego language dialect rule sources are written in.
///
/// v0 is the classic syntax (`deny[msg] { ... }`) most published packs use.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RegoVersion {
    #[default]
    V0,
    V1,
}

impl RegoVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            RegoVersion::V0 => "v0",
            RegoVersion::V1 => "v1",
        }
    }
}

impl fmt::Display for RegoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
