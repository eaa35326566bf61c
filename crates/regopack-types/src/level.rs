use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Severity attached to a classified policy.
///
/// The ordinal is part of the protocol: `0` is advisory, `1` is mandatory.
/// Every JSON surface encodes the level as that integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EnforcementLevel {
    /// Reported for visibility, never blocks.
    Advisory,
    /// Blocks the operation under analysis.
    Mandatory,
}

impl EnforcementLevel {
    pub fn ordinal(self) -> u8 {
        match self {
            EnforcementLevel::Advisory => 0,
            EnforcementLevel::Mandatory => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnforcementLevel::Advisory => "advisory",
            EnforcementLevel::Mandatory => "mandatory",
        }
    }
}

impl From<EnforcementLevel> for u8 {
    fn from(level: EnforcementLevel) -> Self {
        level.ordinal()
    }
}

impl TryFrom<u8> for EnforcementLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EnforcementLevel::Advisory),
            1 => Ok(EnforcementLevel::Mandatory),
            other => Err(format!(
                "unknown enforcement level: {other} (expected 0=advisory or 1=mandatory)"
            )),
        }
    }
}

impl JsonSchema for EnforcementLevel {
    fn schema_name() -> Cow<'static, str> {
        "EnforcementLevel".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "0 = advisory, 1 = mandatory",
            "type": "integer",
            "enum": [0, 1]
        })
    }
}

impl fmt::Display for EnforcementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_serialize_as_ordinals() {
        assert_eq!(
            serde_json::to_string(&EnforcementLevel::Advisory).expect("serialize"),
            "0"
        );
        assert_eq!(
            serde_json::to_string(&EnforcementLevel::Mandatory).expect("serialize"),
            "1"
        );
    }

    #[test]
    fn unknown_ordinal_is_rejected() {
        let err = serde_json::from_str::<EnforcementLevel>("2").unwrap_err();
        assert!(err.to_string().contains("unknown enforcement level"));
    }

    #[test]
    fn ordinals_parse_back() {
        let level: EnforcementLevel = serde_json::from_str("1").expect("parse");
        assert_eq!(level, EnforcementLevel::Mandatory);
    }
}
