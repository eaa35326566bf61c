//! Structured wire representation of resource properties.
//!
//! The shape follows the protobuf `google.protobuf.Value` message the
//! orchestration engine speaks: a value carries exactly one kind, or, when a
//! sender leaves the oneof unset, no kind at all.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

pub type PropertyMap = BTreeMap<String, PropertyValue>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub struct PropertyValue {
    pub kind: Option<Kind>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    Null,
    Number(f64),
    String(String),
    Bool(bool),
    Struct(PropertyMap),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn null() -> Self {
        Kind::Null.into()
    }

    pub fn number(n: f64) -> Self {
        Kind::Number(n).into()
    }

    pub fn string(s: impl Into<String>) -> Self {
        Kind::String(s.into()).into()
    }

    pub fn bool(b: bool) -> Self {
        Kind::Bool(b).into()
    }

    pub fn structure(fields: PropertyMap) -> Self {
        Kind::Struct(fields).into()
    }

    pub fn list(values: Vec<PropertyValue>) -> Self {
        Kind::List(values).into()
    }

    /// A value whose kind was never set by the sender.
    pub fn unset() -> Self {
        Self { kind: None }
    }
}

impl From<Kind> for PropertyValue {
    fn from(kind: Kind) -> Self {
        Self { kind: Some(kind) }
    }
}

/// Decode the canonical JSON form of a wire value. Every JSON value has a kind,
/// so this direction never produces an unset value.
impl From<JsonValue> for PropertyValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => PropertyValue::null(),
            JsonValue::Bool(b) => PropertyValue::bool(b),
            JsonValue::Number(n) => PropertyValue::number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => PropertyValue::string(s),
            JsonValue::Array(items) => {
                PropertyValue::list(items.into_iter().map(PropertyValue::from).collect())
            }
            JsonValue::Object(fields) => PropertyValue::structure(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, PropertyValue::from(v)))
                    .collect(),
            ),
        }
    }
}
