//! Wire value -> generic value translation.
//!
//! Every wire kind maps to exactly one JSON kind. The only rejections are a
//! value with no kind at all and a number JSON cannot carry (NaN, infinities);
//! both fail the request instead of silently dropping data.

use crate::error::TranslateError;
use regopack_types::{Kind, PropertyMap, PropertyValue};
use serde_json::{Map, Number, Value as JsonValue};

/// Translate a resource's top-level property map into the input document.
pub fn translate_properties(props: &PropertyMap) -> Result<JsonValue, TranslateError> {
    translate_struct(props, "$")
}

pub fn translate(value: &PropertyValue) -> Result<JsonValue, TranslateError> {
    translate_at(value, "$")
}

fn translate_at(value: &PropertyValue, path: &str) -> Result<JsonValue, TranslateError> {
    let Some(kind) = &value.kind else {
        return Err(TranslateError::Unsupported {
            path: path.to_string(),
            reason: "value has no kind".to_string(),
        });
    };

    match kind {
        Kind::Null => Ok(JsonValue::Null),
        Kind::Bool(b) => Ok(JsonValue::Bool(*b)),
        Kind::String(s) => Ok(JsonValue::String(s.clone())),
        Kind::Number(n) => number(*n, path),
        Kind::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| translate_at(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Kind::Struct(fields) => translate_struct(fields, path),
    }
}

fn translate_struct(fields: &PropertyMap, path: &str) -> Result<JsonValue, TranslateError> {
    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), translate_at(value, &format!("{path}.{key}"))?);
    }
    Ok(JsonValue::Object(out))
}

// Wire numbers are doubles; integral values become JSON integers so rule
// output such as sprintf("%v") prints `3` rather than `3.0`.
fn number(n: f64, path: &str) -> Result<JsonValue, TranslateError> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Ok(JsonValue::Number(Number::from(n as i64)));
    }
    Number::from_f64(n)
        .map(JsonValue::Number)
        .ok_or_else(|| TranslateError::Unsupported {
            path: path.to_string(),
            reason: format!("number {n} is not representable"),
        })
}
