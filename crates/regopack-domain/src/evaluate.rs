use crate::engine::RuleEngine;
use crate::error::EvaluationError;
use crate::model::{PolicyPack, PolicyRule};
use regopack_types::EnforcementLevel;
use serde_json::Value as JsonValue;

/// One message produced by one rule for one input. Lives for a single request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationResult {
    pub pack: String,
    pub rule: String,
    pub message: String,
    pub level: EnforcementLevel,
}

/// Run every classified rule of `pack` against `input`.
///
/// Results are grouped by rule in catalog order. A rule that cannot execute
/// fails the whole call; a rule that finds nothing contributes nothing.
pub fn evaluate<E: RuleEngine>(
    engine: &E,
    handle: &E::Handle,
    pack: &PolicyPack,
    input: &JsonValue,
) -> Result<Vec<EvaluationResult>, EvaluationError> {
    let mut results = Vec::new();

    for rule in &pack.policies {
        let address = format!("{}.{}", pack.name, rule.name);
        let outcome = engine
            .query(handle, &address, input)
            .map_err(|cause| EvaluationError {
                pack: pack.name.clone(),
                rule: rule.name.clone(),
                cause,
            })?;

        let Some(value) = outcome else {
            tracing::trace!(%address, "rule undefined");
            continue;
        };

        for message in messages(&pack.name, rule, &value) {
            results.push(EvaluationResult {
                pack: pack.name.clone(),
                rule: rule.name.clone(),
                message,
                level: rule.level,
            });
        }
    }

    Ok(results)
}

/// Interpret a rule's value as zero or more violation messages.
fn messages(pack: &str, rule: &PolicyRule, value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::Null | JsonValue::Bool(false) => Vec::new(),
        JsonValue::Bool(true) => vec![format!("{pack}.{} reported a violation", rule.name)],
        JsonValue::String(msg) => vec![msg.clone()],
        JsonValue::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                JsonValue::String(msg) => Some(msg.clone()),
                JsonValue::Object(fields) => match fields.get("msg") {
                    Some(JsonValue::String(msg)) => Some(msg.clone()),
                    _ => {
                        tracing::warn!(rule = %rule.name, "skipping object result without a string `msg`");
                        None
                    }
                },
                other => {
                    tracing::warn!(rule = %rule.name, value = %other, "skipping non-message result");
                    None
                }
            })
            .collect(),
        other => {
            tracing::warn!(rule = %rule.name, value = %other, "ignoring rule value that is not a message set");
            Vec::new()
        }
    }
}
