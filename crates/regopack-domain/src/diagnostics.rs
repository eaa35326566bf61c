use crate::evaluate::EvaluationResult;
use regopack_types::Diagnostic;

/// Map one request's evaluation results onto the externally visible shape.
pub fn produce_diagnostics(
    results: Vec<EvaluationResult>,
    pack_version: &str,
    urn: &str,
) -> Vec<Diagnostic> {
    results
        .into_iter()
        .map(|r| Diagnostic {
            policy_name: r.rule,
            policy_pack_name: r.pack,
            policy_pack_version: pack_version.to_string(),
            message: r.message,
            urn: urn.to_string(),
            enforcement_level: r.level,
        })
        .collect()
}

/// Stack-level analysis. Every resource was already analyzed individually, so
/// rules are not re-run and nothing is aggregated.
pub fn stack_diagnostics() -> Vec<Diagnostic> {
    Vec::new()
}
