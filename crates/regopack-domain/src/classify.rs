//! Naming-convention classification and pack assembly.
//!
//! Only rules whose names follow the deny/violation/warn conventions are
//! policies. Everything else in a module is a library routine other rules may
//! call, and never shows up in the catalog.

use crate::error::PackIdentityError;
use crate::model::{ModuleDecl, PackMetadata, PolicyPack, PolicyRule};
use regex::Regex;
use regopack_types::EnforcementLevel;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static MANDATORY_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(deny|violation)(_[a-zA-Z]+)*$").expect("valid mandatory rule pattern")
});

static ADVISORY_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^warn(_[a-zA-Z]+)*$").expect("valid advisory rule pattern"));

pub fn is_mandatory_rule(name: &str) -> bool {
    MANDATORY_RULE.is_match(name)
}

pub fn is_advisory_rule(name: &str) -> bool {
    ADVISORY_RULE.is_match(name)
}

/// Enforcement level for a rule name, or `None` for library rules.
pub fn classify_rule(name: &str) -> Option<EnforcementLevel> {
    if is_mandatory_rule(name) {
        Some(EnforcementLevel::Mandatory)
    } else if is_advisory_rule(name) {
        Some(EnforcementLevel::Advisory)
    } else {
        None
    }
}

/// Build the policy pack from compiled module declarations.
///
/// Modules are visited in module-identifier order regardless of input order,
/// so the catalog is stable across runs. The first module fixes the pack name;
/// any module with a different package fails the whole pack. Rule names are
/// unique pack-wide and the first declaration wins.
pub fn classify_pack(
    modules: &[ModuleDecl],
    meta: &PackMetadata,
) -> Result<PolicyPack, PackIdentityError> {
    let mut ordered: Vec<&ModuleDecl> = modules.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut pack_name: Option<&str> = None;
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut policies = Vec::new();

    for module in ordered {
        match pack_name {
            None => pack_name = Some(module.package.as_str()),
            Some(expected) if expected != module.package => {
                return Err(PackIdentityError {
                    expected: expected.to_string(),
                    found: module.package.clone(),
                    module: module.id.clone(),
                });
            }
            Some(_) => {}
        }

        for rule in &module.rules {
            let Some(level) = classify_rule(rule) else {
                continue;
            };
            if !seen.insert(rule.as_str()) {
                tracing::debug!(rule = %rule, module = %module.id, "ignoring duplicate rule");
                continue;
            }

            let text = meta.policies.get(rule).cloned().unwrap_or_default();
            policies.push(PolicyRule {
                name: rule.clone(),
                display_name: module.id.as_str().to_string(),
                description: text.description,
                message: text.message,
                level,
            });
        }
    }

    Ok(PolicyPack {
        name: pack_name.unwrap_or_default().to_string(),
        display_name: meta.display_name.clone(),
        version: meta.version.clone(),
        policies,
    })
}
