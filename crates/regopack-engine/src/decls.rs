//! Rule declarations read from the engine's parsed modules.
//!
//! Only rules addressable by path are listed. Function rules take arguments
//! and can never be queried on their own, so they are left out.

use regopack_domain::{CompileError, ModuleDecl};
use regopack_types::ModuleId;
use regorus::unstable::{Expr, Module, Ref, Rule, RuleHead};

/// Extract the declarations of one parsed module.
///
/// `package` is the data path the engine reported when the module was added
/// (`data.<package>`).
pub fn declarations(
    id: &ModuleId,
    package: &str,
    module: &Module,
) -> Result<ModuleDecl, CompileError> {
    let package = package
        .strip_prefix("data.")
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CompileError::MalformedPackage {
            module: id.clone(),
            detail: format!("unexpected package path {package:?}"),
        })?;

    let mut rules: Vec<String> = Vec::new();
    for rule in &module.policy {
        let Some(refr) = queryable_head(rule) else {
            continue;
        };
        let name = rule_path(refr).ok_or_else(|| CompileError::Module {
            module: id.clone(),
            message: format!("unsupported rule head `{}`", rule.span().text()),
        })?;
        if !rules.contains(&name) {
            rules.push(name);
        }
    }

    Ok(ModuleDecl {
        id: id.clone(),
        package: package.to_string(),
        rules,
    })
}

fn queryable_head(rule: &Rule) -> Option<&Ref<Expr>> {
    match rule {
        Rule::Spec {
            head: RuleHead::Compr { refr, .. } | RuleHead::Set { refr, .. },
            ..
        } => Some(refr),
        Rule::Default { refr, args, .. } if args.is_empty() => Some(refr),
        Rule::Spec {
            head: RuleHead::Func { .. },
            ..
        }
        | Rule::Default { .. } => None,
    }
}

/// Dotted path of a rule head. Variable keys (`deny[msg]`, `p[x] = y`) are
/// not part of the path; string keys are.
fn rule_path(refr: &Expr) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    let mut expr = refr;
    loop {
        match expr {
            Expr::Var((span, _)) => {
                parts.push(span.text());
                break;
            }
            Expr::RefDot { refr, field, .. } => {
                parts.push(field.0.text());
                expr = &**refr;
            }
            Expr::RefBrack { refr, index, .. } => {
                if let Expr::String((span, _)) = &**index {
                    parts.push(span.text());
                }
                expr = &**refr;
            }
            _ => return None,
        }
    }
    parts.reverse();
    Some(parts.join("."))
}
