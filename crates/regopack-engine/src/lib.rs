//! Rego rule engine adapter.
//!
//! Implements [`regopack_domain::RuleEngine`] on top of `regorus`. A compiled
//! pack is kept as a prepared template engine; every query evaluates on its
//! own clone so concurrent requests never share mutable evaluator state.
//! Rule declarations come from the modules the engine parsed.

#![forbid(unsafe_code)]

mod decls;

use regopack_domain::{
    Compilation, CompileError, ModuleDecl, ModuleSources, QueryError, RuleEngine,
};
use regopack_types::RegoVersion;
use serde_json::Value as JsonValue;
use std::sync::Mutex;

use decls::declarations;

/// `regorus`-backed rule engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegoEngine {
    version: RegoVersion,
}

impl RegoEngine {
    pub fn new(version: RegoVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> RegoVersion {
        self.version
    }
}

/// Compiled rule set. The lock is held only long enough to clone.
pub struct RegoHandle {
    template: Mutex<regorus::Engine>,
}

impl std::fmt::Debug for RegoHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegoHandle").finish_non_exhaustive()
    }
}

impl RegoHandle {
    fn evaluator(&self) -> Result<regorus::Engine, QueryError> {
        let template = self
            .template
            .lock()
            .map_err(|_| QueryError("rule engine state is poisoned".to_string()))?;
        Ok(template.clone())
    }
}

impl RuleEngine for RegoEngine {
    type Handle = RegoHandle;

    fn compile(&self, sources: &ModuleSources) -> Result<Compilation<RegoHandle>, CompileError> {
        let mut engine = regorus::Engine::new();
        engine.set_rego_v0(self.version == RegoVersion::V0);

        let mut packages = Vec::with_capacity(sources.len());
        for (id, text) in sources {
            let package = engine
                .add_policy(format!("{id}.rego"), text.clone())
                .map_err(|e| CompileError::Module {
                    module: id.clone(),
                    message: e.to_string(),
                })?;
            packages.push((id, package));
        }

        let modules = engine
            .get_modules()
            .iter()
            .zip(&packages)
            .map(|(module, (id, package))| declarations(id, package, module))
            .collect::<Result<Vec<_>, _>>()?;

        // Preparing runs the analyzer (unsafe or undefined references) and
        // leaves the template ready so clones skip it.
        engine
            .eval_query("true".to_string(), false)
            .map_err(|e| CompileError::Engine(e.to_string()))?;
        check_calls(&engine, &modules)?;

        tracing::debug!(
            modules = modules.len(),
            version = %self.version,
            "compiled rule modules"
        );

        Ok(Compilation {
            handle: RegoHandle {
                template: Mutex::new(engine),
            },
            modules,
        })
    }

    fn query(
        &self,
        handle: &RegoHandle,
        address: &str,
        input: &JsonValue,
    ) -> Result<Option<JsonValue>, QueryError> {
        let mut engine = handle.evaluator()?;

        let input = regorus::Value::from_json_str(&input.to_string())
            .map_err(|e| QueryError(format!("binding input: {e}")))?;
        engine.set_input(input);

        let value = engine
            .eval_rule(format!("data.{address}"))
            .map_err(|e| QueryError(e.to_string()))?;
        if matches!(value, regorus::Value::Undefined) {
            return Ok(None);
        }

        let json = value
            .to_json_str()
            .map_err(|e| QueryError(format!("encoding result: {e}")))?;
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| QueryError(format!("decoding result: {e}")))
    }
}

const UNKNOWN_FUNCTION: &str = "could not find function";

/// Evaluate every rule once against an empty input.
///
/// Function calls are only resolved when reached, so a call to a function the
/// pack never defines would otherwise fail every request. Other failures on
/// an empty input are expected (missing fields, conflicts that depend on the
/// resource) and are left to request time.
fn check_calls(template: &regorus::Engine, modules: &[ModuleDecl]) -> Result<(), CompileError> {
    let mut scratch = template.clone();
    scratch.set_input(regorus::Value::new_object());

    for module in modules {
        for rule in &module.rules {
            let Err(e) = scratch.eval_rule(format!("data.{}.{rule}", module.package)) else {
                continue;
            };
            let message = e.to_string();
            if message.contains(UNKNOWN_FUNCTION) {
                return Err(CompileError::Module {
                    module: module.id.clone(),
                    message,
                });
            }
            tracing::trace!(module = %module.id, rule = %rule, error = %message, "rule does not evaluate on empty input");
        }
    }
    Ok(())
}
