//! Pure policy pack logic (no IO).
//!
//! Input: module declarations from a compiled rule set, resource properties in
//! wire form, and a rule engine behind the [`engine::RuleEngine`] capability.
//! Output: a classified policy pack, evaluation results and diagnostics.

#![forbid(unsafe_code)]

pub mod classify;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod translate;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use classify::{classify_pack, classify_rule};
pub use diagnostics::{produce_diagnostics, stack_diagnostics};
pub use engine::{Compilation, ModuleSources, RuleEngine};
pub use error::{
    AnalyzeError, CompileError, EvaluationError, PackIdentityError, QueryError, TranslateError,
};
pub use evaluate::{EvaluationResult, evaluate};
pub use model::{ModuleDecl, PackMetadata, PolicyPack, PolicyRule, PolicyText};
pub use translate::{translate, translate_properties};
