//! The rule engine capability.
//!
//! The core never touches a concrete engine. It needs exactly two operations:
//! compile every module of a pack together, and run one query against the
//! compiled result with an input document bound.

use crate::error::{CompileError, QueryError};
use crate::model::ModuleDecl;
use regopack_types::ModuleId;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Module identifier -> raw source text. Ordered, so every consumer sees the
/// same module order.
pub type ModuleSources = BTreeMap<ModuleId, String>;

/// Output of a joint compilation.
#[derive(Debug)]
pub struct Compilation<H> {
    pub handle: H,
    pub modules: Vec<ModuleDecl>,
}

pub trait RuleEngine: Send + Sync {
    /// Opaque compiled rule set. Shared read-only across concurrent requests.
    type Handle: Send + Sync;

    /// Compile all modules in one pass so cross-module references resolve.
    fn compile(&self, sources: &ModuleSources) -> Result<Compilation<Self::Handle>, CompileError>;

    /// Evaluate `address` (`<package>.<rule>`) with `input` bound.
    ///
    /// `Ok(None)` means the rule is undefined for this input.
    fn query(
        &self,
        handle: &Self::Handle,
        address: &str,
        input: &JsonValue,
    ) -> Result<Option<JsonValue>, QueryError>;
}
