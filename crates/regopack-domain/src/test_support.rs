//! Test-only builders and an in-memory rule engine.

use crate::classify::classify_pack;
use crate::engine::{Compilation, ModuleSources, RuleEngine};
use crate::error::{CompileError, QueryError};
use crate::model::{ModuleDecl, PackMetadata, PolicyPack};
use regopack_types::ModuleId;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub fn module(id: &str, package: &str, rules: &[&str]) -> ModuleDecl {
    ModuleDecl {
        id: ModuleId::new(id),
        package: package.to_string(),
        rules: rules.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn pack_from(modules: &[ModuleDecl]) -> PolicyPack {
    classify_pack(modules, &PackMetadata::default()).expect("classify test pack")
}

/// Engine that answers queries from a fixed table and records what was asked.
#[derive(Default)]
pub struct FakeEngine {
    pub modules: Vec<ModuleDecl>,
    answers: BTreeMap<String, Result<Option<JsonValue>, String>>,
    queried: Mutex<Vec<String>>,
}

impl FakeEngine {
    pub fn answer(&mut self, address: &str, answer: Result<Option<JsonValue>, String>) {
        self.answers.insert(address.to_string(), answer);
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().expect("queried lock").clone()
    }
}

impl RuleEngine for FakeEngine {
    type Handle = ();

    fn compile(&self, _sources: &ModuleSources) -> Result<Compilation<()>, CompileError> {
        Ok(Compilation {
            handle: (),
            modules: self.modules.clone(),
        })
    }

    fn query(
        &self,
        _handle: &(),
        address: &str,
        _input: &JsonValue,
    ) -> Result<Option<JsonValue>, QueryError> {
        self.queried
            .lock()
            .expect("queried lock")
            .push(address.to_string());
        match self.answers.get(address) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(msg)) => Err(QueryError(msg.clone())),
            None => Ok(None),
        }
    }
}
