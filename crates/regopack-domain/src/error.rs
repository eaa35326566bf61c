//! Error types for pack loading and per-request evaluation.
//!
//! Load-time errors (`CompileError`, `PackIdentityError`) are fatal to the
//! process. Request-time errors (`TranslateError`, `EvaluationError`) fail a
//! single analysis call and leave the shared pack untouched.

use regopack_types::ModuleId;
use thiserror::Error;

/// The rule engine rejected the module set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A specific module failed to parse or type-check.
    #[error("policy compilation failed in {module}: {message}")]
    Module { module: ModuleId, message: String },

    /// A module's package clause could not be read.
    #[error("malformed package declaration in {module}: {detail}")]
    MalformedPackage { module: ModuleId, detail: String },

    /// Engine-level failure not attributable to one module.
    #[error("policy compilation failed: {0}")]
    Engine(String),
}

/// Two modules in the same directory declare different packages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unexpected package name differences: got {found} in {module}, expected {expected}"
)]
pub struct PackIdentityError {
    pub expected: String,
    pub found: String,
    pub module: ModuleId,
}

/// A single rule query could not execute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct QueryError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("evaluating rule {pack}.{rule}: {cause}")]
pub struct EvaluationError {
    pub pack: String,
    pub rule: String,
    pub cause: QueryError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unsupported property value at {path}: {reason}")]
    Unsupported { path: String, reason: String },
}

/// Failure of one analysis request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Evaluate(#[from] EvaluationError),
}
