//! Stable DTOs shared across the regopack workspace.
//!
//! This crate is intentionally boring:
//! - the enforcement level and its wire ordinal
//! - analyzer/plugin info documents (dump mode and service responses)
//! - diagnostics returned to the orchestration engine
//! - the structured wire value resource properties arrive in
//! - service request bodies
//! - canonical module identifiers derived from rule file paths
//! - the Rego dialect a pack is written in

#![forbid(unsafe_code)]

pub mod diagnostic;
pub mod info;
pub mod level;
pub mod module;
pub mod property;
pub mod request;
pub mod syntax;

pub use diagnostic::{AnalyzeResponse, Diagnostic};
pub use info::{AnalyzerInfo, PluginInfo, PolicyConfig, PolicyInfo};
pub use level::EnforcementLevel;
pub use module::ModuleId;
pub use property::{Kind, PropertyMap, PropertyValue};
pub use request::{AnalyzeRequest, AnalyzeStackRequest, ConfigureRequest};
pub use syntax::RegoVersion;
