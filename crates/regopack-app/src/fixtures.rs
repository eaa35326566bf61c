//! The `test-fixtures` use case: check a pack against sample resources.
//!
//! A fixture is a JSON object of resource properties. Fixtures whose file
//! name contains `invalid` must trip at least one rule; all others must be
//! clean.

use crate::service::PackContext;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use regopack_domain::RuleEngine;
use regopack_types::{AnalyzeRequest, Diagnostic, PropertyMap};
use std::fmt::Write as _;

const FIXTURE_EXTENSION: &str = "json";
const VIOLATION_MARKER: &str = "invalid";

#[derive(Clone, Debug, PartialEq)]
pub struct FixtureOutcome {
    /// File name, relative to the fixtures directory.
    pub name: String,
    pub expect_violations: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the fixture could not be analyzed at all.
    pub error: Option<String>,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.expect_violations != self.diagnostics.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixtureReport {
    /// Sorted by file name.
    pub outcomes: Vec<FixtureOutcome>,
}

impl FixtureReport {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Human-readable summary, one line per fixture plus a totals line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for o in &self.outcomes {
            let status = if o.passed() { "ok" } else { "FAILED" };
            let detail = match (&o.error, o.expect_violations) {
                (Some(err), _) => format!("error: {err}"),
                (None, true) if o.diagnostics.is_empty() => {
                    "expected violations, got none".to_string()
                }
                (None, false) if !o.diagnostics.is_empty() => {
                    let rules: Vec<&str> =
                        o.diagnostics.iter().map(|d| d.policy_name.as_str()).collect();
                    format!("expected no violations, got: {}", rules.join(", "))
                }
                (None, _) => format!("{} diagnostic(s)", o.diagnostics.len()),
            };
            let _ = writeln!(out, "fixture {} ... {status} ({detail})", o.name);
        }
        let _ = writeln!(
            out,
            "\nfixtures: {} passed; {} failed",
            self.outcomes.len() - self.failed(),
            self.failed()
        );
        out
    }
}

/// Analyze every `*.json` fixture directly inside `dir`.
///
/// Unreadable or malformed fixture files abort the run; analysis failures are
/// recorded against the fixture.
pub fn verify_fixtures<E: RuleEngine>(
    ctx: &PackContext<E>,
    dir: &Utf8Path,
) -> anyhow::Result<FixtureReport> {
    let mut files = fixture_files(dir)?;
    files.sort();

    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let name = path.file_name().unwrap_or(path.as_str()).to_string();
        let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        let properties: PropertyMap = serde_json::from_str(&text)
            .with_context(|| format!("parse fixture {path} as a JSON object"))?;

        let req = AnalyzeRequest {
            resource_type: String::new(),
            properties,
            urn: format!("fixture:{name}"),
            name: Some(name.clone()),
        };
        let (diagnostics, error) = match ctx.analyze(&req) {
            Ok(resp) => (resp.diagnostics, None),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };

        let outcome = FixtureOutcome {
            expect_violations: name.contains(VIOLATION_MARKER),
            name,
            diagnostics,
            error,
        };
        if !outcome.passed() {
            tracing::warn!(fixture = %outcome.name, "fixture expectation not met");
        }
        outcomes.push(outcome);
    }

    Ok(FixtureReport { outcomes })
}

fn fixture_files(dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let entries = dir
        .read_dir_utf8()
        .with_context(|| format!("read fixtures directory {dir}"))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read fixtures directory {dir}"))?;
        let path = entry.path();
        if path.is_file() && path.extension() == Some(FIXTURE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
