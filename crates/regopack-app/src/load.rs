//! The `load` use case: manifest, scan, compile, classify.

use crate::PLUGIN_VERSION;
use crate::service::PackContext;
use anyhow::Context;
use camino::Utf8Path;
use regopack_domain::{PackMetadata, PolicyPack, RuleEngine, classify_pack};
use regopack_engine::RegoEngine;
use regopack_repo::{DEFAULT_EXTENSION, ScanOptions};
use regopack_settings::{MANIFEST_FILE, Overrides, PackManifestV1, ResolvedSettings};

#[derive(Clone, Debug)]
pub struct LoadInput<'a> {
    /// Directory holding the rule sources and, optionally, `policy-pack.toml`.
    pub rules_dir: &'a Utf8Path,
    /// CLI overrides applied on top of the manifest.
    pub overrides: Overrides,
}

/// Load the pack under `rules_dir` with the regorus engine.
///
/// Any failure is fatal to the caller; there is no partially loaded pack.
pub fn load_pack(input: LoadInput<'_>) -> anyhow::Result<PackContext<RegoEngine>> {
    let settings = read_settings(input.rules_dir, input.overrides)?;

    let opts = ScanOptions {
        extension: settings
            .extension
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        exclude: settings.exclude.clone(),
    };
    let sources = regopack_repo::scan_rules(input.rules_dir, &opts)
        .with_context(|| format!("load rules from {}", input.rules_dir))?;

    let engine = RegoEngine::new(settings.rego_version);
    let compilation = engine.compile(&sources).context("compile policies")?;
    let pack = classify_pack(&compilation.modules, &settings.metadata)
        .context("classify policies")?;
    warn_unmatched_metadata(&pack, &settings.metadata);

    tracing::info!(
        pack = %pack.name,
        modules = sources.len(),
        policies = pack.policies.len(),
        "policy pack loaded"
    );

    Ok(PackContext::new(engine, compilation.handle, pack))
}

fn read_settings(rules_dir: &Utf8Path, overrides: Overrides) -> anyhow::Result<ResolvedSettings> {
    let path = rules_dir.join(MANIFEST_FILE);
    // A missing manifest is allowed (defaults apply).
    let manifest = match std::fs::read_to_string(&path) {
        Ok(text) => regopack_settings::parse_manifest_toml(&text)
            .with_context(|| format!("parse {path}"))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => PackManifestV1::default(),
        Err(err) => return Err(err).with_context(|| format!("read {path}")),
    };

    regopack_settings::resolve_settings(manifest, overrides, PLUGIN_VERSION)
        .with_context(|| format!("resolve {path}"))
}

fn warn_unmatched_metadata(pack: &PolicyPack, meta: &PackMetadata) {
    for name in meta.policies.keys() {
        if pack.policy(name).is_none() {
            tracing::warn!(policy = %name, "manifest describes a policy the pack does not define");
        }
    }
}
