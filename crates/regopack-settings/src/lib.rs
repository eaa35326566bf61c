//! Pack manifest parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves a manifest
//! provided as a string.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{PackManifestV1, PolicyManifest};
pub use resolve::{Overrides, ResolvedSettings};

/// File name of the optional manifest inside a rules directory.
pub const MANIFEST_FILE: &str = "policy-pack.toml";

/// Parse `policy-pack.toml` into a typed model.
pub fn parse_manifest_toml(input: &str) -> anyhow::Result<PackManifestV1> {
    let manifest: PackManifestV1 = toml::from_str(input)?;
    Ok(manifest)
}

/// Resolve the effective settings used to load a pack (manifest + overrides).
///
/// `plugin_version` is reported as the pack version when the manifest has none.
pub fn resolve_settings(
    manifest: PackManifestV1,
    overrides: Overrides,
    plugin_version: &str,
) -> anyhow::Result<ResolvedSettings> {
    resolve::resolve_settings(manifest, overrides, plugin_version)
}
