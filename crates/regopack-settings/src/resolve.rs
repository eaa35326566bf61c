use crate::model::PackManifestV1;
use anyhow::Context;
use globset::Glob;
use regex::Regex;
use regopack_domain::{PackMetadata, PolicyText};
use regopack_types::RegoVersion;
use std::sync::LazyLock;

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$",
    )
    .expect("semver regex")
});

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSettings {
    pub metadata: PackMetadata,
    pub rego_version: RegoVersion,
    /// `None` keeps the scanner default.
    pub extension: Option<String>,
    pub exclude: Vec<String>,
}

pub fn resolve_settings(
    manifest: PackManifestV1,
    overrides: Overrides,
    plugin_version: &str,
) -> anyhow::Result<ResolvedSettings> {
    let version = manifest
        .version
        .clone()
        .unwrap_or_else(|| plugin_version.to_string());
    validate_version(&version)?;

    if let Some(ext) = manifest.extension.as_deref() {
        validate_extension(ext)?;
    }
    for pattern in &manifest.exclude {
        Glob::new(pattern).with_context(|| format!("invalid exclude glob: {pattern}"))?;
    }

    let display_name = overrides
        .display_name
        .or(manifest.display_name)
        .unwrap_or_default();

    let policies = manifest
        .policies
        .into_iter()
        .map(|(name, p)| {
            let text = PolicyText {
                description: p.description.unwrap_or_default(),
                message: p.message.unwrap_or_default(),
            };
            (name, text)
        })
        .collect();

    Ok(ResolvedSettings {
        metadata: PackMetadata {
            display_name,
            version,
            policies,
        },
        rego_version: manifest.rego_version.unwrap_or_default(),
        extension: manifest.extension,
        exclude: manifest.exclude,
    })
}

fn validate_version(v: &str) -> anyhow::Result<()> {
    if SEMVER.is_match(v) {
        Ok(())
    } else {
        anyhow::bail!("invalid pack version: {v} (expected MAJOR.MINOR.PATCH)")
    }
}

fn validate_extension(ext: &str) -> anyhow::Result<()> {
    if ext.is_empty() {
        anyhow::bail!("extension must not be empty");
    }
    if ext.starts_with('.') {
        anyhow::bail!("extension must not start with a dot: {ext}");
    }
    if ext.contains(['/', '\\']) {
        anyhow::bail!("extension must not contain path separators: {ext}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_manifest_toml;

    fn resolve(toml: &str) -> anyhow::Result<ResolvedSettings> {
        let manifest = parse_manifest_toml(toml)?;
        resolve_settings(manifest, Overrides::default(), "0.0.1")
    }

    #[test]
    fn empty_manifest_uses_defaults() {
        let s = resolve("").expect("resolve");
        assert_eq!(s.metadata.display_name, "");
        assert_eq!(s.metadata.version, "0.0.1");
        assert!(s.metadata.policies.is_empty());
        assert_eq!(s.rego_version, RegoVersion::V0);
        assert_eq!(s.extension, None);
        assert!(s.exclude.is_empty());
    }

    #[test]
    fn full_manifest_resolves() {
        let s = resolve(
            r#"
display_name = "AWS guardrails"
version = "1.2.0"
rego_version = "v1"
extension = "policy"
exclude = ["**/*_test.policy"]

[policies.deny_public_acl]
description = "S3 buckets must not be public"
message = "Set acl to private"

[policies.warn_untagged]
description = "Resources should be tagged"
"#,
        )
        .expect("resolve");

        assert_eq!(s.metadata.display_name, "AWS guardrails");
        assert_eq!(s.metadata.version, "1.2.0");
        assert_eq!(s.rego_version, RegoVersion::V1);
        assert_eq!(s.extension.as_deref(), Some("policy"));
        assert_eq!(s.exclude, vec!["**/*_test.policy".to_string()]);

        let acl = &s.metadata.policies["deny_public_acl"];
        assert_eq!(acl.description, "S3 buckets must not be public");
        assert_eq!(acl.message, "Set acl to private");
        assert_eq!(s.metadata.policies["warn_untagged"].message, "");
    }

    #[test]
    fn override_display_name_wins() {
        let manifest = parse_manifest_toml("display_name = \"from file\"").expect("parse");
        let s = resolve_settings(
            manifest,
            Overrides {
                display_name: Some("from flag".to_string()),
            },
            "0.0.1",
        )
        .expect("resolve");
        assert_eq!(s.metadata.display_name, "from flag");
    }

    #[test]
    fn prerelease_versions_are_accepted() {
        let s = resolve("version = \"2.0.0-rc.1+build.5\"").expect("resolve");
        assert_eq!(s.metadata.version, "2.0.0-rc.1+build.5");
    }

    #[test]
    fn invalid_version_is_rejected() {
        for bad in ["1.2", "v1.2.3", "01.2.3", "latest"] {
            let err = resolve(&format!("version = \"{bad}\"")).unwrap_err();
            assert!(err.to_string().contains("invalid pack version"), "{bad}: {err}");
        }
    }

    #[test]
    fn invalid_plugin_version_is_rejected_too() {
        let err = resolve_settings(PackManifestV1::default(), Overrides::default(), "dev")
            .unwrap_err();
        assert!(err.to_string().contains("dev"));
    }

    #[test]
    fn unknown_rego_version_fails_to_parse() {
        assert!(parse_manifest_toml("rego_version = \"v2\"").is_err());
    }

    #[test]
    fn invalid_extension_is_rejected() {
        assert!(resolve("extension = \"\"").is_err());
        assert!(resolve("extension = \".rego\"").is_err());
        assert!(resolve("extension = \"a/b\"").is_err());
    }

    #[test]
    fn invalid_exclude_glob_is_rejected() {
        let err = resolve("exclude = [\"a[\"]").unwrap_err();
        assert!(format!("{err:#}").contains("invalid exclude glob: a["));
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let s = resolve("future_option = true\nversion = \"0.3.0\"").expect("resolve");
        assert_eq!(s.metadata.version, "0.3.0");
    }
}
