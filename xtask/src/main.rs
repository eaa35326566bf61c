//! Developer tasks (schema generation, conformance checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_analyzer_info_schema() -> schemars::Schema {
    schema_for!(regopack_types::AnalyzerInfo)
}

fn generate_diagnostics_schema() -> schemars::Schema {
    schema_for!(regopack_types::AnalyzeResponse)
}

fn generate_manifest_schema() -> schemars::Schema {
    schema_for!(regopack_settings::PackManifestV1)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "regopack.analyzer-info.v1.json",
            generate: generate_analyzer_info_schema,
        },
        SchemaSpec {
            filename: "regopack.diagnostics.v1.json",
            generate: generate_diagnostics_schema,
        },
        SchemaSpec {
            filename: "regopack.manifest.v1.json",
            generate: generate_manifest_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run the built regopack binary on tests/fixtures and validate");
    eprintln!("                    its output against the analyzer-info schema");
}

/// A module identifier is clean when it is relative, uses forward slashes and
/// carries no extension or parent references.
fn is_clean_module_id(id: &str) -> bool {
    !(id.is_empty()
        || id.starts_with('/')
        || id.contains('\\')
        || id.split('/').any(|seg| seg == ".." || seg == ".")
        || id.ends_with(".rego"))
}

/// Fixture packs that are expected to be rejected at load time.
const REJECTED_PACKS: &[&str] = &["mixed_packages", "syntax_error"];

/// Resolve the rules directory of a fixture pack: `<pack>/rules` when present.
fn pack_rules_dir(pack: &Path) -> PathBuf {
    let nested = pack.join("rules");
    if nested.is_dir() {
        nested
    } else {
        pack.to_path_buf()
    }
}

fn regopack_binary() -> anyhow::Result<PathBuf> {
    let bin = project_root().join("target").join("debug").join("regopack");

    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "regopack binary not found at {}.\n\
            Run `cargo build -p regopack-cli` first.",
            bin.display()
        );
    }
    Ok(bin)
}

/// Conformance of the binary's observable output.
///
/// For every fixture pack under tests/fixtures:
/// 1. `--get-plugin-info` output validates against the analyzer-info schema
/// 2. policy display names are clean module identifiers
/// 3. two runs produce byte-identical output
/// 4. packs with a `fixtures/` directory pass `--test-fixtures`
/// 5. packs known to be invalid exit 1 with nothing on stdout
fn conform() -> anyhow::Result<()> {
    let bin = regopack_binary()?;

    let schema = serde_json::to_value(generate_analyzer_info_schema())
        .context("Failed to convert analyzer-info schema")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))?;
    println!("✓ analyzer-info schema compiles");

    let fixtures_dir = project_root().join("tests").join("fixtures");
    let mut packs: Vec<PathBuf> = fs::read_dir(&fixtures_dir)
        .context("Failed to read tests/fixtures/")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    packs.sort();

    let mut errors = Vec::new();
    let mut checked = 0;

    for pack in &packs {
        let name = pack
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let rules = pack_rules_dir(pack);

        let run = || {
            Command::new(&bin)
                .arg("--rules")
                .arg(&rules)
                .arg("--get-plugin-info")
                .output()
                .with_context(|| format!("Failed to run regopack on fixture '{name}'"))
        };
        let output = run()?;

        if REJECTED_PACKS.contains(&name.as_str()) {
            if output.status.code() != Some(1) || !output.stdout.is_empty() {
                errors.push(format!(
                    "fixture '{name}': expected load failure with exit 1 and no stdout, got {:?}",
                    output.status.code()
                ));
            } else {
                println!("  ✓ fixture '{name}' is rejected");
            }
            checked += 1;
            continue;
        }

        if !output.status.success() {
            errors.push(format!(
                "fixture '{name}': regopack exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let value: serde_json::Value = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse dump for fixture '{name}'"))?;

        for err in validator.iter_errors(&value) {
            errors.push(format!("fixture '{name}': schema validation: {err}"));
        }

        if let Some(policies) = value.get("policies").and_then(|v| v.as_array()) {
            for (i, policy) in policies.iter().enumerate() {
                if let Some(id) = policy.get("displayName").and_then(|v| v.as_str())
                    && !is_clean_module_id(id)
                {
                    errors.push(format!(
                        "fixture '{name}': policies[{i}].displayName '{id}' is not a clean module id"
                    ));
                }
            }
        }

        let again = run()?;
        if again.stdout != output.stdout {
            errors.push(format!("fixture '{name}': dump output differs between runs"));
        }

        let fixture_inputs = pack.join("fixtures");
        if fixture_inputs.is_dir() {
            let verified = Command::new(&bin)
                .arg("--rules")
                .arg(&rules)
                .arg("--test-fixtures")
                .arg(&fixture_inputs)
                .output()
                .with_context(|| format!("Failed to verify fixtures of '{name}'"))?;
            if !verified.status.success() {
                errors.push(format!(
                    "fixture '{name}': fixture verification failed:\n{}",
                    String::from_utf8_lossy(&verified.stdout)
                ));
            }
        }

        checked += 1;
        println!("  ✓ fixture '{name}' produces valid analyzer info");
    }

    if checked == 0 {
        bail!("No fixture packs found in {}", fixtures_dir.display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {checked} fixture packs pass conformance checks!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_id_hygiene() {
        assert!(is_clean_module_id("s3"));
        assert!(is_clean_module_id("lib/util"));
        assert!(!is_clean_module_id(""));
        assert!(!is_clean_module_id("/abs"));
        assert!(!is_clean_module_id("a\\b"));
        assert!(!is_clean_module_id("../up"));
        assert!(!is_clean_module_id("main.rego"));
    }

    #[test]
    fn schemas_serialize_with_trailing_newline() {
        for spec in schema_specs() {
            let json = serialize_schema(&(spec.generate)()).expect("serialize");
            assert!(json.ends_with('\n'), "{}", spec.filename);
            let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
            assert!(value.is_object(), "{}", spec.filename);
        }
    }

    #[test]
    fn analyzer_info_schema_accepts_a_dump() {
        let schema = serde_json::to_value(generate_analyzer_info_schema()).expect("schema");
        let validator = jsonschema::validator_for(&schema).expect("compile");
        let dump = serde_json::json!({
            "name": "aws",
            "displayName": "",
            "policies": [{
                "name": "deny",
                "displayName": "s3",
                "description": "",
                "message": "",
                "enforcementLevel": 1
            }]
        });
        assert!(validator.is_valid(&dump));

        let bad = serde_json::json!({"name": "aws", "displayName": "", "policies": [{"name": "deny"}]});
        assert!(!validator.is_valid(&bad));
    }
}
