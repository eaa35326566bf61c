//! Repository adapters: find rule-source files under a rules directory and
//! read them into the module map the compiler consumes.
//!
//! This crate is allowed to do filesystem IO. It never interprets rule
//! sources; that is the engine's job.

#![forbid(unsafe_code)]

mod discover;
mod error;

use camino::Utf8Path;
use rayon::prelude::*;
use regopack_domain::ModuleSources;
use regopack_types::ModuleId;

pub use discover::{DEFAULT_EXTENSION, ScanOptions, discover_rule_files};
pub use error::ScanError;

/// Read every rule-source file under `root` into a module map.
///
/// Module identifiers are the file paths relative to `root` with the
/// extension removed. Reads run in parallel; the result is ordered by
/// identifier either way.
pub fn scan_rules(root: &Utf8Path, opts: &ScanOptions) -> Result<ModuleSources, ScanError> {
    let files = discover_rule_files(root, opts)?;

    let modules = files
        .par_iter()
        .map(|rel| {
            let abs = root.join(rel);
            let text = std::fs::read_to_string(&abs).map_err(|source| ScanError::Read {
                path: abs.clone(),
                source,
            })?;
            Ok((ModuleId::from_relative_path(rel), text))
        })
        .collect::<Result<Vec<_>, ScanError>>()?;

    tracing::debug!(root = %root, modules = modules.len(), "loaded rule sources");
    Ok(modules.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn scan_keys_modules_by_relative_path_without_extension() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("main.rego"), "package aws\n");
        write_file(&root.join("s3/bucket.rego"), "package aws\n\ndeny { true }\n");
        write_file(&root.join("README.md"), "# not a rule\n");
        write_file(&root.join("policy-pack.toml"), "display_name = \"x\"\n");

        let modules = scan_rules(&root, &ScanOptions::default()).expect("scan");
        let ids: Vec<&str> = modules.keys().map(|k| k.as_str()).collect();
        assert_eq!(ids, vec!["main", "s3/bucket"]);
        assert_eq!(
            modules[&ModuleId::new("s3/bucket")],
            "package aws\n\ndeny { true }\n"
        );
    }

    #[test]
    fn scan_empty_directory_yields_no_modules() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        let modules = scan_rules(&root, &ScanOptions::default()).expect("scan");
        assert!(modules.is_empty());
    }

    #[test]
    fn scan_reports_unreadable_file_path() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        std::fs::write(root.join("bad.rego"), [0xFF, 0xFE, 0x00]).expect("write");

        let err = scan_rules(&root, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::Read { .. }));
        assert!(err.to_string().contains("bad.rego"), "{err}");
    }

    proptest! {
        #[test]
        fn scan_finds_every_written_module(
            names in prop::collection::btree_set("[a-z]{1,6}(/[a-z]{1,6}){0,2}", 1..6)
        ) {
            let tmp = TempDir::new().expect("temp dir");
            let root = utf8_root(&tmp);

            // A name that is also a directory prefix of another cannot be a file.
            let names: Vec<String> = names
                .iter()
                .filter(|n| !names.iter().any(|o| o.starts_with(&format!("{n}/"))))
                .cloned()
                .collect();

            for n in &names {
                write_file(&root.join(format!("{n}.rego")), "package p\n");
            }

            let modules = scan_rules(&root, &ScanOptions::default()).expect("scan");
            let ids: Vec<String> = modules.keys().map(|k| k.as_str().to_string()).collect();
            prop_assert_eq!(ids, names);
        }
    }
}
