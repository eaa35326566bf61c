use crate::ScanError;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// File extension of rule sources when the pack does not override it.
pub const DEFAULT_EXTENSION: &str = "rego";

/// Which files under the rules directory count as rule sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Extension without the leading dot. Matched case-sensitively.
    pub extension: String,
    /// Globs over root-relative paths (forward slashes) to skip.
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            exclude: Vec::new(),
        }
    }
}

/// List rule-source files under `root`, relative to it, in stable order.
///
/// Any traversal failure aborts the scan; a pack with a silently missing
/// module would classify differently than its author intended.
pub fn discover_rule_files(
    root: &Utf8Path,
    opts: &ScanOptions,
) -> Result<Vec<Utf8PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let exclude = build_globset(&opts.exclude)?;
    let mut out = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        // Links to files count as sources; links to directories are not walked.
        let file_type = entry.file_type();
        let is_source = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        if !is_source {
            if file_type.is_symlink() {
                tracing::debug!(path = %entry.path().display(), "skipping link that is not a file");
            }
            continue;
        }

        let abs = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|path| ScanError::NonUtf8Path { path })?;
        if abs.extension() != Some(opts.extension.as_str()) {
            continue;
        }

        let rel = abs.strip_prefix(root).unwrap_or(&abs);
        let rel = Utf8PathBuf::from(rel.as_str().replace('\\', "/"));
        if exclude.is_match(rel.as_str()) {
            tracing::debug!(path = %rel, "excluded rule source");
            continue;
        }
        out.push(rel);
    }

    // Stable order.
    out.sort();
    Ok(out)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        let glob = Glob::new(p).map_err(|source| ScanError::Pattern {
            pattern: p.clone(),
            source,
        })?;
        b.add(glob);
    }
    b.build().map_err(|source| ScanError::Pattern {
        pattern: patterns.join(","),
        source,
    })
}
