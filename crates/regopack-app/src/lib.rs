//! Use case orchestration for regopack.
//!
//! This crate provides the application layer: loading a policy pack from a
//! rules directory, serving analysis requests against it, dumping its catalog
//! and verifying it against fixtures. It is intentionally thin and delegates
//! heavy lifting to the domain, repo, engine and settings layers.
//!
//! The CLI crate depends on this; it only handles argument parsing, transport
//! and exit codes.

#![forbid(unsafe_code)]

mod fixtures;
mod info;
mod load;
mod service;

pub use fixtures::{FixtureOutcome, FixtureReport, verify_fixtures};
pub use info::serialize_analyzer_info;
pub use load::{LoadInput, load_pack};
pub use service::PackContext;

/// Version reported by `--version`, `plugin_info` and, unless a manifest
/// overrides it, by every diagnostic.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod test_support {
    use camino::{Utf8Path, Utf8PathBuf};
    use tempfile::TempDir;

    pub fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    pub fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    pub const PUBLIC_ACL: &str = r#"package aws

deny_public_acl[msg] {
    input.acl == "public-read"
    msg := "S3 bucket must not be publicly readable"
}
"#;

    pub const TAGGING: &str = r#"package aws

warn_untagged {
    not tagged
}

tagged {
    count(input.tags) > 0
}
"#;
}
