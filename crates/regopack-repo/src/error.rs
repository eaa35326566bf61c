use camino::Utf8PathBuf;
use std::path::PathBuf;

/// Failure while locating or reading rule sources.
///
/// Every variant names the offending path so the message is actionable on
/// its own.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("rules directory {path} does not exist or is not a directory")]
    NotADirectory { path: Utf8PathBuf },

    #[error("searching for policies in {root}")]
    Walk {
        root: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("path {} is not valid UTF-8", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("reading policy {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exclude pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
