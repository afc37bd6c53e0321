use std::path::PathBuf;

/// A manifest or call document that cannot be turned into guards.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON with a malformed entry at `path`.
    #[error("{path}: {message}")]
    Invalid { path: String, message: String },
}

impl ManifestError {
    pub(crate) fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }
}
