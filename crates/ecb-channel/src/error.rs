use std::path::PathBuf;

/// Result channel errors
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Filesystem failure on an artifact or the log
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be encoded or decoded
    #[error("artifact serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ChannelError {
    #[inline]
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
