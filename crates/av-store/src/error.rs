//! Error types for asset stores

use av_asset::{AssetKind, AssetPath};

/// Errors raised by [`AssetStore`](crate::AssetStore) and
/// [`GraphHost`](crate::GraphHost) implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No asset at path
    #[error("no asset at '{0}'")]
    NotFound(AssetPath),

    /// Asset already present at path
    #[error("an asset already exists at '{0}'")]
    AlreadyExists(AssetPath),

    /// Parent directory missing
    #[error("directory '{0}' does not exist")]
    MissingDirectory(String),

    /// Handle no longer matches the asset stored at its path
    #[error("handle for '{0}' is stale")]
    StaleHandle(AssetPath),

    /// Asset has a different kind than requested
    #[error("asset '{path}' is {actual}, expected {expected}")]
    WrongKind {
        path: AssetPath,
        expected: AssetKind,
        actual: AssetKind,
    },

    /// Scene graph is not open
    #[error("graph '{0}' is not open")]
    GraphNotOpen(AssetPath),

    /// Scene graph is already open
    #[error("graph '{0}' is already open")]
    GraphAlreadyOpen(AssetPath),

    /// Filesystem failure
    #[error("i/o error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Encoding failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Content could not be fingerprinted
    #[error(transparent)]
    Fingerprint(#[from] av_asset::HashError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
