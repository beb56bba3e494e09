//! Error types for the variant engine
//!
//! Only precondition violations and storage failures are errors. A sprite
//! with no counterpart in the variant container is logged and skipped, and an
//! asset with nothing to substitute is reported as unchanged.

use av_asset::{AssetKind, AssetPath};
use av_store::StoreError;

/// Main variant engine error type
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    /// Path outside the base directory; never recovered
    #[error("invalid path '{path}': should be inside the '{base}' folder")]
    InvalidPath { path: AssetPath, base: String },

    /// Source asset has the wrong kind for the requested operation
    #[error("asset '{path}' is {actual}, expected {expected}")]
    WrongAssetKind {
        path: AssetPath,
        expected: AssetKind,
        actual: AssetKind,
    },

    /// Source asset does not exist
    #[error("missing asset '{0}'")]
    MissingAsset(AssetPath),

    /// Backing store failure
    #[error("storage error: {0}")]
    Store(StoreError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl VariantError {
    /// Check if error is a precondition violation by the caller
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. } | Self::WrongAssetKind { .. } | Self::MissingAsset(_)
        )
    }
}

impl From<StoreError> for VariantError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => Self::MissingAsset(path),
            StoreError::WrongKind {
                path,
                expected,
                actual,
            } => Self::WrongAssetKind {
                path,
                expected,
                actual,
            },
            other => Self::Store(other),
        }
    }
}
