//! Asset storage contract
//!
//! Everything the variant engine knows about persistence goes through
//! [`AssetStore`]. Paths are [`AssetPath`]s; directories are plain strings
//! because they never hold content.

use crate::error::StoreError;
use av_asset::{AssetContent, AssetHandle, AssetPath, ContentHash, ResourceRef, TypedAsset};

/// An asset read back from a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub handle: AssetHandle,
    pub content: AssetContent,
}

/// Backing asset storage
///
/// Implementations use interior mutability so a single store can be shared by
/// reference between the path resolver, the builders and the orchestrator.
///
/// # Contract
/// - `create_new` and `copy` never overwrite; the destination directory must exist
/// - `copy` assigns the destination a fresh identity
/// - `copy_fields_onto` keeps the identity of the existing asset
pub trait AssetStore {
    /// Check whether an asset is stored at `path`
    fn exists(&self, path: &AssetPath) -> bool;

    /// Check whether `path` names an existing directory
    fn is_valid_directory(&self, path: &str) -> bool;

    /// Create directory `name` inside `parent`
    ///
    /// # Errors
    /// Returns error if `parent` does not exist
    fn create_directory(&self, parent: &str, name: &str) -> Result<(), StoreError>;

    /// Copy the asset at `src` to `dst` under a new identity
    ///
    /// # Errors
    /// Returns error if `src` is missing or `dst` is occupied
    fn copy(&self, src: &AssetPath, dst: &AssetPath) -> Result<AssetHandle, StoreError>;

    /// Delete the asset at `path`, returning whether one existed
    ///
    /// # Errors
    /// Returns error on backend failure
    fn delete(&self, path: &AssetPath) -> Result<bool, StoreError>;

    /// Load the asset at `path`
    ///
    /// # Errors
    /// Returns error on backend failure; absence is `Ok(None)`
    fn load(&self, path: &AssetPath) -> Result<Option<StoredAsset>, StoreError>;

    /// Every named sprite stored at `path`
    ///
    /// Missing assets and non-image assets yield an empty list.
    ///
    /// # Errors
    /// Returns error on backend failure
    fn load_all_named(&self, path: &AssetPath) -> Result<Vec<ResourceRef>, StoreError>;

    /// Persist `content` as a new asset at `path`
    ///
    /// # Errors
    /// Returns error if `path` is occupied or its directory is missing
    fn create_new(&self, content: AssetContent, path: &AssetPath)
        -> Result<AssetHandle, StoreError>;

    /// Overwrite the field values of `existing` with `content`, in place
    ///
    /// # Errors
    /// Returns error if `existing` is missing or stale
    fn copy_fields_onto(
        &self,
        content: AssetContent,
        existing: &AssetHandle,
    ) -> Result<(), StoreError>;

    /// Flush pending writes
    ///
    /// # Errors
    /// Returns error on backend failure
    fn commit(&self) -> Result<(), StoreError>;

    /// Refresh any index after external changes
    ///
    /// # Errors
    /// Returns error on backend failure
    fn rescan(&self) -> Result<(), StoreError>;

    /// Hash of the content stored at `path`
    ///
    /// # Errors
    /// Returns error on backend or encoding failure
    fn fingerprint(&self, path: &AssetPath) -> Result<Option<ContentHash>, StoreError> {
        match self.load(path)? {
            Some(stored) => Ok(Some(stored.content.fingerprint()?)),
            None => Ok(None),
        }
    }
}

/// Load the asset at `path` as `T`
///
/// An asset of another kind yields `Ok(None)`, like a missing one.
///
/// # Errors
/// Returns error on backend failure
pub fn load_typed<T, S>(store: &S, path: &AssetPath) -> Result<Option<(AssetHandle, T)>, StoreError>
where
    T: TypedAsset,
    S: AssetStore + ?Sized,
{
    Ok(store
        .load(path)?
        .and_then(|stored| T::from_content(stored.content).map(|typed| (stored.handle, typed))))
}

/// Load the asset at `path` as `T`, failing on absence or kind mismatch
///
/// # Errors
/// Returns [`StoreError::NotFound`] or [`StoreError::WrongKind`]
pub fn require_typed<T, S>(store: &S, path: &AssetPath) -> Result<(AssetHandle, T), StoreError>
where
    T: TypedAsset,
    S: AssetStore + ?Sized,
{
    let stored = store
        .load(path)?
        .ok_or_else(|| StoreError::NotFound(path.clone()))?;
    let actual = stored.content.kind();
    T::from_content(stored.content)
        .map(|typed| (stored.handle, typed))
        .ok_or_else(|| StoreError::WrongKind {
            path: path.clone(),
            expected: T::KIND,
            actual,
        })
}
