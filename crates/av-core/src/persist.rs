//! Identity-preserving persistence

use crate::error::VariantError;
use av_asset::{AssetContent, AssetHandle, AssetPath};
use av_store::AssetStore;

/// Persist `content` at `path`, keeping the identity of any asset already there
///
/// Absent: a new asset is created and its identity anchored at `path`.
/// Present: `content` is copied onto the existing asset in place, so anything
/// that already references it keeps pointing at the updated content. Never
/// delete-and-recreate an artifact that others may reference.
///
/// # Errors
/// Returns [`VariantError::WrongAssetKind`] if the existing asset has another
/// kind, or a storage error
pub fn create_or_replace<S>(
    store: &S,
    content: AssetContent,
    path: &AssetPath,
) -> Result<AssetHandle, VariantError>
where
    S: AssetStore + ?Sized,
{
    match store.load(path)? {
        None => {
            let handle = store.create_new(content, path)?;
            tracing::debug!(artifact = %path, id = %handle.id, "created artifact");
            Ok(handle)
        }
        Some(existing) => {
            let (expected, actual) = (content.kind(), existing.content.kind());
            if expected != actual {
                return Err(VariantError::WrongAssetKind {
                    path: path.clone(),
                    expected,
                    actual,
                });
            }
            store.copy_fields_onto(content, &existing.handle)?;
            tracing::debug!(artifact = %path, id = %existing.handle.id, "overwrote artifact in place");
            Ok(existing.handle)
        }
    }
}
