//! Sprite variant lookup

use crate::error::VariantError;
use crate::paths::PathResolver;
use av_asset::{ResourceRef, VariantTag};
use av_store::AssetStore;

/// Finds the counterpart of a sprite in the variant container
///
/// The counterpart is the sprite with the same name inside the container at
/// [`PathResolver::texture_variant_path`].
#[derive(Debug)]
pub struct ResourceVariantLookup<'a, S: AssetStore + ?Sized> {
    store: &'a S,
    resolver: &'a PathResolver,
}

impl<S: AssetStore + ?Sized> Clone for ResourceVariantLookup<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: AssetStore + ?Sized> Copy for ResourceVariantLookup<'_, S> {}

impl<'a, S: AssetStore + ?Sized> ResourceVariantLookup<'a, S> {
    #[inline]
    #[must_use]
    pub fn new(store: &'a S, resolver: &'a PathResolver) -> Self {
        Self { store, resolver }
    }

    /// Variant of `sprite` for `tag`, or `None` when the variant container
    /// has no sprite of that name
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] if the sprite's container is
    /// outside the base directory, or a storage error
    pub fn find_variant(
        &self,
        sprite: &ResourceRef,
        tag: &VariantTag,
    ) -> Result<Option<ResourceRef>, VariantError> {
        let container = self.resolver.texture_variant_path(&sprite.container, tag)?;
        let found = self
            .store
            .load_all_named(&container)?
            .into_iter()
            .find(|candidate| candidate.name == sprite.name);

        if found.is_none() {
            tracing::warn!(
                sprite = %sprite.name,
                container = %container,
                "no sprite variant found"
            );
        }
        Ok(found)
    }
}
