//! Variant entry points
//!
//! The root artifact of a run (the scene or object copy) is deleted and
//! recopied every time. Nested artifacts are upserted or reused by the
//! animation builder, so repeated runs converge on the same result.

use crate::animation::AnimationVariantBuilder;
use crate::config::VariantConfig;
use crate::error::VariantError;
use crate::lookup::ResourceVariantLookup;
use crate::paths::{ensure_dirs, PathResolver};
use crate::session::SceneSession;
use crate::visitors::{disconnect_prefab_instances, AnimationSubstitution, ImageSubstitution};
use crate::walker::{walk, WalkSummary};
use av_asset::{AssetHandle, AssetKind, AssetPath, ObjectNode, TypedAsset, VariantTag};
use av_store::{require_typed, AssetStore, GraphHost};

/// Creates scene and object variants for a tag
#[derive(Debug)]
pub struct VariantOrchestrator<'a, S: AssetStore + ?Sized, H: GraphHost + ?Sized> {
    store: &'a S,
    host: &'a H,
    resolver: PathResolver,
}

impl<'a, S, H> VariantOrchestrator<'a, S, H>
where
    S: AssetStore + ?Sized,
    H: GraphHost + ?Sized,
{
    #[must_use]
    pub fn new(store: &'a S, host: &'a H, config: &VariantConfig) -> Self {
        Self {
            store,
            host,
            resolver: PathResolver::new(config),
        }
    }

    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Create the `tag` variant of the scene at `scene_path`
    ///
    /// The scene is copied to its variant path, detached from its prefabs and
    /// every node substituted, then saved. Returns the variant path.
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] for paths outside the base
    /// directory, [`VariantError::MissingAsset`] or
    /// [`VariantError::WrongAssetKind`] if no scene is stored at `scene_path`,
    /// or a storage error. The opened copy is closed on every path.
    pub fn create_scene_variant(
        &self,
        scene_path: &AssetPath,
        tag: &VariantTag,
    ) -> Result<AssetPath, VariantError> {
        tracing::info!(scene = %scene_path, %tag, "creating scene variant");
        let target = self.prepare_copy(scene_path, tag, AssetKind::Scene)?;
        self.replace_copy(scene_path, &target)?;
        self.store.rescan()?;

        let mut session = SceneSession::open(self.host, &target)?;
        let mut images = WalkSummary::default();
        let mut animations = WalkSummary::default();
        let mut disconnected = 0;
        for root in session.roots_mut() {
            disconnected += disconnect_prefab_instances(root)?;
            let (image_summary, animation_summary) = self.substitute(root, tag)?;
            images += image_summary;
            animations += animation_summary;
        }
        session.save()?;
        session.close()?;

        self.store.commit()?;
        self.store.rescan()?;
        tracing::info!(
            scene = %scene_path,
            variant = %target,
            nodes = images.visited,
            sprites = images.changed,
            animations = animations.changed,
            disconnected,
            "created scene variant"
        );
        Ok(target)
    }

    /// Create the `tag` variant of the object (prefab) at `object_path`
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] for paths outside the base
    /// directory, [`VariantError::MissingAsset`] or
    /// [`VariantError::WrongAssetKind`] if no object is stored at
    /// `object_path`, or a storage error
    pub fn create_object_variant(
        &self,
        object_path: &AssetPath,
        tag: &VariantTag,
    ) -> Result<AssetPath, VariantError> {
        tracing::info!(object = %object_path, %tag, "creating object variant");
        let target = self.prepare_copy(object_path, tag, AssetKind::Object)?;
        let handle = self.replace_copy(object_path, &target)?;

        let (_, mut root) = require_typed::<ObjectNode, _>(self.store, &target)?;
        let (images, animations) = self.substitute(&mut root, tag)?;
        self.store.copy_fields_onto(root.into_content(), &handle)?;

        self.store.commit()?;
        tracing::info!(
            object = %object_path,
            variant = %target,
            nodes = images.visited,
            sprites = images.changed,
            animations = animations.changed,
            "created object variant"
        );
        Ok(target)
    }

    /// Same as [`create_object_variant`](Self::create_object_variant)
    ///
    /// # Errors
    /// See [`create_object_variant`](Self::create_object_variant)
    #[inline]
    pub fn create_prefab_variant(
        &self,
        prefab_path: &AssetPath,
        tag: &VariantTag,
    ) -> Result<AssetPath, VariantError> {
        self.create_object_variant(prefab_path, tag)
    }

    /// Create the `tag` variant of every scene in `paths`, in order
    ///
    /// # Errors
    /// Stops at the first error; variants created before it are kept
    pub fn create_scene_variants<'p, I>(
        &self,
        paths: I,
        tag: &VariantTag,
    ) -> Result<Vec<AssetPath>, VariantError>
    where
        I: IntoIterator<Item = &'p AssetPath>,
    {
        paths
            .into_iter()
            .map(|path| self.create_scene_variant(path, tag))
            .collect()
    }

    /// Create the `tag` variant of every object in `paths`, in order
    ///
    /// # Errors
    /// Stops at the first error; variants created before it are kept
    pub fn create_object_variants<'p, I>(
        &self,
        paths: I,
        tag: &VariantTag,
    ) -> Result<Vec<AssetPath>, VariantError>
    where
        I: IntoIterator<Item = &'p AssetPath>,
    {
        paths
            .into_iter()
            .map(|path| self.create_object_variant(path, tag))
            .collect()
    }

    /// Validate the source and make room for its copy
    ///
    /// The path is checked before the store is touched, so an unrooted path
    /// is reported as such whether or not something is stored there.
    fn prepare_copy(
        &self,
        source: &AssetPath,
        tag: &VariantTag,
        expected: AssetKind,
    ) -> Result<AssetPath, VariantError> {
        let target = self.resolver.derive_variant_path(source, tag)?;

        let stored = self
            .store
            .load(source)?
            .ok_or_else(|| VariantError::MissingAsset(source.clone()))?;
        let actual = stored.content.kind();
        if actual != expected {
            return Err(VariantError::WrongAssetKind {
                path: source.clone(),
                expected,
                actual,
            });
        }

        ensure_dirs(self.store, &target)?;
        Ok(target)
    }

    /// Replace whatever is at `target` with a fresh copy of `source`
    fn replace_copy(
        &self,
        source: &AssetPath,
        target: &AssetPath,
    ) -> Result<AssetHandle, VariantError> {
        if self.store.delete(target)? {
            tracing::debug!(variant = %target, "deleted previous variant");
        }
        let handle = self.store.copy(source, target)?;
        self.store.commit()?;
        Ok(handle)
    }

    /// Image pass then animation pass over one tree
    fn substitute(
        &self,
        root: &mut ObjectNode,
        tag: &VariantTag,
    ) -> Result<(WalkSummary, WalkSummary), VariantError> {
        let lookup = ResourceVariantLookup::new(self.store, &self.resolver);
        let images = walk(root, &mut ImageSubstitution::new(lookup, tag))?;

        let builder = AnimationVariantBuilder::new(self.store, &self.resolver, tag);
        let animations = walk(root, &mut AnimationSubstitution::new(builder))?;
        Ok((images, animations))
    }
}
