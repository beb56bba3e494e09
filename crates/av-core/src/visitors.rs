//! Per-node substitutions applied while walking an object tree

use crate::animation::{AnimationOutcome, AnimationVariantBuilder};
use crate::error::VariantError;
use crate::lookup::ResourceVariantLookup;
use crate::walker::{walk, NodeVisitor};
use av_asset::{ObjectNode, VariantTag};
use av_store::AssetStore;

/// Rebinds image capabilities to their sprite variants
#[derive(Debug)]
pub struct ImageSubstitution<'a, S: AssetStore + ?Sized> {
    lookup: ResourceVariantLookup<'a, S>,
    tag: &'a VariantTag,
}

impl<'a, S: AssetStore + ?Sized> ImageSubstitution<'a, S> {
    #[inline]
    #[must_use]
    pub fn new(lookup: ResourceVariantLookup<'a, S>, tag: &'a VariantTag) -> Self {
        Self { lookup, tag }
    }
}

impl<S: AssetStore + ?Sized> NodeVisitor for ImageSubstitution<'_, S> {
    fn visit(&mut self, node: &mut ObjectNode) -> Result<bool, VariantError> {
        let Some(capability) = node.image_capability() else {
            return Ok(false);
        };
        let Some(variant) = self.lookup.find_variant(&capability.sprite, self.tag)? else {
            return Ok(false);
        };

        tracing::debug!(node = %node.name(), sprite = %variant, "rebound sprite");
        if let Some(capability) = node.image_capability_mut() {
            capability.sprite = variant;
        }
        Ok(true)
    }
}

/// Rebinds animation capabilities to generated or reused animation variants
#[derive(Debug)]
pub struct AnimationSubstitution<'a, S: AssetStore + ?Sized> {
    builder: AnimationVariantBuilder<'a, S>,
}

impl<'a, S: AssetStore + ?Sized> AnimationSubstitution<'a, S> {
    #[inline]
    #[must_use]
    pub fn new(builder: AnimationVariantBuilder<'a, S>) -> Self {
        Self { builder }
    }
}

impl<S: AssetStore + ?Sized> NodeVisitor for AnimationSubstitution<'_, S> {
    fn visit(&mut self, node: &mut ObjectNode) -> Result<bool, VariantError> {
        let Some(capability) = node.animation_capability_mut() else {
            return Ok(false);
        };

        let outcome = self.builder.build(&capability.controller)?;
        match outcome {
            AnimationOutcome::Generated(artifact) | AnimationOutcome::Reused(artifact) => {
                capability.controller = artifact.path;
                tracing::debug!(node = %node.name(), "rebound animation");
                Ok(true)
            }
            AnimationOutcome::Unchanged => Ok(false),
        }
    }
}

/// Detaches nodes from their source prefab
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefabDisconnect;

impl NodeVisitor for PrefabDisconnect {
    fn visit(&mut self, node: &mut ObjectNode) -> Result<bool, VariantError> {
        Ok(node.disconnect_prefab())
    }
}

/// Clear the prefab link of `node` and every descendant, returning how many
/// links were cleared
///
/// # Errors
/// Never fails; the signature matches the other tree passes
pub fn disconnect_prefab_instances(node: &mut ObjectNode) -> Result<usize, VariantError> {
    let summary = walk(node, &mut PrefabDisconnect)?;
    Ok(summary.changed)
}
