//! Animation variant generation
//!
//! Direct clips, controllers and override tables follow different reuse rules:
//!
//! - a clip or controller whose variant already exists is reused as is and
//!   never regenerated, since other nodes may already reference that variant
//! - an override table is rebuilt on every run; its clip variants and the
//!   table itself are persisted through [`create_or_replace`], so their
//!   identities survive the rebuild
//!
//! Clip variants behind controller states and override pairs are always
//! upserted; only the direct-clip path reuses them.

use crate::error::VariantError;
use crate::lookup::ResourceVariantLookup;
use crate::paths::PathResolver;
use crate::persist::create_or_replace;
use av_asset::{
    AnimationAsset, AnimationClip, AnimatorController, AssetHandle, AssetPath, ComponentKind,
    OverrideTable, TypedAsset, VariantTag,
};
use av_store::{load_typed, AssetStore};

/// Result of building the variant of one animation asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// A variant was created or overwritten in place
    Generated(AssetHandle),
    /// An existing clip or controller variant was reused untouched
    Reused(AssetHandle),
    /// Nothing substitutable; no artifact written
    Unchanged,
}

impl AnimationOutcome {
    /// Artifact the animation should be rebound to, if any
    #[inline]
    #[must_use]
    pub fn artifact(&self) -> Option<&AssetHandle> {
        match self {
            Self::Generated(handle) | Self::Reused(handle) => Some(handle),
            Self::Unchanged => None,
        }
    }
}

/// Builds sprite-substituted variants of animation assets
#[derive(Debug)]
pub struct AnimationVariantBuilder<'a, S: AssetStore + ?Sized> {
    store: &'a S,
    resolver: &'a PathResolver,
    lookup: ResourceVariantLookup<'a, S>,
    tag: &'a VariantTag,
}

impl<'a, S: AssetStore + ?Sized> AnimationVariantBuilder<'a, S> {
    #[inline]
    #[must_use]
    pub fn new(store: &'a S, resolver: &'a PathResolver, tag: &'a VariantTag) -> Self {
        Self {
            store,
            resolver,
            lookup: ResourceVariantLookup::new(store, resolver),
            tag,
        }
    }

    /// Build the variant of the animation asset at `path`
    ///
    /// A missing asset, or one that is not an animation, is logged and
    /// reported as [`AnimationOutcome::Unchanged`].
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] for paths outside the base
    /// directory, or a storage error. Artifacts persisted before the error
    /// stay in place.
    pub fn build(&self, path: &AssetPath) -> Result<AnimationOutcome, VariantError> {
        let Some((_, asset)) = load_typed::<AnimationAsset, _>(self.store, path)? else {
            tracing::warn!(animation = %path, "no animation asset found");
            return Ok(AnimationOutcome::Unchanged);
        };

        match asset {
            AnimationAsset::Clip(clip) => self.build_clip(path, clip),
            AnimationAsset::Controller(controller) => self.build_controller(path, controller),
            AnimationAsset::OverrideTable(table) => self.build_override_table(path, table),
        }
    }

    fn build_clip(
        &self,
        path: &AssetPath,
        clip: AnimationClip,
    ) -> Result<AnimationOutcome, VariantError> {
        let variant_path = self.resolver.variant_path(self.store, path, self.tag)?;

        if let Some(existing) = self.store.load(&variant_path)? {
            tracing::debug!(clip = %path, variant = %variant_path, "reusing existing clip variant");
            return Ok(AnimationOutcome::Reused(existing.handle));
        }

        let mut duplicate = clip;
        if !self.substitute_keyframes(&mut duplicate)? {
            tracing::debug!(clip = %path, "no sprite keyframes substituted");
            return Ok(AnimationOutcome::Unchanged);
        }

        let handle = create_or_replace(
            self.store,
            AnimationAsset::Clip(duplicate).into_content(),
            &variant_path,
        )?;
        tracing::info!(clip = %path, variant = %handle.path, "generated clip variant");
        Ok(AnimationOutcome::Generated(handle))
    }

    fn build_override_table(
        &self,
        path: &AssetPath,
        table: OverrideTable,
    ) -> Result<AnimationOutcome, VariantError> {
        // Rebuilt from the source each run; untouched pairs keep their binding.
        let mut rebuilt = table;

        let mut overridden = 0usize;
        for pair in &mut rebuilt.overrides {
            let bound = pair.bound_clip().clone();
            let Some((_, AnimationAsset::Clip(duplicate))) =
                load_typed::<AnimationAsset, _>(self.store, &bound)?
            else {
                tracing::warn!(table = %path, clip = %bound, "override does not bind a clip");
                continue;
            };

            let Some(handle) = self.upsert_clip_variant(&bound, duplicate)? else {
                continue;
            };
            tracing::debug!(original = %pair.original, variant = %handle.path, "overrode clip");
            pair.override_clip = Some(handle.path);
            overridden += 1;
        }

        if overridden == 0 {
            tracing::debug!(table = %path, "no overridden clip had sprite substitutions");
            return Ok(AnimationOutcome::Unchanged);
        }

        let table_path = self.resolver.variant_path(self.store, path, self.tag)?;
        let handle = create_or_replace(
            self.store,
            AnimationAsset::OverrideTable(rebuilt).into_content(),
            &table_path,
        )?;
        tracing::info!(
            table = %path,
            variant = %handle.path,
            overridden,
            "generated override table variant"
        );
        Ok(AnimationOutcome::Generated(handle))
    }

    fn build_controller(
        &self,
        path: &AssetPath,
        controller: AnimatorController,
    ) -> Result<AnimationOutcome, VariantError> {
        let controller_path = self.resolver.variant_path(self.store, path, self.tag)?;

        if let Some(existing) = self.store.load(&controller_path)? {
            tracing::debug!(
                controller = %path,
                variant = %controller_path,
                "reusing existing controller variant"
            );
            return Ok(AnimationOutcome::Reused(existing.handle));
        }

        let mut duplicate = controller;
        let mut rebound = 0usize;
        for state in duplicate.states_mut() {
            let Some((_, AnimationAsset::Clip(clip))) =
                load_typed::<AnimationAsset, _>(self.store, &state.motion)?
            else {
                tracing::debug!(
                    state = %state.name,
                    motion = %state.motion,
                    "state motion is not a clip"
                );
                continue;
            };

            let Some(handle) = self.upsert_clip_variant(&state.motion, clip)? else {
                continue;
            };
            tracing::debug!(state = %state.name, variant = %handle.path, "rebound state");
            state.motion = handle.path;
            rebound += 1;
        }

        if rebound == 0 {
            tracing::debug!(controller = %path, "no state clip had sprite substitutions");
            return Ok(AnimationOutcome::Unchanged);
        }

        let handle = create_or_replace(
            self.store,
            AnimationAsset::Controller(duplicate).into_content(),
            &controller_path,
        )?;
        tracing::info!(
            controller = %path,
            variant = %handle.path,
            rebound,
            "generated controller variant"
        );
        Ok(AnimationOutcome::Generated(handle))
    }

    /// Substitute `clip` and upsert it at the variant path of `source`
    ///
    /// Returns `None`, writing nothing, when no keyframe had a variant.
    fn upsert_clip_variant(
        &self,
        source: &AssetPath,
        mut clip: AnimationClip,
    ) -> Result<Option<AssetHandle>, VariantError> {
        if !self.substitute_keyframes(&mut clip)? {
            return Ok(None);
        }
        let clip_path = self.resolver.variant_path(self.store, source, self.tag)?;
        let handle = create_or_replace(
            self.store,
            AnimationAsset::Clip(clip).into_content(),
            &clip_path,
        )?;
        Ok(Some(handle))
    }

    /// Rewrite every sprite keyframe that has a variant, in place
    ///
    /// Only curves bound to sprite renderers are touched; keyframe order and
    /// times never change. Returns whether any keyframe was rewritten.
    fn substitute_keyframes(&self, clip: &mut AnimationClip) -> Result<bool, VariantError> {
        let mut replaced = false;
        for curve in clip.object_curves_for(ComponentKind::SpriteRenderer) {
            for keyframe in &mut curve.keyframes {
                if let Some(variant) = self.lookup.find_variant(&keyframe.value, self.tag)? {
                    tracing::trace!(time = keyframe.time, sprite = %variant, "substituted keyframe");
                    keyframe.value = variant;
                    replaced = true;
                }
            }
        }
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariantConfig;
    use av_asset::{
        AssetContent, ControllerLayer, CurveBinding, FloatCurve, FloatKeyframe, ImageContainer,
        ObjectKeyframe, ObjectReferenceCurve, ResourceRef,
    };
    use av_store::InMemoryStore;
    use pretty_assertions::assert_eq;

    const SHEET: &str = "Assets/Orc/Sheet.png";
    const SHEET_SD: &str = "Assets/Orc/Variant-sd/Sheet.png";

    fn sprite(name: &str) -> ResourceRef {
        ResourceRef::new(SHEET, name)
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::default();
        store.insert(
            SHEET,
            AssetContent::Images(ImageContainer::with_names(["idle_0", "idle_1", "walk_0"])),
        );
        store.insert(
            SHEET_SD,
            AssetContent::Images(ImageContainer::with_names(["idle_0", "idle_1"])),
        );
        store
    }

    fn sprite_clip(name: &str, frames: &[&str]) -> AnimationClip {
        AnimationClip::new(name, 12.0).with_object_curve(ObjectReferenceCurve::sprite_frames(
            0.125,
            frames.iter().map(|f| sprite(f)).collect(),
        ))
    }

    fn insert_clip(store: &InMemoryStore, path: &str, clip: AnimationClip) {
        store.insert(path, AnimationAsset::Clip(clip).into_content());
    }

    fn load_clip(store: &InMemoryStore, path: &str) -> AnimationClip {
        match load_typed::<AnimationAsset, _>(store, &path.into()).unwrap() {
            Some((_, AnimationAsset::Clip(clip))) => clip,
            other => panic!("expected clip at {path}, got {other:?}"),
        }
    }

    fn build(store: &InMemoryStore, path: &str) -> AnimationOutcome {
        let resolver = PathResolver::new(&VariantConfig::default());
        let tag = VariantTag::new("sd").unwrap();
        AnimationVariantBuilder::new(store, &resolver, &tag)
            .build(&path.into())
            .unwrap()
    }

    #[test]
    fn clip_with_substitutions_is_generated() {
        let store = store();
        insert_clip(&store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_0", "idle_1"]));

        let outcome = build(&store, "Assets/Orc/idle.anim");
        let AnimationOutcome::Generated(handle) = outcome else {
            panic!("expected generated, got {outcome:?}");
        };
        assert_eq!(handle.path.as_str(), "Assets/Variant-sd/Orc/idle-sd.anim");

        let variant = load_clip(&store, handle.path.as_str());
        let values: Vec<_> = variant.object_curves[0]
            .keyframes
            .iter()
            .map(|k| k.value.clone())
            .collect();
        assert_eq!(
            values,
            vec![ResourceRef::new(SHEET_SD, "idle_0"), ResourceRef::new(SHEET_SD, "idle_1")]
        );
    }

    #[test]
    fn partial_substitution_keeps_order_and_timing() {
        let store = store();
        insert_clip(
            &store,
            "Assets/Orc/mixed.anim",
            sprite_clip("mixed", &["walk_0", "idle_0", "walk_0"]),
        );

        let outcome = build(&store, "Assets/Orc/mixed.anim");
        let handle = outcome.artifact().unwrap();
        let variant = load_clip(&store, handle.path.as_str());
        let keys = &variant.object_curves[0].keyframes;

        assert_eq!(
            keys,
            &vec![
                ObjectKeyframe { time: 0.0, value: sprite("walk_0") },
                ObjectKeyframe { time: 0.125, value: ResourceRef::new(SHEET_SD, "idle_0") },
                ObjectKeyframe { time: 0.25, value: sprite("walk_0") },
            ]
        );
    }

    #[test]
    fn clip_without_sprite_curves_is_unchanged() {
        let store = store();
        let clip = AnimationClip::new("bob", 30.0).with_float_curve(FloatCurve {
            binding: CurveBinding::new("", ComponentKind::Transform, "m_LocalPosition.y"),
            keyframes: vec![FloatKeyframe { time: 0.0, value: 1.0 }],
        });
        insert_clip(&store, "Assets/Orc/bob.anim", clip);

        assert_eq!(build(&store, "Assets/Orc/bob.anim"), AnimationOutcome::Unchanged);
        assert!(!store.exists(&"Assets/Variant-sd/Orc/bob-sd.anim".into()));
    }

    #[test]
    fn sprite_curve_on_other_component_is_ignored() {
        let store = store();
        let clip = AnimationClip::new("odd", 12.0).with_object_curve(ObjectReferenceCurve {
            binding: CurveBinding::new("", ComponentKind::Animator, "m_Sprite"),
            keyframes: vec![ObjectKeyframe { time: 0.0, value: sprite("idle_0") }],
        });
        insert_clip(&store, "Assets/Orc/odd.anim", clip);

        assert_eq!(build(&store, "Assets/Orc/odd.anim"), AnimationOutcome::Unchanged);
    }

    #[test]
    fn clip_without_any_variant_sprites_is_unchanged() {
        let store = store();
        insert_clip(&store, "Assets/Orc/walk.anim", sprite_clip("walk", &["walk_0"]));
        assert_eq!(build(&store, "Assets/Orc/walk.anim"), AnimationOutcome::Unchanged);
        assert!(!store.exists(&"Assets/Variant-sd/Orc/walk-sd.anim".into()));
    }

    #[test]
    fn existing_clip_variant_is_reused_untouched() {
        let store = store();
        insert_clip(&store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_0"]));
        let first = build(&store, "Assets/Orc/idle.anim");
        let first = first.artifact().unwrap().clone();
        let before = store.fingerprint(&first.path).unwrap();

        // Source changes after the variant exists; the variant is not re-derived.
        insert_clip(&store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_1"]));
        let second = build(&store, "Assets/Orc/idle.anim");

        assert_eq!(second, AnimationOutcome::Reused(first.clone()));
        assert_eq!(store.fingerprint(&first.path).unwrap(), before);
    }

    #[test]
    fn missing_or_foreign_asset_is_unchanged() {
        let store = store();
        assert_eq!(build(&store, "Assets/Orc/none.anim"), AnimationOutcome::Unchanged);
        assert_eq!(build(&store, SHEET), AnimationOutcome::Unchanged);
    }

    fn insert_table(store: &InMemoryStore) {
        insert_clip(store, "Assets/Base/idle.anim", AnimationClip::new("idle", 12.0));
        insert_clip(store, "Assets/Base/walk.anim", AnimationClip::new("walk", 12.0));
        insert_clip(store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_0", "idle_1"]));
        insert_clip(store, "Assets/Orc/walk.anim", sprite_clip("walk", &["walk_0"]));
        store.insert(
            "Assets/Orc/Orc.overrideController",
            AnimationAsset::OverrideTable(
                OverrideTable::new("Assets/Base/Base.controller")
                    .with_override("Assets/Base/idle.anim", Some("Assets/Orc/idle.anim".into()))
                    .with_override("Assets/Base/walk.anim", Some("Assets/Orc/walk.anim".into())),
            )
            .into_content(),
        );
    }

    fn load_table(store: &InMemoryStore, path: &str) -> OverrideTable {
        match load_typed::<AnimationAsset, _>(store, &path.into()).unwrap() {
            Some((_, AnimationAsset::OverrideTable(table))) => table,
            other => panic!("expected override table at {path}, got {other:?}"),
        }
    }

    #[test]
    fn override_table_overrides_only_substituted_pairs() {
        let store = store();
        insert_table(&store);

        let outcome = build(&store, "Assets/Orc/Orc.overrideController");
        let handle = outcome.artifact().unwrap();
        assert_eq!(
            handle.path.as_str(),
            "Assets/Variant-sd/Orc/Orc-sd.overrideController"
        );

        let table = load_table(&store, handle.path.as_str());
        assert_eq!(table.base_controller.as_str(), "Assets/Base/Base.controller");
        assert_eq!(
            table.override_for(&"Assets/Base/idle.anim".into()).map(AssetPath::as_str),
            Some("Assets/Variant-sd/Orc/idle-sd.anim")
        );
        // No walk sprite variants: the pair keeps its source binding.
        assert_eq!(
            table.override_for(&"Assets/Base/walk.anim".into()).map(AssetPath::as_str),
            Some("Assets/Orc/walk.anim")
        );
        assert!(!store.exists(&"Assets/Variant-sd/Orc/walk-sd.anim".into()));
    }

    #[test]
    fn override_table_with_unset_pair_substitutes_original_clip() {
        let store = store();
        insert_clip(&store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_0"]));
        store.insert(
            "Assets/Orc/Plain.overrideController",
            AnimationAsset::OverrideTable(
                OverrideTable::new("Assets/Base/Base.controller")
                    .with_override("Assets/Orc/idle.anim", None),
            )
            .into_content(),
        );

        let outcome = build(&store, "Assets/Orc/Plain.overrideController");
        let table = load_table(&store, outcome.artifact().unwrap().path.as_str());
        assert_eq!(
            table.override_for(&"Assets/Orc/idle.anim".into()).map(AssetPath::as_str),
            Some("Assets/Variant-sd/Orc/idle-sd.anim")
        );
    }

    #[test]
    fn override_table_is_rebuilt_with_stable_identities() {
        let store = store();
        insert_table(&store);

        let first = build(&store, "Assets/Orc/Orc.overrideController");
        let clip_path = AssetPath::from("Assets/Variant-sd/Orc/idle-sd.anim");
        let clip_id = store.handle(&clip_path).unwrap().id;

        // New frame in the source clip; the rebuild must pick it up in place.
        insert_clip(
            &store,
            "Assets/Orc/idle.anim",
            sprite_clip("idle", &["idle_0", "idle_1", "idle_0"]),
        );
        let second = build(&store, "Assets/Orc/Orc.overrideController");

        assert_eq!(first, second);
        assert!(matches!(second, AnimationOutcome::Generated(_)));
        assert_eq!(store.handle(&clip_path).unwrap().id, clip_id);
        assert_eq!(load_clip(&store, clip_path.as_str()).object_curves[0].keyframes.len(), 3);
    }

    fn insert_controller(store: &InMemoryStore) {
        insert_clip(store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_0", "idle_1"]));
        insert_clip(store, "Assets/Orc/walk.anim", sprite_clip("walk", &["walk_0"]));
        store.insert(
            "Assets/Orc/Orc.controller",
            AnimationAsset::Controller(
                AnimatorController::new()
                    .with_layer(
                        ControllerLayer::new("Base")
                            .with_state("Idle", "Assets/Orc/idle.anim")
                            .with_state("Walk", "Assets/Orc/walk.anim"),
                    )
                    .with_layer(
                        ControllerLayer::new("Blend")
                            .with_state("Mix", "Assets/Orc/Blend.controller"),
                    ),
            )
            .into_content(),
        );
    }

    fn load_controller(store: &InMemoryStore, path: &str) -> AnimatorController {
        match load_typed::<AnimationAsset, _>(store, &path.into()).unwrap() {
            Some((_, AnimationAsset::Controller(controller))) => controller,
            other => panic!("expected controller at {path}, got {other:?}"),
        }
    }

    #[test]
    fn controller_rebinds_only_substituted_states() {
        let store = store();
        insert_controller(&store);

        let outcome = build(&store, "Assets/Orc/Orc.controller");
        let AnimationOutcome::Generated(handle) = outcome else {
            panic!("expected generated, got {outcome:?}");
        };
        assert_eq!(handle.path.as_str(), "Assets/Variant-sd/Orc/Orc-sd.controller");

        let controller = load_controller(&store, handle.path.as_str());
        assert_eq!(
            controller.motion_of("Idle").map(AssetPath::as_str),
            Some("Assets/Variant-sd/Orc/idle-sd.anim")
        );
        assert_eq!(
            controller.motion_of("Walk").map(AssetPath::as_str),
            Some("Assets/Orc/walk.anim")
        );
        assert_eq!(
            controller.motion_of("Mix").map(AssetPath::as_str),
            Some("Assets/Orc/Blend.controller")
        );
        assert_eq!(controller.layers.len(), 2);
        assert!(!store.exists(&"Assets/Variant-sd/Orc/walk-sd.anim".into()));

        let idle = load_clip(&store, "Assets/Variant-sd/Orc/idle-sd.anim");
        assert_eq!(idle.object_curves[0].keyframes[1].value, ResourceRef::new(SHEET_SD, "idle_1"));
    }

    #[test]
    fn existing_controller_variant_is_reused_untouched() {
        let store = store();
        insert_controller(&store);
        let first = build(&store, "Assets/Orc/Orc.controller");
        let first = first.artifact().unwrap().clone();
        let controller_before = store.fingerprint(&first.path).unwrap();
        let clip_path = AssetPath::from("Assets/Variant-sd/Orc/idle-sd.anim");
        let clip_before = store.fingerprint(&clip_path).unwrap();

        insert_clip(&store, "Assets/Orc/idle.anim", sprite_clip("idle", &["idle_1"]));
        let second = build(&store, "Assets/Orc/Orc.controller");

        assert_eq!(second, AnimationOutcome::Reused(first.clone()));
        assert_eq!(store.fingerprint(&first.path).unwrap(), controller_before);
        assert_eq!(store.fingerprint(&clip_path).unwrap(), clip_before);
    }

    #[test]
    fn controller_without_substitutions_is_unchanged() {
        let store = store();
        insert_clip(&store, "Assets/Orc/walk.anim", sprite_clip("walk", &["walk_0"]));
        store.insert(
            "Assets/Orc/Walker.controller",
            AnimationAsset::Controller(AnimatorController::new().with_layer(
                ControllerLayer::new("Base")
                    .with_state("Walk", "Assets/Orc/walk.anim")
                    .with_state("Gone", "Assets/Orc/missing.anim"),
            ))
            .into_content(),
        );

        assert_eq!(build(&store, "Assets/Orc/Walker.controller"), AnimationOutcome::Unchanged);
        assert!(!store.exists(&"Assets/Variant-sd/Orc/Walker-sd.controller".into()));
    }

    #[test]
    fn override_table_without_substitutions_is_unchanged() {
        let store = store();
        insert_clip(&store, "Assets/Orc/walk.anim", sprite_clip("walk", &["walk_0"]));
        store.insert(
            "Assets/Orc/Walker.overrideController",
            AnimationAsset::OverrideTable(
                OverrideTable::new("Assets/Base/Base.controller")
                    .with_override("Assets/Base/walk.anim", Some("Assets/Orc/walk.anim".into()))
                    .with_override("Assets/Base/missing.anim", None),
            )
            .into_content(),
        );

        assert_eq!(
            build(&store, "Assets/Orc/Walker.overrideController"),
            AnimationOutcome::Unchanged
        );
        assert!(!store.exists(&"Assets/Variant-sd/Orc/Walker-sd.overrideController".into()));
    }
}
