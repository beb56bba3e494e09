//! Testing utilities for Asset Variants workspace
//!
//! A small Orc project used across the engine tests:
//!
//! - `Assets/Enemies/Sheet.png` holds `orc_idle`, `orc_walk` and `orc_attack`
//! - its `hd` variant container holds only `orc_idle` and `orc_walk`
//! - a direct idle clip, an attack clip with no `hd` frames and an override
//!   table binding both
//! - the Orc prefab and a forest scene with a connected Orc instance
//!
//! [`LogCapture`] records the log lines emitted while a closure runs.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use av_asset::{
    AnimationAsset, AnimationClip, AssetContent, AssetPath, ImageContainer, ObjectNode,
    ObjectReferenceCurve, OverrideTable, ResourceRef, SceneGraph, TypedAsset, VariantTag,
};
use av_store::{load_typed, AssetStore, FsStore, InMemoryStore, StoreError};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

pub const SHEET: &str = "Assets/Enemies/Sheet.png";
pub const HD_SHEET: &str = "Assets/Enemies/Variant-hd/Sheet.png";
pub const IDLE_CLIP: &str = "Assets/Enemies/Anim/idle.anim";
pub const ATTACK_CLIP: &str = "Assets/Enemies/Anim/attack.anim";
pub const BASE_CONTROLLER: &str = "Assets/Shared/Humanoid.controller";
pub const BASE_IDLE: &str = "Assets/Shared/idle.anim";
pub const BASE_ATTACK: &str = "Assets/Shared/attack.anim";
pub const ORC_OVERRIDES: &str = "Assets/Enemies/Anim/Orc.overrideController";
pub const ORC_PREFAB: &str = "Assets/Enemies/Orc.prefab";
pub const FOREST_SCENE: &str = "Assets/Levels/Forest.unity";

pub fn tag(name: &str) -> VariantTag {
    VariantTag::new(name).unwrap()
}

pub fn sheet_sprite(name: &str) -> ResourceRef {
    ResourceRef::new(SHEET, name)
}

pub fn hd_sprite(name: &str) -> ResourceRef {
    ResourceRef::new(HD_SHEET, name)
}

/// Clip with one sprite curve, one frame per name
pub fn sprite_clip(name: &str, frames: &[&str]) -> AnimationClip {
    AnimationClip::new(name, 12.0).with_object_curve(ObjectReferenceCurve::sprite_frames(
        1.0 / 12.0,
        frames.iter().map(|frame| sheet_sprite(frame)).collect(),
    ))
}

pub fn orc_prefab() -> ObjectNode {
    ObjectNode::new("Orc")
        .with_animation(ORC_OVERRIDES)
        .with_child(ObjectNode::new("Body").with_sprite(sheet_sprite("orc_idle")))
        .with_child(ObjectNode::new("Weapon").with_sprite(sheet_sprite("orc_attack")))
        .with_child(ObjectNode::new("Shadow").with_animation(IDLE_CLIP))
}

pub fn forest_scene() -> SceneGraph {
    SceneGraph::new(vec![
        ObjectNode::new("Camera"),
        ObjectNode::new("Orc")
            .with_prefab_link(ORC_PREFAB)
            .with_animation(ORC_OVERRIDES)
            .with_child(
                ObjectNode::new("Body")
                    .with_prefab_link(ORC_PREFAB)
                    .with_sprite(sheet_sprite("orc_walk")),
            ),
        ObjectNode::new("Torch").with_sprite(sheet_sprite("orc_attack")),
    ])
}

/// Every asset of the Orc project, in insertion order
pub fn orc_project() -> Vec<(AssetPath, AssetContent)> {
    let overrides = OverrideTable::new(BASE_CONTROLLER)
        .with_override(BASE_IDLE, Some(IDLE_CLIP.into()))
        .with_override(BASE_ATTACK, Some(ATTACK_CLIP.into()));

    vec![
        (
            SHEET.into(),
            AssetContent::Images(ImageContainer::with_names(["orc_idle", "orc_walk", "orc_attack"])),
        ),
        (
            HD_SHEET.into(),
            AssetContent::Images(ImageContainer::with_names(["orc_idle", "orc_walk"])),
        ),
        (
            IDLE_CLIP.into(),
            AnimationAsset::Clip(sprite_clip("idle", &["orc_idle", "orc_walk"])).into_content(),
        ),
        (
            ATTACK_CLIP.into(),
            AnimationAsset::Clip(sprite_clip("attack", &["orc_attack"])).into_content(),
        ),
        (
            ORC_OVERRIDES.into(),
            AnimationAsset::OverrideTable(overrides).into_content(),
        ),
        (ORC_PREFAB.into(), orc_prefab().into_content()),
        (FOREST_SCENE.into(), forest_scene().into_content()),
    ]
}

/// In-memory store seeded with the Orc project
pub fn orc_store() -> InMemoryStore {
    let store = InMemoryStore::default();
    for (path, content) in orc_project() {
        store.insert(path, content);
    }
    store
}

/// Seed `store` with the Orc project
pub fn seed_fs_store(store: &FsStore) -> Result<(), StoreError> {
    for (path, content) in orc_project() {
        store.insert(&path, content)?;
    }
    Ok(())
}

pub fn load_object<S: AssetStore + ?Sized>(store: &S, path: &str) -> ObjectNode {
    match load_typed::<ObjectNode, _>(store, &path.into()).unwrap() {
        Some((_, node)) => node,
        None => panic!("expected object at {path}"),
    }
}

pub fn load_scene<S: AssetStore + ?Sized>(store: &S, path: &str) -> SceneGraph {
    match load_typed::<SceneGraph, _>(store, &path.into()).unwrap() {
        Some((_, graph)) => graph,
        None => panic!("expected scene at {path}"),
    }
}

pub fn load_clip<S: AssetStore + ?Sized>(store: &S, path: &str) -> AnimationClip {
    match load_typed::<AnimationAsset, _>(store, &path.into()).unwrap() {
        Some((_, AnimationAsset::Clip(clip))) => clip,
        other => panic!("expected clip at {path}, got {other:?}"),
    }
}

pub fn load_table<S: AssetStore + ?Sized>(store: &S, path: &str) -> OverrideTable {
    match load_typed::<AnimationAsset, _>(store, &path.into()).unwrap() {
        Some((_, AnimationAsset::OverrideTable(table))) => table,
        other => panic!("expected override table at {path}, got {other:?}"),
    }
}

/// Sprite values of every keyframe of the first curve
pub fn keyframe_sprites(clip: &AnimationClip) -> Vec<ResourceRef> {
    clip.object_curves[0]
        .keyframes
        .iter()
        .map(|keyframe| keyframe.value.clone())
        .collect()
}


/// Plain-text log lines recorded on the current thread
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Run `f` with a debug-level subscriber writing into a new capture
    pub fn record<R>(f: impl FnOnce() -> R) -> (R, Self) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, capture)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Warning lines containing `message`
    pub fn warnings(&self, message: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains("WARN") && line.contains(message))
            .collect()
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.0))
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
