//! Animation assets
//!
//! An [`AnimationAsset`] is a direct clip, a layered controller whose states
//! each play a clip, or an override table that swaps clips of a shared base
//! controller.

use crate::image::ResourceRef;
use crate::node::ComponentKind;
use crate::path::AssetPath;
use serde::{Deserialize, Serialize};

/// Animation asset bound to a node's animation capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationAsset {
    /// Keyframe curves played directly
    Clip(AnimationClip),
    /// Layers of states, each playing a motion
    Controller(AnimatorController),
    /// Per-clip overrides on top of a base controller
    OverrideTable(OverrideTable),
}

/// Property a curve animates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveBinding {
    /// Relative path of the animated node from the animated root
    pub path: String,
    /// Component type that owns the property
    pub target: ComponentKind,
    pub property: String,
}

impl CurveBinding {
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, target: ComponentKind, property: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target,
            property: property.into(),
        }
    }

    /// Binding of a sprite renderer's sprite on the root node
    #[inline]
    #[must_use]
    pub fn sprite() -> Self {
        Self::new("", ComponentKind::SpriteRenderer, "m_Sprite")
    }
}

/// Scalar keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatKeyframe {
    pub time: f32,
    pub value: f32,
}

/// Curve of scalar keyframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatCurve {
    pub binding: CurveBinding,
    pub keyframes: Vec<FloatKeyframe>,
}

/// Keyframe whose value references a sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectKeyframe {
    pub time: f32,
    pub value: ResourceRef,
}

/// Curve of object-reference keyframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectReferenceCurve {
    pub binding: CurveBinding,
    pub keyframes: Vec<ObjectKeyframe>,
}

impl ObjectReferenceCurve {
    /// Sprite curve on the root node with keyframes evenly spaced by `step`
    #[must_use]
    pub fn sprite_frames(step: f32, sprites: Vec<ResourceRef>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let keyframes = sprites
            .into_iter()
            .enumerate()
            .map(|(i, value)| ObjectKeyframe {
                time: i as f32 * step,
                value,
            })
            .collect();
        Self {
            binding: CurveBinding::sprite(),
            keyframes,
        }
    }
}

/// A clip of keyframe curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub frame_rate: f32,
    #[serde(default)]
    pub float_curves: Vec<FloatCurve>,
    #[serde(default)]
    pub object_curves: Vec<ObjectReferenceCurve>,
}

impl AnimationClip {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, frame_rate: f32) -> Self {
        Self {
            name: name.into(),
            frame_rate,
            float_curves: Vec::new(),
            object_curves: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_object_curve(mut self, curve: ObjectReferenceCurve) -> Self {
        self.object_curves.push(curve);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_float_curve(mut self, curve: FloatCurve) -> Self {
        self.float_curves.push(curve);
        self
    }

    /// Object curves bound to the given component type
    pub fn object_curves_for(
        &mut self,
        target: ComponentKind,
    ) -> impl Iterator<Item = &mut ObjectReferenceCurve> {
        self.object_curves
            .iter_mut()
            .filter(move |curve| curve.binding.target == target)
    }
}

/// State of a controller layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub name: String,
    /// Asset played while the state is active; usually a clip
    pub motion: AssetPath,
}

/// One layer of a controller's state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerLayer {
    pub name: String,
    #[serde(default)]
    pub states: Vec<ControllerState>,
}

impl ControllerLayer {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_state(mut self, name: impl Into<String>, motion: impl Into<AssetPath>) -> Self {
        self.states.push(ControllerState {
            name: name.into(),
            motion: motion.into(),
        });
        self
    }
}

/// Layered state machine playing its own clips
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatorController {
    pub layers: Vec<ControllerLayer>,
}

impl AnimatorController {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layer(mut self, layer: ControllerLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Every state of every layer, in layer order
    pub fn states(&self) -> impl Iterator<Item = &ControllerState> {
        self.layers.iter().flat_map(|layer| layer.states.iter())
    }

    pub fn states_mut(&mut self) -> impl Iterator<Item = &mut ControllerState> {
        self.layers.iter_mut().flat_map(|layer| layer.states.iter_mut())
    }

    /// Motion of the first state named `name`
    #[must_use]
    pub fn motion_of(&self, name: &str) -> Option<&AssetPath> {
        self.states()
            .find(|state| state.name == name)
            .map(|state| &state.motion)
    }
}

/// One (original clip, override clip) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipOverride {
    pub original: AssetPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_clip: Option<AssetPath>,
}

impl ClipOverride {
    /// Clip actually played for this pair
    #[inline]
    #[must_use]
    pub fn bound_clip(&self) -> &AssetPath {
        self.override_clip.as_ref().unwrap_or(&self.original)
    }
}

/// Override table over a shared base controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideTable {
    pub base_controller: AssetPath,
    pub overrides: Vec<ClipOverride>,
}

impl OverrideTable {
    #[inline]
    #[must_use]
    pub fn new(base_controller: impl Into<AssetPath>) -> Self {
        Self {
            base_controller: base_controller.into(),
            overrides: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_override(
        mut self,
        original: impl Into<AssetPath>,
        override_clip: Option<AssetPath>,
    ) -> Self {
        self.overrides.push(ClipOverride {
            original: original.into(),
            override_clip,
        });
        self
    }

    /// Override set for `original`, if any pair names it
    #[must_use]
    pub fn override_for(&self, original: &AssetPath) -> Option<&AssetPath> {
        self.overrides
            .iter()
            .find(|pair| &pair.original == original)
            .and_then(|pair| pair.override_clip.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_clip_falls_back_to_original() {
        let unset = ClipOverride {
            original: "Assets/idle.anim".into(),
            override_clip: None,
        };
        assert_eq!(unset.bound_clip().as_str(), "Assets/idle.anim");

        let set = ClipOverride {
            original: "Assets/idle.anim".into(),
            override_clip: Some("Assets/orc_idle.anim".into()),
        };
        assert_eq!(set.bound_clip().as_str(), "Assets/orc_idle.anim");
    }

    #[test]
    fn object_curves_filtered_by_target() {
        let mut clip = AnimationClip::new("walk", 12.0)
            .with_object_curve(ObjectReferenceCurve::sprite_frames(
                0.5,
                vec![ResourceRef::new("Assets/s.png", "a")],
            ))
            .with_object_curve(ObjectReferenceCurve {
                binding: CurveBinding::new("", ComponentKind::Animator, "controller"),
                keyframes: Vec::new(),
            });
        assert_eq!(clip.object_curves_for(ComponentKind::SpriteRenderer).count(), 1);
    }

    #[test]
    fn sprite_frames_are_evenly_spaced() {
        let curve = ObjectReferenceCurve::sprite_frames(
            0.25,
            vec![
                ResourceRef::new("Assets/s.png", "a"),
                ResourceRef::new("Assets/s.png", "b"),
                ResourceRef::new("Assets/s.png", "c"),
            ],
        );
        let times: Vec<f32> = curve.keyframes.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.25, 0.5]);
    }

    #[test]
    fn controller_states_span_layers() {
        let mut controller = AnimatorController::new()
            .with_layer(
                ControllerLayer::new("Base")
                    .with_state("Idle", "Assets/idle.anim")
                    .with_state("Walk", "Assets/walk.anim"),
            )
            .with_layer(ControllerLayer::new("Upper").with_state("Wave", "Assets/wave.anim"));

        let names: Vec<_> = controller.states().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Idle", "Walk", "Wave"]);

        for state in controller.states_mut() {
            state.motion = state.motion.with_file_suffix("-sd");
        }
        assert_eq!(
            controller.motion_of("Wave").map(AssetPath::as_str),
            Some("Assets/wave-sd.anim")
        );
        assert_eq!(controller.motion_of("Run"), None);
    }

    #[test]
    fn asset_serde_is_tagged() {
        let asset = AnimationAsset::OverrideTable(OverrideTable::new("Assets/base.controller"));
        let json = serde_json::to_string(&asset).unwrap();
        assert!(json.contains(r#""type":"override_table""#));
        let back: AnimationAsset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, asset);
    }
}
