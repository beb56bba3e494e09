//! Asset Variants data model
//!
//! Typed description of the assets a variant run reads and writes.
//!
//! # Core Concepts
//!
//! - [`AssetPath`]: `/`-separated path of a stored asset
//! - [`VariantTag`]: name of a substitution set (`sd`, `hd`, ...)
//! - [`ObjectNode`]: node of an object tree with optional image and animation capabilities
//! - [`ResourceRef`]: a named sprite inside an image container
//! - [`AnimationAsset`]: direct clip, layered controller or override table
//! - [`AssetContent`]: what a store persists, with [`AssetHandle`] identities
//!
//! # Example
//!
//! ```rust
//! use av_asset::{AssetPath, ObjectNode, ResourceRef};
//!
//! let orc = ObjectNode::new("Orc").with_child(
//!     ObjectNode::new("Body").with_sprite(ResourceRef::new("Assets/Enemies/Sheet.png", "orc_idle")),
//! );
//! assert_eq!(orc.subtree_len(), 2);
//! assert_eq!(AssetPath::from("Assets/Enemies/Orc.prefab").file_stem(), "Orc");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod animation;
mod content;
mod hash;
mod image;
mod node;
mod path;

pub use animation::{
    AnimationAsset, AnimationClip, AnimatorController, ClipOverride, ControllerLayer,
    ControllerState, CurveBinding, FloatCurve, FloatKeyframe, ObjectKeyframe,
    ObjectReferenceCurve, OverrideTable,
};
pub use content::{AssetContent, AssetHandle, AssetId, AssetKind, TypedAsset};
pub use hash::{ContentHash, HashError};
pub use image::{ImageContainer, ResourceRef, Sprite, SpriteRect};
pub use node::{AnimationCapability, ComponentKind, ImageCapability, ObjectNode, SceneGraph};
pub use path::{is_relative_segment, AssetPath, PathError, TagError, VariantTag, SEPARATOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
