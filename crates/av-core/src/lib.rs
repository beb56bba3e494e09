//! Asset Variants engine
//!
//! Produces tagged variants of scenes, prefabs and animations by swapping
//! every sprite for its same-named counterpart in a variant image container.
//!
//! - [`PathResolver`]: where variants of assets and image containers live
//! - [`ResourceVariantLookup`]: finds the counterpart of one sprite
//! - [`walk`]: pre-order traversal of object trees with a [`NodeVisitor`]
//! - [`AnimationVariantBuilder`]: clip and override-table variants
//! - [`create_or_replace`]: upsert that keeps asset identity
//! - [`VariantOrchestrator`]: scene and object entry points
//!
//! Runs are idempotent: the root artifact is recopied each time while nested
//! artifacts are overwritten in place or reused, so references to them stay
//! valid.
//!
//! # Example
//!
//! ```rust
//! use av_asset::{AssetContent, AssetPath, ImageContainer, ObjectNode, ResourceRef, VariantTag};
//! use av_core::{VariantConfig, VariantOrchestrator};
//! use av_store::{InMemoryStore, StoreGraphHost};
//!
//! let store = InMemoryStore::default();
//! store.insert("Assets/Enemies/Sheet.png", AssetContent::Images(ImageContainer::with_names(["orc_idle"])));
//! store.insert("Assets/Enemies/Variant-hd/Sheet.png", AssetContent::Images(ImageContainer::with_names(["orc_idle"])));
//! store.insert(
//!     "Assets/Enemies/Orc.prefab",
//!     AssetContent::Object(ObjectNode::new("Orc").with_sprite(ResourceRef::new("Assets/Enemies/Sheet.png", "orc_idle"))),
//! );
//!
//! let host = StoreGraphHost::new(&store);
//! let orchestrator = VariantOrchestrator::new(&store, &host, &VariantConfig::default());
//! let tag = VariantTag::new("hd").unwrap();
//! let variant = orchestrator
//!     .create_object_variant(&AssetPath::from("Assets/Enemies/Orc.prefab"), &tag)
//!     .unwrap();
//! assert_eq!(variant.as_str(), "Assets/Variant-hd/Enemies/Orc-hd.prefab");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod animation;
pub mod config;
pub mod error;
pub mod lookup;
pub mod orchestrator;
pub mod paths;
pub mod persist;
pub mod session;
pub mod visitors;
pub mod walker;

pub use animation::{AnimationOutcome, AnimationVariantBuilder};
pub use config::VariantConfig;
pub use error::VariantError;
pub use lookup::ResourceVariantLookup;
pub use orchestrator::VariantOrchestrator;
pub use paths::{ensure_dirs, PathResolver};
pub use persist::create_or_replace;
pub use session::SceneSession;
pub use visitors::{
    disconnect_prefab_instances, AnimationSubstitution, ImageSubstitution, PrefabDisconnect,
};
pub use walker::{walk, walk_all, NodeVisitor, WalkSummary};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running variants
    pub use crate::{
        AnimationOutcome, PathResolver, VariantConfig, VariantError, VariantOrchestrator,
    };
    pub use av_asset::{AssetPath, VariantTag};
    pub use av_store::{AssetStore, GraphHost};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
