//! Stored asset content and identity
//!
//! Defines [`AssetContent`], the tagged union a store persists, the
//! [`TypedAsset`] trait for typed loads, and [`AssetHandle`] identities.

use crate::animation::AnimationAsset;
use crate::hash::{ContentHash, HashError};
use crate::image::ImageContainer;
use crate::node::{ObjectNode, SceneGraph};
use crate::path::AssetPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Kind of a stored asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Scene,
    Object,
    Images,
    Animation,
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scene => "scene",
            Self::Object => "object",
            Self::Images => "images",
            Self::Animation => "animation",
        };
        f.write_str(name)
    }
}

/// Content of a stored asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetContent {
    Scene(SceneGraph),
    Object(ObjectNode),
    Images(ImageContainer),
    Animation(AnimationAsset),
}

impl AssetContent {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Scene(_) => AssetKind::Scene,
            Self::Object(_) => AssetKind::Object,
            Self::Images(_) => AssetKind::Images,
            Self::Animation(_) => AssetKind::Animation,
        }
    }

    /// Hash of the serialized field values
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn fingerprint(&self) -> Result<ContentHash, HashError> {
        ContentHash::of(self)
    }
}

/// Content types that can be loaded from a store by kind
///
/// This trait is **sealed**: the set of asset kinds is closed.
pub trait TypedAsset: Sized + private::Sealed {
    /// Kind tag of this content type
    const KIND: AssetKind;

    /// Extract typed content, returning `None` on a kind mismatch
    fn from_content(content: AssetContent) -> Option<Self>;

    /// Wrap into the stored representation
    fn into_content(self) -> AssetContent;
}

pub(crate) mod private {
    pub trait Sealed {}
}

macro_rules! typed_asset {
    ($ty:ty, $variant:ident) => {
        impl private::Sealed for $ty {}

        impl TypedAsset for $ty {
            const KIND: AssetKind = AssetKind::$variant;

            fn from_content(content: AssetContent) -> Option<Self> {
                match content {
                    AssetContent::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_content(self) -> AssetContent {
                AssetContent::$variant(self)
            }
        }
    };
}

typed_asset!(SceneGraph, Scene);
typed_asset!(ObjectNode, Object);
typed_asset!(ImageContainer, Images);
typed_asset!(AnimationAsset, Animation);

/// Identity of a persisted asset
///
/// Assigned when an asset is created or copied; kept when its content is
/// overwritten in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Fresh random identity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted asset: identity anchored at a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    pub id: AssetId,
    pub path: AssetPath,
}

impl AssetHandle {
    #[inline]
    #[must_use]
    pub fn new(id: AssetId, path: AssetPath) -> Self {
        Self { id, path }
    }
}
