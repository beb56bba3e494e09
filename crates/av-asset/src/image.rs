//! Sprite containers and sprite references

use crate::path::AssetPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Reference to a named sprite inside an image container
///
/// Identity is `(container, name)`. A variant of a sprite is a different
/// reference with the same name in the variant container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub container: AssetPath,
    pub name: String,
}

impl ResourceRef {
    #[inline]
    #[must_use]
    pub fn new(container: impl Into<AssetPath>, name: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
        }
    }
}

impl Display for ResourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.container, self.name)
    }
}

/// Pixel rectangle of a sprite within its sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A named sprite within a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    #[serde(default)]
    pub rect: SpriteRect,
}

impl Sprite {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, rect: SpriteRect) -> Self {
        Self {
            name: name.into(),
            rect,
        }
    }
}

/// Image asset holding any number of named sprites (e.g. a sprite sheet)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContainer {
    pub sprites: Vec<Sprite>,
}

impl ImageContainer {
    /// Container with one full-size sprite per name
    #[must_use]
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sprites: names
                .into_iter()
                .map(|name| Sprite::new(name, SpriteRect::default()))
                .collect(),
        }
    }

    /// First sprite with the given name
    #[inline]
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Sprite> {
        self.sprites.iter().find(|sprite| sprite.name == name)
    }
}
