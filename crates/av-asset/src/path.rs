//! Asset paths and variant tags
//!
//! Provides [`AssetPath`] for addressing stored assets and [`VariantTag`] for
//! naming a substitution set.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
pub const SEPARATOR: char = '/';

/// Path of a stored asset
///
/// A `/`-separated string such as `Assets/Enemies/Orc.prefab`. Paths read
/// back from a store are trusted and built with [`From`]; user input should go
/// through [`FromStr`], which rejects empty, `.` and `..` segments.
///
/// # Examples
/// - `Assets/Enemies/Orc.prefab` has parent `Assets/Enemies` and file name `Orc.prefab`
/// - `Assets/Enemies/Sheet.png` is rooted under `Assets`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetPath(String);

impl AssetPath {
    /// Build a path from segments
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Path as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Everything before the last separator (empty when there is none)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> &str {
        self.0.rfind(SEPARATOR).map_or("", |idx| &self.0[..idx])
    }

    /// Final segment
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rfind(SEPARATOR).map_or(self.0.as_str(), |idx| &self.0[idx + 1..])
    }

    /// Final segment without its extension
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        name.rfind('.').map_or(name, |idx| &name[..idx])
    }

    /// Check that the path lives strictly below `base`
    ///
    /// `Assets/x.png` is rooted under `Assets`; `Assets` itself,
    /// `AssetsOther/x.png` and `Assets/../x.png` are not.
    #[inline]
    #[must_use]
    pub fn is_rooted_under(&self, base: &str) -> bool {
        self.0.len() > base.len() + 1
            && self.0.starts_with(base)
            && self.0[base.len()..].starts_with(SEPARATOR)
            && !self.segments().any(is_relative_segment)
    }

    /// Remainder of the path below `base`
    ///
    /// # Errors
    /// Returns error if the path is not rooted under `base`
    pub fn relative_to(&self, base: &str) -> Result<&str, PathError> {
        if !self.is_rooted_under(base) {
            return Err(PathError::NotRooted {
                path: self.0.clone(),
                base: base.to_string(),
            });
        }
        Ok(&self.0[base.len() + 1..])
    }

    /// Insert `suffix` before the extension of the final segment
    ///
    /// Without an extension the suffix is appended. The extension starts at
    /// the last `.` of the final segment.
    #[must_use]
    pub fn with_file_suffix(&self, suffix: &str) -> Self {
        let dir_len = self.0.rfind(SEPARATOR).map_or(0, |idx| idx + 1);
        let (dir, name) = self.0.split_at(dir_len);
        let renamed = match name.rfind('.') {
            Some(dot) => format!("{}{}{}", &name[..dot], suffix, &name[dot..]),
            None => format!("{name}{suffix}"),
        };
        Self(format!("{dir}{renamed}"))
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}{}{}", self.0, SEPARATOR, segment))
        }
    }
}

impl Display for AssetPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        if s.split(SEPARATOR).any(str::is_empty) {
            return Err(PathError::EmptySegment(s.to_string()));
        }
        if s.split(SEPARATOR).any(is_relative_segment) {
            return Err(PathError::RelativeSegment(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

/// `.` or `..`, which would let a path step outside its base
#[inline]
#[must_use]
pub fn is_relative_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

impl From<&str> for AssetPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for AssetPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name of a substitution set, e.g. `sd` or `hd`
///
/// Used both as a folder-name component and as a file-name suffix, so it may
/// not be empty or contain a path separator. Tags that collide after case or
/// character normalization are not detected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantTag(String);

impl VariantTag {
    /// Create a tag
    ///
    /// # Errors
    /// Returns error if the tag is empty or contains a separator
    pub fn new(tag: impl Into<String>) -> Result<Self, TagError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(TagError::Empty);
        }
        if tag.contains(|c: char| c == SEPARATOR || c == '\\') {
            return Err(TagError::InvalidCharacter(tag));
        }
        Ok(Self(tag))
    }

    /// Tag as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VariantTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VariantTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for VariantTag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VariantTag> for String {
    fn from(tag: VariantTag) -> Self {
        tag.0
    }
}

/// Errors related to asset paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Empty path
    #[error("asset path is empty")]
    Empty,

    /// Empty segment in path
    #[error("asset path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// `.` or `..` segment in path
    #[error("asset path '{0}' contains a '.' or '..' segment")]
    RelativeSegment(String),

    /// Path outside the base directory
    #[error("path '{path}' should be inside the '{base}' folder")]
    NotRooted { path: String, base: String },
}

/// Errors related to variant tags
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// Empty tag
    #[error("variant tag is empty")]
    Empty,

    /// Separator in tag
    #[error("variant tag '{0}' contains a path separator")]
    InvalidCharacter(String),
}
