//! Variant path derivation
//!
//! Two placement rules, both relative to the configured base directory:
//!
//! - scenes, prefabs and animations nest under one root-level variant tree
//!   and gain a `-<tag>` file suffix:
//!   `Assets/Enemies/Orc.prefab` → `Assets/Variant-hd/Enemies/Orc-hd.prefab`
//! - image containers nest in a variant folder next to the original and keep
//!   their file name:
//!   `Assets/Enemies/Sheet.png` → `Assets/Enemies/Variant-hd/Sheet.png`

use crate::config::VariantConfig;
use crate::error::VariantError;
use av_asset::{is_relative_segment, AssetPath, VariantTag, SEPARATOR};
use av_store::AssetStore;

/// Derives variant paths from source paths and tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base_root: String,
    folder_prefix: String,
}

impl PathResolver {
    #[must_use]
    pub fn new(config: &VariantConfig) -> Self {
        Self {
            base_root: config.base_root.clone(),
            folder_prefix: config.folder_prefix.clone(),
        }
    }

    /// Directory every path must be rooted under
    #[inline]
    #[must_use]
    pub fn base_root(&self) -> &str {
        &self.base_root
    }

    /// Folder holding the variants for `tag`
    #[inline]
    #[must_use]
    pub fn variant_folder_name(&self, tag: &VariantTag) -> String {
        format!("{}{}", self.folder_prefix, tag)
    }

    fn require_rooted<'p>(&self, path: &'p AssetPath) -> Result<&'p str, VariantError> {
        path.relative_to(&self.base_root)
            .map_err(|_| VariantError::InvalidPath {
                path: path.clone(),
                base: self.base_root.clone(),
            })
    }

    /// Variant path of a scene, prefab or animation, without touching the store
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] if `path` is outside the base directory
    pub fn derive_variant_path(
        &self,
        path: &AssetPath,
        tag: &VariantTag,
    ) -> Result<AssetPath, VariantError> {
        let rest = self.require_rooted(path)?;
        let nested = AssetPath::from(format!(
            "{}{SEPARATOR}{}{SEPARATOR}{rest}",
            self.base_root,
            self.variant_folder_name(tag),
        ));
        Ok(nested.with_file_suffix(&format!("-{tag}")))
    }

    /// Variant path of a scene, prefab or animation
    ///
    /// Side effect: every directory above the returned path exists in `store`
    /// afterwards.
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] if `path` is outside the base
    /// directory, or a storage error if a directory cannot be created
    pub fn variant_path<S>(
        &self,
        store: &S,
        path: &AssetPath,
        tag: &VariantTag,
    ) -> Result<AssetPath, VariantError>
    where
        S: AssetStore + ?Sized,
    {
        let variant = self.derive_variant_path(path, tag)?;
        ensure_dirs(store, &variant)?;
        Ok(variant)
    }

    /// Path of the variant container for an image container
    ///
    /// # Errors
    /// Returns [`VariantError::InvalidPath`] if `container` is outside the base directory
    pub fn texture_variant_path(
        &self,
        container: &AssetPath,
        tag: &VariantTag,
    ) -> Result<AssetPath, VariantError> {
        self.require_rooted(container)?;
        Ok(AssetPath::from(format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            container.parent(),
            self.variant_folder_name(tag),
            container.file_name(),
        )))
    }
}

/// Create every missing directory above `path`, returning how many were created
///
/// Existing directories are left alone, so repeated calls are no-ops.
///
/// # Errors
/// Returns [`VariantError::InvalidPath`] if any segment is empty, `.` or
/// `..` (nothing is created then), or a storage error if the store fails to
/// create a directory
pub fn ensure_dirs<S>(store: &S, path: &AssetPath) -> Result<usize, VariantError>
where
    S: AssetStore + ?Sized,
{
    let segments: Vec<&str> = path.segments().collect();
    if segments.iter().any(|s| s.is_empty() || is_relative_segment(s)) {
        return Err(VariantError::InvalidPath {
            path: path.clone(),
            base: segments.first().copied().unwrap_or_default().to_string(),
        });
    }
    let Some((_, dirs)) = segments.split_last() else {
        return Ok(0);
    };

    let mut created = 0;
    let mut parent = String::new();
    for dir in dirs {
        let current = if parent.is_empty() {
            (*dir).to_string()
        } else {
            format!("{parent}{SEPARATOR}{dir}")
        };
        if !store.is_valid_directory(&current) {
            store.create_directory(&parent, dir)?;
            tracing::debug!(directory = %current, "created directory");
            created += 1;
        }
        parent = current;
    }
    Ok(created)
}
