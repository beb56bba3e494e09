//! On-disk asset store
//!
//! Each asset is a JSON file under the project root holding an envelope of
//! identity and content. Asset paths map one-to-one onto files, so
//! `Assets/Enemies/Orc.prefab` lives at `<root>/Assets/Enemies/Orc.prefab`.

use crate::error::StoreError;
use crate::store::{AssetStore, StoredAsset};
use av_asset::{AssetContent, AssetHandle, AssetId, AssetPath, ResourceRef};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    id: AssetId,
    content: AssetContent,
}

/// Asset store backed by a project directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a project rooted at `root`
    ///
    /// # Errors
    /// Returns error if `root` is not a directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::MissingDirectory(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// Project root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, path: &str) -> PathBuf {
        path.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg))
    }

    fn read(&self, path: &AssetPath) -> Result<Option<Envelope>, StoreError> {
        match fs::read(self.file(path.as_str())) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path.as_str(), err)),
        }
    }

    fn write(&self, path: &AssetPath, envelope: &Envelope) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(envelope)?;
        fs::write(self.file(path.as_str()), bytes).map_err(|err| StoreError::io(path.as_str(), err))
    }

    fn require_directory(&self, path: &AssetPath) -> Result<(), StoreError> {
        if self.is_valid_directory(path.parent()) {
            Ok(())
        } else {
            Err(StoreError::MissingDirectory(path.parent().to_string()))
        }
    }

    /// Write `content` at `path` under a new identity, creating directories
    ///
    /// Seeding helper for tools and tests; replaces any existing asset.
    ///
    /// # Errors
    /// Returns error on filesystem or encoding failure
    pub fn insert(&self, path: &AssetPath, content: AssetContent) -> Result<AssetHandle, StoreError> {
        let parent = self.file(path.parent());
        fs::create_dir_all(&parent).map_err(|err| StoreError::io(path.parent(), err))?;
        let envelope = Envelope {
            id: AssetId::new(),
            content,
        };
        self.write(path, &envelope)?;
        Ok(AssetHandle::new(envelope.id, path.clone()))
    }
}

impl AssetStore for FsStore {
    fn exists(&self, path: &AssetPath) -> bool {
        self.file(path.as_str()).is_file()
    }

    fn is_valid_directory(&self, path: &str) -> bool {
        !path.is_empty() && self.file(path).is_dir()
    }

    fn create_directory(&self, parent: &str, name: &str) -> Result<(), StoreError> {
        let full = if parent.is_empty() {
            name.to_string()
        } else {
            if !self.is_valid_directory(parent) {
                return Err(StoreError::MissingDirectory(parent.to_string()));
            }
            format!("{parent}/{name}")
        };
        match fs::create_dir(self.file(&full)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(StoreError::io(full, err)),
        }
    }

    fn copy(&self, src: &AssetPath, dst: &AssetPath) -> Result<AssetHandle, StoreError> {
        let source = self.read(src)?.ok_or_else(|| StoreError::NotFound(src.clone()))?;
        if self.exists(dst) {
            return Err(StoreError::AlreadyExists(dst.clone()));
        }
        self.require_directory(dst)?;
        let envelope = Envelope {
            id: AssetId::new(),
            content: source.content,
        };
        self.write(dst, &envelope)?;
        Ok(AssetHandle::new(envelope.id, dst.clone()))
    }

    fn delete(&self, path: &AssetPath) -> Result<bool, StoreError> {
        match fs::remove_file(self.file(path.as_str())) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::io(path.as_str(), err)),
        }
    }

    fn load(&self, path: &AssetPath) -> Result<Option<StoredAsset>, StoreError> {
        Ok(self.read(path)?.map(|envelope| StoredAsset {
            handle: AssetHandle::new(envelope.id, path.clone()),
            content: envelope.content,
        }))
    }

    fn load_all_named(&self, path: &AssetPath) -> Result<Vec<ResourceRef>, StoreError> {
        let refs = match self.read(path)?.map(|envelope| envelope.content) {
            Some(AssetContent::Images(container)) => container
                .sprites
                .into_iter()
                .map(|sprite| ResourceRef::new(path.clone(), sprite.name))
                .collect(),
            _ => Vec::new(),
        };
        Ok(refs)
    }

    fn create_new(
        &self,
        content: AssetContent,
        path: &AssetPath,
    ) -> Result<AssetHandle, StoreError> {
        if self.exists(path) {
            return Err(StoreError::AlreadyExists(path.clone()));
        }
        self.require_directory(path)?;
        let envelope = Envelope {
            id: AssetId::new(),
            content,
        };
        self.write(path, &envelope)?;
        Ok(AssetHandle::new(envelope.id, path.clone()))
    }

    fn copy_fields_onto(
        &self,
        content: AssetContent,
        existing: &AssetHandle,
    ) -> Result<(), StoreError> {
        let current = self
            .read(&existing.path)?
            .ok_or_else(|| StoreError::NotFound(existing.path.clone()))?;
        if current.id != existing.id {
            return Err(StoreError::StaleHandle(existing.path.clone()));
        }
        self.write(
            &existing.path,
            &Envelope {
                id: current.id,
                content,
            },
        )
    }

    // Writes go straight to disk and nothing is indexed.
    fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn rescan(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
