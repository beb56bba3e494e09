//! In-memory asset store
//!
//! A fake backing store for tests and dry runs. Directories are tracked
//! explicitly so callers that forget to create them fail the same way they
//! would against a real project.

use crate::error::StoreError;
use crate::store::{AssetStore, StoredAsset};
use av_asset::{AssetContent, AssetHandle, AssetId, AssetPath, ResourceRef, SEPARATOR};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct Entry {
    id: AssetId,
    content: AssetContent,
}

#[derive(Debug, Default)]
struct Inner {
    assets: BTreeMap<AssetPath, Entry>,
    directories: BTreeSet<String>,
    pending_writes: usize,
    commits: usize,
}

/// Counters exposed for assertions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Stored assets
    pub asset_count: usize,
    /// Known directories, base included
    pub directory_count: usize,
    /// Writes not yet committed
    pub pending_writes: usize,
    /// Completed commits
    pub commits: usize,
}

/// Asset store held entirely in memory
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Create empty store whose only directory is `base`
    #[must_use]
    pub fn new(base: &str) -> Self {
        let mut inner = Inner::default();
        inner.directories.insert(base.to_string());
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Seed an asset, creating any missing parent directories
    ///
    /// Replaces whatever was stored at `path` under a new identity.
    pub fn insert(&self, path: impl Into<AssetPath>, content: AssetContent) -> AssetHandle {
        let path = path.into();
        let mut inner = self.inner.write();
        let mut current = String::new();
        for segment in path.parent().split(SEPARATOR).filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push(SEPARATOR);
            }
            current.push_str(segment);
            inner.directories.insert(current.clone());
        }
        let id = AssetId::new();
        inner.assets.insert(path.clone(), Entry { id, content });
        AssetHandle::new(id, path)
    }

    /// All stored asset paths, sorted
    #[must_use]
    pub fn paths(&self) -> Vec<AssetPath> {
        self.inner.read().assets.keys().cloned().collect()
    }

    /// All known directories, sorted
    #[must_use]
    pub fn directories(&self) -> Vec<String> {
        self.inner.read().directories.iter().cloned().collect()
    }

    /// Handle of the asset at `path`
    #[must_use]
    pub fn handle(&self, path: &AssetPath) -> Option<AssetHandle> {
        self.inner
            .read()
            .assets
            .get(path)
            .map(|entry| AssetHandle::new(entry.id, path.clone()))
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        StoreStats {
            asset_count: inner.assets.len(),
            directory_count: inner.directories.len(),
            pending_writes: inner.pending_writes,
            commits: inner.commits,
        }
    }

    fn require_directory(inner: &Inner, path: &AssetPath) -> Result<(), StoreError> {
        let parent = path.parent();
        if inner.directories.contains(parent) {
            Ok(())
        } else {
            Err(StoreError::MissingDirectory(parent.to_string()))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("Assets")
    }
}

impl AssetStore for InMemoryStore {
    fn exists(&self, path: &AssetPath) -> bool {
        self.inner.read().assets.contains_key(path)
    }

    fn is_valid_directory(&self, path: &str) -> bool {
        self.inner.read().directories.contains(path)
    }

    fn create_directory(&self, parent: &str, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let path = if parent.is_empty() {
            name.to_string()
        } else {
            if !inner.directories.contains(parent) {
                return Err(StoreError::MissingDirectory(parent.to_string()));
            }
            format!("{parent}{SEPARATOR}{name}")
        };
        inner.directories.insert(path);
        Ok(())
    }

    fn copy(&self, src: &AssetPath, dst: &AssetPath) -> Result<AssetHandle, StoreError> {
        let mut inner = self.inner.write();
        let content = inner
            .assets
            .get(src)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| StoreError::NotFound(src.clone()))?;
        if inner.assets.contains_key(dst) {
            return Err(StoreError::AlreadyExists(dst.clone()));
        }
        Self::require_directory(&inner, dst)?;
        let id = AssetId::new();
        inner.assets.insert(dst.clone(), Entry { id, content });
        inner.pending_writes += 1;
        Ok(AssetHandle::new(id, dst.clone()))
    }

    fn delete(&self, path: &AssetPath) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let removed = inner.assets.remove(path).is_some();
        if removed {
            inner.pending_writes += 1;
        }
        Ok(removed)
    }

    fn load(&self, path: &AssetPath) -> Result<Option<StoredAsset>, StoreError> {
        Ok(self.inner.read().assets.get(path).map(|entry| StoredAsset {
            handle: AssetHandle::new(entry.id, path.clone()),
            content: entry.content.clone(),
        }))
    }

    fn load_all_named(&self, path: &AssetPath) -> Result<Vec<ResourceRef>, StoreError> {
        let inner = self.inner.read();
        let refs = match inner.assets.get(path).map(|entry| &entry.content) {
            Some(AssetContent::Images(container)) => container
                .sprites
                .iter()
                .map(|sprite| ResourceRef::new(path.clone(), sprite.name.clone()))
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
        let mut inner = self.inner.write();
        if inner.assets.contains_key(path) {
            return Err(StoreError::AlreadyExists(path.clone()));
        }
        Self::require_directory(&inner, path)?;
        let id = AssetId::new();
        inner.assets.insert(path.clone(), Entry { id, content });
        inner.pending_writes += 1;
        Ok(AssetHandle::new(id, path.clone()))
    }

    fn copy_fields_onto(
        &self,
        content: AssetContent,
        existing: &AssetHandle,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let entry = inner
            .assets
            .get_mut(&existing.path)
            .ok_or_else(|| StoreError::NotFound(existing.path.clone()))?;
        if entry.id != existing.id {
            return Err(StoreError::StaleHandle(existing.path.clone()));
        }
        entry.content = content;
        inner.pending_writes += 1;
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.pending_writes = 0;
        inner.commits += 1;
        Ok(())
    }

    fn rescan(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_asset::{ImageContainer, ObjectNode};

    fn object(name: &str) -> AssetContent {
        AssetContent::Object(ObjectNode::new(name))
    }

    #[test]
    fn insert_creates_parent_directories() {
        let store = InMemoryStore::default();
        store.insert("Assets/Enemies/Orc.prefab", object("Orc"));
        assert!(store.is_valid_directory("Assets"));
        assert!(store.is_valid_directory("Assets/Enemies"));
        assert!(store.exists(&"Assets/Enemies/Orc.prefab".into()));
    }

    #[test]
    fn create_directory_requires_parent() {
        let store = InMemoryStore::default();
        assert!(store.create_directory("Assets", "A").is_ok());
        assert!(matches!(
            store.create_directory("Assets/Missing", "B"),
            Err(StoreError::MissingDirectory(_))
        ));
    }

    #[test]
    fn create_new_requires_directory_and_free_path() {
        let store = InMemoryStore::default();
        let path = AssetPath::from("Assets/Nowhere/x.prefab");
        assert!(matches!(
            store.create_new(object("x"), &path),
            Err(StoreError::MissingDirectory(_))
        ));

        let path = AssetPath::from("Assets/x.prefab");
        store.create_new(object("x"), &path).unwrap();
        assert!(matches!(
            store.create_new(object("x"), &path),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn copy_assigns_new_identity() {
        let store = InMemoryStore::default();
        let original = store.insert("Assets/a.prefab", object("a"));
        let copy = store.copy(&original.path, &"Assets/b.prefab".into()).unwrap();
        assert_ne!(original.id, copy.id);
        assert_eq!(
            store.load(&copy.path).unwrap().unwrap().content,
            object("a")
        );
    }

    #[test]
    fn copy_refuses_to_overwrite() {
        let store = InMemoryStore::default();
        store.insert("Assets/a.prefab", object("a"));
        store.insert("Assets/b.prefab", object("b"));
        let result = store.copy(&"Assets/a.prefab".into(), &"Assets/b.prefab".into());
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn copy_fields_onto_keeps_identity() {
        let store = InMemoryStore::default();
        let handle = store.insert("Assets/a.prefab", object("a"));
        store.copy_fields_onto(object("renamed"), &handle).unwrap();
        let stored = store.load(&handle.path).unwrap().unwrap();
        assert_eq!(stored.handle.id, handle.id);
        assert_eq!(stored.content, object("renamed"));
    }

    #[test]
    fn copy_fields_onto_rejects_stale_handle() {
        let store = InMemoryStore::default();
        let old = store.insert("Assets/a.prefab", object("a"));
        store.insert("Assets/a.prefab", object("a"));
        assert!(matches!(
            store.copy_fields_onto(object("b"), &old),
            Err(StoreError::StaleHandle(_))
        ));
    }

    #[test]
    fn load_all_named_lists_sprites() {
        let store = InMemoryStore::default();
        store.insert(
            "Assets/Sheet.png",
            AssetContent::Images(ImageContainer::with_names(["a", "b"])),
        );
        let names: Vec<_> = store
            .load_all_named(&"Assets/Sheet.png".into())
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(store.load_all_named(&"Assets/None.png".into()).unwrap().is_empty());
    }

    #[test]
    fn commit_resets_pending_writes() {
        let store = InMemoryStore::default();
        store.create_new(object("x"), &"Assets/x.prefab".into()).unwrap();
        assert_eq!(store.stats().pending_writes, 1);
        store.commit().unwrap();
        let stats = store.stats();
        assert_eq!(stats.pending_writes, 0);
        assert_eq!(stats.commits, 1);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let store = InMemoryStore::default();
        let a = store.insert("Assets/a.prefab", object("same"));
        let b = store.insert("Assets/b.prefab", object("same"));
        assert_eq!(
            store.fingerprint(&a.path).unwrap(),
            store.fingerprint(&b.path).unwrap()
        );
        assert!(store.fingerprint(&"Assets/none".into()).unwrap().is_none());
    }
}
