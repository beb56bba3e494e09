//! Scene hosting contract
//!
//! A [`GraphHost`] opens a stored scene as an editable [`SceneGraph`], saves
//! it back and closes it. [`StoreGraphHost`] implements the contract on top of
//! any [`AssetStore`].

use crate::error::StoreError;
use crate::store::{require_typed, AssetStore};
use av_asset::{AssetHandle, AssetPath, SceneGraph, TypedAsset};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Handle to an open scene
#[derive(Debug, PartialEq, Eq)]
pub struct GraphHandle {
    asset: AssetHandle,
}

impl GraphHandle {
    /// Path of the open scene
    #[inline]
    #[must_use]
    pub fn path(&self) -> &AssetPath {
        &self.asset.path
    }

    /// Identity of the stored scene
    #[inline]
    #[must_use]
    pub fn asset(&self) -> &AssetHandle {
        &self.asset
    }
}

/// Host for editable scene graphs
pub trait GraphHost {
    /// Open the scene at `path` and return an editable copy of its roots
    ///
    /// # Errors
    /// Returns error if the scene is missing, not a scene, or already open
    fn open_graph_copy(&self, path: &AssetPath) -> Result<(GraphHandle, SceneGraph), StoreError>;

    /// Write `graph` back to the scene behind `handle`
    ///
    /// # Errors
    /// Returns error if the scene is not open or cannot be written
    fn save_graph(&self, handle: &GraphHandle, graph: &SceneGraph) -> Result<(), StoreError>;

    /// Close the scene; edits since the last save are dropped
    ///
    /// # Errors
    /// Returns error if the scene is not open
    fn close_graph(&self, handle: GraphHandle, discard_if_unsaved: bool) -> Result<(), StoreError>;
}

/// Open-scene bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenState {
    saved: bool,
}

/// [`GraphHost`] over scenes held by an [`AssetStore`]
#[derive(Debug)]
pub struct StoreGraphHost<'s, S: AssetStore> {
    store: &'s S,
    open: Mutex<BTreeMap<AssetPath, OpenState>>,
}

impl<'s, S: AssetStore> StoreGraphHost<'s, S> {
    #[inline]
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            open: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of scenes currently open
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }

    /// Check whether the scene at `path` is open
    #[must_use]
    pub fn is_open(&self, path: &AssetPath) -> bool {
        self.open.lock().contains_key(path)
    }
}

impl<S: AssetStore> GraphHost for StoreGraphHost<'_, S> {
    fn open_graph_copy(&self, path: &AssetPath) -> Result<(GraphHandle, SceneGraph), StoreError> {
        let mut open = self.open.lock();
        if open.contains_key(path) {
            return Err(StoreError::GraphAlreadyOpen(path.clone()));
        }
        let (asset, graph) = require_typed::<SceneGraph, _>(self.store, path)?;
        open.insert(path.clone(), OpenState { saved: false });
        tracing::debug!(scene = %path, roots = graph.roots.len(), "opened scene");
        Ok((GraphHandle { asset }, graph))
    }

    fn save_graph(&self, handle: &GraphHandle, graph: &SceneGraph) -> Result<(), StoreError> {
        let mut open = self.open.lock();
        let state = open
            .get_mut(handle.path())
            .ok_or_else(|| StoreError::GraphNotOpen(handle.path().clone()))?;
        self.store
            .copy_fields_onto(graph.clone().into_content(), &handle.asset)?;
        state.saved = true;
        Ok(())
    }

    fn close_graph(&self, handle: GraphHandle, discard_if_unsaved: bool) -> Result<(), StoreError> {
        let state = self
            .open
            .lock()
            .remove(handle.path())
            .ok_or_else(|| StoreError::GraphNotOpen(handle.path().clone()))?;
        if !state.saved && !discard_if_unsaved {
            tracing::warn!(scene = %handle.path(), "closed scene without saving");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use av_asset::{AssetContent, ObjectNode};

    fn store_with_scene() -> InMemoryStore {
        let store = InMemoryStore::default();
        store.insert(
            "Assets/Level.unity",
            AssetContent::Scene(SceneGraph::new(vec![ObjectNode::new("Root")])),
        );
        store
    }

    #[test]
    fn open_save_close() {
        let store = store_with_scene();
        let host = StoreGraphHost::new(&store);
        let path = AssetPath::from("Assets/Level.unity");

        let (handle, mut graph) = host.open_graph_copy(&path).unwrap();
        assert!(host.is_open(&path));
        graph.roots.push(ObjectNode::new("Added"));
        host.save_graph(&handle, &graph).unwrap();
        host.close_graph(handle, true).unwrap();

        assert_eq!(host.open_count(), 0);
        let stored = store.load(&path).unwrap().unwrap();
        assert_eq!(stored.content, AssetContent::Scene(graph));
    }

    #[test]
    fn open_twice_fails() {
        let store = store_with_scene();
        let host = StoreGraphHost::new(&store);
        let path = AssetPath::from("Assets/Level.unity");
        let (_handle, _) = host.open_graph_copy(&path).unwrap();
        assert!(matches!(
            host.open_graph_copy(&path),
            Err(StoreError::GraphAlreadyOpen(_))
        ));
    }

    #[test]
    fn open_non_scene_fails() {
        let store = InMemoryStore::default();
        store.insert("Assets/Orc.prefab", AssetContent::Object(ObjectNode::new("Orc")));
        let host = StoreGraphHost::new(&store);
        assert!(matches!(
            host.open_graph_copy(&"Assets/Orc.prefab".into()),
            Err(StoreError::WrongKind { .. })
        ));
        assert_eq!(host.open_count(), 0);
    }

    #[test]
    fn close_without_save_leaves_store_untouched() {
        let store = store_with_scene();
        let host = StoreGraphHost::new(&store);
        let path = AssetPath::from("Assets/Level.unity");
        let before = store.fingerprint(&path).unwrap();

        let (handle, mut graph) = host.open_graph_copy(&path).unwrap();
        graph.roots.clear();
        host.close_graph(handle, true).unwrap();

        assert_eq!(store.fingerprint(&path).unwrap(), before);
    }
}
