//! Scoped scene editing
//!
//! A [`SceneSession`] owns an open scene. Closing is explicit through
//! [`SceneSession::close`]; a session dropped on an early return closes the
//! scene with its unsaved edits discarded.

use crate::error::VariantError;
use av_asset::{AssetPath, ObjectNode, SceneGraph};
use av_store::{GraphHandle, GraphHost};

/// Open scene that is closed on every exit path
pub struct SceneSession<'h, H: GraphHost + ?Sized> {
    host: &'h H,
    handle: Option<GraphHandle>,
    graph: SceneGraph,
}

impl<'h, H: GraphHost + ?Sized> SceneSession<'h, H> {
    /// Open the scene at `path`
    ///
    /// # Errors
    /// Returns error if the host cannot open the scene
    pub fn open(host: &'h H, path: &AssetPath) -> Result<Self, VariantError> {
        let (handle, graph) = host.open_graph_copy(path)?;
        Ok(Self {
            host,
            handle: Some(handle),
            graph,
        })
    }

    /// Scene being edited
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Root nodes, in scene order
    #[inline]
    pub fn roots_mut(&mut self) -> &mut [ObjectNode] {
        &mut self.graph.roots
    }

    /// Write the current graph back to the scene
    ///
    /// # Errors
    /// Returns error if the host fails to save
    pub fn save(&self) -> Result<(), VariantError> {
        if let Some(handle) = &self.handle {
            self.host.save_graph(handle, &self.graph)?;
        }
        Ok(())
    }

    /// Close the scene, keeping what was saved
    ///
    /// # Errors
    /// Returns error if the host fails to close
    pub fn close(mut self) -> Result<(), VariantError> {
        match self.handle.take() {
            Some(handle) => Ok(self.host.close_graph(handle, false)?),
            None => Ok(()),
        }
    }
}

impl<H: GraphHost + ?Sized> Drop for SceneSession<'_, H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let path = handle.path().clone();
            tracing::debug!(scene = %path, "closing scene after early exit");
            if let Err(err) = self.host.close_graph(handle, true) {
                tracing::warn!(scene = %path, error = %err, "failed to close scene");
            }
        }
    }
}

impl<H: GraphHost + ?Sized> std::fmt::Debug for SceneSession<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneSession")
            .field("handle", &self.handle)
            .field("roots", &self.graph.roots.len())
            .finish_non_exhaustive()
    }
}
