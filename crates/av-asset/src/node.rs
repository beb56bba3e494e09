//! Object trees
//!
//! A scene is an ordered list of root [`ObjectNode`]s; a prefab is a single
//! root node. Nodes own their children, so the hierarchy is a tree by
//! construction.

use crate::image::ResourceRef;
use crate::path::AssetPath;
use serde::{Deserialize, Serialize};

/// Component types that animation curves can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Draws a sprite; the image capability
    SpriteRenderer,
    /// Plays an animation controller; the animation capability
    Animator,
    /// Position, rotation and scale
    Transform,
}

/// Image capability: the node draws one sprite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCapability {
    pub sprite: ResourceRef,
}

/// Animation capability: the node is driven by an animation asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationCapability {
    pub controller: AssetPath,
}

/// A node in an object tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectNode {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<ImageCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    animation: Option<AnimationCapability>,
    /// Prefab this node was instantiated from, if still connected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefab_link: Option<AssetPath>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ObjectNode>,
}

impl ObjectNode {
    /// Create a node without capabilities or children
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            animation: None,
            prefab_link: None,
            children: Vec::new(),
        }
    }

    /// With an image capability drawing `sprite`
    #[inline]
    #[must_use]
    pub fn with_sprite(mut self, sprite: ResourceRef) -> Self {
        self.image = Some(ImageCapability { sprite });
        self
    }

    /// With an animation capability driven by `controller`
    #[inline]
    #[must_use]
    pub fn with_animation(mut self, controller: impl Into<AssetPath>) -> Self {
        self.animation = Some(AnimationCapability {
            controller: controller.into(),
        });
        self
    }

    /// With a prefab connection
    #[inline]
    #[must_use]
    pub fn with_prefab_link(mut self, prefab: impl Into<AssetPath>) -> Self {
        self.prefab_link = Some(prefab.into());
        self
    }

    /// With an appended child
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: ObjectNode) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn image_capability(&self) -> Option<&ImageCapability> {
        self.image.as_ref()
    }

    #[inline]
    pub fn image_capability_mut(&mut self) -> Option<&mut ImageCapability> {
        self.image.as_mut()
    }

    #[inline]
    #[must_use]
    pub fn animation_capability(&self) -> Option<&AnimationCapability> {
        self.animation.as_ref()
    }

    #[inline]
    pub fn animation_capability_mut(&mut self) -> Option<&mut AnimationCapability> {
        self.animation.as_mut()
    }

    #[inline]
    #[must_use]
    pub fn prefab_link(&self) -> Option<&AssetPath> {
        self.prefab_link.as_ref()
    }

    /// Break the connection to the source prefab, returning whether one existed
    #[inline]
    pub fn disconnect_prefab(&mut self) -> bool {
        self.prefab_link.take().is_some()
    }

    /// Children in order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[ObjectNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut [ObjectNode] {
        &mut self.children
    }

    /// First descendant (including self) with the given name, pre-order
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ObjectNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Number of nodes in this subtree
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ObjectNode::subtree_len).sum::<usize>()
    }
}

/// Ordered root nodes of a scene
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneGraph {
    pub roots: Vec<ObjectNode>,
}

impl SceneGraph {
    #[inline]
    #[must_use]
    pub fn new(roots: Vec<ObjectNode>) -> Self {
        Self { roots }
    }

    /// First node with the given name across all roots, pre-order
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ObjectNode> {
        self.roots.iter().find_map(|root| root.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObjectNode {
        ObjectNode::new("root")
            .with_child(
                ObjectNode::new("a")
                    .with_sprite(ResourceRef::new("Assets/s.png", "x"))
                    .with_child(ObjectNode::new("a1")),
            )
            .with_child(ObjectNode::new("b").with_animation("Assets/b.anim"))
    }

    #[test]
    fn capabilities_are_optional() {
        let node = sample();
        assert!(node.image_capability().is_none());
        assert!(node.find("a").unwrap().image_capability().is_some());
        assert!(node.find("b").unwrap().animation_capability().is_some());
    }

    #[test]
    fn subtree_len_counts_all_nodes() {
        assert_eq!(sample().subtree_len(), 4);
    }

    #[test]
    fn disconnect_prefab_clears_link() {
        let mut node = ObjectNode::new("x").with_prefab_link("Assets/x.prefab");
        assert!(node.disconnect_prefab());
        assert!(node.prefab_link().is_none());
        assert!(!node.disconnect_prefab());
    }

    #[test]
    fn serde_skips_absent_capabilities() {
        let json = serde_json::to_string(&ObjectNode::new("bare")).unwrap();
        assert_eq!(json, r#"{"name":"bare"}"#);
        let back: ObjectNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ObjectNode::new("bare"));
    }
}
