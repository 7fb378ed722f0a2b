//! Arena-backed node hierarchy
//!
//! Nodes live in a slotmap arena and refer to each other through stable
//! [`NodeKey`] handles: parents hold child keys, children hold a non-owning
//! parent back-reference. Traversals return snapshot key vectors, so
//! callers may restructure the tree while walking a result without
//! invalidating iteration.
//!
//! Transforms compose along the root-to-node parent chain on every query;
//! nothing is cached, so there is no cached state to invalidate when a
//! node moves.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{rotate_turns, Point2, Vec2};
use crate::scene::behavior::{Behavior, DrawPayload};

new_key_type! {
    /// Stable handle to a node in a [`SceneTree`] arena
    pub struct NodeKey;
}

/// A positioned node in the scene hierarchy
///
/// Carries a local offset and rotation relative to its parent, a depth key
/// used for back-to-front draw ordering, and optional behavior and draw
/// payload. The draw payload is opaque to the core; the external renderer
/// interprets it.
pub struct Node {
    /// Optional debug/lookup name
    pub name: Option<String>,

    /// Whether the node is drawn
    pub visible: bool,

    /// Depth key; candidates are sorted by descending `z` for
    /// back-to-front drawing
    pub z: f32,

    /// Offset relative to the parent, in the parent's rotated frame
    pub offset: Vec2,

    /// Rotation relative to the parent, in turns
    pub rotation: f32,

    /// Renderable payload, read by the external renderer
    pub payload: Option<DrawPayload>,

    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Create a visible node at the parent's origin
    pub fn new() -> Self {
        Self {
            name: None,
            visible: true,
            z: 0.0,
            offset: Vec2::zeros(),
            rotation: 0.0,
            payload: None,
            behavior: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the node's name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Set the local rotation, in turns
    pub fn with_rotation(mut self, turns: f32) -> Self {
        self.rotation = turns;
        self
    }

    /// Set the depth key
    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    /// Set the draw payload
    pub fn with_payload(mut self, payload: DrawPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set the tick behavior
    pub fn with_behavior(mut self, behavior: Box<dyn Behavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// This node's parent, if it is not the root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Keys of this node's direct children
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("z", &self.z)
            .field("offset", &self.offset)
            .field("rotation", &self.rotation)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("has_behavior", &self.behavior.is_some())
            .finish()
    }
}

/// Rooted tree of scene nodes
///
/// Owns every node through the arena; the hierarchy itself is expressed
/// only with keys. The unique-parent invariant holds by construction:
/// attaching an already-parented node detaches it from its current parent
/// first.
#[derive(Debug)]
pub struct SceneTree {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Create a tree holding only an unnamed root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new().with_name("root"));
        Self { nodes, root }
    }

    /// Key of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only detached storage (never true: the root
    /// always exists)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a key refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Borrow a node
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Insert a new node as a child of `parent` and return its key
    ///
    /// An invalid parent key is logged as an error and the node is
    /// attached under the root instead.
    pub fn add_child(&mut self, parent: NodeKey, node: Node) -> NodeKey {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            log::error!("add_child: parent {parent:?} is not alive, attaching under root");
            self.root
        };
        let key = self.nodes.insert(node);
        self.nodes[key].parent = Some(parent);
        self.nodes[parent].children.push(key);
        key
    }

    /// Insert a new node as a sibling of `of` and return its key
    ///
    /// The root has no parent, so requesting a sibling of the root is
    /// logged as an error and the root's own key is returned unchanged.
    pub fn add_sibling(&mut self, of: NodeKey, node: Node) -> NodeKey {
        match self.nodes.get(of).and_then(|n| n.parent) {
            Some(parent) => self.add_child(parent, node),
            None => {
                log::error!("add_sibling: node {of:?} has no parent (is it the root?)");
                of
            }
        }
    }

    /// Re-parent an existing node under `parent`
    ///
    /// The child is detached from its current parent first, so a node is
    /// never reachable from two parents at once. Attaching a node to one
    /// of its own descendants would cut the subtree loose from the root;
    /// that request is logged as an error and ignored.
    pub fn attach(&mut self, parent: NodeKey, child: NodeKey) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("attach: parent {parent:?} or child {child:?} is not alive");
            return;
        }
        if child == self.root {
            log::error!("attach: the root cannot be given a parent");
            return;
        }
        if self.path_from_root(parent).contains(&child) {
            log::error!("attach: {parent:?} is a descendant of {child:?}, refusing cycle");
            return;
        }

        if self.nodes[child].parent.is_some() {
            self.detach(child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Detach a node from its parent
    ///
    /// Not cascading: descendants stay alive, reachable only through the
    /// now-orphaned subtree root. Detaching the root (or an already
    /// detached node) is a warning and a no-op.
    pub fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.nodes.get(key).and_then(|n| n.parent) else {
            log::warn!("detach: node {key:?} has no parent");
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != key);
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
    }

    /// Detach a node and destroy it together with all of its descendants
    ///
    /// Destroying the root is logged as an error and ignored.
    pub fn remove_subtree(&mut self, key: NodeKey) {
        if key == self.root {
            log::error!("remove_subtree: refusing to destroy the root");
            return;
        }
        if !self.nodes.contains_key(key) {
            log::warn!("remove_subtree: node {key:?} is not alive");
            return;
        }
        if self.nodes[key].parent.is_some() {
            self.detach(key);
        }
        for doomed in self.all_nodes(key) {
            self.nodes.remove(doomed);
        }
    }

    /// Ordered keys from the root down to and including `key`
    ///
    /// Computed fresh on every call by walking parent links bottom-up and
    /// reversing. A dead key yields an empty path.
    pub fn path_from_root(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut path = Vec::new();
        let mut cursor = Some(key);
        while let Some(k) = cursor {
            let Some(node) = self.nodes.get(k) else {
                log::warn!("path_from_root: node {k:?} is not alive");
                return Vec::new();
            };
            path.push(k);
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    /// Accumulated rotation along the root-to-node path, in turns
    pub fn relative_rotation(&self, key: NodeKey) -> f32 {
        self.path_from_root(key)
            .iter()
            .filter_map(|k| self.nodes.get(*k))
            .map(|n| n.rotation)
            .sum()
    }

    /// Accumulated offset along the root-to-node path
    ///
    /// Standard parent-to-child 2D affine composition, done with explicit
    /// rotation of each local offset instead of matrix products: each
    /// node's local offset is rotated by the rotation accumulated *before*
    /// that node's own rotation joins the sum.
    pub fn relative_offset(&self, key: NodeKey) -> Vec2 {
        let mut total = Vec2::zeros();
        let mut rotation = 0.0;
        for k in self.path_from_root(key) {
            if let Some(node) = self.nodes.get(k) {
                total += rotate_turns(node.offset, rotation);
                rotation += node.rotation;
            }
        }
        total
    }

    /// A node's composed position in world space
    pub fn world_position(&self, key: NodeKey) -> Point2 {
        Point2::origin() + self.relative_offset(key)
    }

    /// Snapshot of the subtree rooted at `from` in depth-first,
    /// children-before-self (post-order) order, `from` included last
    ///
    /// Being a snapshot, the result stays valid while the tree is mutated;
    /// keys removed after the call simply come back dead.
    pub fn all_nodes(&self, from: NodeKey) -> Vec<NodeKey> {
        let mut order = Vec::new();
        self.push_post_order(from, &mut order);
        order
    }

    fn push_post_order(&self, key: NodeKey, order: &mut Vec<NodeKey>) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        for child in &node.children {
            self.push_post_order(*child, order);
        }
        order.push(key);
    }

    /// First node with the given name, in arena order
    ///
    /// Absence is not an error here; callers that required a match log it
    /// themselves.
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name.as_deref() == Some(name))
            .map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn add_child_links_both_directions() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new().with_name("a"));

        assert_eq!(tree.get(a).unwrap().parent(), Some(root));
        assert_eq!(tree.get(root).unwrap().children(), &[a]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn add_sibling_of_root_degrades() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let result = tree.add_sibling(root, Node::new());
        assert_eq!(result, root);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn add_sibling_attaches_to_shared_parent() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_sibling(a, Node::new());
        assert_eq!(tree.get(b).unwrap().parent(), Some(root));
        assert_eq!(tree.get(root).unwrap().children(), &[a, b]);
    }

    #[test]
    fn attach_detaches_from_previous_parent() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_child(root, Node::new());
        let c = tree.add_child(a, Node::new());

        tree.attach(b, c);

        assert_eq!(tree.get(c).unwrap().parent(), Some(b));
        assert!(tree.get(a).unwrap().children().is_empty());
        assert_eq!(tree.get(b).unwrap().children(), &[c]);
    }

    #[test]
    fn attach_refuses_cycles() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_child(a, Node::new());

        tree.attach(b, a); // would orphan a-b from the root

        assert_eq!(tree.get(a).unwrap().parent(), Some(root));
        assert_eq!(tree.get(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn detach_is_not_cascading() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_child(a, Node::new());

        tree.detach(a);

        assert!(tree.contains(a));
        assert!(tree.contains(b));
        assert_eq!(tree.get(a).unwrap().parent(), None);
        assert_eq!(tree.get(b).unwrap().parent(), Some(a));
        // The orphaned subtree is no longer reachable from the root.
        assert_eq!(tree.all_nodes(root), vec![root]);
    }

    #[test]
    fn remove_subtree_destroys_descendants() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_child(a, Node::new());
        let c = tree.add_child(root, Node::new());

        tree.remove_subtree(a);

        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.contains(c));
        assert_eq!(tree.get(root).unwrap().children(), &[c]);
    }

    #[test]
    fn remove_subtree_spares_the_root() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        tree.remove_subtree(root);
        assert!(tree.contains(root));
    }

    #[test]
    fn path_runs_from_root_to_node() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_child(a, Node::new());

        assert_eq!(tree.path_from_root(b), vec![root, a, b]);
        assert_eq!(tree.path_from_root(root), vec![root]);
    }

    #[test]
    fn traversal_is_children_before_self() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new());
        let b = tree.add_child(a, Node::new());

        assert_eq!(tree.all_nodes(root), vec![b, a, root]);
        assert_eq!(tree.all_nodes(a), vec![b, a]);
    }

    #[test]
    fn rotation_accumulates_additively() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new().with_rotation(0.25));
        let b = tree.add_child(a, Node::new().with_rotation(0.5));

        assert_relative_eq!(tree.relative_rotation(b), 0.75);
    }

    #[test]
    fn offset_composes_through_parent_rotation() {
        // Root at rotation 0, child A offset (10, 0) rotated a quarter
        // turn, grandchild B offset (5, 0): B's local offset is rotated 90
        // degrees by A's rotation, landing B at about (10, 5).
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(
            root,
            Node::new().with_offset(Vec2::new(10.0, 0.0)).with_rotation(0.25),
        );
        let b = tree.add_child(a, Node::new().with_offset(Vec2::new(5.0, 0.0)));

        let offset = tree.relative_offset(b);
        assert_relative_eq!(offset.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(offset.y, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn find_by_name_matches_and_tolerates_absence() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.add_child(root, Node::new().with_name("player"));

        assert_eq!(tree.find_by_name("player"), Some(a));
        assert_eq!(tree.find_by_name("ghost"), None);
    }
}
