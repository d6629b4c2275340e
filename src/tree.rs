use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node::Node;

/// Arity used by [`Tree::new`]: a binary tree.
pub const DEFAULT_ARITY: usize = 2;

/// Handle to a node stored inside a [`Tree`].
///
/// Handles are only minted by the tree that stores the node. Using a handle
/// with a different tree is not detected reliably and yields `UnknownNode`
/// at best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// Node as stored in the arena.
#[derive(Debug, Clone)]
pub(crate) struct TreeNode<T> {
    pub(crate) value: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Arena-based tree with a fixed maximum number of children per node.
///
/// The tree exclusively owns every stored node. Values enter the tree by copy,
/// either from a [`Node`] template or directly through a parent handle, so a
/// caller's own nodes never become part of the graph and cycles cannot form.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    arena: Arena<TreeNode<T>>,
    root: Option<NodeId>,
    arity: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Creates an empty binary tree.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            arity: DEFAULT_ARITY,
        }
    }

    /// Creates an empty tree allowing at most `arity` children per node.
    pub fn with_arity(arity: usize) -> TreeResult<Self> {
        if arity == 0 {
            return Err(TreeError::InvalidArity(arity));
        }
        Ok(Self {
            arena: Arena::new(),
            root: None,
            arity,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Pre-, post- and in-order traversals are only defined for binary trees.
    pub fn is_binary(&self) -> bool {
        self.arity == 2
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.arena
            .get(id.0)
            .map(|node| NodeRef { tree: self, id, node })
    }

    pub(crate) fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    /// Number of levels, a lone root counts as one. Empty trees have depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back((root, 1));
        }

        while let Some((id, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.node(id) {
                for &child in &node.children {
                    queue.push_back((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Leaf nodes in depth-first order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<NodeRef<'_, T>> {
        self.dfs().filter(|n| n.is_leaf()).collect()
    }

    /// Installs the root, copying the template's value.
    ///
    /// Only the value is copied; any children of `template` are ignored.
    #[instrument(level = "debug", skip(self, template))]
    pub fn add_root(&mut self, template: &Node<T>) -> TreeResult<NodeId>
    where
        T: Clone,
    {
        if self.root.is_some() {
            debug!("Rejecting second root");
            return Err(TreeError::DuplicateRoot);
        }
        Ok(self.insert_node(template.value().clone(), None))
    }

    /// Attaches a copy of `child`'s value below the first node, in depth-first
    /// order, whose value equals `parent`'s value.
    ///
    /// Nodes are matched by value, not identity: when several nodes hold equal
    /// values the first one found wins. Prefer [`Tree::insert_child`] when the
    /// parent's handle is known.
    #[instrument(level = "debug", skip(self, parent, child))]
    pub fn add_sub_node(&mut self, parent: &Node<T>, child: &Node<T>) -> TreeResult<NodeId>
    where
        T: PartialEq + Clone,
    {
        if self.root.is_none() {
            debug!("Cannot attach to an empty tree");
            return Err(TreeError::EmptyTree);
        }
        let parent_id = self
            .find(parent.value())
            .map(|n| n.id())
            .ok_or_else(|| {
                debug!("No node matches the parent value");
                TreeError::ParentNotFound
            })?;
        self.insert_child(parent_id, child.value().clone())
    }

    /// Attaches `value` as the last child of the node behind `parent`.
    #[instrument(level = "trace", skip(self, value))]
    pub fn insert_child(&mut self, parent: NodeId, value: T) -> TreeResult<NodeId> {
        let child_count = self
            .node(parent)
            .map(|n| n.children.len())
            .ok_or(TreeError::UnknownNode)?;
        if child_count >= self.arity {
            debug!(child_count, arity = self.arity, "Parent is full");
            return Err(TreeError::ArityExceeded { arity: self.arity });
        }
        Ok(self.insert_node(value, Some(parent)))
    }

    /// Handle-based counterpart of [`Tree::add_sub_node`]: copies the
    /// template's value below `parent`.
    pub fn add_child_node(&mut self, parent: NodeId, child: &Node<T>) -> TreeResult<NodeId>
    where
        T: Clone,
    {
        self.insert_child(parent, child.value().clone())
    }

    /// First node in depth-first order whose value equals `value`.
    #[instrument(level = "trace", skip(self, value))]
    pub fn find(&self, value: &T) -> Option<NodeRef<'_, T>>
    where
        T: PartialEq,
    {
        self.dfs().find(|n| n.value() == value)
    }

    fn insert_node(&mut self, value: T, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            value,
            parent,
            children: Vec::new(),
        };
        let node_id = NodeId(self.arena.insert(node));

        if let Some(parent_id) = parent {
            if let Some(parent) = self.arena.get_mut(parent_id.0) {
                parent.children.push(node_id);
            }
        } else {
            self.root = Some(node_id);
        }

        node_id
    }
}

/// Read-only view of a stored node.
///
/// Borrows the tree, so it cannot outlive the tree or survive a mutation.
pub struct NodeRef<'a, T> {
    tree: &'a Tree<T>,
    id: NodeId,
    node: &'a TreeNode<T>,
}

impl<'a, T> NodeRef<'a, T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'a T {
        &self.node.value
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.node.parent.and_then(|id| self.tree.get(id))
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a {
        let tree = self.tree;
        self.node.children.iter().filter_map(move |&id| tree.get(id))
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("value", &self.node.value)
            .field("children", &self.node.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_zero_arity_when_creating_tree_then_fails() {
        let result = Tree::<i32>::with_arity(0);
        assert_eq!(result.err(), Some(TreeError::InvalidArity(0)));
    }

    #[test]
    fn given_new_tree_then_is_empty_binary_tree() {
        let tree = Tree::<i32>::new();
        assert!(tree.is_empty());
        assert!(tree.is_binary());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert!(tree.root().is_none());
    }

    #[test]
    fn given_child_when_inserted_then_parent_link_is_set() {
        let mut tree = Tree::new();
        let root = tree.add_root(&Node::new("a")).unwrap();
        let child = tree.insert_child(root, "b").unwrap();

        let child_ref = tree.get(child).unwrap();
        assert_eq!(child_ref.parent().map(|p| p.id()), Some(root));
        assert!(tree.get(root).unwrap().parent().is_none());
    }

    #[test]
    fn given_handle_from_other_tree_when_inserting_then_unknown_node() {
        let mut other = Tree::new();
        let a = other.add_root(&Node::new(1)).unwrap();
        let b = other.insert_child(a, 2).unwrap();

        let mut tree = Tree::new();
        tree.add_root(&Node::new(10)).unwrap();

        assert_eq!(tree.insert_child(b, 3), Err(TreeError::UnknownNode));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn given_chain_when_computing_depth_then_counts_levels() {
        let mut tree = Tree::with_arity(1).unwrap();
        let mut id = tree.add_root(&Node::new(0)).unwrap();
        for i in 1..5 {
            id = tree.insert_child(id, i).unwrap();
        }
        assert_eq!(tree.depth(), 5);
        assert_eq!(tree.leaves().len(), 1);
        assert_eq!(*tree.leaves()[0].value(), 4);
    }
}
