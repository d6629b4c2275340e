//! Standalone owned tree node.
//!
//! A `Node` owns its value and its children outright. It is the template type
//! handed to [`Tree`](crate::tree::Tree): the tree copies the node's value into
//! storage of its own and never links the caller's node into its graph.

/// Owned tree vertex: a value plus an ordered sequence of owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    value: T,
    children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<T: Clone> Node<T> {
    /// Appends a new child holding a copy of `value` and returns it.
    ///
    /// Never fails: a standalone node has no arity limit, that is enforced
    /// by the tree before it stores anything.
    pub fn add_child(&mut self, value: &T) -> &mut Node<T> {
        self.children.push(Node::new(value.clone()));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
}
