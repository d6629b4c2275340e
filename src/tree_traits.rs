/*
Text rendering for trees and standalone nodes, built on termtree.

Both Tree and Node convert into a termtree::Tree<String>; Display for either
simply prints that conversion.
 */
use std::fmt;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::node::Node;
use crate::tree::Tree;

/// Label used when rendering a tree without a root.
pub const EMPTY_TREE_LABEL: &str = "(empty tree)";

pub trait TreeConvert {
    fn to_term_tree(&self) -> TermTree<String>;
}

impl<T: fmt::Display> TreeConvert for Node<T> {
    fn to_term_tree(&self) -> TermTree<String> {
        let leaves: Vec<_> = self.children().iter().map(|c| c.to_term_tree()).collect();
        TermTree::new(self.value().to_string()).with_leaves(leaves)
    }
}

impl<T: fmt::Display> TreeConvert for Tree<T> {
    #[instrument(level = "trace", skip(self))]
    fn to_term_tree(&self) -> TermTree<String> {
        // Children arrive before their parent: the last `child_count` rendered
        // subtrees always belong to the node at hand.
        let mut rendered: Vec<TermTree<String>> = Vec::with_capacity(self.len());
        for node in self.children_first() {
            let first_child = rendered.len().saturating_sub(node.child_count());
            let leaves: Vec<_> = rendered.drain(first_child..).collect();
            rendered.push(TermTree::new(node.value().to_string()).with_leaves(leaves));
        }

        rendered
            .pop()
            .unwrap_or_else(|| TermTree::new(EMPTY_TREE_LABEL.to_string()))
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_term_tree())
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_term_tree())
    }
}
