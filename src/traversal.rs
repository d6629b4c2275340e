//! Traversal orders over a [`Tree`].
//!
//! Every traversal is a lazy iterator of [`NodeRef`]s borrowing the tree.
//! Iterators are `Clone`, so a traversal can be restarted from any saved copy.
//! All walks use explicit stacks or queues; tree height does not grow the
//! call stack.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::tree::{NodeId, NodeRef, Tree};

/// Traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Node, then each child subtree left to right (binary trees)
    PreOrder,
    /// Each child subtree left to right, then node (binary trees)
    PostOrder,
    /// First subtree, node, second subtree (binary trees)
    InOrder,
    /// Level by level from the root
    #[serde(alias = "bfs")]
    #[value(alias = "bfs")]
    BreadthFirst,
    /// Node, then each child subtree in insertion order (any arity)
    #[serde(alias = "dfs")]
    #[value(alias = "dfs")]
    DepthFirst,
    /// All nodes arranged as a max-heap by value
    Heap,
}

impl Order {
    pub const ALL: [Order; 6] = [
        Order::PreOrder,
        Order::PostOrder,
        Order::InOrder,
        Order::BreadthFirst,
        Order::DepthFirst,
        Order::Heap,
    ];

    /// Orders that are only meaningful when every node has at most two children.
    pub fn requires_binary(self) -> bool {
        matches!(self, Order::PreOrder | Order::PostOrder | Order::InOrder)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Order::PreOrder => "pre-order",
            Order::PostOrder => "post-order",
            Order::InOrder => "in-order",
            Order::BreadthFirst => "breadth-first",
            Order::DepthFirst => "depth-first",
            Order::Heap => "heap",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Order as ValueEnum>::from_str(s, true).map_err(|_| format!("unknown traversal order: {s}"))
    }
}

impl<T> Tree<T> {
    /// Pre-order walk; non-binary trees yield depth-first order.
    pub fn pre_order(&self) -> Traversal<'_, T> {
        self.binary_only(Walk::DepthFirst)
    }

    /// Post-order walk; non-binary trees yield depth-first order.
    pub fn post_order(&self) -> Traversal<'_, T> {
        self.binary_only(Walk::PostOrder)
    }

    /// In-order walk; non-binary trees yield depth-first order.
    pub fn in_order(&self) -> Traversal<'_, T> {
        self.binary_only(Walk::InOrder)
    }

    pub fn bfs(&self) -> Traversal<'_, T> {
        self.walk(Walk::BreadthFirst)
    }

    pub fn dfs(&self) -> Traversal<'_, T> {
        self.walk(Walk::DepthFirst)
    }

    /// All nodes, collected depth-first, then arranged as a max-heap by value.
    ///
    /// The greatest value comes first; the rest is heap-ordered, not sorted.
    #[instrument(level = "trace", skip(self))]
    pub fn heap(&self) -> Traversal<'_, T>
    where
        T: PartialOrd,
    {
        let mut nodes: Vec<NodeRef<'_, T>> = self.dfs().collect();
        make_max_heap(&mut nodes, |a, b| a.value() < b.value());
        Traversal {
            inner: Inner::Heap(nodes.into_iter()),
        }
    }

    /// Walks the tree in `order`, falling back to depth-first order for
    /// binary-only orders on non-binary trees.
    pub fn traverse(&self, order: Order) -> Traversal<'_, T>
    where
        T: PartialOrd,
    {
        match order {
            Order::PreOrder => self.pre_order(),
            Order::PostOrder => self.post_order(),
            Order::InOrder => self.in_order(),
            Order::BreadthFirst => self.bfs(),
            Order::DepthFirst => self.dfs(),
            Order::Heap => self.heap(),
        }
    }

    /// Like [`Tree::traverse`] but refuses binary-only orders on non-binary
    /// trees instead of substituting depth-first order.
    pub fn try_traverse(&self, order: Order) -> TreeResult<Traversal<'_, T>>
    where
        T: PartialOrd,
    {
        if order.requires_binary() && !self.is_binary() {
            debug!(%order, arity = self.arity(), "Refusing binary-only traversal");
            return Err(TreeError::UnsupportedOrder {
                order,
                arity: self.arity(),
            });
        }
        Ok(self.traverse(order))
    }

    /// Children before parents for any arity.
    pub(crate) fn children_first(&self) -> Traversal<'_, T> {
        self.walk(Walk::PostOrder)
    }

    fn binary_only(&self, walk: Walk) -> Traversal<'_, T> {
        if self.is_binary() {
            self.walk(walk)
        } else {
            self.walk(Walk::DepthFirst)
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn walk(&self, walk: Walk) -> Traversal<'_, T> {
        let root = self.root_id();
        let inner = match walk {
            Walk::DepthFirst => Inner::DepthFirst(DepthFirst {
                tree: self,
                stack: root.into_iter().collect(),
            }),
            Walk::PostOrder => Inner::PostOrder(PostOrder {
                tree: self,
                stack: root.map(|id| (id, false)).into_iter().collect(),
            }),
            Walk::InOrder => Inner::InOrder(InOrder {
                tree: self,
                stack: root.map(|id| (id, false)).into_iter().collect(),
            }),
            Walk::BreadthFirst => Inner::BreadthFirst(BreadthFirst {
                tree: self,
                queue: root.into_iter().collect(),
            }),
        };
        Traversal { inner }
    }
}

/// Structural walks; pre-order and depth-first share one algorithm.
#[derive(Debug, Clone, Copy)]
enum Walk {
    DepthFirst,
    PostOrder,
    InOrder,
    BreadthFirst,
}

/// Lazy, restartable sequence of nodes produced by a traversal.
pub struct Traversal<'a, T> {
    inner: Inner<'a, T>,
}

enum Inner<'a, T> {
    DepthFirst(DepthFirst<'a, T>),
    PostOrder(PostOrder<'a, T>),
    InOrder(InOrder<'a, T>),
    BreadthFirst(BreadthFirst<'a, T>),
    Heap(std::vec::IntoIter<NodeRef<'a, T>>),
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::DepthFirst(it) => it.next(),
            Inner::PostOrder(it) => it.next(),
            Inner::InOrder(it) => it.next(),
            Inner::BreadthFirst(it) => it.next(),
            Inner::Heap(it) => it.next(),
        }
    }
}

impl<T> FusedIterator for Traversal<'_, T> {}

impl<T> Clone for Traversal<'_, T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::DepthFirst(it) => Inner::DepthFirst(DepthFirst {
                tree: it.tree,
                stack: it.stack.clone(),
            }),
            Inner::PostOrder(it) => Inner::PostOrder(PostOrder {
                tree: it.tree,
                stack: it.stack.clone(),
            }),
            Inner::InOrder(it) => Inner::InOrder(InOrder {
                tree: it.tree,
                stack: it.stack.clone(),
            }),
            Inner::BreadthFirst(it) => Inner::BreadthFirst(BreadthFirst {
                tree: it.tree,
                queue: it.queue.clone(),
            }),
            Inner::Heap(it) => Inner::Heap(it.clone()),
        };
        Self { inner }
    }
}

struct DepthFirst<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for DepthFirst<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return self.tree.get(current);
            }
        }
        None
    }
}

struct PostOrder<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> Iterator for PostOrder<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if visited {
                return self.tree.get(current);
            }
            if let Some(node) = self.tree.node(current) {
                self.stack.push((current, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

struct InOrder<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, expanded)) = self.stack.pop() {
            if expanded {
                return self.tree.get(current);
            }
            if let Some(node) = self.tree.node(current) {
                // Stack order: second subtree, node, first subtree
                if let Some(&second) = node.children.get(1) {
                    self.stack.push((second, false));
                }
                self.stack.push((current, true));
                if let Some(&first) = node.children.first() {
                    self.stack.push((first, false));
                }
            }
        }
        None
    }
}

struct BreadthFirst<'a, T> {
    tree: &'a Tree<T>,
    queue: VecDeque<NodeId>,
}

impl<'a, T> Iterator for BreadthFirst<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.queue.pop_front() {
            if let Some(node) = self.tree.node(current) {
                self.queue.extend(node.children.iter().copied());
                return self.tree.get(current);
            }
        }
        None
    }
}

/// Rearranges `items` into a max-heap (bottom-up sift-down).
///
/// `less(a, b)` must return true only when `a` orders strictly before `b`;
/// incomparable pairs count as not less and are left in place.
pub(crate) fn make_max_heap<E, F>(items: &mut [E], less: F)
where
    F: Fn(&E, &E) -> bool,
{
    let len = items.len();
    for start in (0..len / 2).rev() {
        sift_down(items, start, &less);
    }
}

fn sift_down<E, F>(items: &mut [E], mut pos: usize, less: &F)
where
    F: Fn(&E, &E) -> bool,
{
    let len = items.len();
    loop {
        let left = 2 * pos + 1;
        if left >= len {
            break;
        }
        let right = left + 1;
        let mut largest = left;
        if right < len && less(&items[left], &items[right]) {
            largest = right;
        }
        if !less(&items[pos], &items[largest]) {
            break;
        }
        items.swap(pos, largest);
        pos = largest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_max_heap(items: &[i32]) -> bool {
        (1..items.len()).all(|i| items[(i - 1) / 2] >= items[i])
    }

    #[test]
    fn given_ascending_values_when_heapifying_then_heap_property_holds() {
        let mut items: Vec<i32> = (1..=20).collect();
        make_max_heap(&mut items, |a, b| a < b);
        assert!(is_max_heap(&items));
        assert_eq!(items[0], 20);
    }

    #[test]
    fn given_short_slices_when_heapifying_then_no_panic() {
        let mut empty: Vec<i32> = vec![];
        make_max_heap(&mut empty, |a, b| a < b);
        let mut single = vec![7];
        make_max_heap(&mut single, |a, b| a < b);
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn given_nan_values_when_heapifying_then_incomparables_stay_put() {
        let mut items = vec![f64::NAN, 1.0, 2.0];
        make_max_heap(&mut items, |a, b| a < b);
        assert!(items[0].is_nan());
        assert_eq!(&items[1..], &[1.0, 2.0]);
    }

    #[test]
    fn given_order_names_when_parsing_then_accepts_aliases() {
        assert_eq!("pre-order".parse::<Order>(), Ok(Order::PreOrder));
        assert_eq!("BFS".parse::<Order>(), Ok(Order::BreadthFirst));
        assert_eq!("dfs".parse::<Order>(), Ok(Order::DepthFirst));
        assert!("sideways".parse::<Order>().is_err());
    }

    #[test]
    fn given_every_order_when_displayed_then_round_trips_through_parse() {
        for order in Order::ALL {
            assert_eq!(order.to_string().parse::<Order>(), Ok(order));
        }
    }
}
