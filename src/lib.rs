//! Bounded-arity trees with ordered insertion and six traversal orders.
//!
//! A [`Tree`] owns every node it stores and limits each node to a fixed
//! number of children (its arity, 2 by default). Values enter the tree by
//! copy, either from a [`Node`] template matched against existing values or
//! through a [`NodeId`] handle:
//!
//! ```
//! use ktree::{Node, Tree};
//!
//! let mut tree = Tree::new();
//! tree.add_root(&Node::new(1.1)).unwrap();
//! tree.add_sub_node(&Node::new(1.1), &Node::new(1.2)).unwrap();
//! tree.add_sub_node(&Node::new(1.1), &Node::new(1.3)).unwrap();
//!
//! let values: Vec<f64> = tree.post_order().map(|n| *n.value()).collect();
//! assert_eq!(values, vec![1.2, 1.3, 1.1]);
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod node;
pub mod traversal;
pub mod tree;
pub mod tree_traits;
pub mod util;

pub use errors::{TreeError, TreeResult};
pub use node::Node;
pub use traversal::{Order, Traversal};
pub use tree::{NodeId, NodeRef, Tree, DEFAULT_ARITY};
pub use tree_traits::TreeConvert;
