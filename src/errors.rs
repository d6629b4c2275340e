use thiserror::Error;

use crate::traversal::Order;

/// Errors raised by tree mutation and strict traversal requests.
///
/// Variants carry no payload values, so `T` does not need to be `Debug`.
/// A failed operation never leaves the tree partially modified.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    #[error("Root already exists")]
    DuplicateRoot,

    #[error("Tree has no root")]
    EmptyTree,

    #[error("Parent node not found")]
    ParentNotFound,

    #[error("Parent node already has the maximum of {arity} children")]
    ArityExceeded { arity: usize },

    #[error("Invalid arity: {0} (must be at least 1)")]
    InvalidArity(usize),

    #[error("Node handle does not belong to this tree")]
    UnknownNode,

    #[error("{order} traversal requires a binary tree, arity is {arity}")]
    UnsupportedOrder { order: Order, arity: usize },
}

pub type TreeResult<T> = Result<T, TreeError>;
