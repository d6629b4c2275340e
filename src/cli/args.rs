//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::traversal::Order;

/// Build bounded-arity trees and print their traversals
#[derive(Parser, Debug)]
#[command(name = "ktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Maximum number of children per node
    #[arg(short, long, global = true)]
    pub arity: Option<usize>,

    /// Fail on pre/post/in-order for non-binary trees instead of walking depth-first
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a tree and print it
    Show {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Build a tree and print one or all traversals
    Walk {
        #[command(flatten)]
        tree: TreeArgs,
        /// Traversal order (default from config)
        #[arg(short, long, value_enum, conflicts_with = "all")]
        order: Option<Order>,
        /// Print every traversal order
        #[arg(long)]
        all: bool,
    },

    /// Print the sample binary and ternary trees with all traversals
    Demo,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Tree description shared by `show` and `walk`.
#[derive(clap::Args, Debug, Clone)]
pub struct TreeArgs {
    /// Root value
    #[arg(short, long, allow_negative_numbers = true)]
    pub root: f64,

    /// Attach CHILD below the first node holding PARENT, applied in order
    #[arg(short, long = "edge", value_name = "PARENT:CHILD", allow_hyphen_values = true)]
    pub edges: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_walk_args_when_parsing_then_collects_edges_and_order() {
        let cli = Cli::try_parse_from([
            "ktree", "-a", "3", "walk", "--root", "1", "-e", "1:2", "-e", "1:3", "--order", "bfs",
        ])
        .unwrap();
        assert_eq!(cli.arity, Some(3));
        match cli.command {
            Commands::Walk { tree, order, all } => {
                assert_eq!(tree.root, 1.0);
                assert_eq!(tree.edges, vec!["1:2", "1:3"]);
                assert_eq!(order, Some(Order::BreadthFirst));
                assert!(!all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_order_and_all_when_parsing_then_conflict() {
        let result = Cli::try_parse_from([
            "ktree", "walk", "--root", "1", "--order", "heap", "--all",
        ]);
        assert!(result.is_err());
    }
}
