use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, TreeArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::node::Node;
use crate::traversal::Order;
use crate::tree::Tree;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Show { tree } => _show(&resolve_settings(cli)?, tree),
        Commands::Walk { tree, order, all } => {
            _walk(&resolve_settings(cli)?, tree, *order, *all)
        }
        Commands::Demo => _demo(&resolve_settings(cli)?),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Config layers first, then command line flags.
pub fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?.apply_flags(cli.arity, cli.strict)?;
    debug!(?settings, "Resolved settings");
    Ok(settings)
}

/// Splits `PARENT:CHILD` into its two values.
pub fn parse_edge(edge: &str) -> CliResult<(f64, f64)> {
    let (parent, child) = edge
        .split_once(':')
        .ok_or_else(|| CliError::InvalidArgs(format!("edge must be PARENT:CHILD: {edge}")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| CliError::InvalidArgs(format!("not a number in edge {edge}: {s}")))
    };
    Ok((parse(parent)?, parse(child)?))
}

/// Builds a tree from a root value and `PARENT:CHILD` edges, applied in order.
#[instrument(level = "debug")]
pub fn build_tree(arity: usize, root: f64, edges: &[String]) -> CliResult<Tree<f64>> {
    let mut tree = Tree::with_arity(arity)?;
    tree.add_root(&Node::new(root))?;
    for edge in edges {
        let (parent, child) = parse_edge(edge)?;
        tree.add_sub_node(&Node::new(parent), &Node::new(child))?;
    }
    info!(nodes = tree.len(), depth = tree.depth(), "Tree built");
    Ok(tree)
}

/// Values of one traversal, space separated.
pub fn format_order(tree: &Tree<f64>, order: Order, strict: bool) -> CliResult<String> {
    let traversal = if strict {
        tree.try_traverse(order)?
    } else {
        tree.traverse(order)
    };
    Ok(traversal.map(|n| n.value()).join(" "))
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, args: &TreeArgs) -> CliResult<()> {
    let tree = build_tree(settings.arity, args.root, &args.edges)?;
    output::info(&tree);
    Ok(())
}

#[instrument(skip(settings))]
fn _walk(settings: &Settings, args: &TreeArgs, order: Option<Order>, all: bool) -> CliResult<()> {
    let tree = build_tree(settings.arity, args.root, &args.edges)?;
    if all {
        print_all_orders(&tree, settings.strict_orders)
    } else {
        let order = order.unwrap_or(settings.order);
        output::info(&format_order(&tree, order, settings.strict_orders)?);
        Ok(())
    }
}

fn print_all_orders(tree: &Tree<f64>, strict: bool) -> CliResult<()> {
    for order in Order::ALL {
        match format_order(tree, order, strict) {
            Ok(line) => output::labelled(order.as_str(), &line),
            Err(CliError::Tree(e)) if strict => output::labelled(order.as_str(), &e),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _demo(settings: &Settings) -> CliResult<()> {
    let binary_edges = ["1.1:1.2", "1.1:1.3", "1.2:1.4", "1.2:1.5", "1.3:1.6"].map(String::from);
    let ternary_edges = ["1:2", "1:3", "1:4", "2:5", "3:6"].map(String::from);

    for (title, arity, root, edges) in [
        ("Binary tree", 2, 1.1, &binary_edges[..]),
        ("3-ary tree", 3, 1.0, &ternary_edges[..]),
    ] {
        let tree = build_tree(arity, root, edges)?;
        output::header(&title);
        output::info(&tree);
        print_all_orders(&tree, settings.strict_orders)?;
        output::info(&"");
    }
    Ok(())
}
