//! Bottom-up semantic analysis: one function per node kind, each mutating
//! its node's `attributes`/`domains` (and, for `join`, `join_columns`) in
//! place once its children have been analyzed.

mod aggregate;
mod join;
mod project;
mod relation;
mod rename;
mod select;
mod setops;
mod times;

use crate::ast::RaNode;
use crate::catalog::Catalog;
use crate::error::CompileError;

pub fn analyze(node: &mut RaNode, catalog: &Catalog) -> Result<(), CompileError> {
    match node {
        RaNode::Relation { .. } => relation::analyze(node, catalog),
        RaNode::Select { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            select::analyze(node)
        }
        RaNode::Project { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            project::analyze(node)
        }
        RaNode::Rename { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            rename::analyze(node)
        }
        RaNode::Union { .. } | RaNode::Intersect { .. } | RaNode::Minus { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            analyze(node.right_child_mut().unwrap(), catalog)?;
            setops::analyze(node)
        }
        RaNode::Join { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            analyze(node.right_child_mut().unwrap(), catalog)?;
            join::analyze(node)
        }
        RaNode::Times { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            analyze(node.right_child_mut().unwrap(), catalog)?;
            times::analyze(node)
        }
        RaNode::Aggregate { .. } => {
            analyze(node.left_child_mut().unwrap(), catalog)?;
            aggregate::analyze(node)
        }
    }
}

/// Renders a list of identifiers the way Python's `str(list)` would, since
/// a couple of diagnostic messages quote the offending list verbatim.
pub(crate) fn list_repr(items: &[String]) -> String {
    format!(
        "[{}]",
        items
            .iter()
            .map(|s| format!("'{s}'"))
            .collect::<Vec<_>>()
            .join(", ")
    )
}
