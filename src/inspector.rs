//! Node-level introspection for an analyzed tree: flattening it for display
//! with stable per-node identifiers, looking a node back up by that
//! identifier, and re-running just its own subquery against a driver.
//!
//! The identifier is assigned during this pass, not during parsing: the
//! original implementation numbers nodes while walking the tree to build its
//! JSON view, so a node's id depends on when that view is requested, not on
//! parse order.

use serde_json::Value;

use crate::ast::RaNode;
use crate::driver::{Driver, SqlValue};
use crate::error::CompileError;
use crate::sqlgen;

/// Pre-order walk assigning a fresh id to every node, left child before
/// right child, mirroring the original's `node_counter` threading.
pub fn assign_ids(node: &mut RaNode, counter: &mut u32) {
    node.header_mut().id = *counter;
    *counter += 1;
    if let Some(left) = node.left_child_mut() {
        assign_ids(left, counter);
    }
    if let Some(right) = node.right_child_mut() {
        assign_ids(right, counter);
    }
}

/// Serializes a tree (after [`assign_ids`] has run) into the JSON shape used
/// by the subtree inspector's node picker.
pub fn to_json(node: &RaNode) -> Result<Value, serde_json::Error> {
    serde_json::to_value(node)
}

/// Reconstructs a tree from its JSON representation, e.g. a tree a client
/// round-tripped back after editing a single node.
pub fn from_json(value: Value) -> Result<RaNode, serde_json::Error> {
    serde_json::from_value(value)
}

/// Finds the node with the given id anywhere in the tree.
pub fn find_by_id(node: &RaNode, id: u32) -> Option<&RaNode> {
    if node.header().id == id {
        return Some(node);
    }
    if let Some(left) = node.left_child() {
        if let Some(found) = find_by_id(left, id) {
            return Some(found);
        }
    }
    if let Some(right) = node.right_child() {
        if let Some(found) = find_by_id(right, id) {
            return Some(found);
        }
    }
    None
}

/// Re-runs the subquery rooted at `id` against `driver`, returning its
/// column names (falling back to the driver's own reported names when the
/// node carries none) and rows.
pub fn subtree_result(
    root: &RaNode,
    id: u32,
    driver: &dyn Driver,
) -> Result<(Vec<String>, Vec<Vec<SqlValue>>), CompileError> {
    let node = find_by_id(root, id).ok_or(CompileError::NodeNotFound)?;
    let query = sqlgen::generate(node);
    let (sql_columns, rows) = driver.execute(&query)?;
    let columns = if node.attributes().is_empty() {
        sql_columns
    } else {
        node.attributes().to_vec()
    };
    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeHeader;
    use crate::catalog::Domain;
    use pretty_assertions::assert_eq;

    fn relation(name: &str) -> RaNode {
        RaNode::Relation {
            header: NodeHeader {
                relation_name: Some(name.to_string()),
                attributes: vec!["X".to_string()],
                domains: vec![Domain::Integer],
                ..Default::default()
            },
            name: name.to_string(),
        }
    }

    #[test]
    fn assigns_ids_preorder() {
        let mut tree = RaNode::Union {
            header: NodeHeader::default(),
            left: Box::new(relation("EMP")),
            right: Box::new(relation("DEPT")),
        };
        let mut counter = 0;
        assign_ids(&mut tree, &mut counter);
        assert_eq!(tree.header().id, 0);
        assert_eq!(tree.left_child().unwrap().header().id, 1);
        assert_eq!(tree.right_child().unwrap().header().id, 2);
    }

    #[test]
    fn finds_node_by_id() {
        let mut tree = RaNode::Union {
            header: NodeHeader::default(),
            left: Box::new(relation("EMP")),
            right: Box::new(relation("DEPT")),
        };
        let mut counter = 0;
        assign_ids(&mut tree, &mut counter);
        let found = find_by_id(&tree, 2).unwrap();
        assert_eq!(found.relation_name(), Some("DEPT"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut tree = RaNode::Union {
            header: NodeHeader::default(),
            left: Box::new(relation("EMP")),
            right: Box::new(relation("DEPT")),
        };
        let mut counter = 0;
        assign_ids(&mut tree, &mut counter);
        let json = to_json(&tree).unwrap();
        let rebuilt = from_json(json).unwrap();
        assert_eq!(rebuilt.kind(), "union");
        assert_eq!(rebuilt.left_child().unwrap().relation_name(), Some("EMP"));
    }
}
