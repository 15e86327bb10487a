//! Assigns temporary relation names to every non-leaf node.
//!
//! The original implementation kept a module-level global counter; here it
//! is an explicit, externalized struct threaded through compilation by
//! `&mut` reference so a compiler embedding this crate can run several
//! compilations without sharing (or resetting) global state.

use crate::ast::RaNode;

#[derive(Debug, Default)]
pub struct NameGenerator {
    counter: u32,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    fn next_name(&mut self) -> String {
        let name = format!("TEMP_{}", self.counter);
        self.counter += 1;
        name
    }
}

/// Post-order walk: a node's children are named before the node itself, and
/// the right child (when present) is named after the node's own name is
/// assigned, matching the recursion order of the original namer exactly.
pub fn assign_temp_names(node: &mut RaNode, names: &mut NameGenerator) {
    if matches!(node, RaNode::Relation { .. }) {
        return;
    }

    if let Some(left) = node.left_child_mut() {
        assign_temp_names(left, names);
    }
    node.header_mut().relation_name = Some(names.next_name());
    if let Some(right) = node.right_child_mut() {
        assign_temp_names(right, names);
    }
}
