use std::collections::HashSet;

use crate::ast::RaNode;
use crate::error::CompileError;

/// Cartesian product. Attributes shared by both sides are disambiguated
/// with `_L`/`_R` suffixes, matching the SQL generator's own aliasing.
pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let RaNode::Times { header, left, right } = node else {
        unreachable!("times::analyze called on a non-times node")
    };

    let lattrs = left.attributes().to_vec();
    let rattrs = right.attributes().to_vec();
    let ldoms = left.domains().to_vec();
    let rdoms = right.domains().to_vec();

    let duplicates: HashSet<&String> = lattrs.iter().filter(|a| rattrs.contains(a)).collect();

    let mut t_attrs = Vec::with_capacity(lattrs.len() + rattrs.len());
    let mut t_doms = Vec::with_capacity(lattrs.len() + rattrs.len());

    for (i, attr) in lattrs.iter().enumerate() {
        t_attrs.push(if duplicates.contains(attr) {
            format!("{attr}_L")
        } else {
            attr.clone()
        });
        t_doms.push(ldoms[i]);
    }
    for (i, attr) in rattrs.iter().enumerate() {
        t_attrs.push(if duplicates.contains(attr) {
            format!("{attr}_R")
        } else {
            attr.clone()
        });
        t_doms.push(rdoms[i]);
    }

    header.attributes = t_attrs;
    header.domains = t_doms;
    Ok(())
}
