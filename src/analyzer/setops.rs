use crate::ast::RaNode;
use crate::error::CompileError;

/// Shared by `UNION`, `INTERSECT`, and `MINUS`: both sides must have the
/// same arity and pairwise-matching domains. Diagnostics are always tagged
/// `UNION` regardless of which of the three operators actually failed,
/// matching the original implementation's single shared error path.
pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let (header, left, right) = match node {
        RaNode::Union { header, left, right }
        | RaNode::Intersect { header, left, right }
        | RaNode::Minus { header, left, right } => (header, left, right),
        _ => unreachable!("setops::analyze called on a non-set node"),
    };

    let lattrs = left.attributes().to_vec();
    let rattrs = right.attributes().to_vec();
    let ldoms = left.domains().to_vec();
    let rdoms = right.domains().to_vec();

    if lattrs.len() != rattrs.len() {
        return Err(CompileError::ArityMismatch {
            op: "UNION",
            detail: "Incompatible Relations - different number of columns".to_string(),
        });
    }

    for i in 0..ldoms.len() {
        if ldoms[i] != rdoms[i] {
            return Err(CompileError::TypeMismatch {
                op: "UNION",
                detail: format!(
                    "{} and {} have different data types: {} and {}",
                    lattrs[i], rattrs[i], ldoms[i], rdoms[i]
                ),
            });
        }
    }

    header.attributes = lattrs;
    header.domains = ldoms;
    Ok(())
}
