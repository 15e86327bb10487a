use std::collections::HashSet;

use crate::analyzer::list_repr;
use crate::ast::RaNode;
use crate::error::CompileError;

pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let RaNode::Rename {
        header,
        child,
        columns,
    } = node
    else {
        unreachable!("rename::analyze called on a non-rename node")
    };

    let attrs = child.attributes().to_vec();
    let doms = child.domains().to_vec();

    if columns.len() != attrs.len() {
        return Err(CompileError::ArityMismatch {
            op: "RENAME",
            detail: format!(
                "{} and {} are of different sizes",
                list_repr(columns),
                list_repr(&attrs)
            ),
        });
    }

    let mut seen = HashSet::new();
    if !columns.iter().all(|c| seen.insert(c.as_str())) {
        return Err(CompileError::DuplicateName {
            op: "RENAME",
            detail: format!("{} has duplicates!", list_repr(columns)),
        });
    }

    header.attributes = columns.clone();
    header.domains = doms;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeHeader;
    use crate::catalog::Domain;
    use pretty_assertions::assert_eq;

    fn emp() -> RaNode {
        RaNode::Relation {
            header: NodeHeader {
                relation_name: Some("EMP".to_string()),
                attributes: vec!["ENAME".to_string(), "SAL".to_string()],
                domains: vec![Domain::Varchar, Domain::Integer],
            },
            name: "EMP".to_string(),
        }
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut node = RaNode::Rename {
            header: NodeHeader::default(),
            child: Box::new(emp()),
            columns: vec!["NAME".to_string()],
        };
        let err = analyze(&mut node).unwrap_err();
        assert!(matches!(err, CompileError::ArityMismatch { op: "RENAME", .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut node = RaNode::Rename {
            header: NodeHeader::default(),
            child: Box::new(emp()),
            columns: vec!["X".to_string(), "X".to_string()],
        };
        let err = analyze(&mut node).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateName { op: "RENAME", .. }));
    }

    #[test]
    fn renames_in_place() {
        let mut node = RaNode::Rename {
            header: NodeHeader::default(),
            child: Box::new(emp()),
            columns: vec!["NAME".to_string(), "SALARY".to_string()],
        };
        analyze(&mut node).unwrap();
        assert_eq!(node.attributes(), &["NAME".to_string(), "SALARY".to_string()]);
        assert_eq!(node.domains(), &[Domain::Varchar, Domain::Integer]);
    }
}
