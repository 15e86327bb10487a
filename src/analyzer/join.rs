use crate::ast::RaNode;
use crate::error::CompileError;

/// Natural join: the result schema is the left relation's attributes
/// followed by the right relation's attributes that aren't already present
/// on the left; attributes present on both sides become the join columns.
/// Unlike the other binary operators this can never fail semantically.
pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let RaNode::Join {
        header,
        left,
        right,
        join_columns,
    } = node
    else {
        unreachable!("join::analyze called on a non-join node")
    };

    let lattrs = left.attributes().to_vec();
    let rattrs = right.attributes().to_vec();
    let ldoms = left.domains().to_vec();
    let rdoms = right.domains().to_vec();

    let mut j_attrs = Vec::new();
    let mut j_doms = Vec::new();
    let mut jcols = Vec::new();

    for (i, attr) in lattrs.iter().enumerate() {
        j_attrs.push(attr.clone());
        j_doms.push(ldoms[i]);
        if rattrs.contains(attr) {
            jcols.push(attr.clone());
        }
    }
    for (i, attr) in rattrs.iter().enumerate() {
        if !lattrs.contains(attr) {
            j_attrs.push(attr.clone());
            j_doms.push(rdoms[i]);
        }
    }

    *join_columns = jcols;
    header.attributes = j_attrs;
    header.domains = j_doms;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeHeader;
    use crate::catalog::Domain;
    use pretty_assertions::assert_eq;

    fn rel(name: &str, attrs: &[&str], doms: &[Domain]) -> RaNode {
        RaNode::Relation {
            header: NodeHeader {
                relation_name: Some(name.to_string()),
                attributes: attrs.iter().map(|s| s.to_string()).collect(),
                domains: doms.to_vec(),
            },
            name: name.to_string(),
        }
    }

    #[test]
    fn computes_common_join_columns() {
        let mut node = RaNode::Join {
            header: NodeHeader::default(),
            left: Box::new(rel(
                "EMP",
                &["ENAME", "DNUMBER"],
                &[Domain::Varchar, Domain::Integer],
            )),
            right: Box::new(rel(
                "DEPT",
                &["DNUMBER", "DNAME"],
                &[Domain::Integer, Domain::Varchar],
            )),
            join_columns: Vec::new(),
        };
        analyze(&mut node).unwrap();
        let RaNode::Join { join_columns, .. } = &node else {
            unreachable!()
        };
        assert_eq!(join_columns, &vec!["DNUMBER".to_string()]);
        assert_eq!(
            node.attributes(),
            &["ENAME".to_string(), "DNUMBER".to_string(), "DNAME".to_string()]
        );
    }
}
