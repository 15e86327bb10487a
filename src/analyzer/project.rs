use crate::ast::RaNode;
use crate::catalog::Domain;
use crate::error::CompileError;

const AGG_FUNCS: [&str; 5] = ["COUNT", "SUM", "AVG", "MIN", "MAX"];

pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let RaNode::Project {
        header,
        child,
        columns,
    } = node
    else {
        unreachable!("project::analyze called on a non-project node")
    };

    let attrs = child.attributes().to_vec();
    let doms = child.domains().to_vec();
    let passthrough_cols = aggregate_passthrough_columns(child);

    for attr in columns.iter() {
        if let Some((func_name, col_name)) = split_aggregate_call(attr) {
            if !AGG_FUNCS.contains(&func_name.to_uppercase().as_str()) {
                return Err(CompileError::UnknownAttribute {
                    op: "PROJECT",
                    detail: format!("Unsupported aggregate function {func_name}"),
                });
            }
            if col_name != "*" && !attrs.contains(&col_name) {
                return Err(CompileError::UnknownAttribute {
                    op: "PROJECT",
                    detail: format!(
                        "Attribute {col_name} does not exist for aggregate {func_name}({col_name})"
                    ),
                });
            }
        } else if !attrs.contains(attr) && !passthrough_cols.contains(attr) {
            return Err(CompileError::UnknownAttribute {
                op: "PROJECT",
                detail: format!("Attribute {attr} does not exist"),
            });
        }
    }

    let mut out_domains = Vec::with_capacity(columns.len());
    for attr in columns.iter() {
        if let Some(idx) = attrs.iter().position(|a| a == attr) {
            out_domains.push(doms[idx]);
        } else if split_aggregate_call(attr).is_some() {
            out_domains.push(Domain::Integer);
        } else {
            out_domains.push(Domain::Varchar);
        }
    }

    header.attributes = columns.clone();
    header.domains = out_domains;
    Ok(())
}

/// When projecting directly over a `JOIN` of an `AGGREGATE` (on either
/// side), columns belonging to the aggregate's own rename list are allowed
/// through even though they never made it into the join's attribute list.
fn aggregate_passthrough_columns(child: &RaNode) -> Vec<String> {
    let RaNode::Join { left, right, .. } = child else {
        return Vec::new();
    };

    let mut allowed = Vec::new();
    if let RaNode::Aggregate { columns, .. } = &**left {
        allowed.extend(columns.iter().cloned());
    }
    if let RaNode::Aggregate { columns, .. } = &**right {
        allowed.extend(columns.iter().cloned());
    }
    allowed
}

fn split_aggregate_call(attr: &str) -> Option<(String, String)> {
    let open = attr.find('(')?;
    if !attr.ends_with(')') {
        return None;
    }
    let func = attr[..open].to_string();
    let col = attr[open + 1..attr.len() - 1].to_string();
    Some((func, col))
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
    fn rejects_unknown_column() {
        let mut node = RaNode::Project {
            header: NodeHeader::default(),
            child: Box::new(emp()),
            columns: vec!["NOPE".to_string()],
        };
        let err = analyze(&mut node).unwrap_err();
        assert!(matches!(err, CompileError::UnknownAttribute { op: "PROJECT", .. }));
    }

    #[test]
    fn accepts_known_columns() {
        let mut node = RaNode::Project {
            header: NodeHeader::default(),
            child: Box::new(emp()),
            columns: vec!["ENAME".to_string()],
        };
        analyze(&mut node).unwrap();
        assert_eq!(node.attributes(), &["ENAME".to_string()]);
        assert_eq!(node.domains(), &[Domain::Varchar]);
    }
}
