use crate::ast::{AggItem, Operand, RaNode};
use crate::catalog::Domain;
use crate::error::CompileError;

pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let RaNode::Aggregate {
        header,
        child,
        project_list,
        group_by,
        having,
        ..
    } = node
    else {
        unreachable!("aggregate::analyze called on a non-aggregate node")
    };

    let relation_attrs = child.attributes().to_vec();

    for item in project_list.iter() {
        match item {
            AggItem::Id(col) => {
                if !relation_attrs.contains(col) {
                    return Err(CompileError::AggregateMisuse(format!(
                        "Column '{col}' does not exist in the relation."
                    )));
                }
                let must_be_grouped = group_by.is_some();
                if must_be_grouped && !group_by.as_ref().unwrap().contains(col) {
                    return Err(CompileError::AggregateMisuse(format!(
                        "Column '{col}' must be in GROUP BY or used in an aggregate function."
                    )));
                }
            }
            AggItem::Agg { column, .. } => {
                if !relation_attrs.contains(column) {
                    return Err(CompileError::AggregateMisuse(format!(
                        "Cannot apply aggregate function on non-existent column '{column}'."
                    )));
                }
            }
        }
    }

    if let Some(group_attrs) = group_by {
        for attr in group_attrs.iter() {
            if !relation_attrs.contains(attr) {
                return Err(CompileError::AggregateMisuse(format!(
                    "GROUP BY column '{attr}' does not exist."
                )));
            }
        }
    }

    if let Some(having_conditions) = having {
        for condition in having_conditions.iter() {
            check_having_operand(&condition.left, &relation_attrs)?;
            check_having_operand(&condition.right, &relation_attrs)?;
        }
    }

    // The schema reported upward is the *source expression* text (e.g.
    // `SUM(SAL)`), not the rename list in `columns` — the rename list only
    // becomes the SQL alias at generation time. This mirrors the original
    // compiler's behavior exactly, surprising as it is.
    let attrs: Vec<String> = project_list
        .iter()
        .map(|item| match item {
            AggItem::Id(col) => col.clone(),
            AggItem::Agg { func, column } => format!("{}({})", func.as_str(), column),
        })
        .collect();
    header.domains = vec![Domain::Integer; attrs.len()];
    header.attributes = attrs;
    Ok(())
}

/// The original only validates a plain column reference in `HAVING`; string,
/// numeric, and aggregate operands pass through unchecked.
fn check_having_operand(operand: &Operand, relation_attrs: &[String]) -> Result<(), CompileError> {
    if let Operand::Col(name) = operand {
        if !relation_attrs.contains(name) {
            return Err(CompileError::AggregateMisuse(format!(
                "HAVING condition references non-existent column '{name}'."
            )));
        }
    }
    Ok(())
}
