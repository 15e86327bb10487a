//! Recursive translation of an analyzed [`RaNode`] tree into a SQL query
//! string. Every node already carries its computed schema and, for every
//! node but a `relation` leaf, a `TEMP_k` name assigned by the namer — this
//! pass assumes both are present and does no further validation.

use std::collections::HashSet;

use crate::ast::{AggItem, CompareOp, Condition, Operand, RaNode};

/// Turns an analyzed, named tree into a single SQL statement.
pub fn generate(node: &RaNode) -> String {
    match node {
        RaNode::Relation { name, .. } => format!("SELECT * FROM {name}"),
        RaNode::Union { left, right, .. } => generate_union(left, right),
        RaNode::Times { left, right, .. } => generate_times(left, right),
        RaNode::Project {
            child, columns, ..
        } => generate_project(child, columns),
        RaNode::Rename {
            header,
            child,
            ..
        } => generate_rename(header.attributes.as_slice(), child),
        RaNode::Select { child, conditions, .. } => generate_select(child, conditions),
        RaNode::Join {
            left,
            right,
            join_columns,
            ..
        } => generate_join(left, right, join_columns),
        RaNode::Intersect { left, right, header } => {
            generate_intersect_or_minus(left, right, &header.attributes, "IN")
        }
        RaNode::Minus { left, right, header } => {
            generate_intersect_or_minus(left, right, &header.attributes, "NOT IN")
        }
        RaNode::Aggregate {
            child,
            columns,
            project_list,
            group_by,
            having,
            ..
        } => generate_aggregate(child, columns, project_list, group_by.as_deref(), having.as_deref()),
    }
}

fn generate_union(left: &RaNode, right: &RaNode) -> String {
    let left_is_agg = left.is_aggregate();
    let right_is_agg = right.is_aggregate();
    let mut lquery = generate(left);
    let mut rquery = generate(right);
    if left_is_agg || right_is_agg {
        lquery = format!("({lquery})");
        rquery = format!("({rquery})");
    }
    format!("{lquery} UNION {rquery}")
}

fn generate_times(left: &RaNode, right: &RaNode) -> String {
    let lquery = wrapped_if_union(left);
    let rquery = wrapped_if_union(right);

    let left_alias = format!("{}_L", left.relation_name().unwrap());
    let right_alias = format!("{}_R", right.relation_name().unwrap());

    let left_attrs = left.attributes();
    let right_attrs = right.attributes();
    let duplicates: HashSet<&String> = left_attrs.iter().filter(|a| right_attrs.contains(a)).collect();

    let mut select_cols = Vec::with_capacity(left_attrs.len() + right_attrs.len());
    for attr in left_attrs {
        if duplicates.contains(attr) {
            select_cols.push(format!("{left_alias}.\"{attr}\" AS {attr}_L"));
        } else {
            select_cols.push(format!("{left_alias}.\"{attr}\" AS {attr}"));
        }
    }
    for attr in right_attrs {
        if duplicates.contains(attr) {
            select_cols.push(format!("{right_alias}.\"{attr}\" AS {attr}_R"));
        } else {
            select_cols.push(format!("{right_alias}.\"{attr}\" AS {attr}"));
        }
    }

    format!(
        "SELECT {} FROM ({lquery}) {left_alias}, ({rquery}) {right_alias}",
        select_cols.join(", ")
    )
}

fn generate_project(child: &RaNode, columns: &[String]) -> String {
    let lquery = generate(child);

    if let RaNode::Join { left, right, .. } = child {
        let left_is_agg = left.is_aggregate();
        let right_is_agg = right.is_aggregate();
        if left_is_agg || right_is_agg {
            let left_columns = join_side_columns(left, left_is_agg);
            let right_columns = join_side_columns(right, right_is_agg);

            let mut all_columns: std::collections::HashMap<String, String> = std::collections::HashMap::new();
            for col in left_columns.iter() {
                all_columns.insert(col.to_uppercase(), col.clone());
            }
            for col in right_columns.iter() {
                all_columns.insert(col.to_uppercase(), col.clone());
            }

            let select_cols: Vec<String> = columns
                .iter()
                .map(|attr| {
                    let attr_upper = attr.to_uppercase();
                    if left_columns.contains(attr) || right_columns.contains(attr) {
                        attr.clone()
                    } else if let Some(original_col) = all_columns.get(&attr_upper) {
                        format!("{original_col} AS {attr}")
                    } else {
                        attr.clone()
                    }
                })
                .collect();

            return format!("SELECT {} FROM ({lquery})", select_cols.join(", "));
        }
    }

    let mut query = format!("SELECT {} FROM ({lquery})", columns.join(", "));

    let non_aggregate_cols: Vec<&String> = columns.iter().filter(|c| !c.contains('(')).collect();
    if !non_aggregate_cols.is_empty() && !child.is_aggregate() {
        let list: Vec<&str> = non_aggregate_cols.iter().map(|s| s.as_str()).collect();
        query.push_str(&format!(" GROUP BY {}", list.join(", ")));
    }

    query
}

fn join_side_columns(side: &RaNode, is_aggregate: bool) -> Vec<String> {
    if is_aggregate {
        let RaNode::Aggregate { columns, .. } = side else {
            unreachable!()
        };
        columns.clone()
    } else {
        side.attributes().to_vec()
    }
}

fn generate_rename(attrs: &[String], child: &RaNode) -> String {
    let lquery = wrapped_if_union(child);
    let child_attrs = child.attributes();
    let select_cols: Vec<String> = attrs
        .iter()
        .enumerate()
        .map(|(i, attr)| format!("{} AS {attr}", child_attrs[i]))
        .collect();
    format!(
        "SELECT {} FROM ({lquery}) {}",
        select_cols.join(", "),
        child.relation_name().unwrap()
    )
}

fn generate_select(child: &RaNode, conditions: &[Condition]) -> String {
    let lquery = wrapped_if_union_or_aggregate(child);
    let mut query = format!(
        "SELECT * FROM ({lquery}) {} WHERE ",
        child.relation_name().unwrap()
    );
    let clauses: Vec<String> = conditions.iter().map(render_condition).collect();
    query.push_str(&clauses.join(" AND "));
    query
}

fn generate_join(left: &RaNode, right: &RaNode, join_columns: &[String]) -> String {
    let left_is_agg = left.is_aggregate();
    let right_is_agg = right.is_aggregate();

    let lquery = wrapped_if_union_or_aggregate(left);
    let rquery = wrapped_if_union_or_aggregate(right);

    let left_alias = left.relation_name().unwrap();
    let right_alias = right.relation_name().unwrap();

    let left_columns = join_side_columns(left, left_is_agg);
    let right_columns = join_side_columns(right, right_is_agg);

    let valid_join_conditions: Vec<&String> = join_columns
        .iter()
        .filter(|c| left_columns.contains(c) && right_columns.contains(c))
        .collect();

    if valid_join_conditions.is_empty() || (left_is_agg && right_is_agg) {
        let mut select_cols = Vec::new();
        let mut added: HashSet<String> = HashSet::new();
        for col in left_columns.iter() {
            select_cols.push(format!("{left_alias}.{col} AS {col}"));
            added.insert(col.clone());
        }
        for col in right_columns.iter() {
            if !added.contains(col) {
                select_cols.push(format!("{right_alias}.{col} AS {col}"));
            }
        }
        return format!(
            "SELECT {} FROM ({lquery}) {left_alias}, ({rquery}) {right_alias}",
            select_cols.join(", ")
        );
    }

    let mut select_cols = Vec::new();
    let mut added: HashSet<String> = HashSet::new();
    for col in valid_join_conditions.iter() {
        select_cols.push(format!("{left_alias}.{col} AS {col}"));
        added.insert((*col).clone());
    }
    for col in left_columns.iter() {
        if !added.contains(col) {
            select_cols.push(format!("{left_alias}.{col} AS {col}"));
        }
    }
    for col in right_columns.iter() {
        if !added.contains(col) && !join_columns.contains(col) {
            select_cols.push(format!("{right_alias}.{col} AS {col}"));
        }
    }

    let join_conditions: Vec<String> = valid_join_conditions
        .iter()
        .map(|col| format!("{left_alias}.{col} = {right_alias}.{col}"))
        .collect();

    format!(
        "SELECT {} FROM ({lquery}) {left_alias}, ({rquery}) {right_alias} WHERE {}",
        select_cols.join(", "),
        join_conditions.join(" AND ")
    )
}

fn generate_intersect_or_minus(left: &RaNode, right: &RaNode, attrs: &[String], verb: &str) -> String {
    let lquery = wrapped_if_union(left);
    let rquery = wrapped_if_union(right);
    format!(
        "SELECT * FROM ({lquery}) {} WHERE ({}) {verb} (SELECT * FROM ({rquery}) {})",
        left.relation_name().unwrap(),
        attrs.join(", "),
        right.relation_name().unwrap()
    )
}

fn generate_aggregate(
    child: &RaNode,
    columns: &[String],
    project_list: &[AggItem],
    group_by: Option<&[String]>,
    having: Option<&[Condition]>,
) -> String {
    let lquery = generate(child);

    let select_cols: Vec<String> = project_list
        .iter()
        .zip(columns.iter())
        .map(|(item, out_name)| match item {
            AggItem::Agg { func, column } => format!("{}({column}) AS {out_name}", func.as_str()),
            AggItem::Id(col) => format!("{col} AS {out_name}"),
        })
        .collect();

    let mut query = format!("SELECT {} FROM ({lquery})", select_cols.join(", "));

    if let Some(group_cols) = group_by {
        if !group_cols.is_empty() {
            query.push_str(&format!(" GROUP BY {}", group_cols.join(", ")));
        }
    }

    if let Some(having_conditions) = having {
        if !having_conditions.is_empty() {
            query.push_str(" HAVING ");
            let clauses: Vec<String> = having_conditions.iter().map(render_condition).collect();
            query.push_str(&clauses.join(" AND "));
        }
    }

    query
}

fn render_condition(condition: &Condition) -> String {
    let left = render_operand(&condition.left);
    let right = render_operand(&condition.right);
    if condition.op == CompareOp::Like {
        format!("{left} LIKE {right}")
    } else {
        format!("{left} {} {right}", condition.op.as_str())
    }
}

fn render_operand(operand: &Operand) -> String {
    match operand {
        Operand::Col(name) => name.clone(),
        Operand::Str(s) => format!("'{s}'"),
        Operand::Num(n) => format_num(*n),
        Operand::Agg { func, column } => format!("{}({column})", func.as_str()),
    }
}

/// Mirrors Python's `str(float(...))`: whole numbers keep a trailing `.0`.
fn format_num(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}

fn wrapped_if_union(node: &RaNode) -> String {
    let query = generate(node);
    if node.kind() == "union" {
        format!("({query})")
    } else {
        query
    }
}

fn wrapped_if_union_or_aggregate(node: &RaNode) -> String {
    let query = generate(node);
    if node.kind() == "union" || node.is_aggregate() {
        format!("({query})")
    } else {
        query
    }
}
