use crate::ast::{Operand, RaNode};
use crate::catalog::Domain;
use crate::error::CompileError;

pub fn analyze(node: &mut RaNode) -> Result<(), CompileError> {
    let RaNode::Select {
        header,
        child,
        conditions,
    } = node
    else {
        unreachable!("select::analyze called on a non-select node")
    };

    let attrs = child.attributes().to_vec();
    let doms = child.domains().to_vec();

    for condition in conditions.iter() {
        check_known(&condition.left, &attrs)?;
        check_known(&condition.right, &attrs)?;

        let ltype = operand_type(&condition.left, &attrs, &doms);
        let rtype = operand_type(&condition.right, &attrs, &doms);
        if ltype != rtype {
            return Err(CompileError::TypeMismatch {
                op: "SELECT",
                detail: format!(
                    "Invalid type comparison {}:{} vs {}:{}",
                    operand_display(&condition.left),
                    ltype,
                    operand_display(&condition.right),
                    rtype
                ),
            });
        }
    }

    header.attributes = attrs;
    header.domains = doms;
    Ok(())
}

fn check_known(operand: &Operand, attrs: &[String]) -> Result<(), CompileError> {
    if let Operand::Col(name) = operand {
        if !attrs.contains(name) {
            return Err(CompileError::UnknownAttribute {
                op: "SELECT",
                detail: format!("Invalid Attribute: {name}"),
            });
        }
    }
    Ok(())
}

/// `"str"` or `"num"`, matching the vocabulary the original type check
/// compares against: a column's type follows its domain, a literal's type
/// follows its own kind.
fn operand_type(operand: &Operand, attrs: &[String], doms: &[Domain]) -> &'static str {
    match operand {
        Operand::Col(name) => {
            let idx = attrs.iter().position(|a| a == name);
            match idx.map(|i| doms[i]) {
                Some(Domain::Varchar) => "str",
                Some(_) => "num",
                None => "num",
            }
        }
        Operand::Str(_) => "str",
        Operand::Num(_) => "num",
        Operand::Agg { .. } => "num",
    }
}

fn operand_display(operand: &Operand) -> String {
    match operand {
        Operand::Col(name) => name.clone(),
        Operand::Str(s) => s.clone(),
        Operand::Num(n) => format_num(*n),
        Operand::Agg { func, column } => format!("{}({})", func.as_str(), column),
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
