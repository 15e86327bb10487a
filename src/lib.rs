//! Compiles a relational-algebra query language into SQL and executes it
//! against a SQLite-compatible engine.
//!
//! The pipeline, in order: [`lexer`] tokenizes, [`parser`] builds an
//! [`ast::RaNode`] tree, [`namer`] assigns every intermediate node a
//! `TEMP_k` relation name, [`analyzer`] computes and validates each node's
//! schema bottom-up, and [`sqlgen`] turns the validated tree into a single
//! SQL statement. [`driver`] executes that statement against SQLite;
//! [`inspector`] lets a caller re-run the subquery rooted at any single node.

pub mod analyzer;
pub mod ast;
pub mod catalog;
pub mod driver;
pub mod error;
pub mod inspector;
pub mod lexer;
pub mod namer;
pub mod parser;
pub mod sqlgen;

use catalog::{Catalog, Domain};
use driver::{Driver, SqlValue};
use namer::NameGenerator;

pub use ast::RaNode;
pub use error::CompileError;

/// Parses and semantically analyzes `source` against `catalog`, assigning
/// `TEMP_k` names to every intermediate node via `names`. Returns the
/// validated tree, ready for SQL generation or subtree inspection.
pub fn compile_to_tree(
    source: &str,
    catalog: &Catalog,
    names: &mut NameGenerator,
) -> Result<RaNode, CompileError> {
    let mut tree = parser::parse(source)?;
    namer::assign_temp_names(&mut tree, names);
    analyzer::analyze(&mut tree, catalog)?;
    Ok(tree)
}

/// Compiles `source` all the way down to a single SQL statement.
pub fn compile(
    source: &str,
    catalog: &Catalog,
    names: &mut NameGenerator,
) -> Result<String, CompileError> {
    let tree = compile_to_tree(source, catalog, names)?;
    Ok(emit_sql(&tree))
}

/// Generates SQL for an already-analyzed tree.
pub fn emit_sql(node: &RaNode) -> String {
    sqlgen::generate(node)
}

/// Re-runs the subquery rooted at `node_id` (assigned by
/// [`inspector::assign_ids`]) against `driver`, returning its column names
/// and rows.
pub fn subtree_result(
    tree: &RaNode,
    node_id: u32,
    driver: &dyn Driver,
) -> Result<(Vec<String>, Vec<Vec<SqlValue>>), CompileError> {
    inspector::subtree_result(tree, node_id, driver)
}

/// The final output schema of an analyzed node: attribute names paired with
/// their domains, in column order.
pub fn header_of(node: &RaNode) -> Vec<(String, Domain)> {
    node.attributes()
        .iter()
        .cloned()
        .zip(node.domains().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emp_dept_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(
            "EMP",
            vec![
                ("ENAME".to_string(), Domain::Varchar),
                ("SAL".to_string(), Domain::Integer),
                ("DNUMBER".to_string(), Domain::Integer),
            ],
        );
        catalog.insert(
            "DEPT",
            vec![
                ("DNUMBER".to_string(), Domain::Integer),
                ("DNAME".to_string(), Domain::Varchar),
            ],
        );
        catalog
    }

    #[test]
    fn compiles_bare_relation() {
        let catalog = emp_dept_catalog();
        let mut names = NameGenerator::new();
        let sql = compile("emp;", &catalog, &mut names).unwrap();
        assert_eq!(sql, "SELECT * FROM EMP");
    }

    #[test]
    fn compiles_project_over_select() {
        let catalog = emp_dept_catalog();
        let mut names = NameGenerator::new();
        let sql = compile("project[ename](select[sal>1000](emp));", &catalog, &mut names).unwrap();
        assert_eq!(
            sql,
            "SELECT ENAME FROM (SELECT * FROM (SELECT * FROM EMP) EMP WHERE SAL > 1000.0) GROUP BY ENAME"
        );
    }

    #[test]
    fn reports_missing_relation() {
        let catalog = emp_dept_catalog();
        let mut names = NameGenerator::new();
        let err = compile("ghost;", &catalog, &mut names).unwrap_err();
        assert!(matches!(err, CompileError::MissingRelation(r) if r == "GHOST"));
    }

    #[test]
    fn header_of_reports_schema() {
        let catalog = emp_dept_catalog();
        let mut names = NameGenerator::new();
        let tree = compile_to_tree("emp;", &catalog, &mut names).unwrap();
        assert_eq!(
            header_of(&tree),
            vec![
                ("ENAME".to_string(), Domain::Varchar),
                ("SAL".to_string(), Domain::Integer),
                ("DNUMBER".to_string(), Domain::Integer),
            ]
        );
    }
}
