//! End-to-end tests against a real SQLite database: compile RA source,
//! execute the generated SQL, and check both the compiled schema and the
//! rows that come back.

use pretty_assertions::assert_eq;

use ra_sql_compiler::catalog::Domain;
use ra_sql_compiler::driver::{Driver, SqliteDriver};
use ra_sql_compiler::namer::NameGenerator;
use ra_sql_compiler::{compile, compile_to_tree, emit_sql, header_of, CompileError};

/// Builds a temp-file SQLite database with the `EMP`/`DEPT` schema used
/// throughout, opens it through `SqliteDriver`, and leaves the backing file
/// alive for the duration of the test (dropping it would delete the file).
fn emp_dept_driver() -> (tempfile::TempDir, SqliteDriver) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emp_dept.db");
    let path_str = path.to_str().unwrap().to_string();

    let setup = rusqlite::Connection::open(&path).unwrap();
    setup
        .execute_batch(
            "create table emp (id integer, name varchar(20), dept varchar(10), sal integer);
             create table dept (dept varchar(10), loc varchar(20));
             insert into emp values (1, 'SMITH', 'ACCOUNTING', 40000);
             insert into emp values (2, 'JONES', 'ACCOUNTING', 60000);
             insert into emp values (3, 'ALLEN', 'SALES', 55000);
             insert into dept values ('ACCOUNTING', 'NEW YORK');
             insert into dept values ('SALES', 'CHICAGO');",
        )
        .unwrap();
    drop(setup);

    let driver = SqliteDriver::open(&path_str).unwrap();
    (dir, driver)
}

#[test]
fn scenario_1_project_over_select() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let tree = compile_to_tree(
        "project[name](select[sal>50000](emp));",
        driver.catalog(),
        &mut names,
    )
    .unwrap();
    assert_eq!(
        header_of(&tree),
        vec![("NAME".to_string(), Domain::Varchar)]
    );

    let sql = emit_sql(&tree);
    let (columns, rows) = driver.execute(&sql).unwrap();
    assert_eq!(columns, vec!["NAME".to_string()]);
    assert_eq!(rows.len(), 1);
}

#[test]
fn scenario_2_natural_join_on_dept() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let tree = compile_to_tree("emp join dept;", driver.catalog(), &mut names).unwrap();

    assert_eq!(
        header_of(&tree),
        vec![
            ("ID".to_string(), Domain::Integer),
            ("NAME".to_string(), Domain::Varchar),
            ("DEPT".to_string(), Domain::Varchar),
            ("SAL".to_string(), Domain::Integer),
            ("LOC".to_string(), Domain::Varchar),
        ]
    );

    let sql = emit_sql(&tree);
    assert!(sql.contains("DEPT"));
    let (_, rows) = driver.execute(&sql).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn scenario_3_times_disambiguates_shared_columns() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let tree = compile_to_tree("emp times dept;", driver.catalog(), &mut names).unwrap();

    let header = header_of(&tree);
    let names_only: Vec<&String> = header.iter().map(|(n, _)| n).collect();
    assert!(names_only.contains(&&"DEPT_L".to_string()));
    assert!(names_only.contains(&&"DEPT_R".to_string()));

    let (_, rows) = driver.execute(&emit_sql(&tree)).unwrap();
    assert_eq!(rows.len(), 3 * 2);
}

#[test]
fn scenario_4_aggregate_with_groupby() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let tree = compile_to_tree(
        "aggregate[(cnt),(count(id)),(dept)](emp);",
        driver.catalog(),
        &mut names,
    )
    .unwrap();

    let sql = emit_sql(&tree);
    assert!(sql.contains("GROUP BY DEPT"));

    let (columns, rows) = driver.execute(&sql).unwrap();
    assert_eq!(columns, vec!["CNT".to_string()]);
    assert_eq!(rows.len(), 2);
}

#[test]
fn scenario_5_rename_arity_mismatch() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let err = compile(
        "rename[a,b](project[id,name](emp));",
        driver.catalog(),
        &mut names,
    )
    .unwrap_err();
    assert!(matches!(err, CompileError::ArityMismatch { op: "RENAME", .. }));
    assert!(err.to_string().starts_with("SEMANTIC ERROR (RENAME)"));
}

#[test]
fn scenario_6_missing_relation() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let err = compile("project[name](bogus);", driver.catalog(), &mut names).unwrap_err();
    assert_eq!(err.to_string(), "Relation 'BOGUS' does not exist");
}

#[test]
fn boundary_keywords_and_identifiers_are_case_insensitive() {
    let (_dir, driver) = emp_dept_driver();
    let mut names_a = NameGenerator::new();
    let mut names_b = NameGenerator::new();
    let a = compile("Project[name](Emp);", driver.catalog(), &mut names_a).unwrap();
    let b = compile("PROJECT[NAME](emp);", driver.catalog(), &mut names_b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn algebraic_law_project_after_project_narrows_to_smaller_set() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let tree = compile_to_tree(
        "project[name](project[name,sal](emp));",
        driver.catalog(),
        &mut names,
    )
    .unwrap();
    assert_eq!(header_of(&tree), vec![("NAME".to_string(), Domain::Varchar)]);

    let (_, narrowed) = driver.execute(&emit_sql(&tree)).unwrap();

    let mut names2 = NameGenerator::new();
    let direct = compile_to_tree("project[name](emp);", driver.catalog(), &mut names2).unwrap();
    let (_, direct_rows) = driver.execute(&emit_sql(&direct)).unwrap();

    assert_eq!(narrowed.len(), direct_rows.len());
}

#[test]
fn algebraic_law_conjunction_equals_nested_select() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let conjoined = compile(
        "select[sal>40000](select[dept='ACCOUNTING'](emp));",
        driver.catalog(),
        &mut names,
    )
    .unwrap();

    let (_, left_rows) = driver.execute(&conjoined).unwrap();

    let mut names2 = NameGenerator::new();
    let dept_only = compile_to_tree("select[dept='ACCOUNTING'](emp);", driver.catalog(), &mut names2)
        .unwrap();
    let (_, dept_rows) = driver.execute(&emit_sql(&dept_only)).unwrap();
    let expected = dept_rows
        .iter()
        .filter(|row| matches!(&row[3], ra_sql_compiler::driver::SqlValue::Integer(s) if *s > 40000))
        .count();

    assert_eq!(left_rows.len(), expected);
}

#[test]
fn rename_then_rename_matches_single_rename() {
    let (_dir, driver) = emp_dept_driver();

    let mut names_a = NameGenerator::new();
    let chained = compile(
        "rename[p,q](rename[x,y](project[name,sal](emp)));",
        driver.catalog(),
        &mut names_a,
    )
    .unwrap();
    let (chained_cols, chained_rows) = driver.execute(&chained).unwrap();

    let mut names_b = NameGenerator::new();
    let direct = compile(
        "rename[p,q](project[name,sal](emp));",
        driver.catalog(),
        &mut names_b,
    )
    .unwrap();
    let (direct_cols, direct_rows) = driver.execute(&direct).unwrap();

    assert_eq!(chained_cols, vec!["P".to_string(), "Q".to_string()]);
    assert_eq!(chained_cols, direct_cols);
    assert_eq!(chained_rows.len(), direct_rows.len());
}

#[test]
fn union_of_matching_domains_compiles_and_runs() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let sql = compile(
        "project[name](emp) union project[dept](dept);",
        driver.catalog(),
        &mut names,
    )
    .unwrap();
    let (_, rows) = driver.execute(&sql).unwrap();
    assert!(!rows.is_empty());
}

#[test]
fn union_rejects_domain_mismatch() {
    let (_dir, driver) = emp_dept_driver();
    let mut names = NameGenerator::new();
    let err = compile(
        "project[name](emp) union project[sal](emp);",
        driver.catalog(),
        &mut names,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("SEMANTIC ERROR (UNION)"));
}
