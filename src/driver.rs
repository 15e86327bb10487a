//! The execution backend: opens a SQLite database, reports its schema for
//! catalog construction, and runs generated SQL against it.

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::catalog::{Catalog, Domain};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("failed to read schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),
}

/// A single SQL value as read back from a query result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Real(r) => write!(f, "{r}"),
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::Null => write!(f, "None"),
        }
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(r) => SqlValue::Real(r),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => SqlValue::Text("<blob>".to_string()),
        }
    }
}

/// The execution surface the compiler needs from a backing store: what
/// relations and columns exist, and how to run a generated query.
pub trait Driver {
    fn catalog(&self) -> &Catalog;
    fn execute(&self, sql: &str) -> Result<(Vec<String>, Vec<Vec<SqlValue>>), DriverError>;
}

/// A `Driver` backed by a single synchronous SQLite connection, built by
/// reading `sqlite_schema` and `pragma_table_info` once at open time.
pub struct SqliteDriver {
    conn: Connection,
    catalog: Catalog,
}

impl SqliteDriver {
    pub fn open(path: &str) -> Result<Self, DriverError> {
        let conn = Connection::open(path).map_err(DriverError::Open)?;
        let catalog = load_catalog(&conn)?;
        Ok(Self { conn, catalog })
    }

    pub fn open_in_memory() -> Result<Self, DriverError> {
        let conn = Connection::open_in_memory().map_err(DriverError::Open)?;
        let catalog = load_catalog(&conn)?;
        Ok(Self { conn, catalog })
    }

    /// Re-reads the schema, e.g. after DDL run outside the compiler.
    pub fn refresh_catalog(&mut self) -> Result<(), DriverError> {
        self.catalog = load_catalog(&self.conn)?;
        Ok(())
    }
}

impl Driver for SqliteDriver {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn execute(&self, sql: &str) -> Result<(Vec<String>, Vec<Vec<SqlValue>>), DriverError> {
        let mut stmt = self.conn.prepare(sql).map_err(DriverError::Query)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|s| s.to_uppercase())
            .collect();

        let mut rows_iter = stmt.query([]).map_err(DriverError::Query)?;
        let mut rows = Vec::new();
        while let Some(row) = rows_iter.next().map_err(DriverError::Query)? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value = row.get_ref(i).map_err(DriverError::Query)?;
                values.push(SqlValue::from(value));
            }
            rows.push(values);
        }
        Ok((columns, rows))
    }
}

fn load_catalog(conn: &Connection) -> Result<Catalog, DriverError> {
    let mut catalog = Catalog::new();
    let mut relations_stmt = conn
        .prepare("select name from sqlite_schema where type='table'")
        .map_err(DriverError::Schema)?;
    let relation_names: Vec<String> = relations_stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(DriverError::Schema)?
        .collect::<Result<_, _>>()
        .map_err(DriverError::Schema)?;

    for rname in relation_names {
        let query = format!("select name, type from pragma_table_info('{rname}')");
        let mut attrs_stmt = conn.prepare(&query).map_err(DriverError::Schema)?;
        let attrs: Vec<(String, Domain)> = attrs_stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let col_type: String = row.get(1)?;
                Ok((name.to_uppercase(), Domain::from_sql_type(&col_type)))
            })
            .map_err(DriverError::Schema)?
            .collect::<Result<_, _>>()
            .map_err(DriverError::Schema)?;
        catalog.insert(rname, attrs);
    }
    Ok(catalog)
}
