//! Read-only schema: for each relation, ordered attribute names and
//! normalized domains.

use std::fmt;

use indexmap::IndexMap;

/// The closed enumeration of normalized attribute types.
///
/// Obtained from a raw SQL type string by prefix matching: `INT*`/`NUM*`
/// become [`Domain::Integer`], `DEC*` becomes [`Domain::Decimal`], and
/// `CHAR*`/`VARCHAR*`/`TEXT*` (or anything else) become [`Domain::Varchar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    Integer,
    Decimal,
    Varchar,
}

use serde::{Deserialize, Serialize};

impl Domain {
    /// Normalizes a raw SQL column type (as reported by the driver) into a
    /// [`Domain`].
    pub fn from_sql_type(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if upper.starts_with("INT") || upper.starts_with("NUM") {
            Domain::Integer
        } else if upper.starts_with("DEC") {
            Domain::Decimal
        } else {
            // CHAR*, VARCHAR*, TEXT*, and anything unrecognized fold to VARCHAR.
            Domain::Varchar
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Domain::Varchar)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::Integer => "INTEGER",
            Domain::Decimal => "DECIMAL",
            Domain::Varchar => "VARCHAR",
        };
        write!(f, "{s}")
    }
}

/// A named, typed, ordered-column relation known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub attributes: Vec<(String, Domain)>,
}

impl Relation {
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn domains(&self) -> Vec<Domain> {
        self.attributes.iter().map(|(_, d)| *d).collect()
    }
}

/// Case-insensitive catalog of relations, keyed by their upper-cased name.
///
/// Relation and attribute names are folded to upper case on insertion, per
/// the relational-algebra convention that identifiers are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    relations: IndexMap<String, Relation>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, attributes: Vec<(String, Domain)>) {
        let name = name.into().to_uppercase();
        let attributes = attributes
            .into_iter()
            .map(|(n, d)| (n.to_uppercase(), d))
            .collect();
        self.relations.insert(
            name.clone(),
            Relation {
                name,
                attributes,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Relation> {
        self.relations.get(&name.to_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(&name.to_uppercase())
    }

    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }
}
