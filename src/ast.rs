//! The expression tree produced by the parser and consumed by every later
//! stage (namer, analyzer, SQL generator, subtree inspector).
//!
//! Re-expressed from the original "one record with many optional fields"
//! shape as a tagged sum: each [`RaNode`] variant only carries the payload
//! its operator actually needs, so e.g. a `Select` always has conditions and
//! a `Join` always has a join-column list, enforced at compile time rather
//! than by convention.

use serde::{Deserialize, Serialize};

use crate::catalog::Domain;

/// Fields every node carries, regardless of operator: the identity used by
/// the subtree inspector, the assigned-or-original relation name, and the
/// schema computed by the semantic analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeHeader {
    /// Pre-order identifier assigned when the tree is flattened for the
    /// subtree inspector. Zero until that pass runs.
    #[serde(default)]
    pub id: u32,
    /// `None` until the namer or parser assigns a name; relation leaves get
    /// their catalog name at parse time, every other node gets a `TEMP_k`
    /// name from the namer.
    pub relation_name: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggFunc {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl AggFunc {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_uppercase().as_str() {
            "SUM" => Some(Self::Sum),
            "AVG" => Some(Self::Avg),
            "COUNT" => Some(Self::Count),
            "MIN" => Some(Self::Min),
            "MAX" => Some(Self::Max),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Count => "COUNT",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Never produced by the parser (the `COMPARISON` token never lexes
    /// `LIKE`); kept so the SQL generator can still emit it for a tree built
    /// programmatically or reconstructed from serialized JSON.
    Like,
}

impl CompareOp {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "=" => Some(Self::Eq),
            "<>" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ if text.eq_ignore_ascii_case("like") => Some(Self::Like),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }
}

/// One side of a condition: a column reference, a literal, or an aggregate
/// function applied to a column (only reachable from an `AGGREGATE`'s
/// `HAVING` clause).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operand {
    Col(String),
    Str(String),
    Num(f64),
    Agg { func: AggFunc, column: String },
}

impl Operand {
    /// The `"col"`/`"str"`/`"num"`/`"agg"` tag used in diagnostics, matching
    /// the vocabulary the semantic analyzer reports errors in.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Col(_) => "col",
            Self::Str(_) => "str",
            Self::Num(_) => "num",
            Self::Agg { .. } => "agg",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

/// One entry of an `AGGREGATE`'s source projection list: either a bare
/// grouping column or an aggregate function applied to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AggItem {
    Id(String),
    Agg { func: AggFunc, column: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum RaNode {
    Relation {
        header: NodeHeader,
        name: String,
    },
    Project {
        header: NodeHeader,
        child: Box<RaNode>,
        columns: Vec<String>,
    },
    Rename {
        header: NodeHeader,
        child: Box<RaNode>,
        columns: Vec<String>,
    },
    Select {
        header: NodeHeader,
        child: Box<RaNode>,
        conditions: Vec<Condition>,
    },
    Union {
        header: NodeHeader,
        left: Box<RaNode>,
        right: Box<RaNode>,
    },
    Intersect {
        header: NodeHeader,
        left: Box<RaNode>,
        right: Box<RaNode>,
    },
    Minus {
        header: NodeHeader,
        left: Box<RaNode>,
        right: Box<RaNode>,
    },
    Join {
        header: NodeHeader,
        left: Box<RaNode>,
        right: Box<RaNode>,
        #[serde(default)]
        join_columns: Vec<String>,
    },
    Times {
        header: NodeHeader,
        left: Box<RaNode>,
        right: Box<RaNode>,
    },
    Aggregate {
        header: NodeHeader,
        child: Box<RaNode>,
        /// Output column names (the RA source's rename list).
        columns: Vec<String>,
        project_list: Vec<AggItem>,
        /// `None` for `aggregate1` (no `GROUP BY`).
        group_by: Option<Vec<String>>,
        /// `None` unless the source used the three-argument `aggregate3`
        /// form with a `HAVING` clause.
        having: Option<Vec<Condition>>,
    },
}

impl RaNode {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Relation { .. } => "relation",
            Self::Project { .. } => "project",
            Self::Rename { .. } => "rename",
            Self::Select { .. } => "select",
            Self::Union { .. } => "union",
            Self::Intersect { .. } => "intersect",
            Self::Minus { .. } => "minus",
            Self::Join { .. } => "join",
            Self::Times { .. } => "times",
            Self::Aggregate { .. } => "aggregate",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate { .. })
    }

    pub fn header(&self) -> &NodeHeader {
        match self {
            Self::Relation { header, .. }
            | Self::Project { header, .. }
            | Self::Rename { header, .. }
            | Self::Select { header, .. }
            | Self::Union { header, .. }
            | Self::Intersect { header, .. }
            | Self::Minus { header, .. }
            | Self::Join { header, .. }
            | Self::Times { header, .. }
            | Self::Aggregate { header, .. } => header,
        }
    }

    pub fn header_mut(&mut self) -> &mut NodeHeader {
        match self {
            Self::Relation { header, .. }
            | Self::Project { header, .. }
            | Self::Rename { header, .. }
            | Self::Select { header, .. }
            | Self::Union { header, .. }
            | Self::Intersect { header, .. }
            | Self::Minus { header, .. }
            | Self::Join { header, .. }
            | Self::Times { header, .. }
            | Self::Aggregate { header, .. } => header,
        }
    }

    pub fn relation_name(&self) -> Option<&str> {
        self.header().relation_name.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.header().attributes
    }

    pub fn domains(&self) -> &[Domain] {
        &self.header().domains
    }

    /// The single child of a unary operator, or the left child of a binary
    /// one. `None` for a `relation` leaf.
    pub fn left_child(&self) -> Option<&RaNode> {
        match self {
            Self::Relation { .. } => None,
            Self::Project { child, .. }
            | Self::Rename { child, .. }
            | Self::Select { child, .. }
            | Self::Aggregate { child, .. } => Some(child),
            Self::Union { left, .. }
            | Self::Intersect { left, .. }
            | Self::Minus { left, .. }
            | Self::Join { left, .. }
            | Self::Times { left, .. } => Some(left),
        }
    }

    pub fn left_child_mut(&mut self) -> Option<&mut RaNode> {
        match self {
            Self::Relation { .. } => None,
            Self::Project { child, .. }
            | Self::Rename { child, .. }
            | Self::Select { child, .. }
            | Self::Aggregate { child, .. } => Some(child),
            Self::Union { left, .. }
            | Self::Intersect { left, .. }
            | Self::Minus { left, .. }
            | Self::Join { left, .. }
            | Self::Times { left, .. } => Some(left),
        }
    }

    pub fn right_child(&self) -> Option<&RaNode> {
        match self {
            Self::Union { right, .. }
            | Self::Intersect { right, .. }
            | Self::Minus { right, .. }
            | Self::Join { right, .. }
            | Self::Times { right, .. } => Some(right),
            _ => None,
        }
    }

    pub fn right_child_mut(&mut self) -> Option<&mut RaNode> {
        match self {
            Self::Union { right, .. }
            | Self::Intersect { right, .. }
            | Self::Minus { right, .. }
            | Self::Join { right, .. }
            | Self::Times { right, .. } => Some(right),
            _ => None,
        }
    }
}
