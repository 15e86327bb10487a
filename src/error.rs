//! Unified error taxonomy for the compilation pipeline.

use crate::driver::DriverError;

/// Everything that can go wrong turning RA source into an executable query.
///
/// Semantic variants carry the operator tag (`"SELECT"`, `"PROJECT"`, …) that
/// produced them and render as `SEMANTIC ERROR (<OP>): <detail>`, matching
/// the message shape of the system this compiler replaces.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The input could not be tokenized into anything parseable at all.
    /// Individual illegal characters are otherwise skipped and logged as
    /// warnings rather than aborting compilation.
    #[error("Lexical error: {0}")]
    Lexical(String),

    #[error("Syntax error: '{0}'")]
    Syntax(String),

    #[error("Relation '{0}' does not exist")]
    MissingRelation(String),

    #[error("SEMANTIC ERROR ({op}): {detail}")]
    UnknownAttribute { op: &'static str, detail: String },

    #[error("SEMANTIC ERROR ({op}): {detail}")]
    TypeMismatch { op: &'static str, detail: String },

    #[error("SEMANTIC ERROR ({op}): {detail}")]
    ArityMismatch { op: &'static str, detail: String },

    #[error("SEMANTIC ERROR ({op}): {detail}")]
    DuplicateName { op: &'static str, detail: String },

    #[error("SEMANTIC ERROR (AGGREGATE): {0}")]
    AggregateMisuse(String),

    #[error("Node not found in the tree.")]
    NodeNotFound,

    #[error(transparent)]
    Driver(#[from] DriverError),
}
