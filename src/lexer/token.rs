//! Token definition for the [`logos`] lexer.

use std::fmt;

/// Use to tokenize relational-algebra source text.
#[derive(logos::Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    #[regex("[ \t\n\r]+")]
    Whitespace,

    #[regex("#.*")]
    Comment,

    #[token("project", ignore(case))]
    ProjectKw,

    #[token("rename", ignore(case))]
    RenameKw,

    #[token("union", ignore(case))]
    UnionKw,

    #[token("intersect", ignore(case))]
    IntersectKw,

    #[token("minus", ignore(case))]
    MinusKw,

    #[token("join", ignore(case))]
    JoinKw,

    #[token("times", ignore(case))]
    TimesKw,

    #[token("select", ignore(case))]
    SelectKw,

    #[token("and", ignore(case))]
    AndKw,

    #[token("aggregate", ignore(case))]
    AggregateKw,

    #[token("sum", ignore(case))]
    SumKw,

    #[token("avg", ignore(case))]
    AvgKw,

    #[token("count", ignore(case))]
    CountKw,

    #[token("min", ignore(case))]
    MinKw,

    #[token("max", ignore(case))]
    MaxKw,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[regex("<>|<=|>=|<|>|=")]
    Comparison,

    // Widened from the historical `[-+]?[1-9][0-9]*(\.([0-9]+)?)?`: a leading
    // zero and a bare `0.x` fraction are both legitimate numeric literals.
    #[regex(r"[-+]?[0-9]+(\.([0-9]+)?)?", priority = 2)]
    Number,

    #[regex(r"'[^']*'")]
    Str,

    #[regex(r"[a-zA-Z][_a-zA-Z0-9]*", priority = 1)]
    Ident,

    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    pub fn is_agg_op(self) -> bool {
        matches!(
            self,
            Self::SumKw | Self::AvgKw | Self::CountKw | Self::MinKw | Self::MaxKw
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn first_kind(input: &str) -> TokenKind {
        Lexer::new(input).tokens().next().unwrap().kind
    }

    #[test]
    fn lex_keyword_is_case_insensitive() {
        assert_eq!(first_kind("PROJECT"), TokenKind::ProjectKw);
        assert_eq!(first_kind("Project"), TokenKind::ProjectKw);
    }

    #[test]
    fn lex_agg_op_before_ident() {
        assert_eq!(first_kind("count"), TokenKind::CountKw);
        assert_eq!(first_kind("countx"), TokenKind::Ident);
    }

    #[test]
    fn lex_number_allows_leading_zero() {
        assert_eq!(first_kind("0.5"), TokenKind::Number);
        assert_eq!(first_kind("0"), TokenKind::Number);
    }
}
