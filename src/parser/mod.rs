//! Hand-written recursive-descent / precedence-climbing parser, building
//! [`RaNode`] values directly rather than a lossless syntax tree: the
//! subtree inspector only needs a serializable, reconstructible logical
//! tree, not source-range fidelity, so no separate concrete-syntax layer is
//! built and thrown away afterwards.

use crate::ast::{AggFunc, AggItem, CompareOp, Condition, NodeHeader, Operand, RaNode};
use crate::error::CompileError;
use crate::lexer::{Lexer, Token, TokenKind};

/// Binding power of the two right-associative precedence tiers: `TIMES`
/// and `JOIN` bind tighter than `UNION`/`MINUS`/`INTERSECT`.
fn infix_binding_power(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::UnionKw | TokenKind::MinusKw | TokenKind::IntersectKw => Some(1),
        TokenKind::TimesKw | TokenKind::JoinKw => Some(2),
        _ => None,
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

/// Parses one complete `expr ;` statement.
pub fn parse(source: &str) -> Result<RaNode, CompileError> {
    let (tokens, warnings) = Lexer::tokenize(source);
    for warning in &warnings {
        log::warn!("{warning}");
    }
    if tokens.is_empty() {
        return Err(CompileError::Lexical(
            "no tokens could be recognized in the input".to_string(),
        ));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_expr(0)?;
    parser.expect(TokenKind::Semi)?;
    Ok(node)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn syntax_error_at_current(&self) -> CompileError {
        let value = self
            .peek()
            .map(|t| t.text.to_string())
            .unwrap_or_else(|| "None".to_string());
        CompileError::Syntax(value)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, CompileError> {
        match self.peek_kind() {
            Some(k) if k == kind => Ok(self.bump().unwrap()),
            _ => Err(self.syntax_error_at_current()),
        }
    }

    fn expect_ident(&mut self) -> Result<String, CompileError> {
        let tok = self.expect(TokenKind::Ident)?;
        Ok(tok.text.to_uppercase())
    }

    fn expect_agg_func(&mut self) -> Result<AggFunc, CompileError> {
        let tok = self.peek().cloned().ok_or_else(|| self.syntax_error_at_current())?;
        if !tok.kind.is_agg_op() {
            return Err(self.syntax_error_at_current());
        }
        self.bump();
        AggFunc::parse(tok.text).ok_or_else(|| CompileError::Syntax(tok.text.to_string()))
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    // query := expr SEMI, right-associative precedence climbing over expr.
    fn parse_expr(&mut self, min_bp: u8) -> Result<RaNode, CompileError> {
        let mut lhs = self.parse_primary()?;

        loop {
            let Some(kind) = self.peek_kind() else { break };
            let Some(bp) = infix_binding_power(kind) else { break };
            if bp < min_bp {
                break;
            }
            self.bump();
            // Right-associative: recurse at the same binding power.
            let rhs = self.parse_expr(bp)?;
            lhs = self.build_binary(kind, lhs, rhs);
        }

        Ok(lhs)
    }

    fn build_binary(&self, kind: TokenKind, left: RaNode, right: RaNode) -> RaNode {
        let header = NodeHeader::default();
        match kind {
            TokenKind::UnionKw => RaNode::Union {
                header,
                left: Box::new(left),
                right: Box::new(right),
            },
            TokenKind::MinusKw => RaNode::Minus {
                header,
                left: Box::new(left),
                right: Box::new(right),
            },
            TokenKind::IntersectKw => RaNode::Intersect {
                header,
                left: Box::new(left),
                right: Box::new(right),
            },
            TokenKind::TimesKw => RaNode::Times {
                header,
                left: Box::new(left),
                right: Box::new(right),
            },
            TokenKind::JoinKw => RaNode::Join {
                header,
                left: Box::new(left),
                right: Box::new(right),
                join_columns: Vec::new(),
            },
            _ => unreachable!("build_binary called with a non-operator token"),
        }
    }

    fn parse_primary(&mut self) -> Result<RaNode, CompileError> {
        match self.peek_kind() {
            Some(TokenKind::Ident) => {
                let name = self.expect_ident()?;
                Ok(RaNode::Relation {
                    header: NodeHeader {
                        relation_name: Some(name.clone()),
                        ..Default::default()
                    },
                    name,
                })
            }
            Some(TokenKind::LParen) => {
                self.bump();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            Some(TokenKind::ProjectKw) => self.parse_project_or_rename(true),
            Some(TokenKind::RenameKw) => self.parse_project_or_rename(false),
            Some(TokenKind::SelectKw) => self.parse_select(),
            Some(TokenKind::AggregateKw) => self.parse_aggregate(),
            _ => Err(self.syntax_error_at_current()),
        }
    }

    fn parse_attr_list(&mut self) -> Result<Vec<String>, CompileError> {
        let mut attrs = vec![self.expect_ident()?];
        while self.at(TokenKind::Comma) {
            self.bump();
            attrs.push(self.expect_ident()?);
        }
        Ok(attrs)
    }

    fn parse_project_or_rename(&mut self, is_project: bool) -> Result<RaNode, CompileError> {
        self.bump(); // PROJECT | RENAME
        self.expect(TokenKind::LBracket)?;
        let columns = self.parse_attr_list()?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::LParen)?;
        let child = self.parse_expr(0)?;
        self.expect(TokenKind::RParen)?;

        let header = NodeHeader::default();
        Ok(if is_project {
            RaNode::Project {
                header,
                child: Box::new(child),
                columns,
            }
        } else {
            RaNode::Rename {
                header,
                child: Box::new(child),
                columns,
            }
        })
    }

    fn parse_select(&mut self) -> Result<RaNode, CompileError> {
        self.bump(); // SELECT
        self.expect(TokenKind::LBracket)?;
        let conditions = self.parse_condition_list(false)?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::LParen)?;
        let child = self.parse_expr(0)?;
        self.expect(TokenKind::RParen)?;
        Ok(RaNode::Select {
            header: NodeHeader::default(),
            child: Box::new(child),
            conditions,
        })
    }

    /// `condition`/`gen_condition`: one or more `AND`-joined comparisons.
    /// `allow_agg` selects between the plain `operand` grammar (used by
    /// `SELECT`) and the extended `gen_operand` grammar (used by
    /// `AGGREGATE`'s `HAVING` clause), which additionally allows
    /// `AGG_OP(ID)` on either side of the comparison.
    fn parse_condition_list(&mut self, allow_agg: bool) -> Result<Vec<Condition>, CompileError> {
        let mut conditions = vec![self.parse_condition(allow_agg)?];
        while self.at(TokenKind::AndKw) {
            self.bump();
            conditions.push(self.parse_condition(allow_agg)?);
        }
        Ok(conditions)
    }

    fn parse_condition(&mut self, allow_agg: bool) -> Result<Condition, CompileError> {
        let left = self.parse_operand(allow_agg)?;
        let op_tok = self.expect(TokenKind::Comparison)?;
        let op = CompareOp::parse(op_tok.text)
            .ok_or_else(|| CompileError::Syntax(op_tok.text.to_string()))?;
        let right = self.parse_operand(allow_agg)?;
        Ok(Condition { left, op, right })
    }

    fn parse_operand(&mut self, allow_agg: bool) -> Result<Operand, CompileError> {
        if allow_agg && self.peek().map(|t| t.kind.is_agg_op()).unwrap_or(false) {
            let func = self.expect_agg_func()?;
            self.expect(TokenKind::LParen)?;
            let column = self.expect_ident()?;
            self.expect(TokenKind::RParen)?;
            return Ok(Operand::Agg { func, column });
        }

        match self.peek_kind() {
            Some(TokenKind::Ident) => Ok(Operand::Col(self.expect_ident()?)),
            Some(TokenKind::Str) => {
                let tok = self.bump().unwrap();
                Ok(Operand::Str(tok.text[1..tok.text.len() - 1].to_string()))
            }
            Some(TokenKind::Number) => {
                let tok = self.bump().unwrap();
                let value: f64 = tok
                    .text
                    .parse()
                    .map_err(|_| CompileError::Syntax(tok.text.to_string()))?;
                Ok(Operand::Num(value))
            }
            _ => Err(self.syntax_error_at_current()),
        }
    }

    fn parse_gen_attr_list(&mut self) -> Result<Vec<AggItem>, CompileError> {
        let mut items = vec![self.parse_gen_attr()?];
        while self.at(TokenKind::Comma) {
            self.bump();
            items.push(self.parse_gen_attr()?);
        }
        Ok(items)
    }

    fn parse_gen_attr(&mut self) -> Result<AggItem, CompileError> {
        if self.peek().map(|t| t.kind.is_agg_op()).unwrap_or(false) {
            let func = self.expect_agg_func()?;
            self.expect(TokenKind::LParen)?;
            let column = self.expect_ident()?;
            self.expect(TokenKind::RParen)?;
            Ok(AggItem::Agg { func, column })
        } else {
            Ok(AggItem::Id(self.expect_ident()?))
        }
    }

    // AGGREGATE[(attr_list),(gen_attr_list)[,(attr_list)[,(gen_condition)]]](expr)
    fn parse_aggregate(&mut self) -> Result<RaNode, CompileError> {
        self.bump(); // AGGREGATE
        self.expect(TokenKind::LBracket)?;
        self.expect(TokenKind::LParen)?;
        let columns = self.parse_attr_list()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Comma)?;
        self.expect(TokenKind::LParen)?;
        let project_list = self.parse_gen_attr_list()?;
        self.expect(TokenKind::RParen)?;

        let mut group_by = None;
        let mut having = None;

        if self.at(TokenKind::Comma) {
            self.bump();
            self.expect(TokenKind::LParen)?;
            group_by = Some(self.parse_attr_list()?);
            self.expect(TokenKind::RParen)?;

            if self.at(TokenKind::Comma) {
                self.bump();
                self.expect(TokenKind::LParen)?;
                having = Some(self.parse_condition_list(true)?);
                self.expect(TokenKind::RParen)?;
            }
        }

        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::LParen)?;
        let child = self.parse_expr(0)?;
        self.expect(TokenKind::RParen)?;

        Ok(RaNode::Aggregate {
            header: NodeHeader::default(),
            child: Box::new(child),
            columns,
            project_list,
            group_by,
            having,
        })
    }
}
