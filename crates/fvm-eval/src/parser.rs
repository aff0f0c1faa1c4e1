//! Recursive descent parser for guard and action text.

use crate::eval::{BinOp, Expr, Stmt, UnaryOp};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::Value;
use thiserror::Error;

/// Parser error. Offsets are byte positions in the parsed text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token at {offset}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("invalid syntax at {offset}: {message}")]
    InvalidSyntax { message: String, offset: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parser over the tokens of one guard or action.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
        }
    }

    /// Parse a complete expression and require end of input.
    pub fn parse_expr_only(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr(1)?;
        self.expect(TokenKind::Eof)?;
        Ok(expr)
    }

    /// Parse `;`-separated statements. Empty input is an empty sequence.
    pub fn parse_stmts(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            if self.match_token(TokenKind::Semicolon) {
                continue;
            }
            stmts.push(self.parse_stmt()?);
            if !self.is_at_end() {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Skip => {
                self.advance();
                Ok(Stmt::Skip)
            }
            TokenKind::Ident(var) => {
                self.advance();
                self.expect(TokenKind::Assign)?;
                let value = self.parse_expr(1)?;
                Ok(Stmt::Assign { var, value })
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "statement".to_string(),
                found: other.to_string(),
                offset: self.current_offset(),
            }),
        }
    }

    /// Precedence climbing: parse operators binding at least as tight as `min_prec`.
    fn parse_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.peek_binop() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            // All operators are left-associative
            let right = self.parse_expr(prec + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn peek_binop(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::Or => Some(BinOp::Or),
            TokenKind::And => Some(BinOp::And),
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::Ne => Some(BinOp::Ne),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Ge => Some(BinOp::Ge),
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Mod),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.match_token(TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        if self.match_token(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let offset = self.current_offset();
        let kind = self.peek_kind();
        match kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Lit(Value::Int(n)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Lit(Value::Str(s)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Lit(Value::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Lit(Value::Bool(false)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Var(name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(1)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::InvalidInteger(digits) => Err(ParseError::InvalidSyntax {
                message: format!("integer literal {} out of range", digits),
                offset,
            }),
            other => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: other.to_string(),
                offset,
            }),
        }
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::Eof)
    }

    fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.offset)
            .unwrap_or(0)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: kind.to_string(),
                found: self.peek_kind().to_string(),
                offset: self.current_offset(),
            })
        }
    }
}

/// Parse a guard expression.
pub fn parse_expr(source: &str) -> ParseResult<Expr> {
    Parser::new(source).parse_expr_only()
}

/// Parse an action: `;`-separated assignments or `skip`.
pub fn parse_stmts(source: &str) -> ParseResult<Vec<Stmt>> {
    Parser::new(source).parse_stmts()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binary_tree_shape() {
        let expr = parse_expr("a || b && c").unwrap();
        match expr {
            Expr::Binary {
                op: BinOp::Or,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinOp::And, .. })),
            other => panic!("expected Or at root, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_statements() {
        let stmts = parse_stmts("x := 1; skip; y := x").unwrap();
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[1], Stmt::Skip);
        assert!(parse_stmts("").unwrap().is_empty());
        assert_eq!(parse_stmts("x := 1;").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_expr("1 +"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_expr("(x"),
            Err(ParseError::UnexpectedToken { expected, .. }) if expected == ")"
        ));
        assert!(matches!(
            parse_stmts("x = 1"),
            Err(ParseError::UnexpectedToken { offset: 2, .. })
        ));
        assert!(matches!(
            parse_expr("99999999999999999999"),
            Err(ParseError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(parse_expr("x y").is_err());
        assert!(parse_stmts("x := 1 y := 2").is_err());
    }
}
