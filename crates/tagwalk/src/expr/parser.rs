//! Recursive-descent parser for the expression language
//!
//! Precedence, lowest first:
//!
//! ```text
//! ||
//! &&
//! == != === !==
//! < <= > >=
//! + -
//! * / %
//! ! - + (prefix)
//! .name [index] (postfix)
//! ```

use super::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use super::lexer::{tokenize, Token, TokenKind};
use crate::error::ExprError;
use crate::value::Value;

/// Nesting allowed in one expression. Every bracket, prefix operator,
/// postfix access and chained binary operator adds a level.
pub const MAX_DEPTH: usize = 128;

/// Parse a single expression; trailing tokens are an error.
pub fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let mut parser = Parser::new(src)?;
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse `;`-separated statements. Empty statements are skipped.
pub fn parse_statements(src: &str) -> Result<Vec<Stmt>, ExprError> {
    let mut parser = Parser::new(src)?;
    let mut stmts = Vec::new();
    while !parser.at_end() {
        if parser.eat(&TokenKind::Semicolon) {
            continue;
        }
        stmts.push(parser.statement()?);
        if !parser.at_end() && !parser.eat(&TokenKind::Semicolon) {
            return Err(parser.unexpected("`;` or end of input"));
        }
    }
    Ok(stmts)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(src: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Token Helpers
    // ═══════════════════════════════════════════════════════════════════

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_end(&self) -> Result<(), ExprError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        match self.tokens.get(self.pos) {
            Some(tok) => ExprError::UnexpectedToken {
                found: tok.kind.to_string(),
                expected: expected.to_string(),
                offset: tok.offset,
            },
            None => ExprError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    fn statement(&mut self) -> Result<Stmt, ExprError> {
        // Declaration keywords are accepted and ignored: every name is global
        if let Some(TokenKind::Ident(kw)) = self.peek() {
            if matches!(kw.as_str(), "let" | "var" | "const")
                && matches!(self.peek_at(1), Some(TokenKind::Ident(_)))
            {
                self.pos += 1;
            }
        }

        // Prefix step: ++i / --i
        if let Some(delta) = step_delta(self.peek()) {
            if let Some(TokenKind::Ident(name)) = self.peek_at(1) {
                let name = name.clone();
                self.pos += 2;
                return Ok(Stmt::Step { name, delta });
            }
        }

        if let Some(TokenKind::Ident(name)) = self.peek() {
            let name = name.clone();
            let next = self.peek_at(1).cloned();

            if let Some(delta) = step_delta(next.as_ref()) {
                self.pos += 2;
                return Ok(Stmt::Step { name, delta });
            }

            let op = match next {
                Some(TokenKind::Assign) => Some(None),
                Some(TokenKind::PlusAssign) => Some(Some(BinaryOp::Add)),
                Some(TokenKind::MinusAssign) => Some(Some(BinaryOp::Sub)),
                Some(TokenKind::StarAssign) => Some(Some(BinaryOp::Mul)),
                Some(TokenKind::SlashAssign) => Some(Some(BinaryOp::Div)),
                _ => None,
            };
            if let Some(op) = op {
                self.pos += 2;
                let value = self.expression()?;
                return Ok(Stmt::Assign { name, op, value });
            }
        }

        let expr = self.expression()?;
        if matches!(self.peek(), Some(TokenKind::Assign)) {
            return Err(ExprError::InvalidAssignTarget(format!("{:?}", expr)));
        }
        Ok(Stmt::Expr(expr))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    fn expression(&mut self) -> Result<Expr, ExprError> {
        self.or()
    }

    fn or(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut left = self.and()?;
        while self.eat(&TokenKind::OrOr) {
            self.descend()?;
            let right = self.and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut left = self.equality()?;
        while self.eat(&TokenKind::AndAnd) {
            self.descend()?;
            let right = self.equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::EqEq) => BinaryOp::LooseEq,
                Some(TokenKind::NotEq) => BinaryOp::LooseNe,
                Some(TokenKind::EqEqEq) => BinaryOp::StrictEq,
                Some(TokenKind::NotEqEq) => BinaryOp::StrictNe,
                _ => {
                    self.depth = entry;
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.descend()?;
            let right = self.comparison()?;
            left = binary(op, left, right);
        }
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut left = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Le) => BinaryOp::Le,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Ge) => BinaryOp::Ge,
                _ => {
                    self.depth = entry;
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.descend()?;
            let right = self.additive()?;
            left = binary(op, left, right);
        }
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => {
                    self.depth = entry;
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.descend()?;
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => {
                    self.depth = entry;
                    return Ok(left);
                }
            };
            self.pos += 1;
            self.descend()?;
            let right = self.unary()?;
            left = binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        let op = match self.peek() {
            Some(TokenKind::Bang) => UnaryOp::Not,
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            _ => return self.postfix(),
        };
        self.pos += 1;
        self.descend()?;
        let operand = self.unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let entry = self.depth;
        let mut expr = self.primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                self.descend()?;
                let Some(TokenKind::Ident(name)) = self.peek().cloned() else {
                    return Err(self.unexpected("a property name"));
                };
                self.pos += 1;
                expr = Expr::Member {
                    target: Box::new(expr),
                    name,
                };
            } else if self.eat(&TokenKind::LBracket) {
                self.descend()?;
                let index = self.expression()?;
                self.expect(TokenKind::RBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                self.depth = entry;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let Some(tok) = self.advance() else {
            return Err(ExprError::UnexpectedEnd {
                expected: "an expression".to_string(),
            });
        };
        match tok.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::string(s))),
            TokenKind::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" => Expr::Literal(Value::Null),
                "undefined" => Expr::Literal(Value::Undefined),
                "NaN" => Expr::Literal(Value::Number(f64::NAN)),
                "Infinity" => Expr::Literal(Value::Number(f64::INFINITY)),
                _ => Expr::Variable(name),
            }),
            TokenKind::LParen => {
                self.descend()?;
                let expr = self.expression()?;
                self.expect(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.descend()?;
                let mut items = Vec::new();
                if !self.eat(&TokenKind::RBracket) {
                    loop {
                        items.push(self.expression()?);
                        if self.eat(&TokenKind::RBracket) {
                            break;
                        }
                        self.expect(TokenKind::Comma)?;
                    }
                }
                self.depth -= 1;
                Ok(Expr::Array(items))
            }
            _ => {
                self.pos -= 1;
                Err(self.unexpected("an expression"))
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn step_delta(kind: Option<&TokenKind>) -> Option<f64> {
    match kind {
        Some(TokenKind::PlusPlus) => Some(1.0),
        Some(TokenKind::MinusMinus) => Some(-1.0),
        _ => None,
    }
}
