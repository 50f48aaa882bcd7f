//! Recursive-descent parser that builds the AST while it recognises the input.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! line        := IDENT '=' flow | IDENT '=' expr | expr
//! flow        := IDENT ('->' IDENT '(' args? ')')+
//! expr        := conditional | or
//! conditional := 'if' '(' expr ')' ':' expr ('else' ':' expr)?
//! or          := and ('||' and)*
//! and         := compare ('&&' compare)*
//! compare     := additive (CMP additive)*          CMP: > < >= <= == !=
//! additive    := (STRING | term) (('+' | '-') term)*
//! term        := power (('*' | '/') power)*
//! power       := factor ('^' factor)?
//! factor      := NUMBER | IDENT | IDENT '(' args? ')'
//!              | '(' expr ')'
//!              | '(' expr ')' '?' '(' expr ')' ':' '(' expr ')'
//! args        := expr (',' expr)*
//! ```
//!
//! Every reduction allocates exactly one node after its children, so ids grow
//! bottom-up. The INITIAL root is allocated before anything else and wired to
//! the top node once the whole line has been consumed.

use lumen_syntax::ast::{Ast, EdgeRole, Literal, NodeId, NodeKind};
use lumen_syntax::error::{Error, ErrorKind, Result};
use lumen_syntax::token::{Token, TokenKind};

static EOF: TokenKind = TokenKind::Eof;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    ast: Ast,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            ast: Ast::new(),
        }
    }

    /// Parses one line. On a syntax error no tree is returned.
    pub fn parse_program(&mut self) -> Result<Ast> {
        self.pos = 0;
        self.ast = Ast::new();
        let root = self.ast.allocate(NodeKind::Initial, "INIT", Literal::Empty);
        let top = self.parse_line().map_err(|e| {
            log::debug!("parse failed: {}", e);
            e
        })?;
        if !self.at(&TokenKind::Eof) {
            return Err(self.unexpected());
        }
        self.ast.connect(root, top, EdgeRole::Operand)?;
        Ok(std::mem::take(&mut self.ast))
    }

    fn peek(&self) -> &TokenKind {
        self.tokens.get(self.pos).map_or(&EOF, |t| &t.kind)
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        self.tokens.get(self.pos + ahead).map_or(&EOF, |t| &t.kind)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn bump(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn position(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.col))
    }

    fn unexpected(&self) -> Error {
        let (line, col) = self.position();
        let msg = match self.peek() {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            other => format!("Unexpected token '{}'", other),
        };
        Error::with_span(ErrorKind::Syntax, msg, line, col)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.at(&kind) {
            self.bump();
            Ok(())
        } else {
            let (line, col) = self.position();
            let found = match self.peek() {
                TokenKind::Eof => "end of input".to_string(),
                other => format!("'{}'", other),
            };
            Err(Error::with_span(
                ErrorKind::Syntax,
                format!("Expected '{}', found {}", kind, found),
                line,
                col,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Allocates `kind` and attaches `children` in order.
    fn reduce(&mut self, kind: NodeKind, label: impl Into<String>, value: Literal, children: &[(EdgeRole, NodeId)]) -> Result<NodeId> {
        let node = self.ast.allocate(kind, label, value);
        for &(role, child) in children {
            self.ast.connect(node, child, role)?;
        }
        Ok(node)
    }

    fn binary(&mut self, kind: NodeKind, label: &str, lhs: NodeId, rhs: NodeId) -> Result<NodeId> {
        self.reduce(
            kind,
            label,
            Literal::Empty,
            &[(EdgeRole::Operand, lhs), (EdgeRole::Operand, rhs)],
        )
    }

    fn parse_line(&mut self) -> Result<NodeId> {
        if let (TokenKind::Ident(name), TokenKind::Equal) = (self.peek(), self.peek_at(1)) {
            let name = name.clone();
            self.bump();
            self.bump();
            let value = if matches!(self.peek(), TokenKind::Ident(_)) && self.peek_at(1) == &TokenKind::Arrow {
                self.parse_flow()?
            } else {
                self.parse_expr()?
            };
            let target = self.reduce(
                NodeKind::VariableAssign,
                format!("VAR_{}", name),
                Literal::Name(name),
                &[],
            )?;
            return self.reduce(
                NodeKind::Assign,
                "=",
                Literal::Empty,
                &[(EdgeRole::Operand, target), (EdgeRole::Operand, value)],
            );
        }
        self.parse_expr()
    }

    /// `src -> f(a) -> g()` becomes `g(f(src, a))`.
    fn parse_flow(&mut self) -> Result<NodeId> {
        let source = self.expect_ident()?;
        let mut acc = self.reduce(
            NodeKind::Variable,
            format!("VAR_{}", source),
            Literal::Name(source),
            &[],
        )?;
        while self.at(&TokenKind::Arrow) {
            self.bump();
            let name = self.expect_ident()?;
            self.expect(TokenKind::LParen)?;
            let mut args = vec![acc];
            if !self.at(&TokenKind::RParen) {
                args.extend(self.parse_args()?);
            }
            self.expect(TokenKind::RParen)?;
            acc = self.call(name, &args)?;
        }
        Ok(acc)
    }

    fn parse_expr(&mut self) -> Result<NodeId> {
        if self.at(&TokenKind::If) {
            return self.parse_conditional();
        }
        self.parse_or()
    }

    fn parse_conditional(&mut self) -> Result<NodeId> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let then = self.parse_expr()?;
        let alternate = if self.at(&TokenKind::Else) {
            self.bump();
            self.expect(TokenKind::Colon)?;
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.if_node(cond, then, alternate)
    }

    fn if_node(&mut self, cond: NodeId, then: NodeId, alternate: Option<NodeId>) -> Result<NodeId> {
        let mut children = vec![(EdgeRole::Condition, cond), (EdgeRole::Expression, then)];
        if let Some(alt) = alternate {
            children.push((EdgeRole::Alternate, alt));
        }
        self.reduce(NodeKind::If, "IF", Literal::Empty, &children)
    }

    fn parse_or(&mut self) -> Result<NodeId> {
        let mut lhs = self.parse_and()?;
        while self.at(&TokenKind::OrOr) {
            self.bump();
            let rhs = self.parse_and()?;
            lhs = self.binary(NodeKind::Or, "||", lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<NodeId> {
        let mut lhs = self.parse_compare()?;
        while self.at(&TokenKind::AndAnd) {
            self.bump();
            let rhs = self.parse_compare()?;
            lhs = self.binary(NodeKind::And, "&&", lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// Comparisons chain left to right: `a < b < c` is `(a < b) < c`.
    fn parse_compare(&mut self) -> Result<NodeId> {
        let mut lhs = self.parse_additive()?;
        loop {
            let (kind, label) = match self.peek() {
                TokenKind::Greater => (NodeKind::Gt, ">"),
                TokenKind::Less => (NodeKind::Lt, "<"),
                TokenKind::GreaterEq => (NodeKind::Ge, ">="),
                TokenKind::LessEq => (NodeKind::Le, "<="),
                TokenKind::EqEq => (NodeKind::Eq, "=="),
                TokenKind::NotEq => (NodeKind::Ne, "!="),
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_additive()?;
            lhs = self.binary(kind, label, lhs, rhs)?;
        }
    }

    /// A string literal may only open an additive chain, never follow an
    /// operator.
    fn parse_additive(&mut self) -> Result<NodeId> {
        let mut lhs = match self.peek() {
            TokenKind::String(s) => {
                let s = s.clone();
                self.bump();
                self.reduce(NodeKind::Str, format!("str_{}", s), Literal::Str(s), &[])?
            }
            _ => self.parse_term()?,
        };
        loop {
            let (kind, label) = match self.peek() {
                TokenKind::Plus => (NodeKind::Plus, "+"),
                TokenKind::Minus => (NodeKind::Minus, "-"),
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_term()?;
            lhs = self.binary(kind, label, lhs, rhs)?;
        }
    }

    fn parse_term(&mut self) -> Result<NodeId> {
        let mut lhs = self.parse_power()?;
        loop {
            let (kind, label) = match self.peek() {
                TokenKind::Star => (NodeKind::Times, "*"),
                TokenKind::Slash => (NodeKind::Divide, "/"),
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_power()?;
            lhs = self.binary(kind, label, lhs, rhs)?;
        }
    }

    /// `^` takes exactly two factors; `2^3^2` needs parentheses.
    fn parse_power(&mut self) -> Result<NodeId> {
        let base = self.parse_factor()?;
        if !self.at(&TokenKind::Caret) {
            return Ok(base);
        }
        self.bump();
        let exponent = self.parse_factor()?;
        self.binary(NodeKind::Power, "POW", base, exponent)
    }

    fn parse_factor(&mut self) -> Result<NodeId> {
        match self.peek().clone() {
            TokenKind::Int(n) => {
                self.bump();
                self.reduce(NodeKind::Number, format!("NUM_{}", n), Literal::Int(n), &[])
            }
            TokenKind::Float(x) => {
                self.bump();
                self.reduce(NodeKind::Number, format!("NUM_{:?}", x), Literal::Float(x), &[])
            }
            TokenKind::Ident(name) => {
                self.bump();
                if !self.at(&TokenKind::LParen) {
                    return self.reduce(
                        NodeKind::Variable,
                        format!("VAR_{}", name),
                        Literal::Name(name),
                        &[],
                    );
                }
                self.bump();
                let args = if self.at(&TokenKind::RParen) {
                    Vec::new()
                } else {
                    self.parse_args()?
                };
                self.expect(TokenKind::RParen)?;
                self.call(name, &args)
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                if self.at(&TokenKind::Question) {
                    self.bump();
                    let then = self.parse_parenthesized()?;
                    self.expect(TokenKind::Colon)?;
                    let alternate = self.parse_parenthesized()?;
                    return self.if_node(inner, then, Some(alternate));
                }
                self.reduce(
                    NodeKind::Group,
                    "( )",
                    Literal::Empty,
                    &[(EdgeRole::Operand, inner)],
                )
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_parenthesized(&mut self) -> Result<NodeId> {
        self.expect(TokenKind::LParen)?;
        let inner = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(inner)
    }

    fn parse_args(&mut self) -> Result<Vec<NodeId>> {
        let mut args = vec![self.parse_expr()?];
        while self.at(&TokenKind::Comma) {
            self.bump();
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    fn call(&mut self, name: String, args: &[NodeId]) -> Result<NodeId> {
        let children: Vec<(EdgeRole, NodeId)> =
            args.iter().map(|&a| (EdgeRole::Operand, a)).collect();
        self.reduce(
            NodeKind::FunctionCall,
            format!("FUN_{}", name),
            Literal::Name(name),
            &children,
        )
    }
}
