//! Recursive-descent parser for minic.
//!
//! Grammar routines return `Result<_, SyntaxError>` and bail out with `?` on
//! the first mismatch. [`Parser::statement`] is the recovery point: it records
//! the error, skips to the next statement boundary and lets parsing continue,
//! so one bad statement costs one diagnostic.

use minic_syntax::ast::{BinaryOp, Block, Expr, Program, Stmt, Type};
use minic_syntax::error::SyntaxError;
use minic_syntax::token::{Token, TokenKind};

type PResult<T> = Result<T, SyntaxError>;

/// Deepest combined nesting of blocks and parentheses the parser descends into.
pub const MAX_NESTING: usize = 128;

/// A parsed program together with every syntax error found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub program: Program,
    pub errors: Vec<SyntaxError>,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Line of the most recently consumed token.
    fn last_line(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn error_here(&self, expected: &str) -> SyntaxError {
        match self.peek() {
            Some(tok) => SyntaxError::new(
                tok.line,
                format!("expected {}, found {}", expected, tok.kind.describe()),
            ),
            None => SyntaxError::new(
                self.last_line(),
                format!("expected {}, found end of input", expected),
            ),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> PResult<Token> {
        if self.check(kind) {
            if let Some(tok) = self.advance() {
                return Ok(tok);
            }
        }
        Err(self.error_here(expected))
    }

    fn expect_ident(&mut self, expected: &str) -> PResult<(String, usize)> {
        if let Some(TokenKind::Ident(name)) = self.peek_kind() {
            let name = name.clone();
            let line = self.peek().map(|t| t.line).unwrap_or_else(|| self.last_line());
            self.pos += 1;
            return Ok((name, line));
        }
        Err(self.error_here(expected))
    }

    /// Parse the whole token stream. Never fails: problems end up in
    /// [`Parsed::errors`] and the offending statements are left out of the tree.
    pub fn parse_program(&mut self) -> Parsed {
        let mut stmts = Vec::new();
        while self.peek().is_some() {
            if let Some(stmt) = self.statement() {
                stmts.push(stmt);
            }
        }
        Parsed {
            program: Program { stmts },
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Parse a single expression from the current position.
    pub fn parse_expr(&mut self) -> PResult<Expr> {
        self.expression()
    }

    fn statement(&mut self) -> Option<Stmt> {
        let start = self.pos;
        match self.parse_statement() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.errors.push(err);
                if self.pos == start {
                    // offending token cannot begin a statement; drop it
                    if let Some(tok) = self.advance() {
                        if matches!(tok.kind, TokenKind::Semicolon | TokenKind::RBrace) {
                            return None;
                        }
                    }
                }
                self.synchronize();
                None
            }
        }
    }

    /// Discard tokens up to a statement boundary: a `;` (consumed) or `}`
    /// (left for the enclosing block) at the current nesting depth, the end
    /// of a skipped `{ ... }`, or a statement keyword.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind().cloned() {
            match kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::Int | TokenKind::If | TokenKind::While if depth == 0 => return,
                _ => self.pos += 1,
            }
        }
    }

    fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.peek_kind() {
            Some(TokenKind::Int) => self.declaration(),
            Some(TokenKind::If) => self.if_statement(),
            Some(TokenKind::While) => self.while_statement(),
            Some(TokenKind::LBrace) => Ok(Stmt::Block(self.block()?)),
            Some(TokenKind::Ident(_)) => self.assignment(),
            _ => Err(self.error_here("a statement")),
        }
    }

    /// Requires the `;` ending a statement that is otherwise complete. A
    /// missing `;` is reported against the statement's last line and the
    /// statement is kept.
    fn end_statement(&mut self, what: &str) {
        if self.eat(&TokenKind::Semicolon) {
            return;
        }
        self.errors.push(SyntaxError::new(
            self.last_line(),
            format!("expected ';' after {}", what),
        ));
        match self.peek_kind() {
            None | Some(TokenKind::RBrace) => {}
            // a bare name only restarts a statement when it is assigned to
            Some(TokenKind::Ident(_)) if self.peek_kind_at(1) == Some(&TokenKind::Equal) => {}
            Some(TokenKind::Ident(_)) => self.synchronize(),
            Some(kind) if kind.starts_statement() => {}
            Some(_) => self.synchronize(),
        }
    }

    fn declaration(&mut self) -> PResult<Stmt> {
        let line = self.advance().map(|t| t.line).unwrap_or_else(|| self.last_line());
        let (name, _) = self.expect_ident("a variable name after 'int'")?;
        let mut init = None;
        if self.eat(&TokenKind::Equal) {
            match self.expression() {
                Ok(expr) => init = Some(expr),
                Err(err) => {
                    // keep the declaration so the name stays bound
                    self.errors.push(err);
                    self.synchronize();
                    return Ok(Stmt::Declaration {
                        name,
                        ty: Type::Int,
                        init: None,
                        line,
                    });
                }
            }
        }
        self.end_statement(&format!("declaration of '{}'", name));
        Ok(Stmt::Declaration {
            name,
            ty: Type::Int,
            init,
            line,
        })
    }

    fn assignment(&mut self) -> PResult<Stmt> {
        let (name, line) = self.expect_ident("a variable name")?;
        self.expect(&TokenKind::Equal, &format!("'=' after '{}'", name))?;
        let expr = self.expression()?;
        self.end_statement(&format!("assignment to '{}'", name));
        Ok(Stmt::Assignment { name, expr, line })
    }

    fn condition(&mut self, keyword: &str) -> PResult<Expr> {
        self.expect(&TokenKind::LParen, &format!("'(' after '{}'", keyword))?;
        let cond = self.expression()?;
        self.expect(&TokenKind::RParen, "')' after condition")?;
        Ok(cond)
    }

    fn if_statement(&mut self) -> PResult<Stmt> {
        let line = self.advance().map(|t| t.line).unwrap_or_else(|| self.last_line());
        let cond = self.condition("if")?;
        let body = self.block()?;
        Ok(Stmt::If { cond, body, line })
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        let line = self.advance().map(|t| t.line).unwrap_or_else(|| self.last_line());
        let cond = self.condition("while")?;
        let body = self.block()?;
        Ok(Stmt::While { cond, body, line })
    }

    fn block(&mut self) -> PResult<Block> {
        let open = self.expect(&TokenKind::LBrace, "'{' to open a block")?;
        if self.depth >= MAX_NESTING {
            self.errors.push(too_deep(open.line));
            self.skip_block();
            return Ok(Block {
                stmts: Vec::new(),
                line: open.line,
            });
        }
        self.depth += 1;
        let mut stmts = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::RBrace) => {
                    self.pos += 1;
                    break;
                }
                None => {
                    self.errors.push(SyntaxError::new(
                        self.last_line(),
                        format!(
                            "expected '}}' to close the block opened on line {}, found end of input",
                            open.line
                        ),
                    ));
                    break;
                }
                Some(_) => {
                    if let Some(stmt) = self.statement() {
                        stmts.push(stmt);
                    }
                }
            }
        }
        self.depth -= 1;
        Ok(Block {
            stmts,
            line: open.line,
        })
    }

    /// Consume the rest of a block whose `{` was already taken, through its
    /// matching `}` or to end of input.
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.pos += 1;
            if depth == 0 {
                return;
            }
        }
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        match self.peek_kind()? {
            TokenKind::Less => Some(BinaryOp::Lt),
            TokenKind::Greater => Some(BinaryOp::Gt),
            TokenKind::EqEq => Some(BinaryOp::Eq),
            _ => None,
        }
    }

    fn expression(&mut self) -> PResult<Expr> {
        let lhs = self.additive()?;
        let Some(op) = self.comparison_op() else {
            return Ok(lhs);
        };
        self.pos += 1;
        let rhs = self.additive()?;
        if self.comparison_op().is_some() {
            let line = self.peek().map(|t| t.line).unwrap_or_else(|| self.last_line());
            return Err(SyntaxError::new(line, "comparison operators cannot be chained"));
        }
        Ok(binary(op, lhs, rhs))
    }

    fn additive(&mut self) -> PResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> PResult<Expr> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> PResult<Expr> {
        let Some(tok) = self.peek().cloned() else {
            return Err(self.error_here("an expression"));
        };
        match tok.kind {
            TokenKind::Number(digits) => {
                self.pos += 1;
                Ok(Expr::Number {
                    digits,
                    line: tok.line,
                })
            }
            TokenKind::Ident(name) => {
                self.pos += 1;
                Ok(Expr::Ident {
                    name,
                    line: tok.line,
                })
            }
            TokenKind::LParen => {
                if self.depth >= MAX_NESTING {
                    return Err(too_deep(tok.line));
                }
                self.pos += 1;
                self.depth += 1;
                let inner = self.expression();
                self.depth -= 1;
                let inner = inner?;
                self.expect(&TokenKind::RParen, "')' after expression")?;
                Ok(inner)
            }
            _ => Err(self.error_here("an expression")),
        }
    }
}

fn too_deep(line: usize) -> SyntaxError {
    SyntaxError::new(
        line,
        format!("nesting too deep (more than {} levels of blocks and parentheses)", MAX_NESTING),
    )
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let line = lhs.line();
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        line,
    }
}
