//! AST (abstract syntax tree) types for the minic language.
//!
//! Every node records the line of its leading token so later stages can
//! attribute errors. Children are owned by their parent; the tree has no
//! sharing and no back references.

use std::fmt;

/// Declarable types. The language has a single primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary operators, lowest to highest binding: comparisons, additive,
/// multiplicative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Eq => "==",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expressions (literals, variable references, binary operations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number {
        digits: String,
        line: usize,
    },
    Ident {
        name: String,
        line: usize,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        line: usize,
    },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Number { line, .. } | Expr::Ident { line, .. } | Expr::Binary { line, .. } => *line,
        }
    }
}

// Long operator chains nest as deep as they are long, so binary children are
// dropped from a work list rather than recursively.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut expr) = pending.pop() {
            detach_children(&mut expr, &mut pending);
        }
    }
}

fn detach_children(expr: &mut Expr, pending: &mut Vec<Expr>) {
    if let Expr::Binary { lhs, rhs, .. } = expr {
        for child in [lhs, rhs] {
            if matches!(**child, Expr::Binary { .. }) {
                let leaf = Expr::Number {
                    digits: String::new(),
                    line: 0,
                };
                pending.push(std::mem::replace(&mut **child, leaf));
            }
        }
    }
}

/// A braced statement list; opens a new scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub line: usize,
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `int name (= init)? ;`
    Declaration {
        name: String,
        ty: Type,
        init: Option<Expr>,
        line: usize,
    },
    Assignment {
        name: String,
        expr: Expr,
        line: usize,
    },
    If {
        cond: Expr,
        body: Block,
        line: usize,
    },
    While {
        cond: Expr,
        body: Block,
        line: usize,
    },
    Block(Block),
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::Declaration { line, .. }
            | Stmt::Assignment { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. } => *line,
            Stmt::Block(block) => block.line,
        }
    }
}

/// Entire program: the top-level statement list (scope 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
