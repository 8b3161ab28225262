//! minic semantic analyzer: resolves names against block scopes.
//!
//! One depth-first walk over the [`Program`] with an explicit [`ScopeStack`].
//! Every block (including `if`/`while` bodies) pushes a scope on entry and
//! pops it on exit. Declarations land in the innermost scope and in the flat
//! symbol table; references are checked against the scopes open at the point
//! of use. The walk never stops early.

pub mod scope;

pub use scope::{Binding, ScopeStack};

use minic_syntax::ast::{Block, Expr, Program, Stmt, Type};
use minic_syntax::error::SemanticError;

/// One successful declaration, kept for display even after its scope closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub line: usize,
    pub name: String,
    pub ty: Type,
    /// Nesting depth of the declaring scope (0 = top level).
    pub scope: usize,
}

/// Result of analyzing one program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Every successful declaration, in source order.
    pub symbol_table: Vec<SymbolEntry>,
    pub errors: Vec<SemanticError>,
}

/// Analyze `program` in one call.
pub fn analyze(program: &Program) -> Analysis {
    Analyzer::new().analyze(program)
}

pub struct Analyzer {
    scopes: ScopeStack,
    symbols: Vec<SymbolEntry>,
    errors: Vec<SemanticError>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new_root(),
            symbols: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> Analysis {
        for stmt in &program.stmts {
            self.stmt(stmt);
        }
        Analysis {
            symbol_table: self.symbols,
            errors: self.errors,
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration { name, ty, init, line } => {
                // the initializer sees the scope as it was before this name
                if let Some(expr) = init {
                    self.expr(expr);
                }
                self.declare(name, *ty, *line);
            }
            Stmt::Assignment { name, expr, line } => {
                self.resolve(name, *line);
                self.expr(expr);
            }
            Stmt::If { cond, body, .. } | Stmt::While { cond, body, .. } => {
                self.expr(cond);
                self.block(body);
            }
            Stmt::Block(block) => self.block(block),
        }
    }

    fn block(&mut self, block: &Block) {
        self.scopes.push();
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.scopes.pop();
    }

    /// Resolves every name in `expr`, left to right.
    fn expr(&mut self, expr: &Expr) {
        let mut pending = vec![expr];
        while let Some(expr) = pending.pop() {
            match expr {
                Expr::Number { .. } => {}
                Expr::Ident { name, line } => self.resolve(name, *line),
                Expr::Binary { lhs, rhs, .. } => {
                    pending.push(rhs);
                    pending.push(lhs);
                }
            }
        }
    }

    fn declare(&mut self, name: &str, ty: Type, line: usize) {
        match self.scopes.declare(name, ty, line) {
            Ok(()) => self.symbols.push(SymbolEntry {
                line,
                name: name.to_string(),
                ty,
                scope: self.scopes.depth(),
            }),
            Err(_) => self
                .errors
                .push(SemanticError::duplicate_declaration(name, line)),
        }
    }

    fn resolve(&mut self, name: &str, line: usize) {
        if self.scopes.lookup(name).is_none() {
            self.errors
                .push(SemanticError::undefined_reference(name, line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_lexer::tokenize;
    use minic_parser::parse;
    use minic_syntax::error::SemanticErrorKind;

    fn analyze_str(input: &str) -> Analysis {
        let parsed = parse(tokenize(input).tokens);
        assert!(parsed.errors.is_empty(), "unexpected syntax errors: {:?}", parsed.errors);
        analyze(&parsed.program)
    }

    fn names(analysis: &Analysis) -> Vec<&str> {
        analysis.symbol_table.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_valid_program_has_no_errors() {
        let a = analyze_str("int x = 10; int y = 20; if (x < y) { int z = x + y; }");
        assert!(a.errors.is_empty(), "{:?}", a.errors);
        assert_eq!(names(&a), vec!["x", "y", "z"]);
        assert_eq!(a.symbol_table[2].scope, 1);
        assert_eq!(a.symbol_table[2].ty, Type::Int);
    }

    #[test]
    fn test_use_after_block_closes() {
        let a = analyze_str("int x = 10;\nif (x > 5) {\n  int y = x + 1;\n}\nint z = y;");
        assert_eq!(a.errors.len(), 1);
        let err = &a.errors[0];
        assert_eq!(err.symbol, "y");
        assert_eq!(err.line, 5);
        assert_eq!(err.kind, SemanticErrorKind::UndefinedReference);
        // the symbol table still records y
        assert_eq!(names(&a), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_sibling_blocks_do_not_share_names() {
        let a = analyze_str("{ int a = 1; }\n{ a = 2; }");
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.errors[0].line, 2);
    }

    #[test]
    fn test_outer_names_visible_in_nested_blocks() {
        let a = analyze_str("int n = 3;\nwhile (n > 0) {\n  if (n == 1) {\n    { n = n - 1; }\n  }\n  n = n - 1;\n}");
        assert!(a.errors.is_empty(), "{:?}", a.errors);
    }

    #[test]
    fn test_duplicate_declaration_in_same_scope() {
        let a = analyze_str("int a;\nint a = 2;");
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.errors[0].kind, SemanticErrorKind::DuplicateDeclaration);
        assert_eq!(a.errors[0].line, 2);
        assert_eq!(a.errors[0].message, "duplicate declaration of a");
        // only the first declaration is recorded
        assert_eq!(names(&a), vec!["a"]);
    }

    #[test]
    fn test_shadowing_in_inner_scope_is_allowed() {
        let a = analyze_str("int a = 1;\n{ int a = a + 1; a = 3; }\na = 4;");
        assert!(a.errors.is_empty(), "{:?}", a.errors);
        assert_eq!(names(&a), vec!["a", "a"]);
        assert_eq!(a.symbol_table[1].scope, 1);
    }

    #[test]
    fn test_initializer_cannot_see_its_own_name() {
        let a = analyze_str("int a = a;");
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.errors[0].kind, SemanticErrorKind::UndefinedReference);
        assert_eq!(names(&a), vec!["a"]);
    }

    #[test]
    fn test_every_violation_reported() {
        let a = analyze_str("q = 1;\nint b = c + d;\nint b;\nwhile (e) { }");
        let lines: Vec<(usize, &str)> = a.errors.iter().map(|e| (e.line, e.symbol.as_str())).collect();
        assert_eq!(lines, vec![(1, "q"), (2, "c"), (2, "d"), (3, "b"), (4, "e")]);
    }

    #[test]
    fn test_redeclaration_after_scope_exit_is_fine() {
        let a = analyze_str("if (1) { int t = 1; }\nif (1) { int t = 2; }\nint t = 3;");
        assert!(a.errors.is_empty(), "{:?}", a.errors);
        assert_eq!(names(&a), vec!["t", "t", "t"]);
    }

    #[test]
    fn test_references_reported_left_to_right() {
        let a = analyze_str("int r = (a + b) * c < d - e / f;");
        let order: Vec<&str> = a.errors.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_long_operator_chain() {
        let src = format!("int x = 1;\nint y = x{} + z;", " + x".repeat(30_000));
        let a = analyze_str(&src);
        assert_eq!(names(&a), vec!["x", "y"]);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.errors[0].symbol, "z");
    }

    #[test]
    fn test_scope_stack_lookup_and_pop() {
        let mut scopes = ScopeStack::new_root();
        assert!(scopes.declare("x", Type::Int, 1).is_ok());
        scopes.push();
        assert_eq!(scopes.depth(), 1);
        assert!(scopes.declare("y", Type::Int, 2).is_ok());
        assert_eq!(scopes.lookup("x").map(|b| b.line), Some(1));
        assert!(scopes.declare("y", Type::Int, 3).is_err());
        scopes.pop();
        assert!(scopes.lookup("y").is_none());
        scopes.pop();
        assert_eq!(scopes.depth(), 0);
        assert!(scopes.lookup("x").is_some());
        // popping at top level keeps the root scope
        scopes.pop();
        assert_eq!(scopes.depth(), 0);
        assert!(scopes.declare("x", Type::Int, 4).is_err());
    }
}
