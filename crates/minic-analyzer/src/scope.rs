//! Scope stack for name resolution.

use std::collections::HashMap;

use minic_syntax::ast::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// The declared type of this binding
    pub ty: Type,
    /// Line of the declaration
    pub line: usize,
}

/// Stack of open scopes on top of the program's top level.
///
/// A popped scope is gone for good, so lookups only ever see names declared
/// in scopes that are still open at the point of use.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    root: HashMap<String, Binding>,
    nested: Vec<HashMap<String, Binding>>,
}

impl ScopeStack {
    pub fn new_root() -> Self {
        Self::default()
    }

    /// Depth of the innermost open scope (0 at top level).
    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    pub fn push(&mut self) {
        self.nested.push(HashMap::new());
    }

    /// Closes the innermost scope. The top-level scope is never popped.
    pub fn pop(&mut self) {
        self.nested.pop();
    }

    /// Binds `name` in the innermost scope. Returns the existing binding
    /// instead if that scope already declares the name.
    pub fn declare(&mut self, name: &str, ty: Type, line: usize) -> Result<(), Binding> {
        let current = match self.nested.last_mut() {
            Some(scope) => scope,
            None => &mut self.root,
        };
        if let Some(existing) = current.get(name) {
            return Err(*existing);
        }
        current.insert(name.to_string(), Binding { ty, line });
        Ok(())
    }

    /// Innermost-first search through the open scopes.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.nested
            .iter()
            .rev()
            .chain(std::iter::once(&self.root))
            .find_map(|scope| scope.get(name))
    }
}
