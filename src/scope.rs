//! Chained name table for variable scoping.
//!
//! Not consulted by the parser or the code generator; available to
//! callers that want scoped name lookup over the AST.

use std::collections::HashMap;

/// Names bound in one scope, with an optional enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable<V> {
    symbols: HashMap<String, V>,
    parent: Option<Box<Self>>,
}

impl<V> SymbolTable<V> {
    /// A global (parentless) scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            parent: None,
        }
    }

    /// A new scope nested inside `self`.
    #[must_use]
    pub fn child(self) -> Self {
        Self {
            symbols: HashMap::new(),
            parent: Some(Box::new(self)),
        }
    }

    /// Leaves this scope, returning the enclosing one.
    #[must_use]
    pub fn into_parent(self) -> Option<Self> {
        self.parent.map(|parent| *parent)
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Binds `name` in this scope, returning any value it shadowed here.
    pub fn define(&mut self, name: &str, value: V) -> Option<V> {
        self.symbols.insert(name.to_string(), value)
    }

    /// Looks `name` up here, then in each enclosing scope.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&V> {
        self.symbols
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    #[must_use]
    pub fn lookup_local(&self, name: &str) -> Option<&V> {
        self.symbols.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.symbols.remove(name)
    }

    /// Number of enclosing scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |p| p.depth() + 1)
    }
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
