use std::collections::HashMap;

use tracing::trace;

use crate::{
    ast::symbols::Symbol,
    builtins::builtins::{builtin_signatures, BUILTIN_TYPES},
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Compile-time scope chain. The bottom scope is the global one, seeded
/// with the builtin types and functions.
#[derive(Debug)]
pub struct SymbolsTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl Default for SymbolsTable {
    fn default() -> Self {
        SymbolsTable::new()
    }
}

impl SymbolsTable {
    pub fn new() -> Self {
        let mut global = HashMap::new();

        for (name, value_type) in BUILTIN_TYPES {
            global.insert(name.to_string(), Symbol::Type(value_type));
        }
        for signature in builtin_signatures() {
            global.insert(signature.name.clone(), Symbol::Function(signature));
        }

        SymbolsTable {
            scopes: vec![global],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!(depth = self.scopes.len(), "entered symbol scope");
    }

    pub fn pop_scope(&mut self) -> Result<(), Error> {
        if self.scopes.len() <= 1 {
            return Err(Error::internal(ErrorImpl::GlobalScopePopped));
        }
        self.scopes.pop();
        Ok(())
    }

    /// Adds `symbol` to the innermost scope. Shadowing an outer scope is
    /// fine; reusing a name within one scope is a `DuplicateSymbol`.
    pub fn define(&mut self, name: &str, symbol: Symbol, position: &Position) -> Result<(), Error> {
        let Some(scope) = self.scopes.last_mut() else {
            return Err(Error::internal(ErrorImpl::GlobalScopePopped));
        };

        if scope.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateSymbol {
                    symbol: name.to_string(),
                },
                position.clone(),
            ));
        }

        scope.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Finds `name` in the innermost scope that defines it.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
