//! Execution context: the stack of variable scopes plus the global constant
//! and function tables.
//!
//! Every function call opens a frame. Variable lookups walk the current
//! frame's scopes innermost first and then fall back to the global scope,
//! so a callee never sees its caller's locals.

use std::{collections::HashMap, rc::Rc};

use tracing::trace;

use crate::{
    ast::{ast::DeclId, declarations::FunctionDecl},
    errors::errors::{Error, ErrorImpl},
};

use super::value::Value;

#[derive(Debug, Default)]
pub struct Scope {
    variables: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Stores `value` into an existing variable, converted to the type the
    /// variable already holds.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the name is not defined in this scope, otherwise the
    /// value as stored.
    pub fn try_assign(&mut self, name: &str, value: Value) -> Result<Option<Value>, ErrorImpl> {
        let Some(slot) = self.variables.get_mut(name) else {
            return Ok(None);
        };

        let value = value.coerce_to(slot.value_type())?;
        *slot = value.clone();
        Ok(Some(value))
    }
}

pub struct Context {
    scopes: Vec<Scope>,
    /// Index of the first scope of each active function call.
    frames: Vec<usize>,
    constants: HashMap<String, (DeclId, Value)>,
    functions: HashMap<String, (DeclId, Rc<FunctionDecl>)>,
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            scopes: vec![Scope::new()],
            frames: vec![],
            constants: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
        trace!(depth = self.scopes.len(), "pushed scope");
    }

    pub fn pop_scope(&mut self) -> Result<(), Error> {
        if self.scopes.len() <= 1 {
            return Err(Error::internal(ErrorImpl::GlobalScopePopped));
        }

        self.scopes.pop();
        trace!(depth = self.scopes.len(), "popped scope");
        Ok(())
    }

    /// Opens a function call frame whose first scope is `scope`.
    pub fn push_frame(&mut self, scope: Scope) {
        self.frames.push(self.scopes.len());
        self.push_scope(scope);
    }

    /// Closes the innermost call frame together with any scopes still open in it.
    pub fn pop_frame(&mut self) -> Result<(), Error> {
        let base = self
            .frames
            .pop()
            .ok_or_else(|| Error::internal(ErrorImpl::GlobalScopePopped))?;

        if base == 0 {
            return Err(Error::internal(ErrorImpl::GlobalScopePopped));
        }

        self.scopes.truncate(base);
        Ok(())
    }

    /// Drops every scope above `depth` and every frame that started above it.
    /// Used to restore the context after a runtime fault.
    pub fn unwind_to(&mut self, depth: usize) {
        let depth = depth.max(1);
        self.scopes.truncate(depth);
        self.frames.retain(|base| *base < depth);
    }

    /// Indices of the scopes visible from the current frame, innermost first.
    fn visible_scopes(&self) -> impl Iterator<Item = usize> {
        let base = self.frames.last().copied().unwrap_or(0);
        let global = if base > 0 { Some(0) } else { None };

        (base..self.scopes.len()).rev().chain(global)
    }

    pub fn declare_variable(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.define(name, value);
        }
    }

    /// Looks `name` up through the visible scopes, innermost first.
    /// Constants are not found here, see [`Context::get_constant`].
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.visible_scopes()
            .find_map(|index| self.scopes[index].get(name))
            .cloned()
    }

    /// The frozen value of the constant declared by `id`, if that
    /// declaration has been evaluated.
    pub fn get_constant(&self, id: DeclId, name: &str) -> Option<Value> {
        match self.constants.get(name) {
            Some((existing, value)) if *existing == id => Some(value.clone()),
            _ => None,
        }
    }

    /// Assigns to the innermost visible variable called `name`.
    ///
    /// # Returns
    ///
    /// The value as stored after conversion to the variable's type.
    pub fn assign_variable(&mut self, name: &str, value: Value) -> Result<Value, ErrorImpl> {
        let indices: Vec<usize> = self.visible_scopes().collect();

        for index in indices {
            if self.scopes[index].get(name).is_some() {
                if let Some(stored) = self.scopes[index].try_assign(name, value)? {
                    return Ok(stored);
                }
                break;
            }
        }

        Err(ErrorImpl::UndefinedVariable {
            variable: name.to_string(),
        })
    }

    /// Freezes a constant. Evaluating the same declaration again keeps the
    /// first value; a different declaration of the same name is an error.
    pub fn define_constant(&mut self, id: DeclId, name: &str, value: Value) -> Result<(), ErrorImpl> {
        match self.constants.get(name) {
            Some((existing, _)) if *existing == id => Ok(()),
            Some(_) => Err(ErrorImpl::ConstantRedefinition {
                constant: name.to_string(),
            }),
            None => {
                self.constants.insert(name.to_string(), (id, value));
                Ok(())
            }
        }
    }

    pub fn is_constant_defined(&self, id: DeclId, name: &str) -> bool {
        matches!(self.constants.get(name), Some((existing, _)) if *existing == id)
    }

    pub fn define_function(
        &mut self,
        id: DeclId,
        name: &str,
        function: Rc<FunctionDecl>,
    ) -> Result<(), ErrorImpl> {
        match self.functions.get(name) {
            Some((existing, _)) if *existing == id => Ok(()),
            Some(_) => Err(ErrorImpl::FunctionRedefinition {
                function: name.to_string(),
            }),
            None => {
                self.functions.insert(name.to_string(), (id, function));
                Ok(())
            }
        }
    }

    pub fn get_function(&self, name: &str) -> Option<Rc<FunctionDecl>> {
        self.functions
            .get(name)
            .map(|(_, function)| Rc::clone(function))
    }
}
