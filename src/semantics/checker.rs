use tracing::{debug, instrument};

use crate::{ast::ast::Node, errors::errors::Error};

use super::{
    context_rules::{check_context_node, ContextChecker},
    resolve_names::{resolve_names_node, NameResolver},
    resolve_types::{resolve_types_node, TypeResolver},
};

/// Runs name resolution, context rules and type resolution over a program.
///
/// Each top-level node goes through all three passes before the next one is
/// looked at, so a later node sees everything declared before it.
#[derive(Debug, Default)]
pub struct SemanticsChecker {
    names: NameResolver,
    context: ContextChecker,
    types: TypeResolver,
}

impl SemanticsChecker {
    pub fn new() -> Self {
        SemanticsChecker::default()
    }

    pub fn check_node(&mut self, node: &Node) -> Result<(), Error> {
        resolve_names_node(&mut self.names, node)?;
        check_context_node(&mut self.context, node)?;
        resolve_types_node(&mut self.types, node)?;
        Ok(())
    }

    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn check_program(&mut self, nodes: &[Node]) -> Result<(), Error> {
        for node in nodes {
            self.check_node(node)?;
        }

        debug!("semantic analysis finished");
        Ok(())
    }
}

/// Checks a whole program with a fresh checker.
pub fn check(nodes: &[Node]) -> Result<(), Error> {
    SemanticsChecker::new().check_program(nodes)
}
