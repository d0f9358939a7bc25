//! Core evaluator state.
//!
//! The evaluator walks a checked program and reports the result of every
//! node through an explicit value stack: evaluating an expression that
//! completes normally leaves exactly one value on top of the stack, and the
//! stack is empty between top-level nodes. `returnal`, `breakout` and
//! `contra` travel back up as a [`Flow`] instead of a value.

use tracing::{debug, instrument, trace};

use crate::{
    ast::ast::Node,
    errors::errors::{Error, ErrorImpl},
    runtime::{
        context::{Context, Scope},
        environment::Environment,
        value::Value,
    },
    Position,
};

use super::stmt::eval_node;

/// How evaluation of a node ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Completed; the node's value is on top of the value stack.
    Normal,
    /// A `returnal` is unwinding to the nearest function call.
    Return(Value),
    /// A `breakout` is unwinding to the nearest loop.
    Break,
    /// A `contra` is unwinding to the nearest loop.
    Continue,
}

/// Walks a checked program.
///
/// # Lifetimes
///
/// * `'a` - Lifetime of the environment the program reads from and writes to
pub struct Evaluator<'a> {
    /// Scopes, constants and functions of the running program
    pub context: Context,
    /// Results of the nodes currently being evaluated
    values: Vec<Value>,
    /// Source of `raid` input and sink of `exodus` output
    environment: &'a mut dyn Environment,
}

impl<'a> Evaluator<'a> {
    pub fn new(environment: &'a mut dyn Environment) -> Self {
        Evaluator {
            context: Context::new(),
            values: vec![],
            environment,
        }
    }

    pub fn environment(&mut self) -> &mut (dyn Environment + 'a) {
        &mut *self.environment
    }

    pub fn stack_len(&self) -> usize {
        self.values.len()
    }

    pub fn push_value(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop_value(&mut self) -> Result<Value, Error> {
        self.values.pop().ok_or_else(|| {
            Error::internal(ErrorImpl::StackImbalance {
                expected: 1,
                found: 0,
            })
        })
    }

    /// Verifies that a node left the stack as it should: one value above
    /// `height` after a normal completion, none after an unwinding signal.
    pub fn check_stack(&self, height: usize, flow: &Flow) -> Result<(), Error> {
        let expected = match flow {
            Flow::Normal => height + 1,
            _ => height,
        };

        if self.values.len() == expected {
            Ok(())
        } else {
            Err(Error::internal(ErrorImpl::StackImbalance {
                expected,
                found: self.values.len(),
            }))
        }
    }

    /// Runs `body` inside a fresh scope. The scope is closed again whether
    /// `body` succeeds or fails.
    pub fn with_scope<T, F>(&mut self, scope: Scope, body: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Evaluator<'a>) -> Result<T, Error>,
    {
        self.context.push_scope(scope);
        let result = body(self);
        let popped = self.context.pop_scope();

        let value = result?;
        popped?;
        Ok(value)
    }

    /// Runs `body` inside a new call frame whose first scope is `scope`.
    pub fn with_frame<T, F>(&mut self, scope: Scope, body: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Evaluator<'a>) -> Result<T, Error>,
    {
        self.context.push_frame(scope);
        let result = body(self);
        let popped = self.context.pop_frame();

        let value = result?;
        popped?;
        Ok(value)
    }

    /// Evaluates a checked program node by node. The first error aborts the
    /// rest of the program.
    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn evaluate_program(&mut self, nodes: &[Node]) -> Result<(), Error> {
        for node in nodes {
            self.evaluate_top_level(node)?;
        }

        debug!("program finished");
        Ok(())
    }

    pub fn evaluate_top_level(&mut self, node: &Node) -> Result<(), Error> {
        if !self.values.is_empty() {
            return Err(Error::internal(ErrorImpl::StackImbalance {
                expected: 0,
                found: self.values.len(),
            }));
        }

        trace!(offset = node.span().start.0, "evaluating top-level node");
        let depth = self.context.depth();

        let result = eval_node(self, node).and_then(|flow| match flow {
            Flow::Normal => self.pop_value().map(|_| ()),
            _ => Err(escaped_signal(&flow, &node.span().start)),
        });

        if result.is_err() {
            self.values.clear();
            self.context.unwind_to(depth);
        }
        result?;

        if self.values.is_empty() {
            Ok(())
        } else {
            Err(Error::internal(ErrorImpl::StackImbalance {
                expected: 0,
                found: self.values.len(),
            }))
        }
    }
}

/// Error for a control signal that reached a place that cannot handle it.
pub fn escaped_signal(flow: &Flow, position: &Position) -> Error {
    let keyword = match flow {
        Flow::Return(_) => "returnal",
        Flow::Break => "breakout",
        Flow::Continue => "contra",
        Flow::Normal => "expression",
    };

    Error::new(
        ErrorImpl::InvalidExpression {
            message: format!("`{}` cannot be used here", keyword),
        },
        position.clone(),
    )
}
