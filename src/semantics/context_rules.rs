use crate::{
    ast::{
        ast::Node,
        declarations::{Declaration, DeclarationKind},
        expressions::{Expression, ExpressionKind},
        symbols::Symbol,
    },
    errors::errors::{Error, ErrorImpl},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopContext {
    Default,
    InsideLoop,
}

/// Second pass: loop control placement and call arity.
#[derive(Debug)]
pub struct ContextChecker {
    contexts: Vec<LoopContext>,
}

impl Default for ContextChecker {
    fn default() -> Self {
        ContextChecker::new()
    }
}

impl ContextChecker {
    pub fn new() -> Self {
        ContextChecker {
            contexts: vec![LoopContext::Default],
        }
    }

    pub fn current(&self) -> LoopContext {
        self.contexts
            .last()
            .copied()
            .unwrap_or(LoopContext::Default)
    }

    fn within<F>(&mut self, context: LoopContext, check: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ContextChecker) -> Result<(), Error>,
    {
        self.contexts.push(context);
        let result = check(self);
        self.contexts.pop();
        result
    }
}

pub fn check_context_node(checker: &mut ContextChecker, node: &Node) -> Result<(), Error> {
    match node {
        Node::Declaration(declaration) => check_context_declaration(checker, declaration),
        Node::Expression(expression) => check_context_expr(checker, expression),
    }
}

fn check_context_block(checker: &mut ContextChecker, nodes: &[Node]) -> Result<(), Error> {
    for node in nodes {
        check_context_node(checker, node)?;
    }
    Ok(())
}

fn check_context_declaration(
    checker: &mut ContextChecker,
    declaration: &Declaration,
) -> Result<(), Error> {
    match &declaration.kind {
        DeclarationKind::Variable { initializer, .. } => match initializer {
            Some(initializer) => check_context_expr(checker, initializer),
            None => Ok(()),
        },
        DeclarationKind::Constant { value, .. } => check_context_expr(checker, value),
        DeclarationKind::Parameter { .. } => Ok(()),
        // A loop around a function declaration does not reach into its body
        DeclarationKind::Function(function) => checker.within(LoopContext::Default, |checker| {
            check_context_block(checker, &function.body)
        }),
    }
}

fn check_context_expr(checker: &mut ContextChecker, expression: &Expression) -> Result<(), Error> {
    match &expression.kind {
        ExpressionKind::Literal(_)
        | ExpressionKind::VariableRef { .. }
        | ExpressionKind::Raid { .. } => Ok(()),
        ExpressionKind::Break | ExpressionKind::Continue => {
            if checker.current() == LoopContext::InsideLoop {
                Ok(())
            } else {
                let keyword = if matches!(expression.kind, ExpressionKind::Break) {
                    "breakout"
                } else {
                    "contra"
                };
                Err(Error::new(
                    ErrorImpl::InvalidExpression {
                        message: format!("`{}` is only allowed inside a loop", keyword),
                    },
                    expression.span.start.clone(),
                ))
            }
        }
        ExpressionKind::Assignment { value, .. } => check_context_expr(checker, value),
        ExpressionKind::Binary { left, right, .. } => {
            check_context_expr(checker, left)?;
            check_context_expr(checker, right)
        }
        ExpressionKind::Unary { operand, .. } => check_context_expr(checker, operand),
        ExpressionKind::FunctionCall {
            name,
            arguments,
            binding,
        } => {
            if let Symbol::Function(function) = binding.get()? {
                if function.parameters.len() != arguments.len() {
                    return Err(Error::new(
                        ErrorImpl::InvalidFunctionCall {
                            function: name.clone(),
                            expected: function.parameters.len(),
                            received: arguments.len(),
                        },
                        expression.span.start.clone(),
                    ));
                }
            }

            for argument in arguments {
                check_context_expr(checker, argument)?;
            }
            Ok(())
        }
        ExpressionKind::If { condition, body } => {
            check_context_expr(checker, condition)?;
            check_context_block(checker, body)
        }
        ExpressionKind::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            check_context_expr(checker, condition)?;
            check_context_block(checker, then_body)?;
            check_context_block(checker, else_body)
        }
        ExpressionKind::While { condition, body } => {
            check_context_expr(checker, condition)?;
            checker.within(LoopContext::InsideLoop, |checker| {
                check_context_block(checker, body)
            })
        }
        ExpressionKind::For {
            iterator,
            condition,
            step,
            body,
        } => {
            check_context_declaration(checker, iterator)?;
            check_context_expr(checker, condition)?;
            if let Some(step) = step {
                check_context_expr(checker, step)?;
            }
            checker.within(LoopContext::InsideLoop, |checker| {
                check_context_block(checker, body)
            })
        }
        ExpressionKind::Return { value } => match value {
            Some(value) => check_context_expr(checker, value),
            None => Ok(()),
        },
        ExpressionKind::Exodus { value } => check_context_expr(checker, value),
        ExpressionKind::VariableScope { variables, body } => {
            for variable in variables {
                check_context_declaration(checker, variable)?;
            }
            check_context_expr(checker, body)
        }
    }
}
