use std::fmt::Display;

use crate::Span;

use super::{
    ast::{Attribute, Node},
    declarations::Declaration,
    symbols::Symbol,
    types::ValueType,
};

#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub result_type: Attribute<ValueType>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Double(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Less
                | BinaryOperator::LessEquals
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEquals
                | BinaryOperator::Equals
                | BinaryOperator::NotEquals
        )
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Not,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Minus => write!(f, "-"),
            UnaryOperator::Not => write!(f, "!"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExpressionKind {
    Literal(Literal),
    VariableRef {
        name: String,
        binding: Attribute<Symbol>,
    },
    Assignment {
        target: String,
        value: Box<Expression>,
        binding: Attribute<Symbol>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
        binding: Attribute<Symbol>,
    },
    If {
        condition: Box<Expression>,
        body: Vec<Node>,
    },
    IfElse {
        condition: Box<Expression>,
        then_body: Vec<Node>,
        else_body: Vec<Node>,
    },
    While {
        condition: Box<Expression>,
        body: Vec<Node>,
    },
    For {
        iterator: Box<Declaration>,
        condition: Box<Expression>,
        step: Option<Box<Expression>>,
        body: Vec<Node>,
    },
    Return {
        value: Option<Box<Expression>>,
    },
    Break,
    Continue,
    Raid {
        target: String,
        binding: Attribute<Symbol>,
    },
    Exodus {
        value: Box<Expression>,
    },
    /// Declares `variables` for the duration of `body` only.
    VariableScope {
        variables: Vec<Declaration>,
        body: Box<Expression>,
    },
}

// Constructors for trees built without the parser
impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression {
            kind,
            result_type: Attribute::default(),
            span,
        }
    }

    fn unspanned(kind: ExpressionKind) -> Self {
        Expression::new(kind, Span::null())
    }

    pub fn int(value: i64) -> Self {
        Expression::unspanned(ExpressionKind::Literal(Literal::Int(value)))
    }

    pub fn double(value: f64) -> Self {
        Expression::unspanned(ExpressionKind::Literal(Literal::Double(value)))
    }

    pub fn string(value: &str) -> Self {
        Expression::unspanned(ExpressionKind::Literal(Literal::String(value.to_string())))
    }

    pub fn variable(name: &str) -> Self {
        Expression::unspanned(ExpressionKind::VariableRef {
            name: name.to_string(),
            binding: Attribute::default(),
        })
    }

    pub fn assign(target: &str, value: Expression) -> Self {
        Expression::unspanned(ExpressionKind::Assignment {
            target: target.to_string(),
            value: Box::new(value),
            binding: Attribute::default(),
        })
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::unspanned(ExpressionKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::unspanned(ExpressionKind::Unary {
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn call(name: &str, arguments: Vec<Expression>) -> Self {
        Expression::unspanned(ExpressionKind::FunctionCall {
            name: name.to_string(),
            arguments,
            binding: Attribute::default(),
        })
    }

    pub fn if_then(condition: Expression, body: Vec<Node>) -> Self {
        Expression::unspanned(ExpressionKind::If {
            condition: Box::new(condition),
            body,
        })
    }

    pub fn if_else(condition: Expression, then_body: Vec<Node>, else_body: Vec<Node>) -> Self {
        Expression::unspanned(ExpressionKind::IfElse {
            condition: Box::new(condition),
            then_body,
            else_body,
        })
    }

    pub fn while_loop(condition: Expression, body: Vec<Node>) -> Self {
        Expression::unspanned(ExpressionKind::While {
            condition: Box::new(condition),
            body,
        })
    }

    pub fn for_loop(
        iterator: Declaration,
        condition: Expression,
        step: Option<Expression>,
        body: Vec<Node>,
    ) -> Self {
        Expression::unspanned(ExpressionKind::For {
            iterator: Box::new(iterator),
            condition: Box::new(condition),
            step: step.map(Box::new),
            body,
        })
    }

    pub fn return_value(value: Option<Expression>) -> Self {
        Expression::unspanned(ExpressionKind::Return {
            value: value.map(Box::new),
        })
    }

    pub fn break_loop() -> Self {
        Expression::unspanned(ExpressionKind::Break)
    }

    pub fn continue_loop() -> Self {
        Expression::unspanned(ExpressionKind::Continue)
    }

    pub fn raid(target: &str) -> Self {
        Expression::unspanned(ExpressionKind::Raid {
            target: target.to_string(),
            binding: Attribute::default(),
        })
    }

    pub fn exodus(value: Expression) -> Self {
        Expression::unspanned(ExpressionKind::Exodus {
            value: Box::new(value),
        })
    }

    pub fn scope(variables: Vec<Declaration>, body: Expression) -> Self {
        Expression::unspanned(ExpressionKind::VariableScope {
            variables,
            body: Box::new(body),
        })
    }
}
