use std::fmt::Display;

/// The four types of the language. `Void` is the type of everything that
/// does not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Double,
    String,
    Void,
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Double)
    }

    /// Whether a value of type `other` may be stored where `self` is expected.
    ///
    /// Int and Double convert into each other in both directions; every
    /// other type is only compatible with itself.
    pub fn is_compatible_with(&self, other: ValueType) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }

    /// Result type of arithmetic between two numeric types.
    pub fn widen(left: ValueType, right: ValueType) -> ValueType {
        if left == ValueType::Double || right == ValueType::Double {
            ValueType::Double
        } else {
            ValueType::Int
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Int => write!(f, "dayzint"),
            ValueType::Double => write!(f, "fallout"),
            ValueType::String => write!(f, "strike"),
            ValueType::Void => write!(f, "void"),
        }
    }
}

/// A type name as written in source, resolved to a [`ValueType`] by name
/// resolution.
#[derive(Debug, Clone)]
pub struct TypeName {
    pub name: String,
    pub span: crate::Span,
    pub resolved: super::ast::Attribute<ValueType>,
}

impl TypeName {
    pub fn new(name: &str, span: crate::Span) -> Self {
        TypeName {
            name: name.to_lowercase(),
            span,
            resolved: super::ast::Attribute::default(),
        }
    }
}
