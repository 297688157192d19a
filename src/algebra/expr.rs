use crate::algebra::Id;
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Neg, Sub},
};

/// A node in an expression tree.
///
/// Every node exclusively owns its children, so duplicating a subtree means
/// cloning it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A placeholder which never appears in a valid tree.
    Invalid,
    Constant(f64),
    /// A reference to an unknown or an auxiliary quantity.
    Identifier(Id),
    /// An expression involving two operands.
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOperation,
    },
}

impl Expression {
    /// Leaves are the only nodes without children.
    pub fn is_term(&self) -> bool {
        match self {
            Expression::Binary { .. } => false,
            _ => true,
        }
    }

    /// A tree is valid when it contains no [`Expression::Invalid`] nodes.
    pub fn is_valid(&self) -> bool {
        match self {
            Expression::Invalid => false,
            Expression::Constant(_) | Expression::Identifier(_) => true,
            Expression::Binary { left, right, .. } => {
                left.is_valid() && right.is_valid()
            },
        }
    }

    fn binary(
        left: Expression,
        right: Expression,
        op: BinaryOperation,
    ) -> Self {
        Expression::Binary {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }
}

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinaryOperation {
    Plus,
    Minus,
    Times,
    Divide,
}

// define some operator overloads to make constructing an expression easier.

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Plus)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Minus)
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Times)
    }
}

impl Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Divide)
    }
}

/// Negation is spelled `-1 * expr`, there is no dedicated node for it.
impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output { Expression::Constant(-1.0) * self }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Invalid => write!(f, "<invalid>"),
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Identifier(id) => write!(f, "#{}", id),
            Expression::Binary { left, right, op } => {
                write_compound(left, f)?;

                let op = match op {
                    BinaryOperation::Plus => " + ",
                    BinaryOperation::Minus => " - ",
                    BinaryOperation::Times => "*",
                    BinaryOperation::Divide => "/",
                };
                write!(f, "{}", op)?;

                write_compound(right, f)?;

                Ok(())
            },
        }
    }
}

fn write_compound(expr: &Expression, f: &mut Formatter<'_>) -> fmt::Result {
    if expr.is_term() {
        write!(f, "{}", expr)
    } else {
        write!(f, "({})", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let inputs = vec![
            (Expression::Constant(3.0), "3"),
            (Expression::Identifier(-10), "#-10"),
            (-Expression::Constant(5.0), "-1*5"),
            (Expression::Constant(1.0) + Expression::Constant(1.0), "1 + 1"),
            (Expression::Constant(1.0) - Expression::Constant(1.0), "1 - 1"),
            (Expression::Constant(1.0) * Expression::Constant(1.0), "1*1"),
            (Expression::Constant(1.0) / Expression::Constant(1.0), "1/1"),
            (
                (Expression::Constant(1.0) + Expression::Constant(2.0))
                    / Expression::Constant(3.0),
                "(1 + 2)/3",
            ),
        ];

        for (expr, should_be) in inputs {
            let got = expr.to_string();
            assert_eq!(got, should_be);
        }
    }

    #[test]
    fn leaves_are_terms() {
        assert!(Expression::Invalid.is_term());
        assert!(Expression::Constant(3.14).is_term());
        assert!(Expression::Identifier(0).is_term());
        assert!(!(Expression::Identifier(0) + Expression::Identifier(1))
            .is_term());
    }

    #[test]
    fn validity_is_checked_recursively() {
        let valid = Expression::Constant(1.0)
            * (Expression::Identifier(-10) - Expression::Constant(2.0));
        let invalid = Expression::Constant(1.0)
            * (Expression::Identifier(-10) - Expression::Invalid);

        assert!(valid.is_valid());
        assert!(!invalid.is_valid());
        assert!(!Expression::Invalid.is_valid());
    }

    #[test]
    fn clones_are_independent() {
        let original = Expression::Identifier(0) + Expression::Constant(1.0);
        let mut copy = original.clone();

        if let Expression::Binary { right, .. } = &mut copy {
            **right = Expression::Constant(2.0);
        }

        assert_eq!(original.to_string(), "#0 + 1");
        assert_eq!(copy.to_string(), "#0 + 2");
    }
}
