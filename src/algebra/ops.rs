//! [`Expression`] operations.
//!
//! The main one is [`finalize()`], which rewrites an arbitrary arithmetic
//! expression into *final form*: a sum whose terms are either constants or
//! `constant * identifier` products. Subtraction and division never survive
//! the rewrite.

use crate::algebra::{BinaryOperation, Expression, Polynomial};
use std::fmt::{self, Display, Formatter};

/// Why an expression couldn't be brought into final form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinalizeError {
    /// Something got multiplied by, or divided by, an identifier.
    #[error("the equation is not linear")]
    NonLinear,
    #[error("division by zero")]
    DivisionByZero,
    /// The tree contained an [`Expression::Invalid`] node.
    #[error("the expression is malformed")]
    InvalidExpression,
}

/// An expression which is known to be in final form.
#[derive(Debug, Clone, PartialEq)]
pub struct Canonical {
    expr: Expression,
}

impl Canonical {
    pub fn expression(&self) -> &Expression { &self.expr }

    pub fn into_expression(self) -> Expression { self.expr }

    /// Flatten the expression into a mapping from identifier to coefficient.
    pub fn polynomial(&self) -> Polynomial {
        Polynomial::from_final(&self.expr)
    }
}

impl Display for Canonical {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.expr, f)
    }
}

/// Rewrite an expression into final form.
///
/// Children are finalized before their parents, so each rewrite only ever has
/// to deal with operands which are already in final form.
pub fn finalize(expr: Expression) -> Result<Canonical, FinalizeError> {
    if !expr.is_valid() {
        return Err(FinalizeError::InvalidExpression);
    }

    let expr = finalize_tree(expr)?;
    debug_assert!(is_final(&expr), "\"{}\" isn't in final form", expr);

    Ok(Canonical { expr })
}

/// Is this expression already in final form?
pub fn is_final(expr: &Expression) -> bool {
    match expr {
        Expression::Constant(_) | Expression::Identifier(_) => true,
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Plus,
        } => is_final(left) && is_final(right),
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Times,
        } => match (&**left, &**right) {
            (Expression::Constant(_), Expression::Identifier(_)) => true,
            _ => false,
        },
        _ => false,
    }
}

fn finalize_tree(expr: Expression) -> Result<Expression, FinalizeError> {
    match expr {
        Expression::Binary { left, right, op } => {
            let left = finalize_tree(*left)?;
            let right = finalize_tree(*right)?;

            match op {
                BinaryOperation::Plus => Ok(add(left, right)),
                BinaryOperation::Minus => {
                    let negated = multiply(Expression::Constant(-1.0), right)?;
                    Ok(add(left, negated))
                },
                BinaryOperation::Times => multiply(left, right),
                BinaryOperation::Divide => divide(left, right),
            }
        },
        Expression::Invalid => Err(FinalizeError::InvalidExpression),
        leaf => Ok(leaf),
    }
}

fn add(left: Expression, right: Expression) -> Expression {
    match (left, right) {
        (Expression::Constant(l), Expression::Constant(r)) => {
            Expression::Constant(l + r)
        },
        (left, right) => left + right,
    }
}

/// Multiply two final-form expressions. At least one of them needs to be a
/// constant, otherwise we'd end up with a higher order term.
fn multiply(
    left: Expression,
    right: Expression,
) -> Result<Expression, FinalizeError> {
    match (left, right) {
        (Expression::Constant(l), Expression::Constant(r)) => {
            Ok(Expression::Constant(l * r))
        },
        (Expression::Constant(factor), other)
        | (other, Expression::Constant(factor)) => scale(factor, other),
        (left, right) => {
            tracing::trace!(%left, %right, "Found a product of two variables");
            Err(FinalizeError::NonLinear)
        },
    }
}

/// Multiply a final-form expression by a constant, distributing over sums
/// and folding into existing coefficients.
fn scale(factor: f64, expr: Expression) -> Result<Expression, FinalizeError> {
    match expr {
        Expression::Constant(value) => Ok(Expression::Constant(factor * value)),
        Expression::Identifier(id) => {
            Ok(Expression::Constant(factor) * Expression::Identifier(id))
        },
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Plus,
        } => {
            let left = scale(factor, *left)?;
            let right = scale(factor, *right)?;
            Ok(add(left, right))
        },
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Times,
        } => match *left {
            Expression::Constant(coefficient) => {
                Ok(Expression::Constant(factor * coefficient) * *right)
            },
            _ => Err(FinalizeError::InvalidExpression),
        },
        _ => Err(FinalizeError::InvalidExpression),
    }
}

fn divide(
    left: Expression,
    right: Expression,
) -> Result<Expression, FinalizeError> {
    match right {
        Expression::Constant(divisor) if divisor == 0.0 => {
            Err(FinalizeError::DivisionByZero)
        },
        Expression::Constant(divisor) => {
            multiply(left, Expression::Constant(1.0 / divisor))
        },
        _ => Err(FinalizeError::NonLinear),
    }
}
