use crate::algebra::{
    ops::{self, Canonical, FinalizeError},
    Expression,
};

/// A single equality, `left = right`, stored as `left - right`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    body: Expression,
}

impl Equation {
    pub fn new(left: Expression, right: Expression) -> Self {
        Equation { body: left - right }
    }

    pub fn body(&self) -> &Expression { &self.body }

    /// Rewrite the equation into its canonical linear form.
    pub fn canonicalize(self) -> Result<Canonical, FinalizeError> {
        ops::finalize(self.body)
    }
}
