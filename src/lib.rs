//! A solver for linear systems where some of the unknowns are pinned to
//! known values and the remaining conditions are written in terms of
//! auxiliary quantities, each of which is a row of a coefficient matrix.
//!
//! ```rust
//! use glls::Options;
//!
//! let src = "
//! x        # the unknown
//! y        # an auxiliary quantity, y<k> is row k of the matrix
//! 1 1 -3   # y0 = x0 + x1 - 3
//! 1 -1 -1  # y1 = x0 - x1 - 1
//! y0 = 0
//! y1 = 0
//! ";
//!
//! let solution = glls::glls(src, Options::default()).unwrap();
//!
//! assert!((solution[0] - 2.0).abs() < 1e-9);
//! assert!((solution[1] - 1.0).abs() < 1e-9);
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
pub mod document;
mod problem;
mod solve;

pub use document::{Document, Options};
pub use problem::Problem;
pub use solve::{solve, SolveError};

/// Anything which can go wrong in [`glls()`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] document::Error),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl Error {
    /// The input line an error was detected on, if it came from the input.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Document(e) => Some(e.line),
            Error::Solve(_) => None,
        }
    }
}

/// Read a document and solve it, returning a value for every unknown.
pub fn glls(src: &str, options: Options) -> Result<Vec<f64>, Error> {
    let document = Document::parse(src, options)?;
    tracing::debug!(
        unknowns = document.unknowns(),
        pinned = document.pinned().len(),
        conditions = document.conditions().len(),
        "Parsed the document"
    );

    let problem = document.into_problem();
    let solution = solve(&problem)?;

    Ok(solution)
}
