use crate::Problem;
use nalgebra::{DMatrix as Matrix, DVector as Vector};

/// Singular values below this are treated as zero when solving with the SVD.
const SINGULAR_VALUE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// A square system has no unique solution.
    #[error("the system of equations is singular")]
    Singular,
    #[error("unable to decompose the coefficient matrix: {0}")]
    Decomposition(&'static str),
}

/// Solve the linear system, returning a value for every unknown (including
/// the ones which were pinned with [`Problem::arrange_x()`]).
///
/// Writing each row as `A.x + c = 0`, we solve `A.x = -c`:
///
/// - more rows than free unknowns gives the least squares solution,
/// - fewer rows than free unknowns gives the minimum norm solution,
/// - otherwise the system is solved exactly using LU decomposition.
pub fn solve(problem: &Problem) -> Result<Vec<f64>, SolveError> {
    let free = problem.free_unknowns();

    let solution = if free == 0 {
        tracing::debug!("Every unknown is pinned, skipping the solve");
        Vec::new()
    } else {
        let (a, b) = split(problem);
        solve_free(a, b)?.as_slice().to_vec()
    };

    Ok(full_solution(&solution, problem.pinned()))
}

/// Split the coefficient matrix into `A` and `b` for `A.x = b`.
fn split(problem: &Problem) -> (Matrix<f64>, Vector<f64>) {
    let coefficients = problem.coefficients();
    let rows = coefficients.num_rows();
    let free = problem.free_unknowns();

    let a = Matrix::from_fn(rows, free, |row, column| {
        coefficients[(column, row)]
    });
    let b = Vector::from_fn(rows, |row, _| -coefficients[(free, row)]);

    (a, b)
}

fn solve_free(
    a: Matrix<f64>,
    b: Vector<f64>,
) -> Result<Vector<f64>, SolveError> {
    let (rows, columns) = a.shape();

    if rows == columns {
        tracing::debug!(rows, columns, "Solving exactly");

        a.lu().solve(&b).ok_or(SolveError::Singular)
    } else {
        if rows > columns {
            tracing::debug!(rows, columns, "Solving for the least squares");
        } else {
            tracing::debug!(rows, columns, "Solving for the minimum norm");
        }

        // the pseudo-inverse gives both the least squares solution of an
        // overdetermined system and the minimum norm solution of an
        // underdetermined one
        a.svd(true, true)
            .solve(&b, SINGULAR_VALUE_EPSILON)
            .map_err(SolveError::Decomposition)
    }
}

/// Splice the pinned values back in between the free ones.
fn full_solution(free: &[f64], pinned: &[(usize, f64)]) -> Vec<f64> {
    let mut values = Vec::with_capacity(free.len() + pinned.len());
    let mut free = free.iter().copied();

    for &(column, value) in pinned {
        while values.len() < column {
            match free.next() {
                Some(v) => values.push(v),
                None => break,
            }
        }
        values.push(value);
    }

    values.extend(free);
    values
}
