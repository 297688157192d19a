//! The linear system which eventually gets handed to the solver.

use crate::algebra::{dictionary::CONSTANT, IdKind, Matrix, Polynomial};

/// A coefficient matrix where each row `[a_0, ..., a_n, c]` states
/// `a_0*x_0 + ... + a_n*x_n + c = 0`.
///
/// Columns for unknowns which have been pinned to a known value with
/// [`Problem::arrange_x()`] are removed, so the matrix always has
/// [`Problem::free_unknowns()`]` + 1` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    coefficients: Matrix<f64>,
    /// `(column, value)` pairs in ascending column order.
    pinned: Vec<(usize, f64)>,
}

impl Problem {
    /// # Panics
    ///
    /// The matrix needs at least one unknown column as well as the constant
    /// column.
    pub fn new(coefficients: Matrix<f64>) -> Self {
        assert!(
            coefficients.num_columns() >= 2,
            "A problem needs at least one unknown"
        );

        Problem {
            coefficients,
            pinned: Vec::new(),
        }
    }

    pub fn coefficients(&self) -> &Matrix<f64> { &self.coefficients }

    /// The number of unknowns which still need to be solved for.
    pub fn free_unknowns(&self) -> usize {
        self.coefficients.num_columns() - 1
    }

    /// The length of the full solution vector.
    pub fn total_unknowns(&self) -> usize {
        self.free_unknowns() + self.pinned.len()
    }

    /// Unknowns with a known value, as `(column, value)` pairs in ascending
    /// column order.
    pub fn pinned(&self) -> &[(usize, f64)] { &self.pinned }

    /// Substitute known values for some of the unknowns, removing their
    /// columns and folding `coefficient * value` into each row's constant.
    ///
    /// # Panics
    ///
    /// This may only be called once, and every column must be a distinct
    /// index into the current set of unknowns.
    pub fn arrange_x(&mut self, known: &[(usize, f64)]) {
        assert!(self.pinned.is_empty(), "Unknowns have already been pinned");

        let mut known = known.to_vec();
        known.sort_by_key(|&(column, _)| column);

        let unknowns = self.free_unknowns();
        for pair in known.windows(2) {
            assert!(pair[0].0 != pair[1].0, "x{} is pinned twice", pair[0].0);
        }
        if let Some(&(column, _)) = known.last() {
            assert!(
                column < unknowns,
                "x{} is out of range (there are {} unknowns)",
                column,
                unknowns
            );
        }

        let columns = self.coefficients.num_columns();
        let mut arranged = Matrix::with_columns(columns - known.len());

        for row in self.coefficients.rows() {
            let mut constant = row[columns - 1];
            for &(column, value) in &known {
                constant += row[column] * value;
            }

            let free = row[..columns - 1]
                .iter()
                .enumerate()
                .filter(|(column, _)| {
                    known.binary_search_by_key(column, |&(c, _)| c).is_err()
                })
                .map(|(_, &coefficient)| coefficient);

            arranged.push_row(free.chain(std::iter::once(constant)));
        }

        tracing::debug!(
            pinned = known.len(),
            free = arranged.num_columns() - 1,
            rows = arranged.num_rows(),
            "Folded known unknowns into the constant column"
        );

        self.coefficients = arranged;
        self.pinned = known;
    }

    /// Replace the coefficient matrix with one row per condition, where each
    /// condition is a linear combination of the existing rows.
    ///
    /// Every auxiliary id in a condition refers to the row with the same
    /// index, and the condition's constant is added straight to the new
    /// row's constant column.
    ///
    /// # Panics
    ///
    /// There must be at least one condition, and conditions may only mention
    /// auxiliary quantities with a valid row index.
    pub fn arrange_y(&mut self, conditions: &[Polynomial]) {
        assert!(!conditions.is_empty(), "No auxiliary conditions were given");

        let columns = self.coefficients.num_columns();
        let mut arranged = Matrix::with_columns(columns);

        for condition in conditions {
            let mut combined = vec![0.0; columns];

            for (id, multiplier) in condition.terms() {
                match IdKind::of(id) {
                    IdKind::Constant => combined[columns - 1] += multiplier,
                    IdKind::Auxiliary(row) => {
                        let row = self.coefficients.row(row).unwrap_or_else(
                            || panic!("There is no row {} to combine", row),
                        );

                        for (cell, coefficient) in combined.iter_mut().zip(row)
                        {
                            *cell += multiplier * coefficient;
                        }
                    },
                    other => panic!(
                        "Auxiliary conditions can't contain {:?} (id {})",
                        other, id
                    ),
                }
            }

            tracing::trace!(?combined, "Combined an auxiliary condition");
            arranged.push_row(combined);
        }

        tracing::debug!(
            conditions = conditions.len(),
            replaced = self.coefficients.num_rows(),
            "Folded the auxiliary conditions into new rows"
        );

        self.coefficients = arranged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn problem(rows: &[&[f64]]) -> Problem {
        Problem::new(Matrix::from_rows(rows[0].len(), rows))
    }

    #[test]
    fn pin_the_first_column() {
        let mut problem = problem(&[
            &[1.0, 2.0, 3.0, 4.0, 0.0],
            &[4.0, 5.0, 6.0, 8.0, 0.0],
        ]);

        problem.arrange_x(&[(0, 4.0)]);

        assert_eq!(problem.free_unknowns(), 3);
        assert_eq!(problem.total_unknowns(), 4);
        assert_eq!(problem.pinned(), &[(0, 4.0)]);
        assert_eq!(
            problem.coefficients().as_slice(),
            &[2.0, 3.0, 4.0, 4.0, 5.0, 6.0, 8.0, 16.0]
        );
    }

    #[test]
    fn pin_in_any_order() {
        let mut problem = problem(&[
            &[1.0, 2.0, 3.0, 4.0, 0.0],
            &[4.0, 5.0, 6.0, 8.0, 0.0],
        ]);

        problem.arrange_x(&[(3, -2.0), (0, 1.0)]);

        assert_eq!(problem.free_unknowns(), 2);
        assert_eq!(problem.pinned(), &[(0, 1.0), (3, -2.0)]);
        assert_eq!(
            problem.coefficients().as_slice(),
            &[2.0, 3.0, -7.0, 5.0, 6.0, -12.0]
        );
    }

    #[test]
    fn folding_uses_the_row_constant() {
        // x0 + 2*x1 - 5 = 0 and 3*x0 - x1 + 1 = 0, written with both signs
        let mut problem =
            problem(&[&[1.0, 2.0, -5.0], &[3.0, -1.0, 1.0]]);

        problem.arrange_x(&[(0, 1.0)]);

        // 2*x1 - 4 = 0 and -x1 + 4 = 0
        assert_eq!(problem.coefficients().as_slice(), &[2.0, -4.0, -1.0, 4.0]);
    }

    #[test]
    fn pinning_nothing_keeps_the_matrix() {
        let mut problem = problem(&[&[1.0, 2.0, 3.0]]);
        let original = problem.clone();

        problem.arrange_x(&[]);

        assert_eq!(problem, original);
    }

    #[test]
    #[should_panic(expected = "already been pinned")]
    fn can_only_pin_once() {
        let mut problem = problem(&[&[1.0, 2.0, 3.0]]);

        problem.arrange_x(&[(0, 1.0)]);
        problem.arrange_x(&[(0, 1.0)]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn pinned_columns_must_exist() {
        let mut problem = problem(&[&[1.0, 2.0, 3.0]]);

        problem.arrange_x(&[(2, 1.0)]);
    }

    #[test]
    #[should_panic(expected = "pinned twice")]
    fn pinned_columns_must_be_distinct() {
        let mut problem = problem(&[&[1.0, 2.0, 3.0]]);

        problem.arrange_x(&[(1, 1.0), (1, 2.0)]);
    }

    #[test]
    fn combine_rows() {
        let mut problem = problem(&[
            &[1.0, 2.0, 3.0, 4.0],
            &[4.0, 5.0, 6.0, 8.0],
        ]);
        // y0 - 2*y1 = 3
        let condition: Polynomial =
            vec![(0, 1.0), (1, -2.0), (CONSTANT, -3.0)]
                .into_iter()
                .collect();
        // y1 = 0
        let other: Polynomial = vec![(1, 1.0)].into_iter().collect();

        problem.arrange_y(&[condition, other]);

        let got = problem.coefficients();
        assert_eq!(got.num_rows(), 2);
        for (got, should_be) in got
            .as_slice()
            .iter()
            .zip(&[-7.0, -8.0, -9.0, -15.0, 4.0, 5.0, 6.0, 8.0])
        {
            assert_relative_eq!(*got, *should_be);
        }
    }

    #[test]
    #[should_panic(expected = "no row 2")]
    fn combined_rows_must_exist() {
        let mut problem = problem(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let condition: Polynomial = vec![(2, 1.0)].into_iter().collect();

        problem.arrange_y(&[condition]);
    }

    #[test]
    #[should_panic(expected = "No auxiliary conditions")]
    fn need_at_least_one_condition() {
        let mut problem = problem(&[&[1.0, 2.0]]);

        problem.arrange_y(&[]);
    }
}
