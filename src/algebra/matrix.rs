//! A simplified row-major matrix, containing just the operations the
//! coefficient matrix needs.

use std::{
    fmt::{self, Debug, Formatter},
    ops::Index,
};

/// A general-purpose MxN matrix laid out sequentially in memory, one row
/// after another.
#[derive(Clone, PartialEq)]
pub struct Matrix<T> {
    cells: Vec<T>,
    columns: usize,
    rows: usize,
}

impl<T> Matrix<T> {
    /// An empty matrix where every row will have `columns` cells.
    pub fn with_columns(columns: usize) -> Self {
        Matrix {
            cells: Vec::new(),
            columns,
            rows: 0,
        }
    }

    pub fn num_columns(&self) -> usize { self.columns }

    pub fn num_rows(&self) -> usize { self.rows }

    /// Append a row to the bottom of the matrix.
    ///
    /// # Panics
    ///
    /// The row must have exactly [`Matrix::num_columns()`] cells.
    pub fn push_row<I>(&mut self, row: I)
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.cells.len();
        self.cells.extend(row);
        assert_eq!(
            self.cells.len() - before,
            self.columns,
            "Rows must have exactly {} cells",
            self.columns
        );
        self.rows += 1;
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.rows {
            let start = row * self.columns;
            Some(&self.cells[start..start + self.columns])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        let rows = self.rows;
        let columns = self.columns;

        (0..rows)
            .map(move |row| row * columns..(row + 1) * columns)
            .map(move |range| &self.cells[range])
    }

    fn offset(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    /// All the cells, row by row.
    pub fn as_slice(&self) -> &[T] { &self.cells }
}

impl<T: Clone> Matrix<T> {
    /// Build a matrix from a list of equally sized rows.
    pub fn from_rows<R>(columns: usize, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<[T]>,
    {
        let mut matrix = Matrix::with_columns(columns);

        for row in rows {
            matrix.push_row(row.as_ref().iter().cloned());
        }

        matrix
    }
}

impl<T: Debug> Debug for Matrix<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (column, row): (usize, usize)) -> &Self::Output {
        assert!(column < self.columns, "Column index out of bounds");
        assert!(row < self.rows, "Row index out of bounds");

        &self.cells[self.offset(column, row)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_representation() {
        let matrix = Matrix::<i32>::from_rows(3, &[[0, 1, 2], [1, 2, 3]]);
        let should_be = "[[0, 1, 2], [1, 2, 3]]";

        let got = format!("{:?}", matrix);

        assert_eq!(got, should_be);
    }

    #[test]
    fn build_row_by_row() {
        let mut matrix = Matrix::with_columns(3);
        matrix.push_row(vec![1, 2, 3]);
        matrix.push_row(vec![4, 5, 6]);

        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.num_columns(), 3);
        assert_eq!(matrix[(2, 1)], 6);
        assert_eq!(matrix.row(0), Some(&[1, 2, 3][..]));
        assert_eq!(matrix.row(2), None);
        assert_eq!(matrix, Matrix::from_rows(3, &[[1, 2, 3], [4, 5, 6]]));
    }

    #[test]
    #[should_panic(expected = "Rows must have exactly 3 cells")]
    fn rows_must_be_the_right_length() {
        let mut matrix = Matrix::with_columns(3);
        matrix.push_row(vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "Row index out of bounds")]
    fn indexing_past_the_last_row() {
        let matrix = Matrix::<i32>::from_rows(2, &[[1, 2]]);

        let _ = matrix[(0, 1)];
    }
}
