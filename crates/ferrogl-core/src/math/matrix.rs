use std::ops::{Index, IndexMut};

/// Floating-point element usable in a [`Matrix`].
pub trait MatrixElement: Copy + PartialEq + std::fmt::Debug + 'static {
    const ZERO: Self;
    const ONE: Self;
}

impl MatrixElement for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
}

impl MatrixElement for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
}

/// Dense `C` columns × `R` rows matrix, stored row by row.
///
/// The dimensions follow shading-language naming: `Matrix<f32, 2, 3>` is a
/// `mat2x3`, two columns of three rows each.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix<T, const C: usize, const R: usize> {
    rows: [[T; C]; R],
}

impl<T: MatrixElement, const C: usize, const R: usize> Matrix<T, C, R> {
    #[inline]
    pub const fn from_rows(rows: [[T; C]; R]) -> Self {
        Self { rows }
    }

    pub fn from_columns(columns: [[T; R]; C]) -> Self {
        let mut rows = [[T::ZERO; C]; R];
        for (c, column) in columns.iter().enumerate() {
            for (r, value) in column.iter().enumerate() {
                rows[r][c] = *value;
            }
        }
        Self { rows }
    }

    #[inline]
    pub fn zero() -> Self {
        Self { rows: [[T::ZERO; C]; R] }
    }

    #[inline]
    pub const fn rows(&self) -> &[[T; C]; R] {
        &self.rows
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> T {
        self.rows[row][column]
    }

    pub fn transpose(&self) -> Matrix<T, R, C> {
        let mut out = Matrix::<T, R, C>::zero();
        for r in 0..R {
            for c in 0..C {
                out.rows[c][r] = self.rows[r][c];
            }
        }
        out
    }

    /// Row-major iteration over every element.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().flatten()
    }
}

impl<T: MatrixElement, const N: usize> Matrix<T, N, N> {
    pub fn identity() -> Self {
        let mut m = Self::zero();
        for i in 0..N {
            m.rows[i][i] = T::ONE;
        }
        m
    }
}

impl<T: MatrixElement, const C: usize, const R: usize> Default for Matrix<T, C, R> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: MatrixElement, const C: usize, const R: usize> From<[[T; C]; R]> for Matrix<T, C, R> {
    fn from(rows: [[T; C]; R]) -> Self {
        Self::from_rows(rows)
    }
}

impl<T, const C: usize, const R: usize> Index<(usize, usize)> for Matrix<T, C, R> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        &self.rows[row][column]
    }
}

impl<T, const C: usize, const R: usize> IndexMut<(usize, usize)> for Matrix<T, C, R> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        &mut self.rows[row][column]
    }
}

pub type Mat2 = Matrix<f32, 2, 2>;
pub type Mat2x3 = Matrix<f32, 2, 3>;
pub type Mat2x4 = Matrix<f32, 2, 4>;
pub type Mat3x2 = Matrix<f32, 3, 2>;
pub type Mat3 = Matrix<f32, 3, 3>;
pub type Mat3x4 = Matrix<f32, 3, 4>;
pub type Mat4x2 = Matrix<f32, 4, 2>;
pub type Mat4x3 = Matrix<f32, 4, 3>;
pub type Mat4 = Matrix<f32, 4, 4>;

pub type DMat2 = Matrix<f64, 2, 2>;
pub type DMat2x3 = Matrix<f64, 2, 3>;
pub type DMat2x4 = Matrix<f64, 2, 4>;
pub type DMat3x2 = Matrix<f64, 3, 2>;
pub type DMat3 = Matrix<f64, 3, 3>;
pub type DMat3x4 = Matrix<f64, 3, 4>;
pub type DMat4x2 = Matrix<f64, 4, 2>;
pub type DMat4x3 = Matrix<f64, 4, 3>;
pub type DMat4 = Matrix<f64, 4, 4>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_ones_on_diagonal() {
        let m = Mat3::identity();
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(m.get(r, c), if r == c { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let m = Mat2x3::from_rows([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let t: Mat3x2 = m.transpose();
        assert_eq!(t.rows(), &[[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn from_columns_matches_from_rows() {
        let by_cols = DMat2x3::from_columns([[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]);
        let by_rows = DMat2x3::from_rows([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        assert_eq!(by_cols, by_rows);
        assert_eq!(by_rows[(2, 1)], 6.0);
    }

    #[test]
    fn iter_is_row_major() {
        let m = Mat2::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let flat: Vec<f32> = m.iter().copied().collect();
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
