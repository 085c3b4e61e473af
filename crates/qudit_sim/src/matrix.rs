//! Dense complex matrices
//!
//! Gantree: L2_Simulation → ComplexMatrix
//!
//! Square, row-major `Complex64` matrices of runtime dimension. Used for
//! gate matrices and reduced density matrices; nothing here assumes a
//! fixed size.

use num_complex::Complex64;
use qudit_core::numerics;
use qudit_core::{QuditError, QuditResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Square complex matrix, row-major
/// Gantree: ComplexMatrix // 복소 행렬
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexMatrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl ComplexMatrix {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Zero matrix
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![Complex64::new(0.0, 0.0); dim * dim],
        }
    }

    /// Identity matrix
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        m
    }

    /// Build entry-wise from `f(row, col)`
    pub fn from_fn(dim: usize, f: impl Fn(usize, usize) -> Complex64) -> Self {
        let mut data = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                data.push(f(i, j));
            }
        }
        Self { dim, data }
    }

    /// Diagonal matrix
    pub fn diagonal(entries: &[Complex64]) -> Self {
        let mut m = Self::zeros(entries.len());
        for (i, &e) in entries.iter().enumerate() {
            m.data[i * entries.len() + i] = e;
        }
        m
    }

    /// Wrap row-major data of length `dim²`
    pub fn from_row_major(dim: usize, data: Vec<Complex64>) -> QuditResult<Self> {
        if data.len() != dim * dim {
            return Err(QuditError::AmplitudeLength {
                expected: dim * dim,
                got: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Row/column count
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Set entry at (row, col)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.dim + col] = value;
    }

    /// Row-major entries
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// One row
    #[inline]
    pub fn row(&self, row: usize) -> &[Complex64] {
        &self.data[row * self.dim..(row + 1) * self.dim]
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Conjugate transpose
    /// Gantree: dagger(&self) -> Self // 켤레 전치
    pub fn dagger(&self) -> Self {
        Self::from_fn(self.dim, |i, j| self.get(j, i).conj())
    }

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &Self) -> QuditResult<Self> {
        if self.dim != other.dim {
            return Err(QuditError::DimensionMismatch {
                gate: "matmul".to_string(),
                expected: vec![self.dim],
                found: vec![other.dim],
            });
        }
        let n = self.dim;
        let mut out = Self::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let a = self.data[i * n + k];
                if a == Complex64::new(0.0, 0.0) {
                    continue;
                }
                for j in 0..n {
                    out.data[i * n + j] += a * other.data[k * n + j];
                }
            }
        }
        Ok(out)
    }

    /// Matrix-vector product into `out`
    #[inline]
    pub fn apply_to(&self, input: &[Complex64], out: &mut [Complex64]) {
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = self
                .row(row)
                .iter()
                .zip(input)
                .map(|(&m, &v)| m * v)
                .sum();
        }
    }

    /// Kronecker product `self ⊗ other`
    pub fn kron(&self, other: &Self) -> Self {
        let (n, m) = (self.dim, other.dim);
        Self::from_fn(n * m, |i, j| self.get(i / m, j / m) * other.get(i % m, j % m))
    }

    /// Trace
    pub fn trace(&self) -> Complex64 {
        (0..self.dim).map(|i| self.get(i, i)).sum()
    }

    // ========================================================================
    // Checks
    // ========================================================================

    /// Check that every entry is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.re.is_finite() && c.im.is_finite())
    }

    /// max |U·U† − I| over all entries
    /// Gantree: unitarity_deviation(&self) -> f64 // 유니타리 검사
    ///
    /// Returns infinity for non-finite matrices. Rows are checked in parallel
    /// from [`numerics::PARALLEL_CHECK_DIM`] upward.
    pub fn unitarity_deviation(&self) -> f64 {
        if !self.is_finite() {
            return f64::INFINITY;
        }

        let row_deviation = |i: usize| -> f64 {
            let ri = self.row(i);
            (0..self.dim)
                .map(|j| {
                    let dot: Complex64 = ri
                        .iter()
                        .zip(self.row(j))
                        .map(|(&a, &b)| a * b.conj())
                        .sum();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    (dot - Complex64::new(expected, 0.0)).norm()
                })
                .fold(0.0, f64::max)
        };

        if self.dim >= numerics::PARALLEL_CHECK_DIM {
            (0..self.dim)
                .into_par_iter()
                .map(row_deviation)
                .reduce(|| 0.0, f64::max)
        } else {
            (0..self.dim).map(row_deviation).fold(0.0, f64::max)
        }
    }

    /// Check U·U† ≈ I within `tolerance`
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// max |M − M†|
    pub fn hermiticity_deviation(&self) -> f64 {
        let mut max = 0.0f64;
        for i in 0..self.dim {
            for j in i..self.dim {
                max = max.max((self.get(i, j) - self.get(j, i).conj()).norm());
            }
        }
        max
    }

    /// max |A − B| entry-wise (infinity if sizes differ)
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        if self.dim != other.dim {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_identity_is_unitary() {
        let id = ComplexMatrix::identity(5);
        assert!(id.unitarity_deviation() < 1e-15);
        assert!((id.trace().re - 5.0).abs() < 1e-15);
    }

    #[test]
    fn test_non_unitary_detected() {
        let m = ComplexMatrix::diagonal(&[c(1.0, 0.0), c(2.0, 0.0)]);
        assert!(!m.is_unitary(1e-9));

        let nan = ComplexMatrix::diagonal(&[c(f64::NAN, 0.0)]);
        assert!(nan.unitarity_deviation().is_infinite());
        assert!(!nan.is_unitary(1e-9));
    }

    #[test]
    fn test_dagger_and_matmul() {
        let m = ComplexMatrix::from_fn(2, |i, j| c(i as f64, j as f64));
        let d = m.dagger();
        assert_eq!(d.get(0, 1), c(1.0, -0.0));
        assert_eq!(d.get(1, 0), c(0.0, -1.0));

        let prod = ComplexMatrix::identity(2).matmul(&m).unwrap();
        assert_eq!(prod, m);
        assert!(m.matmul(&ComplexMatrix::identity(3)).is_err());
    }

    #[test]
    fn test_kron() {
        let a = ComplexMatrix::diagonal(&[c(1.0, 0.0), c(2.0, 0.0)]);
        let b = ComplexMatrix::identity(3);
        let k = a.kron(&b);
        assert_eq!(k.dim(), 6);
        assert_eq!(k.get(4, 4), c(2.0, 0.0));
        assert_eq!(k.get(1, 1), c(1.0, 0.0));
        assert_eq!(k.get(0, 3), c(0.0, 0.0));
    }

    #[test]
    fn test_apply_to() {
        let m = ComplexMatrix::from_fn(2, |i, j| if i != j { c(1.0, 0.0) } else { c(0.0, 0.0) });
        let mut out = vec![c(0.0, 0.0); 2];
        m.apply_to(&[c(1.0, 0.0), c(0.0, 2.0)], &mut out);
        assert_eq!(out, vec![c(0.0, 2.0), c(1.0, 0.0)]);
    }

    #[test]
    fn test_hermiticity() {
        let h = ComplexMatrix::from_fn(2, |i, j| match (i, j) {
            (0, 1) => c(0.0, 1.0),
            (1, 0) => c(0.0, -1.0),
            _ => c(0.5, 0.0),
        });
        assert!(h.hermiticity_deviation() < 1e-15);

        let not_h = ComplexMatrix::from_fn(2, |i, j| c(i as f64, j as f64));
        assert!(not_h.hermiticity_deviation() > 0.5);
    }

    #[test]
    fn test_from_row_major_length() {
        assert!(ComplexMatrix::from_row_major(2, vec![c(1.0, 0.0); 3]).is_err());
        assert!(ComplexMatrix::from_row_major(2, vec![c(1.0, 0.0); 4]).is_ok());
    }
}
