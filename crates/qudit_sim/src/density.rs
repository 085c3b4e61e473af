//! Reduced density matrices
//!
//! Gantree: L2_Simulation → DensityMatrix
//!
//! Produced on demand by [`crate::QuditState::partial_trace`]; read by the
//! entropy analyzer.

use crate::matrix::ComplexMatrix;
use faer::complex_native::c64;
use faer::Mat;
use qudit_core::numerics;
use qudit_core::{QuditError, QuditResult};
use serde::{Deserialize, Serialize};

/// Density matrix over a set of kept subsystems
/// Gantree: DensityMatrix // 축약 밀도 행렬
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityMatrix {
    /// Dimensions of the kept subsystems, in kept order
    dims: Vec<usize>,

    /// ∏dims × ∏dims matrix
    matrix: ComplexMatrix,
}

impl DensityMatrix {
    /// Wrap a matrix, checking size, Hermiticity and unit trace
    /// Gantree: new(dims, matrix) -> Result<Self> // 생성+검증
    pub fn new(dims: Vec<usize>, matrix: ComplexMatrix) -> QuditResult<Self> {
        let size: usize = dims.iter().product();
        if dims.is_empty() || matrix.dim() != size {
            return Err(QuditError::DimensionMismatch {
                gate: "density".to_string(),
                expected: dims,
                found: vec![matrix.dim()],
            });
        }

        let rho = Self { dims, matrix };
        rho.validate()?;
        Ok(rho)
    }

    /// Check Hermiticity and unit trace
    pub fn validate(&self) -> QuditResult<()> {
        let hermiticity = self.matrix.hermiticity_deviation();
        if !(hermiticity <= numerics::DENSITY_TOLERANCE) {
            return Err(QuditError::InvalidParameter(format!(
                "density matrix is not Hermitian (deviation {:e})",
                hermiticity
            )));
        }

        let drift = numerics::norm_drift(self.trace());
        if !(drift <= numerics::NORM_HARD_CEILING) {
            return Err(QuditError::NormalizationDrift {
                drift,
                ceiling: numerics::NORM_HARD_CEILING,
            });
        }
        Ok(())
    }

    /// Kept subsystem dimensions
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Matrix size ∏dims
    pub fn size(&self) -> usize {
        self.matrix.dim()
    }

    /// Underlying matrix
    pub fn matrix(&self) -> &ComplexMatrix {
        &self.matrix
    }

    /// Real part of the trace
    pub fn trace(&self) -> f64 {
        self.matrix.trace().re
    }

    /// Purity Tr(ρ²) = Σ|ρ_ij|² for Hermitian ρ
    pub fn purity(&self) -> f64 {
        self.matrix.as_slice().iter().map(|c| c.norm_sqr()).sum()
    }

    /// Eigenvalues in ascending order (Hermitian decomposition)
    /// Gantree: eigenvalues(&self) -> Vec<f64> // 고유값
    pub fn eigenvalues(&self) -> Vec<f64> {
        let dim = self.size();
        if dim == 1 {
            return vec![self.trace()];
        }

        let mat = Mat::<c64>::from_fn(dim, dim, |i, j| {
            let c = self.matrix.get(i, j);
            c64::new(c.re, c.im)
        });
        let eigen = mat.selfadjoint_eigendecomposition(faer::Side::Lower);
        let s = eigen.s();
        (0..dim).map(|i| s.column_vector().read(i).re).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
