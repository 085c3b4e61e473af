//! Gate library
//!
//! Gantree: L2_Simulation → GateLibrary
//!
//! Dimension-generic unitary constructors. Every gate is checked against
//! U·U† ≈ I when it is built; a gate that exists is unitary.

use crate::matrix::ComplexMatrix;
use num_complex::Complex64;
use qudit_core::numerics;
use qudit_core::{
    dense_dim, math, Angle, Dimensions, GateSpec, QuditError, QuditResult, SubsystemId,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Unitary gate over one or more local subsystems
/// Gantree: UnitaryGate // 유니타리 게이트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    /// Gate name
    name: String,

    /// Local dimensions of the subsystems the gate acts on, in order
    /// Gantree: dims: Vec<usize> // 국소 차원
    dims: Vec<usize>,

    /// Angle parameter, if any
    angle: Option<Angle>,

    /// ∏dims × ∏dims matrix
    matrix: ComplexMatrix,
}

impl UnitaryGate {
    // ========================================================================
    // Single-Subsystem Constructors
    // ========================================================================

    /// Generalized Hadamard H_d[j,k] = e^{2πi·jk/d}/√d
    /// Gantree: hadamard(d) -> Result<Self> // 일반화 하다마드
    pub fn hadamard(d: usize) -> QuditResult<Self> {
        dense_dim(&[d])?;
        Self::finish("h", vec![d], None, fourier_matrix(d, false))
    }

    /// Discrete Fourier transform QFT_d[j,k] = ω^{jk}/√d
    /// Gantree: fourier(d) -> Result<Self> // 양자 푸리에
    pub fn fourier(d: usize) -> QuditResult<Self> {
        dense_dim(&[d])?;
        Self::finish("qft", vec![d], None, fourier_matrix(d, false))
    }

    /// Inverse Fourier transform QFT_d†
    pub fn inverse_fourier(d: usize) -> QuditResult<Self> {
        dense_dim(&[d])?;
        Self::finish("iqft", vec![d], None, fourier_matrix(d, true))
    }

    /// Phase rotation diag(e^{iθk/d})
    /// Gantree: phase(d, θ) -> Result<Self> // 위상 회전
    pub fn phase(d: usize, theta: Angle) -> QuditResult<Self> {
        dense_dim(&[d])?;
        let entries: Vec<Complex64> = (0..d)
            .map(|k| Complex64::from_polar(1.0, theta * k as f64 / d as f64))
            .collect();
        Self::finish("phase", vec![d], Some(theta), ComplexMatrix::diagonal(&entries))
    }

    /// Cyclic shift |t⟩ → |t + amount mod d⟩
    pub fn shift(d: usize, amount: usize) -> QuditResult<Self> {
        dense_dim(&[d])?;
        let amount = amount.checked_rem(d).unwrap_or(0);
        let matrix = ComplexMatrix::from_fn(d, |row, col| {
            if row == (col + amount) % d {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        Self::finish("shift", vec![d], None, matrix)
    }

    // ========================================================================
    // Multi-Subsystem Constructors
    // ========================================================================

    /// Controlled shift on (d_c × d_t): |c,t⟩ → |c, t + c mod d_t⟩
    /// Gantree: controlled_shift(dc, dt) -> Result<Self> // 제어-시프트
    pub fn controlled_shift(dc: usize, dt: usize) -> QuditResult<Self> {
        let size = dense_dim(&[dc, dt])?;
        let matrix = ComplexMatrix::from_fn(size, |row, col| {
            let (c, t) = (col / dt, col % dt);
            if row == c * dt + (t + c) % dt {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        Self::finish("cshift", vec![dc, dt], None, matrix)
    }

    /// Joint phase diag(e^{iπ·c·m/D}) over a block of composite size D
    pub fn constant_phase(dims: Vec<usize>, constant: &str) -> QuditResult<Self> {
        let value = math::named_constant(constant)
            .ok_or_else(|| QuditError::UnknownConstant(constant.to_string()))?;
        let size = dense_dim(&dims)?;
        let entries: Vec<Complex64> = (0..size)
            .map(|m| Complex64::from_polar(1.0, PI * value * m as f64 / size as f64))
            .collect();
        Self::finish(
            &format!("cphase({})", constant.to_lowercase()),
            dims,
            Some(value),
            ComplexMatrix::diagonal(&entries),
        )
    }

    /// User-supplied matrix, checked like every built-in gate
    pub fn custom(name: &str, dims: Vec<usize>, matrix: ComplexMatrix) -> QuditResult<Self> {
        let size = dense_dim(&dims)?;
        if dims.is_empty() || matrix.dim() != size {
            return Err(QuditError::DimensionMismatch {
                gate: name.to_string(),
                expected: dims,
                found: vec![matrix.dim()],
            });
        }
        Self::finish(name, dims, None, matrix)
    }

    /// Resolve a circuit step against a dimension tuple
    /// Gantree: from_spec(step, dims) -> Result<(Self, targets)> // 단계 해석
    pub fn from_spec(
        step: &GateSpec,
        dims: &Dimensions,
    ) -> QuditResult<(Self, Vec<SubsystemId>)> {
        let targets = step.targets();
        let local = dims.select(&targets)?;

        let gate = match step {
            GateSpec::Hadamard { .. } => Self::hadamard(local[0])?,
            GateSpec::Fourier { .. } => Self::fourier(local[0])?,
            GateSpec::InverseFourier { .. } => Self::inverse_fourier(local[0])?,
            GateSpec::Phase { theta, .. } => Self::phase(local[0], *theta)?,
            GateSpec::Shift { amount, .. } => Self::shift(local[0], *amount)?,
            GateSpec::ControlledShift { .. } => Self::controlled_shift(local[0], local[1])?,
            GateSpec::ConstantPhase { constant, .. } => Self::constant_phase(local, constant)?,
        };
        Ok((gate, targets))
    }

    fn finish(
        name: &str,
        dims: Vec<usize>,
        angle: Option<Angle>,
        matrix: ComplexMatrix,
    ) -> QuditResult<Self> {
        let deviation = if dims.contains(&0) || matrix.dim() == 0 {
            f64::INFINITY
        } else {
            matrix.unitarity_deviation()
        };
        let tolerance = numerics::UNITARITY_TOLERANCE;

        // NaN deviations fail here as well
        if !(deviation <= tolerance) {
            return Err(QuditError::NonUnitaryGate {
                gate: name.to_string(),
                deviation,
                tolerance,
            });
        }
        if angle.is_some_and(|a| !a.is_finite()) {
            return Err(QuditError::NonUnitaryGate {
                gate: name.to_string(),
                deviation: f64::INFINITY,
                tolerance,
            });
        }

        Ok(Self {
            name: name.to_string(),
            dims,
            angle,
            matrix,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Gate name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local dimensions
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Angle parameter
    pub fn angle(&self) -> Option<Angle> {
        self.angle
    }

    /// Gate matrix
    pub fn matrix(&self) -> &ComplexMatrix {
        &self.matrix
    }

    /// Composite local size ∏dims
    pub fn size(&self) -> usize {
        self.matrix.dim()
    }

    /// Number of subsystems the gate acts on
    pub fn arity(&self) -> usize {
        self.dims.len()
    }

    /// Inverse gate U†
    pub fn dagger(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            dims: self.dims.clone(),
            angle: self.angle.map(|a| -a),
            matrix: self.matrix.dagger(),
        }
    }
}

impl fmt::Display for UnitaryGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.name, self.dims)?;
        if let Some(angle) = self.angle {
            write!(f, "({:.6})", angle)?;
        }
        Ok(())
    }
}

/// (1/√d)·ω^{±jk} with the exponent reduced mod d over a root table
fn fourier_matrix(d: usize, inverse: bool) -> ComplexMatrix {
    if d == 0 {
        return ComplexMatrix::zeros(0);
    }
    let sign = if inverse { -1.0 } else { 1.0 };
    let scale = 1.0 / (d as f64).sqrt();
    let roots: Vec<Complex64> = (0..d)
        .map(|m| Complex64::from_polar(scale, sign * 2.0 * PI * m as f64 / d as f64))
        .collect();
    ComplexMatrix::from_fn(d, |j, k| roots[(j * k) % d])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadamard_unitary() {
        for d in [2, 3, 5, 7, 11] {
            let h = UnitaryGate::hadamard(d).unwrap();
            assert!(h.matrix().unitarity_deviation() < 1e-9);
            assert_eq!(h.dims(), &[d]);
        }
    }

    #[test]
    fn test_qft_1000_unitary() {
        let qft = UnitaryGate::fourier(1000).unwrap();
        assert_eq!(qft.size(), 1000);
        assert!(qft.matrix().unitarity_deviation() < 1e-9);

        // QFT · QFT† on a small register, entry by entry
        let small = UnitaryGate::fourier(12).unwrap();
        let product = small.matrix().matmul(small.dagger().matrix()).unwrap();
        assert!(product.max_abs_diff(&ComplexMatrix::identity(12)) < 1e-9);
    }

    #[test]
    fn test_inverse_fourier_is_dagger() {
        let qft = UnitaryGate::fourier(6).unwrap();
        let iqft = UnitaryGate::inverse_fourier(6).unwrap();
        assert!(iqft.matrix().max_abs_diff(qft.dagger().matrix()) < 1e-12);
    }

    #[test]
    fn test_phase_golden_ratio() {
        let p = UnitaryGate::phase(5, math::GOLDEN_RATIO).unwrap();
        let expected = Complex64::from_polar(1.0, math::GOLDEN_RATIO * 3.0 / 5.0);
        assert!((p.matrix().get(3, 3) - expected).norm() < 1e-12);
        assert_eq!(p.angle(), Some(math::GOLDEN_RATIO));
    }

    #[test]
    fn test_controlled_shift_mapping() {
        let g = UnitaryGate::controlled_shift(3, 4).unwrap();
        // |2,3⟩ → |2,(3+2) mod 4⟩ = |2,1⟩
        let input = 2 * 4 + 3;
        let output = 2 * 4 + 1;
        assert_eq!(g.matrix().get(output, input), Complex64::new(1.0, 0.0));
        assert_eq!(g.dims(), &[3, 4]);
    }

    #[test]
    fn test_shift_and_constant_phase() {
        let x = UnitaryGate::shift(4, 1).unwrap();
        assert_eq!(x.matrix().get(0, 3), Complex64::new(1.0, 0.0));

        let cp = UnitaryGate::constant_phase(vec![2, 3], "phi").unwrap();
        assert_eq!(cp.size(), 6);
        assert!(UnitaryGate::constant_phase(vec![2], "tau").is_err());
    }

    #[test]
    fn test_shift_amount_reduced_mod_d() {
        let identity = UnitaryGate::shift(3, usize::MAX).unwrap();
        // usize::MAX = 2^64 - 1 ≡ 0 (mod 3)
        assert!(identity.matrix().max_abs_diff(&ComplexMatrix::identity(3)) < 1e-12);

        let x = UnitaryGate::shift(4, usize::MAX).unwrap();
        // ≡ 3 (mod 4): |1⟩ → |0⟩
        assert_eq!(x.matrix().get(0, 1), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_oversized_gates_rejected() {
        let max = numerics::MAX_MATRIX_DIM;
        assert!(matches!(
            UnitaryGate::hadamard(1 << 24),
            Err(QuditError::MatrixTooLarge { .. })
        ));
        assert!(matches!(
            UnitaryGate::fourier(max + 1),
            Err(QuditError::MatrixTooLarge { .. })
        ));
        assert!(matches!(
            UnitaryGate::shift(1 << 20, 1),
            Err(QuditError::MatrixTooLarge { .. })
        ));
        assert!(matches!(
            UnitaryGate::controlled_shift(usize::MAX, 2),
            Err(QuditError::MatrixTooLarge { .. })
        ));
        assert!(matches!(
            UnitaryGate::constant_phase(vec![4096, 4096], "phi"),
            Err(QuditError::MatrixTooLarge { .. })
        ));

        let dims = Dimensions::new(vec![1 << 13, 2]).unwrap();
        let err = UnitaryGate::from_spec(&GateSpec::Hadamard { target: 0 }, &dims).unwrap_err();
        assert_eq!(err.kind(), qudit_core::ErrorKind::InvalidCircuit);
    }

    #[test]
    fn test_invalid_gates() {
        assert!(matches!(
            UnitaryGate::hadamard(0),
            Err(QuditError::NonUnitaryGate { .. })
        ));
        assert!(matches!(
            UnitaryGate::phase(3, f64::NAN),
            Err(QuditError::NonUnitaryGate { .. })
        ));
        assert!(matches!(
            UnitaryGate::phase(3, f64::INFINITY),
            Err(QuditError::NonUnitaryGate { .. })
        ));

        let scaled = ComplexMatrix::diagonal(&[Complex64::new(2.0, 0.0); 2]);
        assert!(matches!(
            UnitaryGate::custom("bad", vec![2], scaled),
            Err(QuditError::NonUnitaryGate { .. })
        ));
        assert!(matches!(
            UnitaryGate::custom("wrong", vec![3], ComplexMatrix::identity(2)),
            Err(QuditError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_spec() {
        let dims = Dimensions::new(vec![5, 7]).unwrap();
        let (gate, targets) = UnitaryGate::from_spec(
            &GateSpec::ControlledShift {
                control: 1,
                target: 0,
            },
            &dims,
        )
        .unwrap();
        assert_eq!(gate.dims(), &[7, 5]);
        assert_eq!(targets, vec![1, 0]);

        assert!(UnitaryGate::from_spec(&GateSpec::Hadamard { target: 2 }, &dims).is_err());
    }
}
