//! Qudit state vector
//!
//! Gantree: L2_Simulation → QuditState
//!
//! A flat amplitude vector over a composite basis, addressed through the
//! mixed-radix [`IndexCodec`]. Every public mutation ends with a
//! normalization self-check.

use crate::density::DensityMatrix;
use crate::library::UnitaryGate;
use crate::matrix::ComplexMatrix;
use num_complex::Complex64;
use qudit_core::codec::{encode_unchecked, strides_for};
use qudit_core::numerics;
use qudit_core::types::validate_subsystems;
use qudit_core::{
    dense_dim, Dimensions, GateSpec, IndexCodec, QuditError, QuditResult, SubsystemId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized amplitude vector over a dimension tuple
/// Gantree: QuditState // 상태 벡터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuditState {
    /// Index codec (carries the dimension tuple)
    codec: IndexCodec,

    /// ∏dᵢ amplitudes, flat
    /// Gantree: amplitudes: Vec<Complex64> // 진폭
    amplitudes: Vec<Complex64>,
}

impl QuditState {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Zero state |0…0⟩
    /// Gantree: new(dims) -> Self // 생성자
    pub fn new(dims: &Dimensions) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dims.total()];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            codec: IndexCodec::new(dims),
            amplitudes,
        }
    }

    /// Computational basis state |i₁,…,iₙ⟩
    pub fn basis_state(dims: &Dimensions, indices: &[usize]) -> QuditResult<Self> {
        let codec = IndexCodec::new(dims);
        let flat = codec.encode(indices)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dims.total()];
        amplitudes[flat] = Complex64::new(1.0, 0.0);
        Ok(Self { codec, amplitudes })
    }

    /// From amplitudes that are already normalized (within the hard ceiling)
    pub fn from_amplitudes(dims: &Dimensions, amplitudes: Vec<Complex64>) -> QuditResult<Self> {
        if amplitudes.len() != dims.total() {
            return Err(QuditError::AmplitudeLength {
                expected: dims.total(),
                got: amplitudes.len(),
            });
        }
        let mut state = Self {
            codec: IndexCodec::new(dims),
            amplitudes,
        };
        state.self_check()?;
        Ok(state)
    }

    /// From any non-zero finite vector, rescaled to unit norm
    pub fn from_unnormalized(dims: &Dimensions, amplitudes: Vec<Complex64>) -> QuditResult<Self> {
        if amplitudes.len() != dims.total() {
            return Err(QuditError::AmplitudeLength {
                expected: dims.total(),
                got: amplitudes.len(),
            });
        }
        let norm = amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(QuditError::NormalizationDrift {
                drift: 1.0,
                ceiling: numerics::NORM_HARD_CEILING,
            });
        }
        let amplitudes = amplitudes.into_iter().map(|a| a / norm).collect();
        Self::from_amplitudes(dims, amplitudes)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Dimension tuple
    pub fn dims(&self) -> &Dimensions {
        self.codec.dims()
    }

    /// Index codec
    pub fn codec(&self) -> &IndexCodec {
        &self.codec
    }

    /// Flat amplitudes
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Composite size ∏dᵢ
    pub fn size(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude of a basis state
    pub fn amplitude(&self, indices: &[usize]) -> QuditResult<Complex64> {
        Ok(self.amplitudes[self.codec.encode(indices)?])
    }

    /// |amplitude|² for every flat index
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Σ|a|²
    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// ⟨self|other⟩
    pub fn inner_product(&self, other: &Self) -> QuditResult<Complex64> {
        if self.dims() != other.dims() {
            return Err(QuditError::DimensionMismatch {
                gate: "inner_product".to_string(),
                expected: self.dims().as_slice().to_vec(),
                found: other.dims().as_slice().to_vec(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// |⟨self|other⟩|²
    pub fn fidelity(&self, other: &Self) -> QuditResult<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    // ========================================================================
    // Evolution
    // ========================================================================

    /// Apply a gate to the listed subsystems
    /// Gantree: apply_gate(&mut, gate, targets) -> Result // 게이트 적용
    ///
    /// The gate matrix acts on every slice obtained by fixing all
    /// non-target subsystems. Targets are in gate order: the first target
    /// is the gate's most significant local subsystem.
    pub fn apply_gate(&mut self, gate: &UnitaryGate, targets: &[SubsystemId]) -> QuditResult<()> {
        validate_subsystems(targets, self.dims().len())?;

        let local = self.dims().select(targets)?;
        if local.as_slice() != gate.dims() {
            return Err(QuditError::DimensionMismatch {
                gate: gate.name().to_string(),
                expected: gate.dims().to_vec(),
                found: local,
            });
        }

        let strides = self.codec.strides().to_vec();
        let target_offsets = offsets(&local, targets, &strides);

        let rest = self.dims().complement(targets);
        let rest_dims = self.dims().select(&rest)?;
        let base_offsets = if rest.is_empty() {
            vec![0]
        } else {
            offsets(&rest_dims, &rest, &strides)
        };

        let size = gate.size();
        let mut input = vec![Complex64::new(0.0, 0.0); size];
        let mut output = vec![Complex64::new(0.0, 0.0); size];
        for base in base_offsets {
            for (slot, &off) in input.iter_mut().zip(&target_offsets) {
                *slot = self.amplitudes[base + off];
            }
            gate.matrix().apply_to(&input, &mut output);
            for (&value, &off) in output.iter().zip(&target_offsets) {
                self.amplitudes[base + off] = value;
            }
        }

        log::debug!("applied {} to {:?}", gate, targets);
        self.self_check()
    }

    /// Resolve and apply a circuit step
    pub fn apply_step(&mut self, step: &GateSpec) -> QuditResult<()> {
        let (gate, targets) = UnitaryGate::from_spec(step, self.dims())?;
        self.apply_gate(&gate, &targets)
    }

    /// Tensor product over the concatenated dimension tuple
    /// Gantree: tensor(&self, other) -> Result<Self> // 텐서 곱
    pub fn tensor(&self, other: &Self) -> QuditResult<Self> {
        let dims = self.dims().concat(other.dims())?;
        let mut amplitudes = Vec::with_capacity(dims.total());
        for a in &self.amplitudes {
            for b in &other.amplitudes {
                amplitudes.push(a * b);
            }
        }
        Self::from_amplitudes(&dims, amplitudes)
    }

    /// Reduced density matrix over `keep` (in the given order)
    /// Gantree: partial_trace(&self, keep) -> Result<DensityMatrix> // 부분 대각합
    ///
    /// Reshapes ψ into a (kept × traced) matrix Ψ and returns ρ = Ψ·Ψ†.
    pub fn partial_trace(&self, keep: &[SubsystemId]) -> QuditResult<DensityMatrix> {
        if keep.is_empty() {
            return Err(QuditError::InvalidParameter(
                "partial trace must keep at least one subsystem".to_string(),
            ));
        }
        let kept_dims = self.dims().select(keep)?;
        let traced = self.dims().complement(keep);
        let traced_dims = self.dims().select(&traced)?;

        let kept_size = dense_dim(&kept_dims)?;
        let traced_size: usize = traced_dims.iter().product();

        let mut psi = vec![Complex64::new(0.0, 0.0); kept_size * traced_size];
        let mut kept_digits = vec![0; keep.len()];
        let mut traced_digits = vec![0; traced.len()];
        for (flat, &amp) in self.amplitudes.iter().enumerate() {
            for (digit, &s) in kept_digits.iter_mut().zip(keep) {
                *digit = self.codec.digit(flat, s);
            }
            for (digit, &s) in traced_digits.iter_mut().zip(&traced) {
                *digit = self.codec.digit(flat, s);
            }
            let row = encode_unchecked(&kept_digits, &kept_dims);
            let col = encode_unchecked(&traced_digits, &traced_dims);
            psi[row * traced_size + col] = amp;
        }

        let mut rho = ComplexMatrix::zeros(kept_size);
        for a in 0..kept_size {
            let row_a = &psi[a * traced_size..(a + 1) * traced_size];
            for b in a..kept_size {
                let row_b = &psi[b * traced_size..(b + 1) * traced_size];
                let value: Complex64 = row_a.iter().zip(row_b).map(|(x, y)| x * y.conj()).sum();
                rho.set(a, b, value);
                rho.set(b, a, value.conj());
            }
        }

        DensityMatrix::new(kept_dims, rho)
    }

    /// Replace the state by a computational basis vector
    ///
    /// Destructive. Used by [`crate::MeasurementSampler::measure_and_collapse`].
    pub fn collapse_to(&mut self, flat: usize) -> QuditResult<()> {
        if flat >= self.size() {
            return Err(QuditError::FlatIndexOutOfRange {
                index: flat,
                size: self.size(),
            });
        }
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[flat] = Complex64::new(1.0, 0.0);
        Ok(())
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    /// Rescale to unit norm
    /// Gantree: normalize(&mut) -> Result // 정규화
    ///
    /// Fails if the drift |‖ψ‖² − 1| exceeds the hard ceiling.
    pub fn normalize(&mut self) -> QuditResult<()> {
        let norm_sq = self.norm_squared();
        let drift = numerics::norm_drift(norm_sq);
        if !(drift <= numerics::NORM_HARD_CEILING) {
            return Err(QuditError::NormalizationDrift {
                drift,
                ceiling: numerics::NORM_HARD_CEILING,
            });
        }
        let norm = norm_sq.sqrt();
        for a in &mut self.amplitudes {
            *a /= norm;
        }
        Ok(())
    }

    /// Post-mutation check: accept, renormalize or fail
    fn self_check(&mut self) -> QuditResult<()> {
        let drift = numerics::norm_drift(self.norm_squared());
        if drift <= numerics::NORM_TOLERANCE {
            return Ok(());
        }
        if drift <= numerics::NORM_HARD_CEILING {
            log::warn!("renormalizing state {} (drift {:e})", self.dims(), drift);
            return self.normalize();
        }
        Err(QuditError::NormalizationDrift {
            drift,
            ceiling: numerics::NORM_HARD_CEILING,
        })
    }
}

impl fmt::Display for QuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuditState{} [", self.dims())?;
        let mut first = true;
        for (flat, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() < numerics::EIGENVALUE_CUTOFF {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            let digits = self.codec.decode(flat).map_err(|_| fmt::Error)?;
            write!(
                f,
                "({:.4}{:+.4}i)|{}⟩",
                amp.re,
                amp.im,
                qudit_core::outcome_label(&digits)
            )?;
        }
        write!(f, "]")
    }
}

/// Flat offsets of every local configuration of `subsystems`
/// (local index order: mixed radix over `local_dims`, first subsystem most significant)
fn offsets(local_dims: &[usize], subsystems: &[SubsystemId], strides: &[usize]) -> Vec<usize> {
    let size: usize = local_dims.iter().product();
    let local_strides = strides_for(local_dims);
    (0..size)
        .map(|local| {
            subsystems
                .iter()
                .zip(local_dims)
                .zip(&local_strides)
                .map(|((&s, &d), &ls)| ((local / ls) % d) * strides[s])
                .sum()
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
