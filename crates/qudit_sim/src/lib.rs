//! # Qudit Sim
//!
//! Dense state-vector simulation over arbitrary-dimension subsystems.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qudit_sim // L2: Simulation (완료)
//!     ComplexMatrix // 복소 행렬 (완료)
//!         dagger, matmul, kron
//!         unitarity_deviation() - 행 병렬 검사
//!     GateLibrary // 게이트 라이브러리 (완료)
//!         hadamard, fourier, inverse_fourier, phase
//!         shift, controlled_shift, constant_phase, custom
//!     QuditState // 상태 벡터 (완료)
//!         apply_gate, tensor, partial_trace, normalize
//!     NamedStates // GHZ/Bell/W/cat (완료)
//!         prime_entangled_pair, teleportation_capacity - GF(p) 얽힘쌍
//!     DensityMatrix // 축약 밀도 행렬 (완료)
//!     EntropyAnalyzer // 폰 노이만 엔트로피 (완료)
//!     MeasurementSampler // 시드 샘플링 (완료)
//!     GoodnessOfFit // 카이제곱 검정 (완료)
//!     ExperimentReport // 실험 보고서 (완료)
//!     SimulatorBackend // 백엔드 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qudit_sim::prelude::*;
//!
//! // Maximally entangled (5, 7) pair
//! let state = bell_pair(5, 7).unwrap();
//! let s = EntropyAnalyzer::new().entanglement_entropy(&state, &[0]).unwrap();
//! assert!((s - 5f64.ln()).abs() < 1e-6);
//!
//! // Seeded measurement
//! let histogram = MeasurementSampler::new(&state).histogram(1000, 42).unwrap();
//! assert_eq!(histogram.values().sum::<u64>(), 1000);
//! ```
//!
//! ## Running a Circuit Specification
//!
//! ```rust
//! use qudit_sim::prelude::*;
//!
//! let spec = CircuitBuilder::with_dims(&[5, 7, 11])
//!     .unwrap()
//!     .seed(42)
//!     .ghz_chain()
//!     .build()
//!     .unwrap();
//!
//! let report = SimulatorBackend::new().execute(&spec).unwrap();
//! assert_eq!(report.entropy_of(&[0]), Some(1.609438));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Dense complex matrices (Gantree: L2_Simulation → ComplexMatrix)
pub mod matrix;

/// Gate library (Gantree: L2_Simulation → GateLibrary)
pub mod library;

/// State vector (Gantree: L2_Simulation → QuditState)
pub mod state;

/// Named states (Gantree: L2_Simulation → NamedStates)
pub mod named;

/// Reduced density matrices (Gantree: L2_Simulation → DensityMatrix)
pub mod density;

/// Entropy analyzer (Gantree: L2_Simulation → EntropyAnalyzer)
pub mod entropy;

/// Measurement sampler (Gantree: L2_Simulation → MeasurementSampler)
pub mod measurement;

/// Goodness-of-fit statistics (Gantree: L2_Simulation → GoodnessOfFit)
pub mod stats;

/// Experiment report (Gantree: L2_Simulation → ExperimentReport)
pub mod report;

/// Simulator backend (Gantree: L2_Simulation → SimulatorBackend)
pub mod simulator;

// ============================================================================
// Re-exports
// ============================================================================

pub use density::DensityMatrix;
pub use entropy::EntropyAnalyzer;
pub use library::UnitaryGate;
pub use matrix::ComplexMatrix;
pub use measurement::{MeasurementOutcome, MeasurementSampler};
pub use named::{
    bell_pair, cat_state, ghz, is_prime, prime_entangled_pair, teleportation_capacity,
    uniform_superposition, w_state,
};
pub use report::{ExperimentReport, PartitionEntropy};
pub use simulator::{Backend, SimulatorBackend};
pub use state::QuditState;
pub use stats::{chi_squared, chi_squared_uniform, ChiSquaredResult};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qudit_sim::prelude::*;
    //! ```

    pub use crate::density::DensityMatrix;
    pub use crate::entropy::EntropyAnalyzer;
    pub use crate::library::UnitaryGate;
    pub use crate::matrix::ComplexMatrix;
    pub use crate::measurement::{MeasurementOutcome, MeasurementSampler};
    pub use crate::named::{
        bell_pair, cat_state, ghz, is_prime, prime_entangled_pair, teleportation_capacity,
        uniform_superposition, w_state,
    };
    pub use crate::report::{ExperimentReport, PartitionEntropy};
    pub use crate::simulator::{Backend, SimulatorBackend};
    pub use crate::state::QuditState;
    pub use crate::stats::{chi_squared, chi_squared_uniform, ChiSquaredResult};
    pub use qudit_core::prelude::*;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use num_complex::Complex64;

    #[test]
    fn test_tensor_of_bell_pairs() {
        // (2,3)-pair ⊗ (5,7)-pair: entropies stay local to each pair
        let a = bell_pair(2, 3).unwrap();
        let b = bell_pair(5, 7).unwrap();
        let ab = a.tensor(&b).unwrap();
        assert_eq!(ab.dims().as_slice(), &[2, 3, 5, 7]);

        let analyzer = EntropyAnalyzer::new();
        let s_first = analyzer.entanglement_entropy(&ab, &[0]).unwrap();
        let s_cross = analyzer.entanglement_entropy(&ab, &[0, 2]).unwrap();
        assert!((s_first - 2f64.ln()).abs() < 1e-6);
        assert!((s_cross - (2f64.ln() + 5f64.ln())).abs() < 1e-6);
    }

    #[test]
    fn test_golden_ratio_phase_keeps_entropy() {
        // local phases do not change entanglement
        let spec = CircuitBuilder::with_dims(&[5, 7])
            .unwrap()
            .ghz_chain()
            .phase(0, math::GOLDEN_RATIO)
            .phase(1, std::f64::consts::PI * math::GOLDEN_RATIO)
            .build()
            .unwrap();
        let report = SimulatorBackend::new().execute(&spec).unwrap();
        assert_eq!(report.entropy_of(&[0]), Some(1.609438));
    }

    #[test]
    fn test_constant_phase_circuit() {
        let spec = CircuitBuilder::with_dims(&[3, 4])
            .unwrap()
            .hadamard_layer()
            .constant_phase(&[0, 1], "zeta3")
            .fourier(1)
            .build()
            .unwrap();
        let state = SimulatorBackend::new().evolve(&spec).unwrap();
        let total: f64 = state.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_gate_roundtrip() {
        let dims = Dimensions::new(vec![3]).unwrap();
        let qft = UnitaryGate::fourier(3).unwrap();
        let custom = UnitaryGate::custom("my_qft", vec![3], qft.matrix().clone()).unwrap();

        let mut state = QuditState::basis_state(&dims, &[1]).unwrap();
        state.apply_gate(&custom, &[0]).unwrap();
        state.apply_gate(&custom.dagger(), &[0]).unwrap();
        assert!((state.amplitude(&[1]).unwrap() - Complex64::new(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_report_roundtrip_via_json() {
        let spec = CircuitBuilder::with_dims(&[2, 3])
            .unwrap()
            .seed(3)
            .ghz_chain()
            .build()
            .unwrap();
        let report = SimulatorBackend::new().execute(&spec).unwrap();
        let back = ExperimentReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(back.entropies, report.entropies);
        assert_eq!(back.histogram, report.histogram);
    }

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "qudit_sim");
    }
}
