//! Entropy analyzer
//!
//! Gantree: L2_Simulation → EntropyAnalyzer
//!
//! von Neumann entropy S = −Tr(ρ ln ρ) from a Hermitian eigendecomposition.
//! Eigenvalues below the cutoff count as zero, so near-singular density
//! matrices (pure states, Schmidt rank below the kept dimension) give
//! stable results.

use crate::density::DensityMatrix;
use crate::state::QuditState;
use qudit_core::numerics;
use qudit_core::{Dimensions, QuditResult, SubsystemId};
use serde::{Deserialize, Serialize};

/// Entropy analyzer
/// Gantree: EntropyAnalyzer // 엔트로피 분석
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyAnalyzer {
    /// Eigenvalues below this are treated as zero
    /// Gantree: cutoff: f64 // 고유값 컷오프
    cutoff: f64,
}

impl Default for EntropyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropyAnalyzer {
    /// Analyzer with the default eigenvalue cutoff
    pub fn new() -> Self {
        Self {
            cutoff: numerics::EIGENVALUE_CUTOFF,
        }
    }

    /// Set eigenvalue cutoff
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Eigenvalue cutoff
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// S(ρ) = −Σ λ ln λ over eigenvalues above the cutoff
    /// Gantree: von_neumann(&self, rho) -> Result<f64> // 폰 노이만
    pub fn von_neumann(&self, rho: &DensityMatrix) -> QuditResult<f64> {
        rho.validate()?;
        let entropy: f64 = rho
            .eigenvalues()
            .into_iter()
            .filter(|&lambda| lambda > self.cutoff)
            .map(|lambda| {
                let lambda = lambda.min(1.0);
                -lambda * lambda.ln()
            })
            .sum();
        Ok(entropy.max(0.0))
    }

    /// Entropy of the reduced state over `keep`
    /// Gantree: entanglement_entropy(&self, state, keep) -> Result<f64> // 얽힘 엔트로피
    pub fn entanglement_entropy(
        &self,
        state: &QuditState,
        keep: &[SubsystemId],
    ) -> QuditResult<f64> {
        let rho = state.partial_trace(keep)?;
        self.von_neumann(&rho)
    }

    /// Shannon entropy of the computational-basis distribution
    pub fn shannon_entropy(&self, state: &QuditState) -> f64 {
        self.shannon_of(&state.probabilities())
    }

    /// Shannon entropy −Σ p ln p of a probability vector
    pub fn shannon_of(&self, probabilities: &[f64]) -> f64 {
        probabilities
            .iter()
            .filter(|&&p| p > self.cutoff)
            .map(|&p| -p * p.ln())
            .sum::<f64>()
            .max(0.0)
    }

    /// Purity Tr(ρ²) of the reduced state over `keep`
    pub fn purity(&self, state: &QuditState, keep: &[SubsystemId]) -> QuditResult<f64> {
        Ok(state.partial_trace(keep)?.purity())
    }

    /// ln(∏dᵢ), the largest entropy a state over `dims` can reach
    pub fn max_entropy(dims: &Dimensions) -> f64 {
        (dims.total() as f64).ln()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named::{bell_pair, ghz, uniform_superposition};
    use qudit_core::consistency::round_to;
    use qudit_core::GateSpec;

    #[test]
    fn test_maximally_entangled_pairs() {
        let analyzer = EntropyAnalyzer::new();
        for (d1, d2, expected) in [(2, 3, 0.693147), (5, 7, 1.609438), (7, 11, 1.945910)] {
            let state = bell_pair(d1, d2).unwrap();
            let s = analyzer.entanglement_entropy(&state, &[0]).unwrap();
            assert!((s - (d1.min(d2) as f64).ln()).abs() < 1e-6);
            assert!((round_to(s, 6) - expected).abs() < 1e-12);

            let s_other = analyzer.entanglement_entropy(&state, &[1]).unwrap();
            assert!((s - s_other).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ghz_5_7_11() {
        let analyzer = EntropyAnalyzer::new();
        let state = ghz(&Dimensions::new(vec![5, 7, 11]).unwrap()).unwrap();
        for keep in [vec![0], vec![1], vec![2], vec![0, 1]] {
            let s = analyzer.entanglement_entropy(&state, &keep).unwrap();
            assert!((round_to(s, 6) - 1.609438).abs() < 1e-12);
        }
    }

    #[test]
    fn test_product_state_zero_entropy() {
        let analyzer = EntropyAnalyzer::new();
        let state = uniform_superposition(&Dimensions::new(vec![3, 4]).unwrap()).unwrap();
        let s = analyzer.entanglement_entropy(&state, &[0]).unwrap();
        assert!(s.abs() < 1e-9);
        assert!((analyzer.purity(&state, &[1]).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_whole_system_is_pure() {
        let analyzer = EntropyAnalyzer::new();
        let state = bell_pair(3, 3).unwrap();
        let s = analyzer.entanglement_entropy(&state, &[0, 1]).unwrap();
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn test_shannon_entropy() {
        let analyzer = EntropyAnalyzer::new();
        let dims = Dimensions::new(vec![3, 5]).unwrap();
        let state = uniform_superposition(&dims).unwrap();
        let h = analyzer.shannon_entropy(&state);
        assert!((h - EntropyAnalyzer::max_entropy(&dims)).abs() < 1e-9);

        let mut zero = QuditState::new(&dims);
        assert!(analyzer.shannon_entropy(&zero).abs() < 1e-12);
        zero.apply_step(&GateSpec::Shift {
            target: 0,
            amount: 2,
        })
        .unwrap();
        assert!(analyzer.shannon_entropy(&zero).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_bounded_by_min_dimension() {
        let analyzer = EntropyAnalyzer::new();
        let state = bell_pair(4, 9).unwrap();
        let s = analyzer.entanglement_entropy(&state, &[1]).unwrap();
        assert!(s <= (4f64).ln() + 1e-9);
    }
}
