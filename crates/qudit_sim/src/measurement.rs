//! Measurement sampler
//!
//! Gantree: L2_Simulation → MeasurementSampler
//!
//! Seeded sampling from |amplitude|² by binary search over the cumulative
//! distribution. Every call takes its own seed and uses the portable
//! ChaCha8 generator, so a seed yields the same outcomes on every host.

use crate::state::QuditState;
use qudit_core::{outcome_label, Histogram, IndexCodec, QuditResult, Seed};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One sampled basis outcome
/// Gantree: MeasurementOutcome // 측정 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// Per-subsystem basis indices
    pub indices: Vec<usize>,

    /// Flattened index
    pub flat_index: usize,

    /// Probability of this outcome in the sampled state
    pub probability: f64,
}

impl MeasurementOutcome {
    /// Histogram label, e.g. `"0,3,2"`
    pub fn label(&self) -> String {
        outcome_label(&self.indices)
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}⟩ (p={:.6})", self.label(), self.probability)
    }
}

/// Sampler over a fixed probability distribution
/// Gantree: MeasurementSampler // 측정 샘플러
///
/// Holds a snapshot of the state's distribution; the state itself is never
/// touched unless [`MeasurementSampler::measure_and_collapse`] is called.
#[derive(Debug, Clone)]
pub struct MeasurementSampler {
    codec: IndexCodec,
    probabilities: Vec<f64>,
    cdf: Vec<f64>,
}

impl MeasurementSampler {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Snapshot the distribution of a state
    /// Gantree: new(state) -> Self // 생성자
    pub fn new(state: &QuditState) -> Self {
        let probabilities = state.probabilities();
        let mut acc = 0.0;
        let cdf = probabilities
            .iter()
            .map(|p| {
                acc += p;
                acc
            })
            .collect();
        Self {
            codec: state.codec().clone(),
            probabilities,
            cdf,
        }
    }

    /// Outcome probabilities, by flat index
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    /// Draw a single outcome
    /// Gantree: sample(&self, seed) -> Result<MeasurementOutcome> // 단일 샘플
    pub fn sample(&self, seed: Seed) -> QuditResult<MeasurementOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.draw(&mut rng)
    }

    /// Draw `n` outcomes from one seeded stream
    pub fn sample_n(&self, n: usize, seed: Seed) -> QuditResult<Vec<MeasurementOutcome>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n).map(|_| self.draw(&mut rng)).collect()
    }

    /// Counts over `shots` draws, keyed by outcome label
    /// Gantree: histogram(&self, shots, seed) -> Result<Histogram> // 히스토그램
    pub fn histogram(&self, shots: u64, seed: Seed) -> QuditResult<Histogram> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts: Histogram = Histogram::new();
        for _ in 0..shots {
            let outcome = self.draw(&mut rng)?;
            *counts.entry(outcome.label()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Counts over `shots` draws, indexed by flat index
    pub fn counts(&self, shots: u64, seed: Seed) -> Vec<u64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts = vec![0u64; self.probabilities.len()];
        for _ in 0..shots {
            counts[self.draw_index(&mut rng)] += 1;
        }
        counts
    }

    /// Sample one outcome and replace the state by that basis vector
    ///
    /// Destructive and irreversible.
    pub fn measure_and_collapse(
        state: &mut QuditState,
        seed: Seed,
    ) -> QuditResult<MeasurementOutcome> {
        let outcome = Self::new(state).sample(seed)?;
        state.collapse_to(outcome.flat_index)?;
        log::debug!("collapsed state {} to {}", state.dims(), outcome);
        Ok(outcome)
    }

    fn draw(&self, rng: &mut ChaCha8Rng) -> QuditResult<MeasurementOutcome> {
        let flat_index = self.draw_index(rng);
        Ok(MeasurementOutcome {
            indices: self.codec.decode(flat_index)?,
            flat_index,
            probability: self.probabilities[flat_index],
        })
    }

    /// First index whose cumulative probability exceeds r·total
    fn draw_index(&self, rng: &mut ChaCha8Rng) -> usize {
        let total = self.cdf.last().copied().unwrap_or(1.0);
        let r = rng.gen::<f64>() * total;
        let idx = self.cdf.partition_point(|&c| c <= r);
        idx.min(self.cdf.len() - 1)
    }
}

// ============================================================================
// Tests
// ============================================================================
