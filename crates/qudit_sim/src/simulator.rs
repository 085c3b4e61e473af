//! Simulator backend
//!
//! Gantree: L2_Simulation → SimulatorBackend
//!
//! Circuit specification in, [`ExperimentReport`] out: evolve the state,
//! compute the requested reduced entropies and sample the histogram.

use crate::entropy::EntropyAnalyzer;
use crate::measurement::MeasurementSampler;
use crate::report::{ExperimentReport, PartitionEntropy};
use crate::state::QuditState;
use chrono::Utc;
use qudit_core::consistency::{self, round_to};
use qudit_core::{CircuitSpec, QuditResult};
use std::time::Instant;

/// Execution backend
/// Gantree: BackendTrait // 백엔드 인터페이스
pub trait Backend: Send + Sync {
    /// Backend (execution context) name
    fn name(&self) -> &str;

    /// Execute a circuit specification
    /// Gantree: execute(spec) -> Result<ExperimentReport>
    fn execute(&self, spec: &CircuitSpec) -> QuditResult<ExperimentReport>;

    /// Execute several specifications
    fn execute_batch(&self, specs: &[CircuitSpec]) -> QuditResult<Vec<ExperimentReport>> {
        specs.iter().map(|s| self.execute(s)).collect()
    }
}

/// In-process state-vector simulator
/// Gantree: SimulatorBackend // 시뮬레이터 구현
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    /// Backend name, copied into reports as the context label
    name: String,

    /// Decimal places for reported entropies
    precision: u32,

    /// Entropy analyzer
    analyzer: EntropyAnalyzer,
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a backend with default precision
    pub fn new() -> Self {
        Self {
            name: "qudit_simulator".to_string(),
            precision: consistency::ENTROPY_DECIMALS,
            analyzer: EntropyAnalyzer::new(),
        }
    }

    /// Set backend name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set report precision (decimal places)
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Set entropy analyzer
    pub fn with_analyzer(mut self, analyzer: EntropyAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Evolve the zero state through every step
    /// Gantree: evolve(spec) -> Result<QuditState> // 상태 진화
    pub fn evolve(&self, spec: &CircuitSpec) -> QuditResult<QuditState> {
        spec.validate()?;
        let mut state = QuditState::new(spec.dimensions());
        for step in spec.steps() {
            state.apply_step(step)?;
        }
        Ok(state)
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, spec: &CircuitSpec) -> QuditResult<ExperimentReport> {
        let start = Instant::now();
        log::debug!(
            "[{}] executing {} steps over {} (seed={})",
            self.name,
            spec.len(),
            spec.dimensions(),
            spec.seed()
        );

        let state = self.evolve(spec)?;

        let entropies = spec
            .partitions()
            .into_iter()
            .map(|subsystems| {
                let value = self.analyzer.entanglement_entropy(&state, &subsystems)?;
                Ok(PartitionEntropy {
                    subsystems,
                    value: round_to(value, self.precision),
                })
            })
            .collect::<QuditResult<Vec<_>>>()?;
        let shannon_entropy = round_to(self.analyzer.shannon_entropy(&state), self.precision);

        let histogram = MeasurementSampler::new(&state).histogram(spec.shots(), spec.seed())?;

        let report = ExperimentReport {
            context: self.name.clone(),
            name: spec.name().map(str::to_string),
            dimensions: spec.dimensions().clone(),
            sequence_id: spec.sequence_id(),
            seed: spec.seed(),
            shots: spec.shots(),
            entropies,
            shannon_entropy,
            histogram,
            precision: self.precision,
            wall_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            engine_version: crate::VERSION.to_string(),
            created_at: Utc::now(),
        };
        log::debug!("[{}] {}", self.name, report);
        Ok(report)
    }
}

// ============================================================================
// Tests
// ============================================================================
