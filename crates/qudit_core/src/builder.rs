//! Circuit builder
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for [`CircuitSpec`]. Step validation errors are held back
//! and returned by [`CircuitBuilder::build`], so a chain of calls stays
//! readable without silently dropping a bad step.

use crate::circuit::CircuitSpec;
use crate::error::{QuditError, QuditResult};
use crate::gate::GateSpec;
use crate::types::{Angle, Dimensions, Seed, SubsystemId};

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
pub struct CircuitBuilder {
    /// Specification being built
    spec: CircuitSpec,

    /// First validation error, reported on build
    error: Option<QuditError>,
}

impl CircuitBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a builder for the given dimensions (seed 0)
    /// Gantree: new(dims) -> Self // 생성자
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            spec: CircuitSpec::new(dimensions, 0),
            error: None,
        }
    }

    /// Create from a raw dimension list
    pub fn with_dims(dims: &[usize]) -> QuditResult<Self> {
        Ok(Self::new(Dimensions::new(dims.to_vec())?))
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Set circuit name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.spec.set_name(name);
        self
    }

    /// Set sampling seed
    pub fn seed(mut self, seed: Seed) -> Self {
        self.spec = self.spec.with_seed(seed);
        self
    }

    /// Set measurement shots
    pub fn shots(mut self, shots: u64) -> Self {
        self.spec.set_shots(shots);
        self
    }

    /// Request the reduced entropy of a subsystem subset
    pub fn partition(mut self, subsystems: &[SubsystemId]) -> Self {
        let result = self.spec.add_partition(subsystems.to_vec());
        self.record(result);
        self
    }

    // ========================================================================
    // Single-Subsystem Gates
    // ========================================================================

    /// Add generalized Hadamard
    /// Gantree: hadamard(self, q) -> Self // H 추가
    pub fn hadamard(self, target: SubsystemId) -> Self {
        self.step(GateSpec::Hadamard { target })
    }

    /// Add Fourier transform
    pub fn fourier(self, target: SubsystemId) -> Self {
        self.step(GateSpec::Fourier { target })
    }

    /// Add inverse Fourier transform
    pub fn inverse_fourier(self, target: SubsystemId) -> Self {
        self.step(GateSpec::InverseFourier { target })
    }

    /// Add phase rotation
    /// Gantree: phase(self, q, θ) -> Self // 위상 추가
    pub fn phase(self, target: SubsystemId, theta: Angle) -> Self {
        self.step(GateSpec::Phase { target, theta })
    }

    /// Add cyclic shift
    pub fn shift(self, target: SubsystemId, amount: usize) -> Self {
        self.step(GateSpec::Shift { target, amount })
    }

    // ========================================================================
    // Multi-Subsystem Gates
    // ========================================================================

    /// Add controlled shift
    /// Gantree: cshift(self, c, t) -> Self // 제어-시프트 추가
    pub fn cshift(self, control: SubsystemId, target: SubsystemId) -> Self {
        self.step(GateSpec::ControlledShift { control, target })
    }

    /// Add constant-driven joint phase
    pub fn constant_phase(self, targets: &[SubsystemId], constant: &str) -> Self {
        self.step(GateSpec::ConstantPhase {
            targets: targets.to_vec(),
            constant: constant.to_string(),
        })
    }

    // ========================================================================
    // Layers and Templates
    // ========================================================================

    /// Hadamard on every subsystem
    pub fn hadamard_layer(mut self) -> Self {
        for target in 0..self.spec.dimensions().len() {
            self = self.hadamard(target);
        }
        self
    }

    /// GHZ preparation: Hadamard on the smallest subsystem, then a chain of
    /// controlled shifts through the remaining subsystems
    ///
    /// Rooting at the smallest dimension keeps every control value below
    /// the next target dimension, giving Σ_{k<min d}|k,…,k⟩/√(min d).
    pub fn ghz_chain(mut self) -> Self {
        let dims = self.spec.dimensions().clone();
        let root = dims.argmin();
        let order: Vec<SubsystemId> = std::iter::once(root)
            .chain((0..dims.len()).filter(|&s| s != root))
            .collect();

        self = self.hadamard(root);
        for pair in order.windows(2) {
            self = self.cshift(pair[0], pair[1]);
        }
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finish, returning the first recorded validation error if any
    pub fn build(self) -> QuditResult<CircuitSpec> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.spec),
        }
    }

    /// Peek at the specification under construction
    pub fn spec(&self) -> &CircuitSpec {
        &self.spec
    }

    fn step(mut self, step: GateSpec) -> Self {
        let result = self.spec.add_step(step);
        self.record(result);
        self
    }

    fn record(&mut self, result: QuditResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
