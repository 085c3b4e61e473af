//! Circuit specification
//!
//! Gantree: L1_Circuit → CircuitSpec
//!
//! The unit of work consumed by the engine: a dimension tuple, an ordered
//! list of gate steps and the seed that drives measurement sampling.
//! Two executions of the same specification must produce the same report.

use crate::constants::{consistency, math};
use crate::error::{QuditError, QuditResult};
use crate::gate::GateSpec;
use crate::types::{dense_dim, Dimensions, Seed, SubsystemId};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_shots() -> u64 {
    consistency::DEFAULT_SHOTS
}

/// Circuit specification
/// Gantree: CircuitSpec // 회로 명세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitSpec {
    /// Optional circuit name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Per-subsystem dimensions
    /// Gantree: dimensions: Dimensions // 차원 튜플
    dimensions: Dimensions,

    /// Ordered gate steps
    /// Gantree: steps: Vec<GateSpec> // 게이트 목록
    #[serde(default)]
    steps: Vec<GateSpec>,

    /// Sampling seed
    /// Gantree: seed: u64 // 시드
    seed: Seed,

    /// Number of measurement shots for the histogram
    #[serde(default = "default_shots")]
    shots: u64,

    /// Subsystem subsets whose reduced entropy is reported
    /// (empty: every single subsystem)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    partitions: Vec<Vec<SubsystemId>>,
}

impl CircuitSpec {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty specification
    /// Gantree: new(dims, seed) -> Self // 생성자
    pub fn new(dimensions: Dimensions, seed: Seed) -> Self {
        Self {
            name: None,
            dimensions,
            steps: Vec::new(),
            seed,
            shots: consistency::DEFAULT_SHOTS,
            partitions: Vec::new(),
        }
    }

    /// Create from steps, validating every step
    pub fn from_steps(dimensions: Dimensions, steps: Vec<GateSpec>, seed: Seed) -> QuditResult<Self> {
        let mut spec = Self::new(dimensions, seed);
        spec.add_steps(steps)?;
        Ok(spec)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Append a step
    /// Gantree: add_step(&mut, GateSpec) -> Result // 단계 추가
    pub fn add_step(&mut self, step: GateSpec) -> QuditResult<()> {
        self.validate_step(&step)?;
        self.steps.push(step);
        Ok(())
    }

    /// Append several steps
    pub fn add_steps(&mut self, steps: impl IntoIterator<Item = GateSpec>) -> QuditResult<()> {
        for step in steps {
            self.add_step(step)?;
        }
        Ok(())
    }

    /// Request the reduced entropy of a subsystem subset
    pub fn add_partition(&mut self, subsystems: Vec<SubsystemId>) -> QuditResult<()> {
        self.validate_partition(&subsystems)?;
        self.partitions.push(subsystems);
        Ok(())
    }

    /// Set circuit name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Set number of shots
    pub fn set_shots(&mut self, shots: u64) {
        self.shots = shots;
    }

    /// Copy of this specification with a different seed
    pub fn with_seed(&self, seed: Seed) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Dimension tuple
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Gate steps
    pub fn steps(&self) -> &[GateSpec] {
        &self.steps
    }

    /// Sampling seed
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Measurement shots
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if there are no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Entropy partitions, defaulting to every single subsystem
    pub fn partitions(&self) -> Vec<Vec<SubsystemId>> {
        if self.partitions.is_empty() {
            (0..self.dimensions.len()).map(|s| vec![s]).collect()
        } else {
            self.partitions.clone()
        }
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Deterministic identifier of the gate sequence
    /// Gantree: sequence_id(&self) -> String // 시퀀스 식별자
    pub fn sequence_id(&self) -> String {
        if self.steps.is_empty() {
            return "identity".to_string();
        }
        self.steps
            .iter()
            .map(|s| s.identifier())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Number of entangling steps
    pub fn count_entangling(&self) -> usize {
        self.steps.iter().filter(|s| s.is_entangling()).count()
    }

    /// Circuit depth (longest chain of steps sharing a subsystem)
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.dimensions.len()];
        for step in &self.steps {
            let targets = step.targets();
            let layer = targets.iter().map(|&t| depths[t]).max().unwrap_or(0) + 1;
            for t in targets {
                depths[t] = layer;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate all steps and partitions against the dimension tuple
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> QuditResult<()> {
        for step in &self.steps {
            self.validate_step(step)?;
        }
        for partition in &self.partitions() {
            self.validate_partition(partition)?;
        }
        Ok(())
    }

    fn validate_step(&self, step: &GateSpec) -> QuditResult<()> {
        let targets = step.targets();
        if targets.is_empty() {
            return Err(QuditError::InvalidParameter(format!(
                "step '{}' has no targets",
                step.name()
            )));
        }
        dense_dim(&self.dimensions.select(&targets)?)?;

        if let GateSpec::ConstantPhase { constant, .. } = step {
            if math::named_constant(constant).is_none() {
                return Err(QuditError::UnknownConstant(constant.clone()));
            }
        }
        Ok(())
    }

    fn validate_partition(&self, subsystems: &[SubsystemId]) -> QuditResult<()> {
        if subsystems.is_empty() {
            return Err(QuditError::InvalidParameter(
                "entropy partition must not be empty".to_string(),
            ));
        }
        dense_dim(&self.dimensions.select(subsystems)?)?;
        Ok(())
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize to JSON
    pub fn to_json(&self) -> QuditResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> QuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate from JSON
    pub fn from_json(json: &str) -> QuditResult<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl fmt::Display for CircuitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "// circuit {} dims={} seed={} shots={}",
            self.name.as_deref().unwrap_or("unnamed"),
            self.dimensions,
            self.seed,
            self.shots
        )?;
        for step in &self.steps {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
