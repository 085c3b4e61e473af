//! Experiment report
//!
//! Gantree: L2_Simulation → ExperimentReport
//!
//! The only artifact that leaves a run. Comparable fields (dimensions,
//! sequence id, seed, shots, entropies, histogram) are deterministic for a
//! given circuit specification; timing, context label, engine version and
//! timestamp are informational.

use chrono::{DateTime, Utc};
use qudit_core::consistency::round_to;
use qudit_core::{Dimensions, Histogram, QuditResult, Seed, SubsystemId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Reduced entropy of one subsystem partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionEntropy {
    /// Kept subsystems
    pub subsystems: Vec<SubsystemId>,

    /// von Neumann entropy (nats), rounded to the report precision
    pub value: f64,
}

/// Result of one circuit execution
/// Gantree: ExperimentReport // 실험 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Execution context that produced the report
    pub context: String,

    /// Circuit name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Dimension tuple
    pub dimensions: Dimensions,

    /// Gate sequence identifier
    pub sequence_id: String,

    /// Sampling seed
    pub seed: Seed,

    /// Measurement shots
    pub shots: u64,

    /// Reduced entropies, one per partition
    pub entropies: Vec<PartitionEntropy>,

    /// Computational-basis Shannon entropy of the final state
    pub shannon_entropy: f64,

    /// Measurement histogram
    pub histogram: Histogram,

    /// Decimal places of the entropy values
    pub precision: u32,

    /// Wall-clock time of the run
    pub wall_time_ms: f64,

    /// Engine version
    pub engine_version: String,

    /// Creation time (UTC)
    pub created_at: DateTime<Utc>,
}

impl ExperimentReport {
    /// Round an entropy value to the report precision
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.precision)
    }

    /// Entropy for a partition, if reported
    pub fn entropy_of(&self, subsystems: &[SubsystemId]) -> Option<f64> {
        self.entropies
            .iter()
            .find(|e| e.subsystems == subsystems)
            .map(|e| e.value)
    }

    /// Total histogram count
    pub fn total_counts(&self) -> u64 {
        self.histogram.values().sum()
    }

    /// Relative frequency of an outcome label
    pub fn frequency(&self, label: &str) -> f64 {
        let total = self.total_counts();
        if total == 0 {
            return 0.0;
        }
        self.histogram.get(label).copied().unwrap_or(0) as f64 / total as f64
    }

    /// Most frequent outcome
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.histogram
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(label, &count)| (label, count))
    }

    /// Flat key → value view of the report
    /// Gantree: to_flat_map(&self) -> BTreeMap // 평탄화
    ///
    /// Entropies appear as `entropy[0,1]`, histogram counts as
    /// `histogram[0,3,2]`.
    pub fn to_flat_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("context".to_string(), Value::from(self.context.clone()));
        if let Some(name) = &self.name {
            map.insert("name".to_string(), Value::from(name.clone()));
        }
        map.insert(
            "dimensions".to_string(),
            Value::from(self.dimensions.as_slice().to_vec()),
        );
        map.insert("sequence_id".to_string(), Value::from(self.sequence_id.clone()));
        map.insert("seed".to_string(), Value::from(self.seed));
        map.insert("shots".to_string(), Value::from(self.shots));
        map.insert("precision".to_string(), Value::from(self.precision));
        map.insert("shannon_entropy".to_string(), Value::from(self.shannon_entropy));
        map.insert("wall_time_ms".to_string(), Value::from(self.wall_time_ms));
        map.insert(
            "engine_version".to_string(),
            Value::from(self.engine_version.clone()),
        );
        map.insert(
            "created_at".to_string(),
            Value::from(self.created_at.to_rfc3339()),
        );
        for entropy in &self.entropies {
            map.insert(
                format!("entropy[{}]", qudit_core::outcome_label(&entropy.subsystems)),
                Value::from(entropy.value),
            );
        }
        for (label, &count) in &self.histogram {
            map.insert(format!("histogram[{}]", label), Value::from(count));
        }
        map
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QuditResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> QuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> QuditResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExperimentReport[{}] dims={} seed={} shots={} S=[",
            self.context, self.dimensions, self.seed, self.shots
        )?;
        for (i, e) in self.entropies.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{{{}}}:{:.*}",
                qudit_core::outcome_label(&e.subsystems),
                self.precision as usize,
                e.value
            )?;
        }
        write!(f, "] unique={} time={:.2}ms", self.histogram.len(), self.wall_time_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================
