//! Runner configuration
//!
//! Gantree: L3_Consistency → RunnerConfig
//!
//! Explicit configuration value for the consistency runner. Loaded from
//! JSON or built in code; there is no process-wide state.

use crate::context::ExecutionContext;
use qudit_core::consistency;
use qudit_core::{QuditError, QuditResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Consistency runner configuration
/// Gantree: RunnerConfig // 러너 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum accepted absolute difference between runs
    /// Gantree: tolerance: f64 // 허용오차
    pub tolerance: f64,

    /// Per-run deadline in milliseconds
    /// Gantree: timeout_ms: u64 // 타임아웃
    pub timeout_ms: u64,

    /// Execution contexts, one run each
    pub contexts: Vec<ExecutionContext>,

    /// Compare histogram relative frequencies as well as entropies
    #[serde(default = "default_true")]
    pub compare_histograms: bool,

    /// Decimal places of reported entropies
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_true() -> bool {
    true
}

fn default_precision() -> u32 {
    consistency::ENTROPY_DECIMALS
}

impl RunnerConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// `n` in-process contexts labelled `local-0`, `local-1`, …
    pub fn in_process(n: usize) -> Self {
        Self {
            tolerance: consistency::DEFAULT_TOLERANCE,
            timeout_ms: consistency::DEFAULT_TIMEOUT_MS,
            contexts: (0..n)
                .map(|i| ExecutionContext::in_process(&format!("local-{}", i)))
                .collect(),
            compare_histograms: true,
            precision: consistency::ENTROPY_DECIMALS,
        }
    }

    /// No contexts yet
    pub fn empty() -> Self {
        Self::in_process(0)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set per-run timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Add an execution context
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.contexts.push(context);
        self
    }

    /// Enable/disable histogram comparison
    pub fn with_compare_histograms(mut self, enabled: bool) -> Self {
        self.compare_histograms = enabled;
        self
    }

    /// Set report precision
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QuditResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(invalid(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tolerance
            )));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms must be > 0".to_string()));
        }
        if self.contexts.is_empty() {
            return Err(invalid("at least one execution context is required".to_string()));
        }
        if self.precision > 15 {
            return Err(invalid(format!("precision must be <= 15, got {}", self.precision)));
        }

        for (i, ctx) in self.contexts.iter().enumerate() {
            if self.contexts[..i].iter().any(|c| c.label() == ctx.label()) {
                return Err(invalid(format!("duplicate context label '{}'", ctx.label())));
            }
            if let ExecutionContext::Subprocess { program, .. } = ctx {
                if program.trim().is_empty() {
                    return Err(invalid(format!(
                        "context '{}' has an empty program",
                        ctx.label()
                    )));
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Parse and validate from JSON
    pub fn from_json(json: &str) -> QuditResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> QuditResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::in_process(2)
    }
}

impl fmt::Display for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunnerConfig({} contexts, tol={:e}, timeout={}ms, histograms={})",
            self.contexts.len(),
            self.tolerance,
            self.timeout_ms,
            self.compare_histograms
        )
    }
}

fn invalid(message: String) -> QuditError {
    QuditError::InvalidParameter(message)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = RunnerConfig::default();
        assert_eq!(config.contexts.len(), 2);
        assert_eq!(config.tolerance, consistency::DEFAULT_TOLERANCE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RunnerConfig::in_process(1)
            .with_context(ExecutionContext::canary("canary", 7))
            .with_tolerance(1e-9)
            .with_timeout_ms(500)
            .with_compare_histograms(false);
        assert_eq!(config.contexts.len(), 2);
        assert_eq!(config.timeout_ms, 500);
        assert!(!config.compare_histograms);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(RunnerConfig::empty().validate().is_err());
        assert!(RunnerConfig::default().with_tolerance(-1.0).validate().is_err());
        assert!(RunnerConfig::default().with_tolerance(f64::NAN).validate().is_err());
        assert!(RunnerConfig::default().with_timeout_ms(0).validate().is_err());

        let dup = RunnerConfig::in_process(1).with_context(ExecutionContext::in_process("local-0"));
        assert!(dup.validate().is_err());

        let empty_program = RunnerConfig::in_process(1)
            .with_context(ExecutionContext::subprocess("w", " ", &[]));
        assert!(empty_program.validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "tolerance": 1e-6,
            "timeout_ms": 10000,
            "contexts": [
                {"kind": "in_process", "label": "a"},
                {"kind": "subprocess", "label": "b", "program": "qudit_worker", "args": ["--log-level", "warn"]}
            ]
        }"#;
        let config = RunnerConfig::from_json(json).unwrap();
        assert!(config.compare_histograms);
        assert_eq!(config.precision, consistency::ENTROPY_DECIMALS);
        assert!(config.contexts[1].is_subprocess());

        let back = RunnerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
