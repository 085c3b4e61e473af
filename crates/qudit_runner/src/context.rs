//! Execution contexts
//!
//! Gantree: L3_Consistency → ExecutionContext
//!
//! Where one run of a circuit specification happens. Contexts never share
//! state; each produces its own report.

use qudit_core::Seed;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One independent execution context
/// Gantree: ExecutionContext // 실행 컨텍스트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionContext {
    /// Blocking thread inside the runner process
    /// Gantree: InProcess(label, seed_override) // 프로세스 내부
    InProcess {
        /// Context label
        label: String,

        /// Replace the specification's seed (divergence canary)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed_override: Option<Seed>,
    },

    /// Separate OS process speaking the worker protocol
    /// Gantree: Subprocess(label, program, args) // 별도 프로세스
    Subprocess {
        /// Context label
        label: String,

        /// Program to launch
        program: String,

        /// Program arguments
        #[serde(default)]
        args: Vec<String>,
    },
}

impl ExecutionContext {
    /// In-process context
    pub fn in_process(label: &str) -> Self {
        ExecutionContext::InProcess {
            label: label.to_string(),
            seed_override: None,
        }
    }

    /// In-process context that runs with a different seed
    pub fn canary(label: &str, seed: Seed) -> Self {
        ExecutionContext::InProcess {
            label: label.to_string(),
            seed_override: Some(seed),
        }
    }

    /// Subprocess context
    pub fn subprocess(label: &str, program: &str, args: &[&str]) -> Self {
        ExecutionContext::Subprocess {
            label: label.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Context label
    pub fn label(&self) -> &str {
        match self {
            ExecutionContext::InProcess { label, .. } | ExecutionContext::Subprocess { label, .. } => {
                label
            }
        }
    }

    /// Check if the context launches a process
    pub fn is_subprocess(&self) -> bool {
        matches!(self, ExecutionContext::Subprocess { .. })
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::InProcess {
                label,
                seed_override: Some(seed),
            } => write!(f, "{} (in-process, seed={})", label, seed),
            ExecutionContext::InProcess { label, .. } => write!(f, "{} (in-process)", label),
            ExecutionContext::Subprocess { label, program, .. } => {
                write!(f, "{} (subprocess {})", label, program)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let local = ExecutionContext::in_process("a");
        assert_eq!(local.label(), "a");
        assert!(!local.is_subprocess());

        let remote = ExecutionContext::subprocess("b", "qudit_worker", &["--pretty"]);
        assert!(remote.is_subprocess());
        assert_eq!(remote.to_string(), "b (subprocess qudit_worker)");
        assert_eq!(
            ExecutionContext::canary("c", 9).to_string(),
            "c (in-process, seed=9)"
        );
    }

    #[test]
    fn test_serde() {
        let ctx: ExecutionContext =
            serde_json::from_str(r#"{"kind":"subprocess","label":"w","program":"qudit_worker"}"#)
                .unwrap();
        assert_eq!(ctx, ExecutionContext::subprocess("w", "qudit_worker", &[]));

        let json = serde_json::to_string(&ExecutionContext::in_process("x")).unwrap();
        assert_eq!(json, r#"{"kind":"in_process","label":"x"}"#);
    }
}
