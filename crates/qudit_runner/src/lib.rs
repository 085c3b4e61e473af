//! # Qudit Runner
//!
//! Runs one circuit specification in several independent execution contexts
//! and checks that the resulting reports agree.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qudit_runner // L3: Consistency (완료)
//!     ExecutionContext // 실행 컨텍스트 (완료)
//!         InProcess - 블로킹 스레드, 시드 카나리
//!         Subprocess - 워커 프로토콜
//!     RunnerConfig // 러너 설정 (완료)
//!     WorkerProtocol // stdin 명세 → stdout 응답 (완료)
//!     ConsistencyCheck // 쌍별 비교 (완료)
//!         MATCH / DIVERGED / INCONCLUSIVE
//!     ConsistencyRunner // 병렬 실행 + 타임아웃 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qudit_runner::prelude::*;
//!
//! let spec = CircuitBuilder::with_dims(&[5, 7])
//!     .unwrap()
//!     .seed(42)
//!     .ghz_chain()
//!     .build()
//!     .unwrap();
//!
//! let runner = ConsistencyRunner::new(RunnerConfig::in_process(2)).unwrap();
//! let batch = runner.run(&spec).unwrap();
//! assert_eq!(batch.verdict(), Verdict::Match);
//! ```
//!
//! ## Divergence Canary
//!
//! ```rust
//! use qudit_runner::prelude::*;
//!
//! let spec = CircuitBuilder::with_dims(&[2, 3]).unwrap().ghz_chain().build().unwrap();
//! let config = RunnerConfig::in_process(1)
//!     .with_context(ExecutionContext::canary("canary", 12345));
//!
//! let batch = ConsistencyRunner::new(config).unwrap().run(&spec).unwrap();
//! assert_eq!(batch.verdict(), Verdict::Diverged);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Execution contexts (Gantree: L3_Consistency → ExecutionContext)
pub mod context;

/// Runner configuration (Gantree: L3_Consistency → RunnerConfig)
pub mod config;

/// Worker protocol (Gantree: L3_Consistency → WorkerProtocol)
pub mod protocol;

/// Consistency verdicts (Gantree: L3_Consistency → ConsistencyCheck)
pub mod verdict;

/// Consistency runner (Gantree: L3_Consistency → ConsistencyRunner)
pub mod runner;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::RunnerConfig;
pub use context::ExecutionContext;
pub use protocol::{WorkerRequest, WorkerResponse};
pub use runner::{BatchResult, ConsistencyRunner, RunFailure, RunOutcome, RunStatus};
pub use verdict::{check_consistency, ConsistencyReport, Mismatch, Verdict};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qudit_runner::prelude::*;
    //! ```

    pub use crate::config::RunnerConfig;
    pub use crate::context::ExecutionContext;
    pub use crate::protocol::{WorkerRequest, WorkerResponse};
    pub use crate::runner::{BatchResult, ConsistencyRunner, RunFailure, RunOutcome, RunStatus};
    pub use crate::verdict::{check_consistency, ConsistencyReport, Mismatch, Verdict};
    pub use qudit_sim::prelude::*;
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

    #[test]
    fn test_config_file_to_verdict() {
        let json = r#"{
            "tolerance": 1e-6,
            "timeout_ms": 20000,
            "contexts": [
                {"kind": "in_process", "label": "host-a"},
                {"kind": "in_process", "label": "host-b"}
            ]
        }"#;
        let config = RunnerConfig::from_json(json).unwrap();
        let spec = CircuitBuilder::with_dims(&[5, 7, 11])
            .unwrap()
            .seed(2024)
            .ghz_chain()
            .partition(&[0, 1])
            .build()
            .unwrap();

        let batch = ConsistencyRunner::new(config).unwrap().run(&spec).unwrap();
        assert_eq!(batch.verdict(), Verdict::Match);
        assert_eq!(batch.consistency.pairs, 1);
        assert!((batch.reports()[1].entropy_of(&[0, 1]).unwrap() - 1.609438).abs() < 1e-12);
    }

    #[test]
    fn test_reports_compared_offline() {
        // reports produced elsewhere and shipped back as JSON
        let spec = CircuitBuilder::with_dims(&[3, 3])
            .unwrap()
            .seed(8)
            .ghz_chain()
            .build()
            .unwrap();
        let a = SimulatorBackend::new().with_name("a").execute(&spec).unwrap();
        let b = SimulatorBackend::new().with_name("b").execute(&spec).unwrap();
        let b = ExperimentReport::from_json(&b.to_json().unwrap()).unwrap();

        let result = check_consistency(&[a, b], 1e-6, true);
        assert!(result.is_match());
        assert_eq!(result.max_divergence, 0.0);
    }

    #[test]
    fn test_failure_is_reproducible_from_record() {
        let json = r#"{"dimensions":[2,2],"steps":[{"gate":"controlled_shift","control":0,"target":0}],"seed":3}"#;
        let spec: CircuitSpec = serde_json::from_str(json).unwrap();
        let batch = ConsistencyRunner::new(RunnerConfig::in_process(2))
            .unwrap()
            .run(&spec)
            .unwrap();

        let failure = batch.failures()[0].clone();
        let replay = SimulatorBackend::new().execute(&failure.circuit).unwrap_err();
        assert_eq!(replay.kind(), failure.kind);
    }

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "qudit_runner");
    }
}
