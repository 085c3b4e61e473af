//! Consistency runner
//!
//! Gantree: L3_Consistency → ConsistencyRunner
//!
//! Runs one circuit specification in every configured execution context
//! concurrently, then compares the completed reports.
//!
//! - In-process contexts run on tokio's blocking pool.
//! - Subprocess contexts receive a [`WorkerRequest`] (specification and
//!   report precision) on stdin and answer with a [`WorkerResponse`] on
//!   stdout. The child is killed when its run times
//!   out.
//!
//! A run that exceeds the timeout is excluded from comparison. A run that
//! fails keeps the error kind, message and full specification.

use crate::config::RunnerConfig;
use crate::context::ExecutionContext;
use crate::protocol::{WorkerRequest, WorkerResponse};
use crate::verdict::{check_consistency, ConsistencyReport, Verdict};
use qudit_core::{CircuitSpec, ErrorKind, QuditError, QuditResult, Seed};
use qudit_sim::{Backend, ExperimentReport, SimulatorBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

// ============================================================================
// Run Records
// ============================================================================

/// Failed run, reproducible from the attached specification
/// Gantree: RunFailure // 실행 실패 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFailure {
    /// Error category
    pub kind: ErrorKind,

    /// Error message
    pub message: String,

    /// Specification as executed (seed override applied)
    pub circuit: CircuitSpec,
}

impl RunFailure {
    /// Record an error for a specification
    pub fn from_error(err: &QuditError, circuit: CircuitSpec) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            circuit,
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (seed={}, sequence={})",
            self.kind,
            self.message,
            self.circuit.seed(),
            self.circuit.sequence_id()
        )
    }
}

/// Status of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Report produced
    Completed {
        /// Experiment report
        report: Box<ExperimentReport>,
    },

    /// Deadline exceeded
    TimedOut {
        /// Deadline that was exceeded
        timeout_ms: u64,
    },

    /// Run aborted with an error
    Failed {
        /// Failure record
        failure: RunFailure,
    },
}

/// Outcome of one run
/// Gantree: RunOutcome // 실행 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Context label
    pub context: String,

    /// Wall time of the run
    pub elapsed_ms: f64,

    /// Status
    pub status: RunStatus,
}

impl RunOutcome {
    /// Report if the run completed
    pub fn report(&self) -> Option<&ExperimentReport> {
        match &self.status {
            RunStatus::Completed { report } => Some(&**report),
            _ => None,
        }
    }

    /// Failure record if the run failed
    pub fn failure(&self) -> Option<&RunFailure> {
        match &self.status {
            RunStatus::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    /// Check if the run completed
    pub fn is_completed(&self) -> bool {
        matches!(self.status, RunStatus::Completed { .. })
    }

    /// Check if the run timed out
    pub fn is_timed_out(&self) -> bool {
        matches!(self.status, RunStatus::TimedOut { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            RunStatus::Completed { .. } => {
                write!(f, "{}: COMPLETED in {:.1}ms", self.context, self.elapsed_ms)
            }
            RunStatus::TimedOut { timeout_ms } => {
                write!(f, "{}: TIMED_OUT after {}ms", self.context, timeout_ms)
            }
            RunStatus::Failed { failure } => write!(f, "{}: FAILED {}", self.context, failure),
        }
    }
}

/// Every outcome of a batch plus the consistency verdict
/// Gantree: BatchResult // 배치 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Outcomes in context order
    pub outcomes: Vec<RunOutcome>,

    /// Comparison of the completed reports
    pub consistency: ConsistencyReport,
}

impl BatchResult {
    /// Verdict
    pub fn verdict(&self) -> Verdict {
        self.consistency.verdict
    }

    /// Completed reports
    pub fn reports(&self) -> Vec<&ExperimentReport> {
        self.outcomes.iter().filter_map(RunOutcome::report).collect()
    }

    /// Failure records
    pub fn failures(&self) -> Vec<&RunFailure> {
        self.outcomes.iter().filter_map(RunOutcome::failure).collect()
    }

    /// Labels of timed-out contexts
    pub fn timed_out(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_timed_out())
            .map(|o| o.context.as_str())
            .collect()
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> QuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.consistency)?;
        for outcome in &self.outcomes {
            writeln!(f, "  {}", outcome)?;
        }
        for mismatch in &self.consistency.mismatches {
            writeln!(
                f,
                "  {} vs {}: {} {}",
                mismatch.left, mismatch.right, mismatch.field, mismatch.detail
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs a specification across independent contexts
/// Gantree: ConsistencyRunner // 일관성 러너
#[derive(Debug, Clone)]
pub struct ConsistencyRunner {
    config: Arc<RunnerConfig>,
}

impl ConsistencyRunner {
    /// Create a runner from a validated configuration
    pub fn new(config: RunnerConfig) -> QuditResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Configuration
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run on the current tokio runtime
    /// Gantree: run_async(spec) -> BatchResult // 비동기 실행
    pub async fn run_async(&self, spec: &CircuitSpec) -> BatchResult {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        log::info!(
            "running {} over {} contexts (timeout={}ms)",
            spec,
            self.config.contexts.len(),
            self.config.timeout_ms
        );

        let handles: Vec<_> = self
            .config
            .contexts
            .iter()
            .map(|context| {
                let context = context.clone();
                let spec = spec.clone();
                let precision = self.config.precision;
                tokio::spawn(run_context(context, spec, precision, timeout))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, context) in handles.into_iter().zip(&self.config.contexts) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let err = QuditError::Internal(format!("run task aborted: {}", e));
                    log::warn!("[{}] {}", context.label(), err);
                    RunOutcome {
                        context: context.label().to_string(),
                        elapsed_ms: 0.0,
                        status: RunStatus::Failed {
                            failure: RunFailure::from_error(&err, spec.clone()),
                        },
                    }
                }
            };
            outcomes.push(outcome);
        }

        let reports: Vec<ExperimentReport> = outcomes
            .iter()
            .filter_map(|o| o.report().cloned())
            .collect();
        let consistency = check_consistency(
            &reports,
            self.config.tolerance,
            self.config.compare_histograms,
        );
        log::info!("{}", consistency);

        BatchResult {
            outcomes,
            consistency,
        }
    }

    /// Run on a dedicated runtime, blocking the caller
    /// Gantree: run(spec) -> Result<BatchResult> // 동기 실행
    pub fn run(&self, spec: &CircuitSpec) -> QuditResult<BatchResult> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let result = runtime.block_on(self.run_async(spec));
        // timed-out in-process runs may still occupy blocking threads
        runtime.shutdown_background();
        Ok(result)
    }
}

// ============================================================================
// Context Execution
// ============================================================================

async fn run_context(
    context: ExecutionContext,
    spec: CircuitSpec,
    precision: u32,
    timeout: Duration,
) -> RunOutcome {
    let start = Instant::now();
    let label = context.label().to_string();

    let (spec, attempt) = match context {
        ExecutionContext::InProcess { seed_override, .. } => {
            let spec = apply_seed_override(spec, seed_override);
            let attempt = tokio::time::timeout(
                timeout,
                execute_in_process(label.clone(), spec.clone(), precision),
            )
            .await;
            (spec, attempt)
        }
        ExecutionContext::Subprocess { program, args, .. } => {
            let request = WorkerRequest::new(spec.clone(), precision);
            let attempt =
                tokio::time::timeout(timeout, execute_subprocess(&program, &args, &request)).await;
            (spec, attempt)
        }
    };

    let status = match attempt {
        Err(_) => {
            log::warn!("[{}] timed out after {}ms", label, timeout.as_millis());
            RunStatus::TimedOut {
                timeout_ms: timeout.as_millis() as u64,
            }
        }
        Ok(Ok(WorkerResponse::Ok { mut report })) => {
            report.context = label.clone();
            RunStatus::Completed { report }
        }
        Ok(Ok(WorkerResponse::Error { kind, message })) => {
            log::warn!("[{}] failed: {}: {}", label, kind, message);
            RunStatus::Failed {
                failure: RunFailure {
                    kind,
                    message,
                    circuit: spec,
                },
            }
        }
        Ok(Err(err)) => {
            log::warn!("[{}] failed: {}", label, err);
            RunStatus::Failed {
                failure: RunFailure::from_error(&err, spec),
            }
        }
    };

    RunOutcome {
        context: label,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        status,
    }
}

fn apply_seed_override(spec: CircuitSpec, seed_override: Option<Seed>) -> CircuitSpec {
    match seed_override {
        Some(seed) => spec.with_seed(seed),
        None => spec,
    }
}

async fn execute_in_process(
    label: String,
    spec: CircuitSpec,
    precision: u32,
) -> QuditResult<WorkerResponse> {
    tokio::task::spawn_blocking(move || {
        let backend = SimulatorBackend::new()
            .with_name(&label)
            .with_precision(precision);
        WorkerResponse::from_result(backend.execute(&spec))
    })
    .await
    .map_err(|e| QuditError::Internal(format!("in-process run aborted: {}", e)))
}

async fn execute_subprocess(
    program: &str,
    args: &[String],
    request: &WorkerRequest,
) -> QuditResult<WorkerResponse> {
    let input = request.to_json()?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| QuditError::Worker(format!("failed to launch '{}': {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input.as_bytes()).await {
            Ok(()) => {}
            // worker exited without reading its input
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(e.into()),
        }
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(QuditError::Worker(format!(
            "'{}' exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    WorkerResponse::from_json(&String::from_utf8_lossy(&output.stdout))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qudit_core::CircuitBuilder;

    fn ghz_spec(dims: &[usize], seed: u64) -> CircuitSpec {
        CircuitBuilder::with_dims(dims)
            .unwrap()
            .seed(seed)
            .ghz_chain()
            .build()
            .unwrap()
    }

    fn runner(config: RunnerConfig) -> ConsistencyRunner {
        ConsistencyRunner::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ConsistencyRunner::new(RunnerConfig::empty()).is_err());
    }

    #[tokio::test]
    async fn test_identical_runs_match() {
        let spec = ghz_spec(&[5, 7, 11], 42);
        let batch = runner(RunnerConfig::in_process(3)).run_async(&spec).await;

        assert_eq!(batch.verdict(), Verdict::Match);
        assert_eq!(batch.reports().len(), 3);
        let first = batch.reports()[0];
        for report in batch.reports() {
            assert_eq!(report.entropies, first.entropies);
            assert_eq!(report.entropy_of(&[0]), Some(1.609438));
        }
        assert_eq!(batch.outcomes[2].context, "local-2");
        assert_eq!(batch.reports()[2].context, "local-2");
    }

    #[tokio::test]
    async fn test_seed_canary_diverges() {
        let config = RunnerConfig::in_process(1).with_context(ExecutionContext::canary("canary", 99));
        let batch = runner(config).run_async(&ghz_spec(&[5, 7], 42)).await;

        assert_eq!(batch.verdict(), Verdict::Diverged);
        assert!(batch.consistency.max_divergence > batch.consistency.tolerance);
        assert_eq!(batch.reports()[1].seed, 99);
    }

    #[tokio::test]
    async fn test_single_context_inconclusive() {
        let batch = runner(RunnerConfig::in_process(1))
            .run_async(&ghz_spec(&[2, 3], 1))
            .await;
        assert_eq!(batch.verdict(), Verdict::Inconclusive);
        assert!(batch.outcomes[0].is_completed());
    }

    #[tokio::test]
    async fn test_state_error_recorded_with_circuit() {
        let json = r#"{"dimensions":[2,3],"steps":[{"gate":"hadamard","target":5}],"seed":17}"#;
        let spec: CircuitSpec = serde_json::from_str(json).unwrap();
        let batch = runner(RunnerConfig::in_process(2)).run_async(&spec).await;

        assert_eq!(batch.verdict(), Verdict::Inconclusive);
        let failures = batch.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].kind, ErrorKind::IndexRange);
        assert_eq!(failures[0].circuit, spec);
        assert_eq!(failures[0].circuit.seed(), 17);
    }

    #[tokio::test]
    async fn test_canary_failure_keeps_overridden_seed() {
        let json = r#"{"dimensions":[3],"steps":[{"gate":"shift","target":1,"amount":1}],"seed":5}"#;
        let spec: CircuitSpec = serde_json::from_str(json).unwrap();
        let config = RunnerConfig::empty().with_context(ExecutionContext::canary("c", 6));
        let batch = runner(config).run_async(&spec).await;
        assert_eq!(batch.failures()[0].circuit.seed(), 6);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subprocess_timeout() {
        let config = RunnerConfig::in_process(2)
            .with_context(ExecutionContext::subprocess("slow", "sleep", &["5"]))
            .with_timeout_ms(1000);
        let start = Instant::now();
        let batch = runner(config).run_async(&ghz_spec(&[2, 3], 1)).await;

        assert!(start.elapsed() < Duration::from_secs(4));
        assert_eq!(batch.timed_out(), vec!["slow"]);
        assert_eq!(batch.verdict(), Verdict::Match);
        assert_eq!(batch.consistency.compared_runs, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subprocess_exit_failure() {
        let config = RunnerConfig::in_process(2)
            .with_context(ExecutionContext::subprocess("broken", "false", &[]));
        let batch = runner(config).run_async(&ghz_spec(&[2, 3], 1)).await;

        let failures = batch.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, ErrorKind::Worker);
        assert_eq!(batch.reports().len(), 2);
        assert_eq!(batch.verdict(), Verdict::Match);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_program_fails() {
        let config = RunnerConfig::in_process(1).with_context(ExecutionContext::subprocess(
            "missing",
            "/nonexistent/qudit_worker",
            &[],
        ));
        let batch = runner(config).run_async(&ghz_spec(&[2], 1)).await;
        assert_eq!(batch.failures()[0].kind, ErrorKind::Worker);
        assert!(batch.failures()[0].message.contains("failed to launch"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subprocess_worker_response() {
        let spec = ghz_spec(&[5, 7], 11);
        let report = SimulatorBackend::new().with_name("prepared").execute(&spec).unwrap();
        let response = WorkerResponse::from_result(Ok(report)).to_json().unwrap();

        let path = std::env::temp_dir().join(format!(
            "qudit_runner_response_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, response).unwrap();
        let command = format!("cat '{}'", path.display());

        let config = RunnerConfig::in_process(1).with_context(ExecutionContext::subprocess(
            "remote",
            "sh",
            &["-c", &command],
        ));
        let batch = runner(config).run_async(&spec).await;
        std::fs::remove_file(&path).ok();

        assert_eq!(batch.verdict(), Verdict::Match);
        assert_eq!(batch.reports()[1].context, "remote");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subprocess_error_response_keeps_kind() {
        let line = r#"echo '{"status":"error","kind":"NormalizationDriftError","message":"drift"}'"#;
        let config = RunnerConfig::empty().with_context(ExecutionContext::subprocess(
            "drifty",
            "sh",
            &["-c", line],
        ));
        let batch = runner(config).run_async(&ghz_spec(&[2, 3], 1)).await;

        let failure = batch.failures()[0];
        assert_eq!(failure.kind, ErrorKind::NormalizationDrift);
        assert_eq!(failure.message, "drift");
    }

    #[test]
    fn test_blocking_run() {
        let batch = runner(RunnerConfig::default())
            .run(&ghz_spec(&[7, 11], 3))
            .unwrap();
        assert!(batch.consistency.is_match());
        assert_eq!(batch.reports()[0].entropy_of(&[1]), Some(1.94591));

        let json = batch.to_json_pretty().unwrap();
        assert!(json.contains(r#""verdict": "MATCH""#));
        assert!(json.contains(r#""status": "COMPLETED""#));
    }
}
