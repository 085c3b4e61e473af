//! Worker protocol
//!
//! Gantree: L3_Consistency → WorkerProtocol
//!
//! A worker reads one request as JSON on stdin, either a bare circuit
//! specification or an envelope carrying the report precision:
//!
//! ```text
//! {"dimensions":[5,7],"steps":[...],"seed":42}
//! {"circuit":{"dimensions":[5,7],...},"precision":9}
//! ```
//!
//! and answers with a single tagged JSON response on stdout:
//!
//! ```text
//! {"status":"ok","report":{...}}
//! {"status":"error","kind":"IndexRangeError","message":"..."}
//! ```

use qudit_core::{CircuitSpec, ErrorKind, QuditError, QuditResult};
use qudit_sim::ExperimentReport;
use serde::{Deserialize, Serialize};

/// Request read by a worker
/// Gantree: WorkerRequest // 워커 요청
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Circuit to execute
    pub circuit: CircuitSpec,

    /// Decimal places of reported entropies (worker default when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl WorkerRequest {
    /// Request with an explicit precision
    pub fn new(circuit: CircuitSpec, precision: u32) -> Self {
        Self {
            circuit,
            precision: Some(precision),
        }
    }

    /// Parse an envelope or a bare circuit specification, then validate
    /// the circuit
    pub fn from_json(json: &str) -> QuditResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let request = if value.get("circuit").is_some() {
            serde_json::from_value::<Self>(value)?
        } else {
            Self {
                circuit: serde_json::from_value(value)?,
                precision: None,
            }
        };
        request.circuit.validate()?;
        Ok(request)
    }

    /// Serialize to a single line
    pub fn to_json(&self) -> QuditResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Response written by a worker
/// Gantree: WorkerResponse // 워커 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerResponse {
    /// Run completed
    Ok {
        /// Experiment report
        report: Box<ExperimentReport>,
    },

    /// Run failed inside the worker
    Error {
        /// Error category
        kind: ErrorKind,
        /// Error message
        message: String,
    },
}

impl WorkerResponse {
    /// Wrap an execution result
    pub fn from_result(result: QuditResult<ExperimentReport>) -> Self {
        match result {
            Ok(report) => WorkerResponse::Ok {
                report: Box::new(report),
            },
            Err(err) => WorkerResponse::Error {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }

    /// Check if the response carries a report
    pub fn is_ok(&self) -> bool {
        matches!(self, WorkerResponse::Ok { .. })
    }

    /// Parse a response from worker output
    pub fn from_json(json: &str) -> QuditResult<Self> {
        serde_json::from_str(json.trim())
            .map_err(|e| QuditError::Worker(format!("invalid worker response: {}", e)))
    }

    /// Serialize to a single line
    pub fn to_json(&self) -> QuditResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize with indentation
    pub fn to_json_pretty(&self) -> QuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
