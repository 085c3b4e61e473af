//! Circuit step definitions
//!
//! Gantree: L1_Circuit → GateSpec
//!
//! A [`GateSpec`] names a gate, its parameters and the subsystems it acts
//! on. It carries no matrix: the simulation layer resolves it against the
//! circuit's dimension tuple, so the same step works for any dimension.

use crate::types::{Angle, SubsystemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a circuit specification
/// Gantree: GateSpec // 게이트 단계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum GateSpec {
    // ========================================================================
    // Single-Subsystem Gates
    // ========================================================================
    /// Generalized Hadamard H_d
    /// Gantree: Hadamard(SubsystemId) // 일반화 하다마드
    Hadamard { target: SubsystemId },

    /// Discrete Fourier transform QFT_d
    Fourier { target: SubsystemId },

    /// Inverse discrete Fourier transform QFT_d†
    InverseFourier { target: SubsystemId },

    /// Phase rotation diag(e^{iθk/d})
    /// Gantree: Phase(SubsystemId, Angle) // 위상 회전
    Phase { target: SubsystemId, theta: Angle },

    /// Cyclic shift |t⟩ → |t + amount mod d⟩
    Shift { target: SubsystemId, amount: usize },

    // ========================================================================
    // Multi-Subsystem Gates
    // ========================================================================
    /// Controlled shift |c,t⟩ → |c, t + c mod d_t⟩
    /// Gantree: ControlledShift(ctrl, tgt) // 제어-시프트
    ControlledShift {
        control: SubsystemId,
        target: SubsystemId,
    },

    /// Joint phase driven by a named mathematical constant
    ConstantPhase {
        targets: Vec<SubsystemId>,
        constant: String,
    },
}

impl GateSpec {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Subsystems touched by this step, in gate order
    /// Gantree: targets(&self) -> Vec<SubsystemId> // 대상 서브시스템
    pub fn targets(&self) -> Vec<SubsystemId> {
        match self {
            GateSpec::Hadamard { target }
            | GateSpec::Fourier { target }
            | GateSpec::InverseFourier { target }
            | GateSpec::Phase { target, .. }
            | GateSpec::Shift { target, .. } => vec![*target],
            GateSpec::ControlledShift { control, target } => vec![*control, *target],
            GateSpec::ConstantPhase { targets, .. } => targets.clone(),
        }
    }

    /// Gate name
    pub fn name(&self) -> &'static str {
        match self {
            GateSpec::Hadamard { .. } => "h",
            GateSpec::Fourier { .. } => "qft",
            GateSpec::InverseFourier { .. } => "iqft",
            GateSpec::Phase { .. } => "phase",
            GateSpec::Shift { .. } => "shift",
            GateSpec::ControlledShift { .. } => "cshift",
            GateSpec::ConstantPhase { .. } => "cphase",
        }
    }

    /// Check if step can create entanglement
    pub fn is_entangling(&self) -> bool {
        match self {
            GateSpec::ControlledShift { .. } => true,
            GateSpec::ConstantPhase { targets, .. } => targets.len() > 1,
            _ => false,
        }
    }

    /// Check if step carries a continuous parameter
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            GateSpec::Phase { .. } | GateSpec::ConstantPhase { .. }
        )
    }

    /// Canonical text form, used to build sequence identifiers
    /// Gantree: identifier(&self) -> String // 정규 표현
    pub fn identifier(&self) -> String {
        let qudits = self
            .targets()
            .iter()
            .map(|t| format!("q[{}]", t))
            .collect::<Vec<_>>()
            .join(",");

        match self {
            GateSpec::Phase { theta, .. } => format!("phase({}) {}", theta, qudits),
            GateSpec::Shift { amount, .. } => format!("shift({}) {}", amount, qudits),
            GateSpec::ConstantPhase { constant, .. } => {
                format!("cphase({}) {}", constant.to_lowercase(), qudits)
            }
            _ => format!("{} {}", self.name(), qudits),
        }
    }
}

impl fmt::Display for GateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.identifier())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        assert_eq!(GateSpec::Hadamard { target: 2 }.targets(), vec![2]);
        assert_eq!(
            GateSpec::ControlledShift {
                control: 0,
                target: 1
            }
            .targets(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_classification() {
        assert!(GateSpec::ControlledShift {
            control: 0,
            target: 1
        }
        .is_entangling());
        assert!(!GateSpec::Fourier { target: 0 }.is_entangling());
        assert!(GateSpec::Phase {
            target: 0,
            theta: 1.0
        }
        .is_parameterized());
    }

    #[test]
    fn test_identifier() {
        assert_eq!(GateSpec::Hadamard { target: 0 }.to_string(), "h q[0];");
        assert_eq!(
            GateSpec::ControlledShift {
                control: 0,
                target: 1
            }
            .to_string(),
            "cshift q[0],q[1];"
        );
        assert_eq!(
            GateSpec::Phase {
                target: 1,
                theta: 0.5
            }
            .identifier(),
            "phase(0.5) q[1]"
        );
    }

    #[test]
    fn test_serde_tagged() {
        let step: GateSpec =
            serde_json::from_str(r#"{"gate":"controlled_shift","control":0,"target":2}"#).unwrap();
        assert_eq!(
            step,
            GateSpec::ControlledShift {
                control: 0,
                target: 2
            }
        );

        let json = serde_json::to_string(&GateSpec::Phase {
            target: 0,
            theta: 1.5,
        })
        .unwrap();
        assert!(json.contains("\"gate\":\"phase\""));
    }
}
