//! Consistency verdicts
//!
//! Gantree: L3_Consistency → ConsistencyCheck
//!
//! Pairwise comparison of experiment reports. Structural fields must be
//! identical; entropies and histogram relative frequencies must agree
//! within the tolerance. Reported entropies are already rounded, so their
//! comparison also allows half a unit in the last reported decimal place.

use qudit_core::consistency;
use qudit_sim::ExperimentReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Outcome of a consistency check
/// Gantree: Verdict // 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Every pair agrees within tolerance
    Match,
    /// At least one pair differs
    Diverged,
    /// Fewer than two comparable reports
    Inconclusive,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Match => "MATCH",
            Verdict::Diverged => "DIVERGED",
            Verdict::Inconclusive => "INCONCLUSIVE",
        };
        write!(f, "{}", s)
    }
}

/// One disagreement between two reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Compared field, e.g. `seed` or `entropy[0]`
    pub field: String,

    /// Context of the first report
    pub left: String,

    /// Context of the second report
    pub right: String,

    /// Human-readable difference
    pub detail: String,
}

/// Result of comparing a set of reports
/// Gantree: ConsistencyReport // 일관성 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Verdict
    pub verdict: Verdict,

    /// Largest numeric difference observed over all pairs
    pub max_divergence: f64,

    /// Tolerance used
    pub tolerance: f64,

    /// Number of reports compared
    pub compared_runs: usize,

    /// Number of report pairs compared
    pub pairs: usize,

    /// Every recorded disagreement
    pub mismatches: Vec<Mismatch>,
}

impl ConsistencyReport {
    /// Check if the verdict is MATCH
    pub fn is_match(&self) -> bool {
        self.verdict == Verdict::Match
    }

    fn inconclusive(tolerance: f64, compared_runs: usize) -> Self {
        Self {
            verdict: Verdict::Inconclusive,
            max_divergence: 0.0,
            tolerance,
            compared_runs,
            pairs: 0,
            mismatches: Vec::new(),
        }
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} over {} runs (max divergence {:e}, tolerance {:e}, {} mismatches)",
            self.verdict,
            self.compared_runs,
            self.max_divergence,
            self.tolerance,
            self.mismatches.len()
        )
    }
}

/// Compare every pair of reports
/// Gantree: check_consistency(reports, tol, histograms) -> ConsistencyReport // 일관성 검사
pub fn check_consistency(
    reports: &[ExperimentReport],
    tolerance: f64,
    compare_histograms: bool,
) -> ConsistencyReport {
    if reports.len() < consistency::MIN_COMPARABLE_RUNS {
        return ConsistencyReport::inconclusive(tolerance, reports.len());
    }

    let mut max_divergence = 0.0f64;
    let mut mismatches = Vec::new();
    let mut pairs = 0;

    for (i, a) in reports.iter().enumerate() {
        for b in &reports[i + 1..] {
            pairs += 1;
            let mut pair = PairCheck {
                left: a,
                right: b,
                tolerance,
                max_divergence: 0.0,
                mismatches: &mut mismatches,
            };
            pair.compare(compare_histograms);
            max_divergence = max_divergence.max(pair.max_divergence);
        }
    }

    let verdict = if mismatches.is_empty() {
        Verdict::Match
    } else {
        Verdict::Diverged
    };

    ConsistencyReport {
        verdict,
        max_divergence,
        tolerance,
        compared_runs: reports.len(),
        pairs,
        mismatches,
    }
}

struct PairCheck<'a> {
    left: &'a ExperimentReport,
    right: &'a ExperimentReport,
    tolerance: f64,
    max_divergence: f64,
    mismatches: &'a mut Vec<Mismatch>,
}

impl PairCheck<'_> {
    fn compare(&mut self, compare_histograms: bool) {
        let (a, b) = (self.left, self.right);

        self.structural("dimensions", a.dimensions.to_string(), b.dimensions.to_string());
        self.structural("sequence_id", a.sequence_id.clone(), b.sequence_id.clone());
        self.structural("seed", a.seed.to_string(), b.seed.to_string());
        self.structural("shots", a.shots.to_string(), b.shots.to_string());
        self.structural("precision", a.precision.to_string(), b.precision.to_string());

        let partitions_a: Vec<_> = a.entropies.iter().map(|e| &e.subsystems).collect();
        let partitions_b: Vec<_> = b.entropies.iter().map(|e| &e.subsystems).collect();
        if partitions_a != partitions_b {
            self.structural(
                "partitions",
                format!("{:?}", partitions_a),
                format!("{:?}", partitions_b),
            );
        } else {
            for (ea, eb) in a.entropies.iter().zip(&b.entropies) {
                let field = format!("entropy[{}]", qudit_core::outcome_label(&ea.subsystems));
                self.numeric(&field, ea.value, eb.value);
            }
        }
        self.numeric("shannon_entropy", a.shannon_entropy, b.shannon_entropy);

        if compare_histograms {
            self.histograms();
        }
    }

    fn structural(&mut self, field: &str, left: String, right: String) {
        if left != right {
            self.record(field, format!("{} != {}", left, right));
        }
    }

    /// Half a unit in the last decimal place of the coarser report
    fn rounding_slack(&self) -> f64 {
        let precision = self.left.precision.min(self.right.precision);
        0.5 * 10f64.powi(-(precision as i32))
    }

    fn numeric(&mut self, field: &str, left: f64, right: f64) {
        let diff = (left - right).abs();
        if diff.is_finite() {
            self.max_divergence = self.max_divergence.max(diff);
        }
        if !(diff <= self.tolerance + self.rounding_slack()) {
            self.record(field, format!("|{} - {}| = {:e}", left, right, diff));
        }
    }

    /// Largest relative-frequency difference over the union of outcomes
    fn histograms(&mut self) {
        let (a, b) = (self.left, self.right);
        let labels: BTreeSet<&String> = a.histogram.keys().chain(b.histogram.keys()).collect();

        let mut worst: Option<(&String, f64)> = None;
        for label in labels {
            let diff = (a.frequency(label) - b.frequency(label)).abs();
            if worst.map_or(true, |(_, w)| diff > w) {
                worst = Some((label, diff));
            }
        }

        if let Some((label, diff)) = worst {
            self.max_divergence = self.max_divergence.max(diff);
            if diff > self.tolerance {
                self.record(
                    &format!("histogram[{}]", label),
                    format!("relative frequency differs by {:e}", diff),
                );
            }
        }
    }

    fn record(&mut self, field: &str, detail: String) {
        self.mismatches.push(Mismatch {
            field: field.to_string(),
            left: self.left.context.clone(),
            right: self.right.context.clone(),
            detail,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qudit_core::CircuitBuilder;
    use qudit_sim::{Backend, SimulatorBackend};

    fn report(context: &str, seed: u64) -> ExperimentReport {
        let spec = CircuitBuilder::with_dims(&[5, 7, 11])
            .unwrap()
            .seed(seed)
            .ghz_chain()
            .build()
            .unwrap();
        SimulatorBackend::new().with_name(context).execute(&spec).unwrap()
    }

    #[test]
    fn test_identical_runs_match() {
        let reports = vec![report("a", 42), report("b", 42), report("c", 42)];
        let result = check_consistency(&reports, 1e-6, true);
        assert_eq!(result.verdict, Verdict::Match);
        assert_eq!(result.pairs, 3);
        assert_relative_eq!(result.max_divergence, 0.0);
        assert!(result.is_match());
    }

    #[test]
    fn test_perturbed_seed_diverges() {
        let reports = vec![report("a", 42), report("b", 43)];
        let result = check_consistency(&reports, 1e-6, true);
        assert_eq!(result.verdict, Verdict::Diverged);
        assert!(result.max_divergence > 1e-6);
        assert!(result.mismatches.iter().any(|m| m.field == "seed"));
        assert!(result
            .mismatches
            .iter()
            .any(|m| m.field.starts_with("histogram[")));
    }

    #[test]
    fn test_entropy_divergence_above_tolerance() {
        let a = report("a", 1);
        let mut b = report("b", 1);
        b.entropies[0].value += 1e-3;
        let result = check_consistency(&[a, b], 1e-6, false);
        assert_eq!(result.verdict, Verdict::Diverged);
        assert!((result.max_divergence - 1e-3).abs() < 1e-9);
        assert_eq!(result.mismatches[0].field, "entropy[0]");
        assert_eq!(result.mismatches[0].left, "a");
    }

    #[test]
    fn test_divergence_within_tolerance_matches() {
        let a = report("a", 1);
        let mut b = report("b", 1);
        b.entropies[1].value += 1e-8;
        let result = check_consistency(&[a, b], 1e-6, true);
        assert_eq!(result.verdict, Verdict::Match);
        assert!(result.max_divergence > 0.0);
    }

    #[test]
    fn test_rounded_neighbours_match() {
        // 1.6094375 rounds either way at six decimals
        let mut a = report("a", 1);
        let mut b = report("b", 1);
        a.entropies[0].value = 1.609438;
        b.entropies[0].value = 1.609437;
        let result = check_consistency(&[a.clone(), b.clone()], 1e-6, false);
        assert_eq!(result.verdict, Verdict::Match);

        b.entropies[0].value = 1.609436;
        let result = check_consistency(&[a, b], 1e-6, false);
        assert_eq!(result.verdict, Verdict::Diverged);
        assert_eq!(result.mismatches[0].field, "entropy[0]");
    }

    #[test]
    fn test_precision_mismatch_named() {
        let a = report("a", 1);
        let spec = CircuitBuilder::with_dims(&[5, 7, 11])
            .unwrap()
            .seed(1)
            .ghz_chain()
            .build()
            .unwrap();
        let b = SimulatorBackend::new()
            .with_name("b")
            .with_precision(3)
            .execute(&spec)
            .unwrap();
        let result = check_consistency(&[a, b], 1.0, false);
        assert_eq!(result.verdict, Verdict::Diverged);
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].field, "precision");
        assert_eq!(result.mismatches[0].detail, "6 != 3");
    }

    #[test]
    fn test_structural_mismatch() {
        let a = report("a", 1);
        let mut b = report("b", 1);
        b.sequence_id = "identity".to_string();
        let result = check_consistency(&[a, b], 1.0, false);
        assert_eq!(result.verdict, Verdict::Diverged);
        assert_eq!(result.mismatches[0].field, "sequence_id");
    }

    #[test]
    fn test_too_few_reports() {
        let result = check_consistency(&[report("a", 1)], 1e-6, true);
        assert_eq!(result.verdict, Verdict::Inconclusive);
        assert_eq!(check_consistency(&[], 1e-6, true).compared_runs, 0);
    }

    #[test]
    fn test_verdict_serde() {
        assert_eq!(serde_json::to_string(&Verdict::Diverged).unwrap(), "\"DIVERGED\"");
        assert_eq!(Verdict::Inconclusive.to_string(), "INCONCLUSIVE");
    }
}
