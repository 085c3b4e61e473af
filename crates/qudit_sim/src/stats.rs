//! Goodness-of-fit statistics
//!
//! Gantree: L2_Simulation → GoodnessOfFit
//!
//! Pearson chi-squared test of observed counts against an expected
//! distribution. The critical value uses the Wilson–Hilferty
//! approximation χ²ₖ ≈ k(1 − 2/9k + z·√(2/9k))³ with the one-tailed z
//! constants from [`qudit_core::stats`].

use qudit_core::stats;
use qudit_core::{QuditError, QuditResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a chi-squared test
/// Gantree: ChiSquaredResult // 카이제곱 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredResult {
    /// Pearson statistic Σ(O − E)²/E
    pub statistic: f64,

    /// Degrees of freedom (non-empty bins − 1)
    pub degrees_of_freedom: usize,

    /// Critical value at the requested confidence
    pub critical_value: f64,

    /// Confidence level used
    pub confidence: f64,

    /// statistic ≤ critical value
    pub passed: bool,
}

impl fmt::Display for ChiSquaredResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "χ²={:.3} (dof={}, critical={:.3} @ {}) {}",
            self.statistic,
            self.degrees_of_freedom,
            self.critical_value,
            self.confidence,
            if self.passed { "PASS" } else { "FAIL" }
        )
    }
}

/// Chi-squared test of `observed` counts against `expected` probabilities
/// Gantree: chi_squared(observed, expected, confidence) -> Result // 적합도 검정
///
/// Bins with zero expected probability are excluded; a count landing in
/// such a bin makes the statistic infinite.
pub fn chi_squared(
    observed: &[u64],
    expected: &[f64],
    confidence: f64,
) -> QuditResult<ChiSquaredResult> {
    if observed.len() != expected.len() {
        return Err(QuditError::AmplitudeLength {
            expected: expected.len(),
            got: observed.len(),
        });
    }
    let total: u64 = observed.iter().sum();
    if total == 0 {
        return Err(QuditError::InvalidParameter(
            "chi-squared test needs at least one observation".to_string(),
        ));
    }

    let mut statistic = 0.0;
    let mut bins = 0usize;
    for (&o, &p) in observed.iter().zip(expected) {
        let e = p * total as f64;
        if e > 0.0 {
            statistic += (o as f64 - e).powi(2) / e;
            bins += 1;
        } else if o > 0 {
            statistic = f64::INFINITY;
        }
    }

    let degrees_of_freedom = bins.saturating_sub(1);
    let critical_value = critical_value(degrees_of_freedom, confidence);
    Ok(ChiSquaredResult {
        statistic,
        degrees_of_freedom,
        critical_value,
        confidence,
        passed: statistic <= critical_value,
    })
}

/// Chi-squared test against the uniform distribution over all bins
pub fn chi_squared_uniform(observed: &[u64], confidence: f64) -> QuditResult<ChiSquaredResult> {
    let p = 1.0 / observed.len().max(1) as f64;
    chi_squared(observed, &vec![p; observed.len()], confidence)
}

/// Wilson–Hilferty upper critical value of χ² with `dof` degrees of freedom
pub fn critical_value(dof: usize, confidence: f64) -> f64 {
    if dof == 0 {
        return 0.0;
    }
    let k = dof as f64;
    let z = stats::z_critical(confidence);
    let a = 2.0 / (9.0 * k);
    k * (1.0 - a + z * a.sqrt()).powi(3)
}

// ============================================================================
// Tests
// ============================================================================
