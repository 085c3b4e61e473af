//! Constants for the qudit engine
//!
//! Gantree: L0_Foundation → Constants
//!
//! Numerical tolerances, consistency defaults, statistical thresholds and
//! the named mathematical constants used by constant-phase gates.

// ============================================================================
// Numerics Constants
// Gantree: numerics // 수치 허용오차
// ============================================================================

pub mod numerics {
    //! Tolerances for unitarity, normalization and eigenvalue handling

    /// Accepted drift of Σ|a|² from 1 without correction
    /// Gantree: NORM_TOLERANCE: f64 = 1e-9
    pub const NORM_TOLERANCE: f64 = 1e-9;

    /// Drift beyond which the state is considered corrupted
    /// Gantree: NORM_HARD_CEILING: f64 = 1e-6
    pub const NORM_HARD_CEILING: f64 = 1e-6;

    /// Maximum entry of |U·U† − I| accepted at gate construction
    /// Gantree: UNITARITY_TOLERANCE: f64 = 1e-9
    pub const UNITARITY_TOLERANCE: f64 = 1e-9;

    /// Eigenvalues below this are treated as exactly zero
    /// Gantree: EIGENVALUE_CUTOFF: f64 = 1e-12
    pub const EIGENVALUE_CUTOFF: f64 = 1e-12;

    /// Tolerance for Hermiticity and unit trace of density matrices
    pub const DENSITY_TOLERANCE: f64 = 1e-9;

    /// Maximum number of amplitudes in a composite state (2^24)
    pub const MAX_STATE_SIZE: usize = 1 << 24;

    /// Maximum dimension of a dense gate or reduced density matrix
    /// Gantree: MAX_MATRIX_DIM: usize = 4096
    pub const MAX_MATRIX_DIM: usize = 4096;

    /// Matrix dimension from which the unitarity check runs row-parallel
    pub const PARALLEL_CHECK_DIM: usize = 64;

    /// Relative drift of Σ|a|² from 1
    #[inline]
    pub fn norm_drift(norm_squared: f64) -> f64 {
        (norm_squared - 1.0).abs()
    }
}

// ============================================================================
// Consistency Constants
// Gantree: consistency // 재현성 검증
// ============================================================================

pub mod consistency {
    //! Defaults for the distributed consistency runner

    /// Default numeric tolerance for cross-run comparison
    /// Gantree: DEFAULT_TOLERANCE: f64 = 1e-6
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    /// Decimal places reported for entropy values
    /// Gantree: ENTROPY_DECIMALS: u32 = 6
    pub const ENTROPY_DECIMALS: u32 = 6;

    /// Default per-run timeout in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

    /// Default number of measurement shots per run
    /// Gantree: DEFAULT_SHOTS: u64 = 1024
    pub const DEFAULT_SHOTS: u64 = 1024;

    /// Minimum successful runs for a conclusive verdict
    pub const MIN_COMPARABLE_RUNS: usize = 2;

    /// Round a value to the given number of decimal places
    #[inline]
    pub fn round_to(value: f64, decimals: u32) -> f64 {
        let scale = 10f64.powi(decimals as i32);
        (value * scale).round() / scale
    }
}

// ============================================================================
// Statistics Constants
// Gantree: stats // 통계 상수
// ============================================================================

pub mod stats {
    //! Statistical constants for goodness-of-fit tests

    /// Z critical value for 95% confidence (one-tailed)
    pub const Z_CRIT_95: f64 = 1.645;

    /// Z critical value for 99% confidence (one-tailed)
    pub const Z_CRIT_99: f64 = 2.326;

    /// Z critical value for 99.9% confidence (one-tailed)
    pub const Z_CRIT_999: f64 = 3.090;

    /// Default confidence level
    pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.99;

    /// Get one-tailed z-critical value for a given confidence level
    pub fn z_critical(confidence: f64) -> f64 {
        if confidence >= 0.999 {
            Z_CRIT_999
        } else if confidence >= 0.99 {
            Z_CRIT_99
        } else {
            Z_CRIT_95
        }
    }
}

// ============================================================================
// Mathematical Constants
// Gantree: math // 상수 위상
// ============================================================================

pub mod math {
    //! Named constants accepted by constant-phase gates

    /// Golden ratio φ
    pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

    /// Euler–Mascheroni constant γ
    pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

    /// Apéry's constant ζ(3)
    pub const APERY: f64 = 1.202_056_903_159_594_2;

    /// Table of (name, value) pairs, in stable order
    pub const NAMED: [(&str, f64); 8] = [
        ("phi", GOLDEN_RATIO),
        ("pi", std::f64::consts::PI),
        ("e", std::f64::consts::E),
        ("gamma", EULER_GAMMA),
        ("zeta3", APERY),
        ("sqrt2", std::f64::consts::SQRT_2),
        ("sqrt3", 1.732_050_807_568_877_2),
        ("sqrt5", 2.236_067_977_499_79),
    ];

    /// Look up a constant by name (case-insensitive)
    pub fn named_constant(name: &str) -> Option<f64> {
        let lower = name.to_lowercase();
        NAMED
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, value)| *value)
    }
}

// ============================================================================
// Tests
// ============================================================================
