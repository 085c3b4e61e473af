//! Core types for the qudit engine
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Provides type aliases and the validated [`Dimensions`] tuple used
//! throughout the engine.

use crate::constants::numerics;
use crate::error::{QuditError, QuditResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Subsystem position in a dimension tuple (0-indexed)
/// Gantree: SubsystemId // pub type SubsystemId = usize
pub type SubsystemId = usize;

/// Rotation angle in radians
pub type Angle = f64;

/// Seed for every sampling call
pub type Seed = u64;

/// Measurement histogram: outcome label -> count (ordered for stable output)
/// Gantree: Histogram // BTreeMap<String, u64>
pub type Histogram = BTreeMap<String, u64>;

/// Format a per-subsystem index tuple as a histogram label, e.g. `"0,3,2"`
pub fn outcome_label(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a histogram label back into an index tuple
pub fn parse_outcome_label(label: &str) -> QuditResult<Vec<usize>> {
    label
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| QuditError::InvalidParameter(format!("bad outcome label '{}'", label)))
        })
        .collect()
}

// ============================================================================
// Dimensions (Validated Tuple)
// ============================================================================

/// Ordered per-subsystem dimensions (d₁, …, dₙ)
/// Gantree: Dimensions // 차원 튜플
///
/// Immutable once built. The composite size ∏dᵢ is cached and bounded by
/// [`numerics::MAX_STATE_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Dimensions {
    dims: Vec<usize>,
    total: usize,
}

impl Dimensions {
    /// Create a validated dimension tuple
    /// Gantree: new(Vec<usize>) -> Result<Self> // 생성+검증
    pub fn new(dims: Vec<usize>) -> QuditResult<Self> {
        if dims.is_empty() || dims.contains(&0) {
            return Err(QuditError::InvalidDimension(dims));
        }

        let mut total: usize = 1;
        for &d in &dims {
            total = total
                .checked_mul(d)
                .filter(|&t| t <= numerics::MAX_STATE_SIZE)
                .ok_or_else(|| QuditError::StateTooLarge {
                    size: dims.iter().fold(1usize, |acc, &x| acc.saturating_mul(x)),
                    max: numerics::MAX_STATE_SIZE,
                })?;
        }

        Ok(Self { dims, total })
    }

    /// Single-subsystem tuple
    pub fn single(d: usize) -> QuditResult<Self> {
        Self::new(vec![d])
    }

    /// Uniform register of `n` subsystems with dimension `d`
    pub fn uniform(n: usize, d: usize) -> QuditResult<Self> {
        Self::new(vec![d; n])
    }

    /// Composite Hilbert space size ∏dᵢ
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of subsystems
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Always false for a validated tuple
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Dimension of one subsystem
    pub fn get(&self, subsystem: SubsystemId) -> QuditResult<usize> {
        self.dims
            .get(subsystem)
            .copied()
            .ok_or(QuditError::SubsystemOutOfRange {
                subsystem,
                count: self.dims.len(),
            })
    }

    /// Dimensions as a slice
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.dims
    }

    /// Smallest subsystem dimension
    pub fn min(&self) -> usize {
        self.dims.iter().copied().min().unwrap_or(1)
    }

    /// Position of the first subsystem with the smallest dimension
    pub fn argmin(&self) -> SubsystemId {
        let min = self.min();
        self.dims.iter().position(|&d| d == min).unwrap_or(0)
    }

    /// Concatenate two tuples (tensor-product ordering)
    pub fn concat(&self, other: &Dimensions) -> QuditResult<Self> {
        let mut dims = self.dims.clone();
        dims.extend_from_slice(&other.dims);
        Self::new(dims)
    }

    /// Dimensions of the listed subsystems, validating range and uniqueness
    pub fn select(&self, subsystems: &[SubsystemId]) -> QuditResult<Vec<usize>> {
        validate_subsystems(subsystems, self.len())?;
        Ok(subsystems.iter().map(|&s| self.dims[s]).collect())
    }

    /// Subsystems not listed, in ascending order
    pub fn complement(&self, subsystems: &[SubsystemId]) -> Vec<SubsystemId> {
        (0..self.len()).filter(|s| !subsystems.contains(s)).collect()
    }
}

/// Dimension ∏dims of a dense matrix over `dims`, bounded by
/// [`numerics::MAX_MATRIX_DIM`]
/// Gantree: dense_dim(dims) -> Result<usize> // 밀집 행렬 차원
pub fn dense_dim(dims: &[usize]) -> QuditResult<usize> {
    let dim = dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d));
    if dim > numerics::MAX_MATRIX_DIM {
        return Err(QuditError::MatrixTooLarge {
            dim,
            max: numerics::MAX_MATRIX_DIM,
        });
    }
    Ok(dim)
}

/// Check that subsystem positions are in range and pairwise distinct
pub fn validate_subsystems(subsystems: &[SubsystemId], count: usize) -> QuditResult<()> {
    for (i, &s) in subsystems.iter().enumerate() {
        if s >= count {
            return Err(QuditError::SubsystemOutOfRange {
                subsystem: s,
                count,
            });
        }
        if subsystems[..i].contains(&s) {
            return Err(QuditError::DuplicateSubsystem(s));
        }
    }
    Ok(())
}

impl TryFrom<Vec<usize>> for Dimensions {
    type Error = QuditError;

    fn try_from(dims: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(dims)
    }
}

impl From<Dimensions> for Vec<usize> {
    fn from(dims: Dimensions) -> Self {
        dims.dims
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", outcome_label(&self.dims))
    }
}

// ============================================================================
// Tests
// ============================================================================
