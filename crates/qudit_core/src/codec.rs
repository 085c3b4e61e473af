//! Basis/index codec
//!
//! Gantree: L0_Foundation → IndexCodec
//!
//! Mixed-radix conversion between per-subsystem basis indices and the
//! flattened amplitude index. The first subsystem is the most significant
//! digit; the last subsystem has stride 1. Every component of the engine
//! uses this ordering.

use crate::error::{QuditError, QuditResult};
use crate::types::Dimensions;
use serde::{Deserialize, Serialize};

/// Mixed-radix codec bound to a dimension tuple
/// Gantree: IndexCodec // 혼합 진법
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCodec {
    dims: Dimensions,
    strides: Vec<usize>,
}

impl IndexCodec {
    /// Create a codec for the given dimensions
    pub fn new(dims: &Dimensions) -> Self {
        Self {
            strides: strides_for(dims.as_slice()),
            dims: dims.clone(),
        }
    }

    /// Dimension tuple
    #[inline]
    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// Per-subsystem strides (last entry is 1)
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Composite dimension ∏dᵢ
    #[inline]
    pub fn size(&self) -> usize {
        self.dims.total()
    }

    /// Per-subsystem indices → flattened index
    /// Gantree: encode(&[usize]) -> Result<usize> // 인코딩
    pub fn encode(&self, indices: &[usize]) -> QuditResult<usize> {
        if indices.len() != self.dims.len() {
            return Err(QuditError::IndexArity {
                expected: self.dims.len(),
                got: indices.len(),
            });
        }

        let mut flat = 0;
        for (subsystem, ((&index, &dimension), &stride)) in indices
            .iter()
            .zip(self.dims.as_slice())
            .zip(&self.strides)
            .enumerate()
        {
            if index >= dimension {
                return Err(QuditError::BasisIndexOutOfRange {
                    subsystem,
                    index,
                    dimension,
                });
            }
            flat += index * stride;
        }
        Ok(flat)
    }

    /// Flattened index → per-subsystem indices
    /// Gantree: decode(usize) -> Result<Vec<usize>> // 디코딩
    pub fn decode(&self, flat: usize) -> QuditResult<Vec<usize>> {
        let mut indices = vec![0; self.dims.len()];
        self.decode_into(flat, &mut indices)?;
        Ok(indices)
    }

    /// Decode into a caller-provided buffer of length `len()`
    pub fn decode_into(&self, flat: usize, out: &mut [usize]) -> QuditResult<()> {
        if flat >= self.size() {
            return Err(QuditError::FlatIndexOutOfRange {
                index: flat,
                size: self.size(),
            });
        }
        if out.len() != self.dims.len() {
            return Err(QuditError::IndexArity {
                expected: self.dims.len(),
                got: out.len(),
            });
        }

        for ((slot, &dimension), &stride) in out
            .iter_mut()
            .zip(self.dims.as_slice())
            .zip(&self.strides)
        {
            *slot = (flat / stride) % dimension;
        }
        Ok(())
    }

    /// Digit of one subsystem inside a flattened index (no range check)
    #[inline]
    pub fn digit(&self, flat: usize, subsystem: usize) -> usize {
        (flat / self.strides[subsystem]) % self.dims.as_slice()[subsystem]
    }
}

/// Mixed-radix strides for a dimension slice, most significant first
pub fn strides_for(dims: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; dims.len()];
    for i in (0..dims.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

/// Encode digits against an arbitrary radix list without validation
///
/// Used for local gate/partial-trace indexing where the digits were produced
/// by this module and are known to be in range.
#[inline]
pub fn encode_unchecked(digits: &[usize], radices: &[usize]) -> usize {
    digits
        .iter()
        .zip(radices)
        .fold(0, |acc, (&digit, &radix)| acc * radix + digit)
}

// ============================================================================
// Tests
// ============================================================================
