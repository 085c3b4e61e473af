//! # Qudit Core
//!
//! Foundation types, index codec and circuit specifications for the qudit
//! simulation engine.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qudit_core // L0+L1: Foundation + Circuit (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // 차원 튜플, 별칭 (완료)
//!         Constants // 허용오차/통계/수학 상수 (완료)
//!         Errors // 에러 타입 (완료)
//!         IndexCodec // 혼합 진법 인코딩 (완료)
//!     L1_Circuit // 회로 명세 (완료)
//!         GateSpec // 게이트 단계 (완료)
//!         CircuitSpec // 회로 명세 (완료)
//!         CircuitBuilder // 빌더 패턴 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qudit_core::prelude::*;
//!
//! // GHZ preparation over three subsystems of different dimension
//! let spec = CircuitBuilder::with_dims(&[5, 7, 11])
//!     .unwrap()
//!     .name("ghz")
//!     .seed(42)
//!     .ghz_chain()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(spec.dimensions().total(), 385);
//! assert_eq!(spec.count_entangling(), 2);
//! println!("{}", spec);
//! ```
//!
//! ## Index Codec
//!
//! ```rust
//! use qudit_core::prelude::*;
//!
//! let dims = Dimensions::new(vec![2, 3, 4]).unwrap();
//! let codec = IndexCodec::new(&dims);
//! assert_eq!(codec.encode(&[1, 2, 3]).unwrap(), 23);
//! assert_eq!(codec.decode(23).unwrap(), vec![1, 2, 3]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Mixed-radix index codec (Gantree: L0_Foundation → IndexCodec)
pub mod codec;

/// Circuit steps (Gantree: L1_Circuit → GateSpec)
pub mod gate;

/// Circuit specification (Gantree: L1_Circuit → CircuitSpec)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::CircuitSpec;
pub use codec::IndexCodec;
pub use constants::{consistency, math, numerics, stats};
pub use error::{ErrorKind, QuditError, QuditResult};
pub use gate::GateSpec;
pub use types::{dense_dim, outcome_label, Angle, Dimensions, Histogram, Seed, SubsystemId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qudit_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::CircuitSpec;
    pub use crate::codec::IndexCodec;
    pub use crate::constants::{consistency, math, numerics, stats};
    pub use crate::error::{ErrorKind, QuditError, QuditResult};
    pub use crate::gate::GateSpec;
    pub use crate::types::{dense_dim, outcome_label, Angle, Dimensions, Histogram, Seed, SubsystemId};
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
