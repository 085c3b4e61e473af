//! Named state constructions
//!
//! Gantree: L2_Simulation → NamedStates
//!
//! GHZ, Bell, W and cat templates. Each returns a flat [`QuditState`] over
//! the requested dimension tuple. Prime-dimension pairs carry the GF(p)
//! maximally entangled state used for teleportation.

use crate::state::QuditState;
use num_complex::Complex64;
use qudit_core::{Dimensions, GateSpec, QuditError, QuditResult, SubsystemId};

/// Generalized GHZ state Σ_{k<m}|k,…,k⟩/√m with m = min dᵢ
/// Gantree: ghz(dims) -> Result<QuditState> // GHZ 상태
///
/// Hadamard on the smallest subsystem, then controlled shifts chained from
/// it through the other subsystems in order.
pub fn ghz(dims: &Dimensions) -> QuditResult<QuditState> {
    let root = dims.argmin();
    let chain: Vec<SubsystemId> = std::iter::once(root)
        .chain((0..dims.len()).filter(|&s| s != root))
        .collect();

    let mut state = QuditState::new(dims);
    state.apply_step(&GateSpec::Hadamard { target: root })?;
    for pair in chain.windows(2) {
        state.apply_step(&GateSpec::ControlledShift {
            control: pair[0],
            target: pair[1],
        })?;
    }
    Ok(state)
}

/// Maximally entangled pair Σ_{k<min}|k,k⟩/√min(d₁,d₂)
pub fn bell_pair(d1: usize, d2: usize) -> QuditResult<QuditState> {
    ghz(&Dimensions::new(vec![d1, d2])?)
}

/// Trial-division primality check
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|&i| i <= n / i).all(|i| n % i != 0)
}

fn require_prime(p: usize) -> QuditResult<()> {
    if is_prime(p) {
        Ok(())
    } else {
        Err(QuditError::InvalidParameter(format!("{} is not prime", p)))
    }
}

/// Maximally entangled pair |Φ⟩ = Σ_{k<p}|k,k⟩/√p over GF(p) × GF(p)
/// Gantree: prime_entangled_pair(p) -> Result<QuditState> // 소수 얽힘쌍
pub fn prime_entangled_pair(p: usize) -> QuditResult<QuditState> {
    require_prime(p)?;
    bell_pair(p, p)
}

/// Teleportation capacity log₂ p in bits per channel use of a prime pair
pub fn teleportation_capacity(p: usize) -> QuditResult<f64> {
    require_prime(p)?;
    Ok((p as f64).log2())
}

/// W state Σᵢ|0…1ᵢ…0⟩/√n
/// Gantree: w_state(dims) -> Result<QuditState> // W 상태
pub fn w_state(dims: &Dimensions) -> QuditResult<QuditState> {
    if dims.as_slice().iter().any(|&d| d < 2) {
        return Err(QuditError::InvalidParameter(format!(
            "W state needs every dimension >= 2, got {}",
            dims
        )));
    }

    let amp = Complex64::new(1.0 / (dims.len() as f64).sqrt(), 0.0);
    let mut amplitudes = vec![Complex64::new(0.0, 0.0); dims.total()];
    let mut digits = vec![0; dims.len()];
    let codec = qudit_core::IndexCodec::new(dims);
    for i in 0..dims.len() {
        digits[i] = 1;
        amplitudes[codec.encode(&digits)?] = amp;
        digits[i] = 0;
    }
    QuditState::from_amplitudes(dims, amplitudes)
}

/// Cat state (|0…0⟩ + |d₁−1,…,dₙ−1⟩)/√2
pub fn cat_state(dims: &Dimensions) -> QuditResult<QuditState> {
    let mut amplitudes = vec![Complex64::new(0.0, 0.0); dims.total()];
    amplitudes[0] += Complex64::new(1.0, 0.0);
    amplitudes[dims.total() - 1] += Complex64::new(1.0, 0.0);
    QuditState::from_unnormalized(dims, amplitudes)
}

/// Uniform superposition over every basis state (Hadamard on each subsystem)
pub fn uniform_superposition(dims: &Dimensions) -> QuditResult<QuditState> {
    let mut state = QuditState::new(dims);
    for target in 0..dims.len() {
        state.apply_step(&GateSpec::Hadamard { target })?;
    }
    Ok(state)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(d: &[usize]) -> Dimensions {
        Dimensions::new(d.to_vec()).unwrap()
    }

    #[test]
    fn test_bell_pair_support() {
        let s = bell_pair(2, 3).unwrap();
        let p = 1.0 / 2.0;
        assert!((s.amplitude(&[0, 0]).unwrap().norm_sqr() - p).abs() < 1e-12);
        assert!((s.amplitude(&[1, 1]).unwrap().norm_sqr() - p).abs() < 1e-12);
        assert!(s.amplitude(&[1, 2]).unwrap().norm_sqr() < 1e-12);
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<usize> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(7919));
        assert!(!is_prime(7917));
        assert!(!is_prime(usize::MAX));
    }

    #[test]
    fn test_prime_entangled_pair() {
        let s = prime_entangled_pair(7).unwrap();
        for k in 0..7 {
            assert!((s.amplitude(&[k, k]).unwrap().norm_sqr() - 1.0 / 7.0).abs() < 1e-12);
        }
        assert!(s.amplitude(&[0, 1]).unwrap().norm_sqr() < 1e-12);

        let rho = s.partial_trace(&[0]).unwrap();
        assert!((rho.purity() - 1.0 / 7.0).abs() < 1e-9);

        let err = prime_entangled_pair(9).unwrap_err();
        assert!(matches!(err, QuditError::InvalidParameter(_)));
        assert!(prime_entangled_pair(1).is_err());
    }

    #[test]
    fn test_teleportation_capacity() {
        assert!((teleportation_capacity(2).unwrap() - 1.0).abs() < 1e-12);
        assert!((teleportation_capacity(11).unwrap() - 11f64.log2()).abs() < 1e-12);
        assert!(teleportation_capacity(12).is_err());
    }

    #[test]
    fn test_ghz_any_ordering() {
        let s = ghz(&dims(&[11, 5, 7])).unwrap();
        for k in 0..5 {
            let p = s.amplitude(&[k, k, k]).unwrap().norm_sqr();
            assert!((p - 0.2).abs() < 1e-12);
        }
        let total: f64 = s.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_w_state() {
        let s = w_state(&dims(&[2, 3, 2])).unwrap();
        for idx in [[1, 0, 0], [0, 1, 0], [0, 0, 1]] {
            assert!((s.amplitude(&idx).unwrap().norm_sqr() - 1.0 / 3.0).abs() < 1e-12);
        }
        assert!(w_state(&dims(&[2, 1])).is_err());
    }

    #[test]
    fn test_cat_state() {
        let s = cat_state(&dims(&[3, 4])).unwrap();
        assert!((s.amplitude(&[0, 0]).unwrap().norm_sqr() - 0.5).abs() < 1e-12);
        assert!((s.amplitude(&[2, 3]).unwrap().norm_sqr() - 0.5).abs() < 1e-12);

        // degenerate: the two branches coincide
        let one = cat_state(&dims(&[1])).unwrap();
        assert!((one.probabilities()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_superposition() {
        let s = uniform_superposition(&dims(&[3, 5])).unwrap();
        for p in s.probabilities() {
            assert!((p - 1.0 / 15.0).abs() < 1e-12);
        }
    }
}
