//! Linear-Counting cardinality estimation over the decrypted sketch.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::she::SecretKey;

/// Decrypt every bucket of a received sketch.
pub fn decrypt_sketch(key: &SecretKey, sketch: &[BigUint]) -> Vec<BigUint> {
    sketch.iter().map(|c| key.decrypt(c)).collect()
}

/// Standard Linear-Counting estimator: `floor(-m · ln(V/m))` where `V` is
/// the number of zero buckets out of `m`.
///
/// A saturated sketch (no zeros left) makes the formula diverge; the
/// sketch length is reported instead, as a lower bound.
///
/// # Panics
///
/// Panics on an empty sketch.
pub fn linear_count(buckets: &[BigUint]) -> u64 {
    let m = buckets.len();
    assert!(m > 0, "sketch must not be empty");

    let zeros = buckets.iter().filter(|b| b.is_zero()).count();
    if zeros == 0 {
        return m as u64;
    }
    let ratio = zeros as f64 / m as f64;
    (-(m as f64) * ratio.ln()).floor() as u64
}
