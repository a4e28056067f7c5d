//! Aggregator core: homomorphic sketch summation, blinding, shuffling.
//!
//! The aggregator holds no cryptographic state. It adds ciphertexts as
//! plain integers (the reduction happens implicitly at decryption), masks
//! each bucket with a small scalar, and permutes the result so bucket
//! positions stop corresponding to record hashes.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::params::BLIND_SCALAR_MAX;
use crate::protocol::ProtocolError;

/// Sum the `providers` concatenated sketches bucket-wise.
///
/// Fails unless the flat vector is a positive exact multiple of the
/// provider count; a mismatch means the holder and aggregator disagree on
/// the protocol shape and nothing downstream would decrypt sensibly.
pub fn combine_provider_sketches(
    flat: &[BigUint],
    providers: usize,
) -> Result<Vec<BigUint>, ProtocolError> {
    assert!(providers > 0, "provider count must be positive");
    if flat.is_empty() || flat.len() % providers != 0 {
        return Err(ProtocolError::SketchShape {
            len: flat.len(),
            providers,
        });
    }

    let sketch_len = flat.len() / providers;
    let mut agg = vec![BigUint::zero(); sketch_len];
    for (t, bucket) in agg.iter_mut().enumerate() {
        for p in 0..providers {
            *bucket += &flat[p * sketch_len + t];
        }
    }
    Ok(agg)
}

/// Scale every bucket by a fresh scalar in `{1..=100}`, then apply a
/// uniform random permutation.
///
/// Scaling keeps zero buckets zero (the only property the client's
/// estimator reads) while masking the exact per-bucket counts; the
/// shuffle removes positional information.
pub fn blind_and_shuffle(sketch: &mut [BigUint], rng: &mut impl Rng) {
    for bucket in sketch.iter_mut() {
        *bucket *= BigUint::from(rng.random_range(1..=BLIND_SCALAR_MAX));
    }
    sketch.shuffle(rng);
}
