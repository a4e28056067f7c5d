//! Client driver: build the encrypted query, recover the estimate.

use std::ops::Range;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;

use crate::bloom::BloomFilter;
use crate::estimate::{decrypt_sketch, linear_count};
use crate::params::BLOOM_FALSE_POSITIVE_RATE;
use crate::she::SecretKey;

/// Build the full query payload for the rectangle `range_x × range_y`:
/// two bit-encrypted Bloom filters, two `E(0)` blinding seeds, and the
/// cleartext public modulus.
///
/// # Panics
///
/// Panics if either range is empty.
pub fn build_query(
    range_x: Range<i32>,
    range_y: Range<i32>,
    key: &SecretKey,
    rng: &mut impl Rng,
) -> Vec<BigUint> {
    assert!(
        !range_x.is_empty() && !range_y.is_empty(),
        "query ranges must be non-empty"
    );

    let bf_x = range_filter(&range_x);
    let bf_y = range_filter(&range_y);

    let mut payload = Vec::with_capacity(bf_x.len() + bf_y.len() + 3);
    for &bit in bf_x.bits().iter().chain(bf_y.bits()) {
        payload.push(key.encrypt(&BigUint::from(bit), rng));
    }
    // Blinding seeds the holder consumes when initializing buckets.
    payload.push(key.encrypt(&BigUint::zero(), rng));
    payload.push(key.encrypt(&BigUint::zero(), rng));
    payload.push(key.modulus().clone());
    payload
}

/// Bloom filter covering one query dimension, sized for the range's
/// element count at the protocol false-positive rate.
fn range_filter(range: &Range<i32>) -> BloomFilter {
    let mut bf = BloomFilter::new(range.len(), BLOOM_FALSE_POSITIVE_RATE);
    for v in range.clone() {
        bf.insert(v);
    }
    bf
}

/// Decrypt the aggregator's response and run the Linear-Counting
/// estimator over it.
pub fn recover_estimate(key: &SecretKey, response: &[BigUint]) -> u64 {
    linear_count(&decrypt_sketch(key, response))
}
