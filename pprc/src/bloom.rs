//! Bloom filter encoding one dimension of a range query.

use crate::hash::{bloom_key, hash_index};
use crate::params::BLOOM_HASH_COUNT;

/// A Bloom filter over `i32` elements with one-sided (false-positive)
/// error.
///
/// One filter is built per query dimension, encrypted bit by bit, and
/// dropped once the query payload is assembled.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    bits: Vec<u8>,
    hash_count: u32,
}

impl BloomFilter {
    /// Allocate an empty filter sized for `expected_elements` at
    /// `false_positive_rate`.
    ///
    /// The bit count is `ceil(-n·ln(fpr) / ln(2)²)`, rounded up to a
    /// multiple of 8.
    ///
    /// # Panics
    ///
    /// Panics if `expected_elements == 0` or `false_positive_rate` lies
    /// outside `(0, 1)`.
    pub fn new(expected_elements: usize, false_positive_rate: f64) -> Self {
        assert!(expected_elements > 0, "expected_elements must be positive");
        assert!(
            false_positive_rate > 0.0 && false_positive_rate < 1.0,
            "false_positive_rate must lie in (0, 1), got {false_positive_rate}"
        );

        let ln2 = std::f64::consts::LN_2;
        let bits = (-(expected_elements as f64) * false_positive_rate.ln() / (ln2 * ln2)).ceil()
            as usize;
        let len = bits.div_ceil(8) * 8;

        Self {
            bits: vec![0u8; len],
            hash_count: BLOOM_HASH_COUNT,
        }
    }

    /// Insert an element. Idempotent.
    pub fn insert(&mut self, value: i32) {
        let m = self.bits.len();
        for seed in 0..self.hash_count {
            self.bits[hash_index(&bloom_key(value, m), seed, m)] = 1;
        }
    }

    /// Whether the element is possibly in the set. `false` is definitive;
    /// `true` may be a false positive.
    pub fn contains(&self, value: i32) -> bool {
        let m = self.bits.len();
        (0..self.hash_count).all(|seed| self.bits[hash_index(&bloom_key(value, m), seed, m)] == 1)
    }

    /// Number of bit positions.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The raw 0/1 bit array, in position order.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }
}
