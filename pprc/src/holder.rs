//! Data-holder evaluator: homomorphic range membership plus encrypted
//! Linear-Counting sketches.

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use rayon::prelude::*;

use crate::hash::{bloom_key, hash_index, sketch_key};
use crate::params::{BLIND_SCALAR_MAX, BLOOM_HASH_COUNT, SKETCH_HASH_SEED};
use crate::protocol::QueryPayload;

/// One holder's in-memory table of 2-D records, partitioned into equal
/// provider shards.
pub struct DataHolder {
    records: Vec<(i32, i32)>,
    providers: usize,
    sketch_len: usize,
}

impl DataHolder {
    /// # Panics
    ///
    /// Panics if `providers == 0`, `sketch_len == 0`, or the record count
    /// does not split evenly across the providers.
    pub fn new(records: Vec<(i32, i32)>, providers: usize, sketch_len: usize) -> Self {
        assert!(providers > 0, "provider count must be positive");
        assert!(sketch_len > 0, "sketch length must be positive");
        assert_eq!(
            records.len() % providers,
            0,
            "record count ({}) must split evenly across {} providers",
            records.len(),
            providers
        );
        Self {
            records,
            providers,
            sketch_len,
        }
    }

    /// Synthetic dataset: provider `p` holds the diagonal points
    /// `(i + p, i + p)` for `i` in `0..per_provider`.
    pub fn synthetic(per_provider: usize, providers: usize, sketch_len: usize) -> Self {
        let records = (0..providers)
            .flat_map(|p| {
                (0..per_provider).map(move |i| {
                    let v = (i + p) as i32;
                    (v, v)
                })
            })
            .collect();
        Self::new(records, providers, sketch_len)
    }

    /// Total number of records across all providers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn providers(&self) -> usize {
        self.providers
    }

    pub fn sketch_len(&self) -> usize {
        self.sketch_len
    }

    /// Evaluate a query end to end: one encrypted 0/1 indicator per
    /// record, deposited into per-provider sketches whose buckets are
    /// pre-blinded with the query's E(0) seeds. Returns the
    /// `providers · sketch_len` flat ciphertext vector, sketches
    /// concatenated in provider order.
    pub fn respond(&self, query: &QueryPayload, rng: &mut impl Rng) -> Vec<BigUint> {
        let signs = self.range_indicators(query);
        self.build_sketches(query, &signs, rng)
    }

    /// `sign_i = (Π_j BFx[h_j(x_i)]) · (Π_j BFy[h_j(y_i)]) mod n`.
    ///
    /// Decrypts to 1 iff all 2k probed filter bits are 1, i.e. both
    /// coordinates pass their Bloom filters. Records are independent, so
    /// the products run in parallel; the collected order is record order.
    fn range_indicators(&self, query: &QueryPayload) -> Vec<BigUint> {
        let m_bf = query.filter_len();
        let n = query.modulus();
        self.records
            .par_iter()
            .map(|&(x, y)| {
                let mut sign_x = BigUint::one();
                let mut sign_y = BigUint::one();
                for seed in 0..BLOOM_HASH_COUNT {
                    let ix = hash_index(&bloom_key(x, m_bf), seed, m_bf);
                    let iy = hash_index(&bloom_key(y, m_bf), seed, m_bf);
                    sign_x = sign_x * &query.bf_x()[ix] % n;
                    sign_y = sign_y * &query.bf_y()[iy] % n;
                }
                sign_x * sign_y % n
            })
            .collect()
    }

    fn build_sketches(
        &self,
        query: &QueryPayload,
        signs: &[BigUint],
        rng: &mut impl Rng,
    ) -> Vec<BigUint> {
        let n = query.modulus();
        let shard = self.records.len() / self.providers;
        let mut out = Vec::with_capacity(self.providers * self.sketch_len);

        for p in 0..self.providers {
            // Every bucket starts as a fresh randomization of E(0), so the
            // sketch does not reveal which buckets real records touched.
            let mut sketch: Vec<BigUint> = (0..self.sketch_len)
                .map(|_| {
                    let u = rng.random_range(1..=BLIND_SCALAR_MAX);
                    let v = rng.random_range(1..=BLIND_SCALAR_MAX);
                    (BigUint::from(u) * query.blind_a() + BigUint::from(v) * query.blind_b()) % n
                })
                .collect();

            for i in 0..shard {
                let idx = p * shard + i;
                let (x, y) = self.records[idx];
                let t = hash_index(
                    &sketch_key(x, y, self.sketch_len),
                    SKETCH_HASH_SEED,
                    self.sketch_len,
                );
                sketch[t] = (&sketch[t] + &signs[idx]) % n;
            }
            out.append(&mut sketch);
        }
        out
    }
}
