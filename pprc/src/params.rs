//! Protocol constants shared by all three parties.
//!
//! These are fixed by the protocol, not negotiated at runtime. A party pair
//! that disagrees on any of them does not fail cleanly: the sketches still
//! decrypt, just to noise, and the client sees a degraded estimate.

/// Number of hash functions per Bloom filter.
pub const BLOOM_HASH_COUNT: u32 = 7;

/// Target false-positive rate used when sizing query Bloom filters.
pub const BLOOM_FALSE_POSITIVE_RATE: f64 = 1e-4;

/// Buckets in one provider's Linear-Counting sketch.
pub const SKETCH_LEN: usize = 2048;

/// Simulated data providers per holder. The aggregator rejects sketch
/// vectors whose length is not a multiple of this.
pub const PROVIDERS_PER_HOLDER: usize = 4;

/// Seed for the sketch bucket hash. Bloom positions use seeds
/// `0..BLOOM_HASH_COUNT`, so the two hash families stay disjoint per key.
pub const SKETCH_HASH_SEED: u32 = 0;

/// Bit width of the message-side noise term `r` (k2).
pub const MESSAGE_NOISE_BITS: u64 = 80;

/// Bit width of the mask-side noise term `r'` (k0). Tunable in principle,
/// but interoperating parties must keep the reference value.
pub const MASK_NOISE_BITS: u64 = 4096;

/// Upper bound (inclusive) for the blinding scalars drawn by the holder
/// when seeding buckets and by the aggregator when masking them.
pub const BLIND_SCALAR_MAX: u32 = 100;
