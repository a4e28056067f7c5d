//! Seeded, deterministic 32-bit hashing of structured keys.
//!
//! Every bit and bucket position in the protocol is derived with
//! MurmurHash3 x86 32-bit over an ASCII key of decimal fields joined by
//! `"|"`. The delimiter is part of the wire-level contract: all three
//! parties must derive identical indices from identical inputs.

use murmurhash3::murmurhash3_x86_32;

/// Map a key to an index in `[0, length)` under the given seed.
///
/// The modulo bias for lengths far below `u32::MAX` is accepted by the
/// protocol.
pub fn hash_index(key: &str, seed: u32, length: usize) -> usize {
    murmurhash3_x86_32(key.as_bytes(), seed) as usize % length
}

/// Key for a Bloom-filter position: the element and the filter length.
///
/// Folding the filter length into the key prevents aliasing between
/// filters of different sizes.
pub fn bloom_key(value: i32, filter_len: usize) -> String {
    format!("{value}|{filter_len}")
}

/// Key for a Linear-Counting bucket: both record coordinates and the
/// sketch length.
pub fn sketch_key(x: i32, y: i32, sketch_len: usize) -> String {
    format!("{x}|{y}|{sketch_len}")
}
