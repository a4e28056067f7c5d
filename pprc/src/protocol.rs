//! Query payload layout shared by client, aggregator, and holder.
//!
//! A query travels as one flat ciphertext vector:
//!
//! ```text
//! [ BFx bits ][ BFy bits ][ E(0) ][ E(0) ][ n ]
//! ```
//!
//! Both filters have the same length, so a receiver recovers it as
//! `(len - 3) / 2`. The two `E(0)` ciphertexts are blinding seeds the
//! holder consumes when initializing sketch buckets; the trailing public
//! modulus is the only cleartext element.

use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("query vector of length {len} cannot hold two equal-length filters plus trailer")]
    MalformedQuery { len: usize },
    #[error("sketch vector of length {len} is not a positive multiple of {providers} providers")]
    SketchShape { len: usize, providers: usize },
}

/// Receiver-side view of a query payload.
pub struct QueryPayload {
    bf_x: Vec<BigUint>,
    bf_y: Vec<BigUint>,
    blind_a: BigUint,
    blind_b: BigUint,
    modulus: BigUint,
}

impl QueryPayload {
    /// Split a received vector into its five fields.
    pub fn from_vec(mut v: Vec<BigUint>) -> Result<Self, ProtocolError> {
        let len = v.len();
        if len < 5 || (len - 3) % 2 != 0 {
            return Err(ProtocolError::MalformedQuery { len });
        }
        let filter_len = (len - 3) / 2;

        let mut trailer = v.split_off(2 * filter_len);
        let bf_y = v.split_off(filter_len);
        let bf_x = v;

        let modulus = trailer.pop();
        let blind_b = trailer.pop();
        let blind_a = trailer.pop();
        match (blind_a, blind_b, modulus) {
            (Some(blind_a), Some(blind_b), Some(modulus)) => Ok(Self {
                bf_x,
                bf_y,
                blind_a,
                blind_b,
                modulus,
            }),
            _ => Err(ProtocolError::MalformedQuery { len }),
        }
    }

    /// Length of each encrypted Bloom filter.
    pub fn filter_len(&self) -> usize {
        self.bf_x.len()
    }

    /// Encrypted x-dimension filter bits.
    pub fn bf_x(&self) -> &[BigUint] {
        &self.bf_x
    }

    /// Encrypted y-dimension filter bits.
    pub fn bf_y(&self) -> &[BigUint] {
        &self.bf_y
    }

    /// First blinding seed, an encryption of zero.
    pub fn blind_a(&self) -> &BigUint {
        &self.blind_a
    }

    /// Second blinding seed, an encryption of zero.
    pub fn blind_b(&self) -> &BigUint {
        &self.blind_b
    }

    /// The public modulus `n` all homomorphic arithmetic reduces by.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}
