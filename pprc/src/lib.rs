//! Privacy-preserving range counting (PPRC) over encrypted Bloom filters
//! and Linear-Counting sketches.
//!
//! Three parties cooperate. The client encodes a rectangular range as two
//! Bloom filters and encrypts every bit under an integer SHE scheme. Data
//! holders evaluate range membership homomorphically, producing one
//! encrypted 0/1 indicator per record, and deposit the indicators into
//! per-provider Linear-Counting sketches. An aggregator sums the sketches
//! bucket-wise, blinds and shuffles them, and returns the result; the
//! client decrypts and estimates the cardinality of the intersection.
//!
//! The aggregator never holds the secret key, the holders never see the
//! queried range or their own indicators, and the client learns only the
//! blinded bucket multiset.

pub mod aggregate;
pub mod bloom;
pub mod client;
pub mod estimate;
pub mod hash;
pub mod holder;
pub mod params;
pub mod protocol;
pub mod she;
pub mod wire;

// Re-export commonly used types for convenience
pub use bloom::BloomFilter;
pub use holder::DataHolder;
pub use protocol::{ProtocolError, QueryPayload};
pub use she::{KeyError, SecretKey, SheParams};
pub use wire::WireError;
