//! Length-prefixed wire codec for vectors of large integers.
//!
//! Frame: a `u32` little-endian total payload length, then records of a
//! `u32` little-endian byte length followed by the integer's big-endian
//! magnitude (most significant byte first). Zero is a zero-length record.
//! The byte order is pinned explicitly; the stream works unchanged across
//! heterogeneous hosts.

use std::io::{Read, Write};

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

/// Hard cap on one frame's payload. The largest legal message — 8192
/// sketch ciphertexts of a 6144-bit modulus — is under 7 MiB, so this is
/// generous while still bounding a hostile length prefix.
pub const MAX_FRAME_BYTES: u32 = 256 * 1024 * 1024;

/// Rough ciphertext size used to pre-size encode buffers.
const RECORD_SIZE_HINT: usize = 800;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("i/o failure on wire: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame of {got} bytes exceeds the {max}-byte bound")]
    FrameTooLarge { got: u64, max: u32 },
    #[error("record of {len} bytes overruns the frame at offset {offset}")]
    TruncatedRecord { offset: usize, len: u32 },
    #[error("frame ends mid-header at offset {offset}")]
    TruncatedHeader { offset: usize },
}

/// Encode a vector of integers into one frame payload (without the outer
/// length prefix).
pub fn encode_vec(numbers: &[BigUint]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(numbers.len() * RECORD_SIZE_HINT);
    for num in numbers {
        if num.is_zero() {
            buf.extend_from_slice(&0u32.to_le_bytes());
        } else {
            let bytes = num.to_bytes_be();
            buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(&bytes);
        }
    }
    buf
}

/// Decode one frame payload. The buffer must be consumed exactly: a
/// record running past the end or a dangling partial header is an error.
pub fn decode_vec(payload: &[u8]) -> Result<Vec<BigUint>, WireError> {
    let mut numbers = Vec::new();
    let mut offset = 0usize;

    while offset < payload.len() {
        let Some(header) = payload.get(offset..offset + 4) else {
            return Err(WireError::TruncatedHeader { offset });
        };
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(header);
        let len = u32::from_le_bytes(len_bytes);
        offset += 4;

        let end = offset + len as usize;
        let Some(body) = payload.get(offset..end) else {
            return Err(WireError::TruncatedRecord { offset, len });
        };
        numbers.push(if body.is_empty() {
            BigUint::zero()
        } else {
            BigUint::from_bytes_be(body)
        });
        offset = end;
    }
    Ok(numbers)
}

/// Write one frame: the length prefix plus the encoded payload.
pub fn write_frame(w: &mut impl Write, numbers: &[BigUint]) -> Result<(), WireError> {
    let payload = encode_vec(numbers);
    if payload.len() as u64 > MAX_FRAME_BYTES as u64 {
        return Err(WireError::FrameTooLarge {
            got: payload.len() as u64,
            max: MAX_FRAME_BYTES,
        });
    }
    w.write_all(&(payload.len() as u32).to_le_bytes())?;
    w.write_all(&payload)?;
    w.flush()?;
    Ok(())
}

/// Read one frame, enforcing the payload bound before allocating.
pub fn read_frame(r: &mut impl Read) -> Result<Vec<BigUint>, WireError> {
    let mut prefix = [0u8; 4];
    r.read_exact(&mut prefix)?;
    let total = u32::from_le_bytes(prefix);
    if total > MAX_FRAME_BYTES {
        return Err(WireError::FrameTooLarge {
            got: total as u64,
            max: MAX_FRAME_BYTES,
        });
    }

    let mut payload = vec![0u8; total as usize];
    r.read_exact(&mut payload)?;
    decode_vec(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn roundtrip(numbers: &[BigUint]) -> Vec<BigUint> {
        decode_vec(&encode_vec(numbers)).unwrap()
    }

    #[test]
    fn test_pinned_byte_layout() {
        // [0, 1, 255, 256, 2^256 − 1] encodes to an exact byte sequence:
        // LE lengths, BE magnitudes, zero as an empty record.
        let numbers = vec![
            BigUint::zero(),
            BigUint::one(),
            BigUint::from(255u32),
            BigUint::from(256u32),
            (BigUint::one() << 256usize) - 1u32,
        ];

        let mut expected: Vec<u8> = Vec::new();
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        expected.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x01]);
        expected.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0xFF]);
        expected.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x01, 0x00]);
        expected.extend_from_slice(&[0x20, 0x00, 0x00, 0x00]);
        expected.extend_from_slice(&[0xFF; 32]);

        assert_eq!(encode_vec(&numbers), expected);

        // The framed stream prepends the LE total length (56 = 0x38).
        let mut framed = Vec::new();
        write_frame(&mut framed, &numbers).unwrap();
        assert_eq!(&framed[..4], &[0x38, 0x00, 0x00, 0x00]);
        assert_eq!(&framed[4..], &expected[..]);
    }

    #[test]
    fn test_roundtrip_small_values() {
        let numbers: Vec<BigUint> = (0..20u32).map(BigUint::from).collect();
        assert_eq!(roundtrip(&numbers), numbers);
    }

    #[test]
    fn test_roundtrip_random_large_values() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let numbers: Vec<BigUint> = (0..64)
            .map(|_| {
                let len = rng.random_range(0..512);
                let mut bytes = vec![0u8; len];
                rng.fill_bytes(&mut bytes);
                BigUint::from_bytes_be(&bytes)
            })
            .collect();
        assert_eq!(roundtrip(&numbers), numbers);
    }

    #[test]
    fn test_roundtrip_empty_vector() {
        assert_eq!(roundtrip(&[]), vec![]);
        let mut framed = Vec::new();
        write_frame(&mut framed, &[]).unwrap();
        assert_eq!(framed, vec![0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_roundtrip_through_io() {
        let numbers: Vec<BigUint> = vec![
            BigUint::zero(),
            BigUint::from(123_456_789u64),
            BigUint::one() << 1000usize,
        ];
        let mut stream = Vec::new();
        write_frame(&mut stream, &numbers).unwrap();
        let decoded = read_frame(&mut stream.as_slice()).unwrap();
        assert_eq!(decoded, numbers);
    }

    #[test]
    fn test_decode_rejects_record_overrun() {
        // A record claiming 10 bytes with only 2 present.
        let mut payload = Vec::new();
        payload.extend_from_slice(&10u32.to_le_bytes());
        payload.extend_from_slice(&[0xAA, 0xBB]);
        let err = decode_vec(&payload);
        assert!(matches!(
            err,
            Err(WireError::TruncatedRecord { offset: 4, len: 10 })
        ));
    }

    #[test]
    fn test_decode_rejects_partial_header() {
        let err = decode_vec(&[0x01, 0x00]);
        assert!(matches!(err, Err(WireError::TruncatedHeader { offset: 0 })));
    }

    #[test]
    fn test_read_rejects_oversized_frame() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = read_frame(&mut stream.as_slice());
        assert!(matches!(err, Err(WireError::FrameTooLarge { .. })));
    }

    #[test]
    fn test_read_rejects_short_stream() {
        // Prefix promises 100 bytes, stream ends early.
        let mut stream = Vec::new();
        stream.extend_from_slice(&100u32.to_le_bytes());
        stream.extend_from_slice(&[0u8; 10]);
        let err = read_frame(&mut stream.as_slice());
        assert!(matches!(err, Err(WireError::Io(_))));
    }
}
