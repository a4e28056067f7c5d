//! Somewhat-homomorphic encryption over large integers.
//!
//! A ciphertext is `(r·l + m)·(1 + r'·p) mod n` with `n = p·q`, so adding
//! or multiplying ciphertexts mod `n` adds or multiplies the plaintexts
//! mod `l` — as long as every decryptable value's `r·l + m` component
//! stays below `p`. Nothing detects overflow at decryption time; the
//! budget is enforced once, when the key is constructed.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;
use thiserror::Error;

use crate::params::{BLOOM_HASH_COUNT, MASK_NOISE_BITS, MESSAGE_NOISE_BITS};

/// Bits reserved on top of the multiplicative chain for bucket sums and
/// blinding scalars.
const NOISE_HEADROOM_BITS: u64 = 32;

const REFERENCE_P: &str = "5233808858138479536618943759233568376444256976872573755220264530216701300230327826853380953639064951471152569958211843163473693443883311067173407655367607147510877135360373293845922337248823432014739523180373605013498358606045480316064441597383737302095035096437710064596798442529055516554556861821144118318226857216387049077903970769079354625936493434678074694875814709144356817450626692905770855060547863448659970837661087778606985669604052136620092998840166000187704451419347662832963212745660712313573624537424902750715234118455770391473455288080218449902399257772336326478576953677777958744971771722322778885246503564964813461286255468512202633853729404637419225461802554686111155116774257333045551576839328979023849097484131955104383962442131613081404932400217789219566755816285028444858375743866069422135414119042271699252899128430576544715710765421616848586336369065156420141166067462726756799447191221059578968652167";

const REFERENCE_Q: &str = "5114103018554267540411353297842536611118835468878312039788617536904337156112902953720541016902997605230937954182537055448518163179233185930973105418909305925664336908874422118471183030198667240213118249676421396353473427646691315989521593869346932316303052283643036425319485782780466784362638090300262273163538647698168426356241893193057658542643282145900599159679583568462426158574469780988207795026114516665730000739850066157839149264154627401543428535762570920196353815072725758748266127902474744278643344641126956385808074211662478101110317419941216663829103660613128976830829141133857738968387012169619366533214774975770667294341277267579112584431203252083710469868046608894527129399601706361738760638856371309455097367308545444099121235584713745816033904192728837767768708407507265025672150049391041492981516164504458656779846648368917891856671499155813376104361542771292693580177562965008508549052389203104901701015243";

const REFERENCE_L: &str = "975861485164544069203193";

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("p and q must be distinct")]
    PrimesEqual,
    #[error("plaintext modulus must be smaller than p")]
    PlaintextModulusTooLarge,
    #[error("plaintext modulus shares a factor with p")]
    PlaintextModulusNotCoprime,
    #[error(
        "noise budget exceeded: a depth-{depth} product needs {required} bits but p has {available}"
    )]
    NoiseBudget {
        depth: u64,
        required: u64,
        available: u64,
    },
}

/// Noise bit-widths. The defaults are the interoperable reference values;
/// parties that change them must change them together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheParams {
    /// Bit width of the mask-side noise `r'` (k0).
    pub mask_noise_bits: u64,
    /// Bit width of the message-side noise `r` (k2).
    pub message_noise_bits: u64,
}

impl Default for SheParams {
    fn default() -> Self {
        Self {
            mask_noise_bits: MASK_NOISE_BITS,
            message_noise_bits: MESSAGE_NOISE_BITS,
        }
    }
}

/// Secret key. Owned by the client; only the public modulus `n` ever
/// leaves it.
pub struct SecretKey {
    p: BigUint,
    l: BigUint,
    n: BigUint,
    params: SheParams,
}

impl SecretKey {
    /// Assemble a key and verify it can carry the protocol's circuit.
    ///
    /// The range-membership evaluation multiplies `2k` ciphertexts per
    /// record, so a decryptable bucket holds a sum of products of `2k`
    /// terms, each of `message_noise_bits + bits(l)` bits. The whole sum
    /// must stay below `p`, or decryption silently garbles; this is the
    /// only place that bound is checked.
    pub fn new(p: BigUint, q: BigUint, l: BigUint, params: SheParams) -> Result<Self, KeyError> {
        if p == q {
            return Err(KeyError::PrimesEqual);
        }
        if l >= p {
            return Err(KeyError::PlaintextModulusTooLarge);
        }
        if !p.gcd(&l).is_one() {
            return Err(KeyError::PlaintextModulusNotCoprime);
        }

        let depth = 2 * BLOOM_HASH_COUNT as u64;
        let required = depth * (params.message_noise_bits + l.bits()) + NOISE_HEADROOM_BITS;
        if required > p.bits() {
            return Err(KeyError::NoiseBudget {
                depth,
                required,
                available: p.bits(),
            });
        }

        let n = &p * &q;
        Ok(Self { p, l, n, params })
    }

    /// The reference key: 3072-bit primes with an 80-bit prime plaintext
    /// modulus. Key generation is outside the protocol; interoperating
    /// parties agree on the modulus this key implies.
    ///
    /// 2048-bit primes do not survive the depth-14 indicator chain (the
    /// budget check above needs ~2250 bits), hence the larger primes.
    pub fn reference() -> Self {
        let p = BigUint::parse_bytes(REFERENCE_P.as_bytes(), 10)
            .expect("reference prime p is a valid decimal literal");
        let q = BigUint::parse_bytes(REFERENCE_Q.as_bytes(), 10)
            .expect("reference prime q is a valid decimal literal");
        let l = BigUint::parse_bytes(REFERENCE_L.as_bytes(), 10)
            .expect("reference modulus l is a valid decimal literal");
        Self::new(p, q, l, SheParams::default()).expect("reference key satisfies the noise budget")
    }

    /// The public modulus `n = p·q`, shipped in cleartext with every query.
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// The plaintext-space modulus `l`.
    pub fn plaintext_modulus(&self) -> &BigUint {
        &self.l
    }

    pub fn params(&self) -> SheParams {
        self.params
    }

    /// Encrypt `m ∈ [0, l)`.
    pub fn encrypt(&self, m: &BigUint, rng: &mut impl Rng) -> BigUint {
        let r = random_bits(rng, self.params.message_noise_bits);
        let r_prime = random_bits(rng, self.params.mask_noise_bits);
        (r * &self.l + m) * (BigUint::one() + r_prime * &self.p) % &self.n
    }

    /// Decrypt: `(c mod p) mod l`. Defined for every integer; a ciphertext
    /// whose noise overflowed `p` decrypts to an arbitrary value.
    pub fn decrypt(&self, c: &BigUint) -> BigUint {
        c % &self.p % &self.l
    }
}

/// Uniform integer in `[0, 2^bits)`: fill whole random bytes, mask the
/// excess high bits.
pub fn random_bits(rng: &mut impl Rng, bits: u64) -> BigUint {
    if bits == 0 {
        return BigUint::zero();
    }
    let mut bytes = vec![0u8; bits.div_ceil(8) as usize];
    rng.fill_bytes(&mut bytes);
    let rem = bits % 8;
    if rem != 0 {
        bytes[0] &= (1u8 << rem) - 1;
    }
    BigUint::from_bytes_be(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_random_bits_bounded() {
        let mut rng = rng();
        for bits in [1u64, 7, 8, 9, 80, 4096] {
            for _ in 0..8 {
                let r = random_bits(&mut rng, bits);
                assert!(r.bits() <= bits, "{r} exceeds {bits} bits");
            }
        }
        assert!(random_bits(&mut rng, 0).is_zero());
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = SecretKey::reference();
        let mut rng = rng();
        let l = key.plaintext_modulus().clone();

        for m in [
            BigUint::zero(),
            BigUint::one(),
            BigUint::from(2u32),
            BigUint::from(12_345_678u32),
            l.clone() - 1u32,
        ] {
            let c = key.encrypt(&m, &mut rng);
            assert_eq!(key.decrypt(&c), m, "round trip failed for {m}");
        }
    }

    #[test]
    fn test_ciphertexts_not_canonical() {
        let key = SecretKey::reference();
        let mut rng = rng();
        let m = BigUint::from(7u32);
        let c1 = key.encrypt(&m, &mut rng);
        let c2 = key.encrypt(&m, &mut rng);
        assert_ne!(c1, c2);
        assert_eq!(key.decrypt(&c1), key.decrypt(&c2));
    }

    #[test]
    fn test_additive_homomorphism() {
        let key = SecretKey::reference();
        let mut rng = rng();
        let n = key.modulus();

        let m1 = BigUint::from(40u32);
        let m2 = BigUint::from(2u32);
        let c = (key.encrypt(&m1, &mut rng) + key.encrypt(&m2, &mut rng)) % n;
        assert_eq!(key.decrypt(&c), BigUint::from(42u32));
    }

    #[test]
    fn test_multiplicative_homomorphism() {
        let key = SecretKey::reference();
        let mut rng = rng();
        let n = key.modulus();

        let m1 = BigUint::from(6u32);
        let m2 = BigUint::from(7u32);
        let c = key.encrypt(&m1, &mut rng) * key.encrypt(&m2, &mut rng) % n;
        assert_eq!(key.decrypt(&c), BigUint::from(42u32));
    }

    #[test]
    fn test_scalar_multiplication() {
        let key = SecretKey::reference();
        let mut rng = rng();
        let n = key.modulus();

        let c = key.encrypt(&BigUint::from(5u32), &mut rng) * BigUint::from(9u32) % n;
        assert_eq!(key.decrypt(&c), BigUint::from(45u32));
    }

    #[test]
    fn test_protocol_depth_product_of_ones() {
        // The full indicator chain: 2k = 14 encrypted ones multiplied
        // together must still decrypt to 1.
        let key = SecretKey::reference();
        let mut rng = rng();
        let n = key.modulus();

        let mut acc = BigUint::one();
        for _ in 0..14 {
            acc = acc * key.encrypt(&BigUint::one(), &mut rng) % n;
        }
        assert_eq!(key.decrypt(&acc), BigUint::one());
    }

    #[test]
    fn test_protocol_depth_product_with_zero() {
        // One encrypted zero anywhere in the chain forces the product to 0.
        let key = SecretKey::reference();
        let mut rng = rng();
        let n = key.modulus();

        let mut acc = BigUint::one();
        for i in 0..14 {
            let bit = if i == 5 { BigUint::zero() } else { BigUint::one() };
            acc = acc * key.encrypt(&bit, &mut rng) % n;
        }
        assert!(key.decrypt(&acc).is_zero());
    }

    #[test]
    fn test_blinded_bucket_accumulation() {
        // A bucket seeded with u·E(0) + v·E(0) and fed one indicator must
        // decrypt to the indicator alone.
        let key = SecretKey::reference();
        let mut rng = rng();
        let n = key.modulus();

        let e0_a = key.encrypt(&BigUint::zero(), &mut rng);
        let e0_b = key.encrypt(&BigUint::zero(), &mut rng);
        let bucket = (BigUint::from(37u32) * e0_a + BigUint::from(99u32) * e0_b) % n;

        let sign = key.encrypt(&BigUint::one(), &mut rng);
        let bucket = (bucket + sign) % n;
        assert_eq!(key.decrypt(&bucket), BigUint::one());
    }

    #[test]
    fn test_rejects_equal_primes() {
        let p = BigUint::from(101u32);
        let err = SecretKey::new(p.clone(), p, BigUint::from(7u32), SheParams::default());
        assert!(matches!(err, Err(KeyError::PrimesEqual)));
    }

    #[test]
    fn test_rejects_oversized_plaintext_modulus() {
        let err = SecretKey::new(
            BigUint::from(101u32),
            BigUint::from(103u32),
            BigUint::from(1009u32),
            SheParams::default(),
        );
        assert!(matches!(err, Err(KeyError::PlaintextModulusTooLarge)));
    }

    #[test]
    fn test_rejects_shared_factor() {
        let err = SecretKey::new(
            BigUint::from(15u32),
            BigUint::from(17u32),
            BigUint::from(5u32),
            SheParams::default(),
        );
        assert!(matches!(err, Err(KeyError::PlaintextModulusNotCoprime)));
    }

    #[test]
    fn test_rejects_insufficient_noise_budget() {
        // Small primes cannot carry a depth-14 product of 80+3-bit terms.
        let err = SecretKey::new(
            BigUint::from(101u32),
            BigUint::from(103u32),
            BigUint::from(7u32),
            SheParams::default(),
        );
        assert!(matches!(err, Err(KeyError::NoiseBudget { depth: 14, .. })));
    }

    #[test]
    fn test_reference_key_passes_validation() {
        let key = SecretKey::reference();
        assert_eq!(key.modulus().bits(), 6144);
        assert_eq!(key.plaintext_modulus().bits(), 80);
    }
}
