//! Poseidon hash over BN254 built on the arkworks sponge

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::{ProverError, Result};

const RATE: usize = 2;
const CAPACITY: usize = 1;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 57;
const ALPHA: u64 = 5;

/// Poseidon hasher with width-3 BN254 parameters
#[derive(Clone)]
pub struct PoseidonHasher {
    config: PoseidonConfig<Fr>,
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseidonHasher {
    /// Create a new Poseidon hasher
    ///
    /// Round constants and the MDS matrix are derived with the Grain LFSR,
    /// so building a hasher is not free; share one where possible.
    pub fn new() -> Self {
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            u64::from(Fr::MODULUS_BIT_SIZE),
            RATE,
            FULL_ROUNDS as u64,
            PARTIAL_ROUNDS as u64,
            0,
        );
        Self {
            config: PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, CAPACITY),
        }
    }

    /// Hash inputs using Poseidon
    pub fn hash(&self, inputs: &[Fr]) -> Fr {
        let mut sponge = PoseidonSponge::new(&self.config);
        sponge.absorb(&inputs.to_vec());
        sponge.squeeze_field_elements::<Fr>(1)[0]
    }

    /// Hash a value together with its blinding factor: Poseidon(value, blinding)
    pub fn hash_blinded(&self, value: u64, blinding: &Fr) -> Fr {
        self.hash(&[Fr::from(value), *blinding])
    }
}

/// Convert a decimal string to Fr
pub fn string_to_fr(s: &str) -> Result<Fr> {
    let biguint = BigUint::from_str_radix(s, 10)
        .map_err(|e| ProverError::ArkError(format!("Invalid number: {e}")))?;

    if biguint >= BigUint::from(Fr::MODULUS) {
        return Err(ProverError::ArkError(format!(
            "Number exceeds the field modulus: {s}"
        )));
    }

    Ok(Fr::from_be_bytes_mod_order(&biguint.to_bytes_be()))
}

/// Convert Fr to decimal string
pub fn fr_to_string(f: &Fr) -> String {
    BigUint::from(f.into_bigint()).to_str_radix(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poseidon_hash() {
        let hasher = PoseidonHasher::new();

        let input1 = Fr::from(1u64);
        let input2 = Fr::from(2u64);

        let hash = hasher.hash(&[input1, input2]);

        // Verify hash is deterministic, also across hasher instances
        assert_eq!(hash, hasher.hash(&[input1, input2]));
        assert_eq!(hash, PoseidonHasher::new().hash(&[input1, input2]));

        // Order matters
        assert_ne!(hash, hasher.hash(&[input2, input1]));
    }

    #[test]
    fn test_hash_blinded() {
        let hasher = PoseidonHasher::new();
        let blinding = Fr::from(123_456_789u64);

        let h = hasher.hash_blinded(8500, &blinding);
        assert_eq!(h, hasher.hash_blinded(8500, &blinding));
        assert_ne!(h, hasher.hash_blinded(8501, &blinding));
        assert_ne!(h, hasher.hash_blinded(8500, &Fr::from(123_456_790u64)));
    }

    #[test]
    fn test_decimal_conversion() {
        let f = string_to_fr("987654321").unwrap();
        assert_eq!(f, Fr::from(987_654_321u64));
        assert_eq!(fr_to_string(&f), "987654321");

        assert!(string_to_fr("not a number").is_err());

        let modulus = BigUint::from(Fr::MODULUS).to_str_radix(10);
        assert!(string_to_fr(&modulus).is_err());
    }
}
