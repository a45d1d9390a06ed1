//! Hiding, binding commitments to private numeric values
//!
//! `digest = Poseidon(value, blinding_factor)` over BN254. The blinding factor
//! is a uniformly random field element, so the digest reveals nothing about
//! `value` to anyone without it.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalDeserialize;
use ark_std::UniformRand;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{ProverError, Result};
use crate::poseidon::{fr_to_string, string_to_fr, PoseidonHasher};
use crate::types::Domain;

fn fr_to_hex(f: &Fr) -> String {
    hex::encode(f.into_bigint().to_bytes_be())
}

fn fr_from_hex(s: &str) -> Result<Fr> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| ProverError::InvalidProofFormat { reason: e.to_string() })?;
    if bytes.len() != 32 {
        return Err(ProverError::InvalidProofFormat {
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        });
    }
    let mut le = bytes;
    le.reverse();
    Fr::deserialize_compressed(le.as_slice()).map_err(ProverError::from)
}

/// Random blinding factor, known only to the committing party
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlindingFactor(Fr);

impl BlindingFactor {
    /// Draw a fresh blinding factor from the given CSPRNG
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }

    /// Draw a fresh blinding factor from the operating system RNG
    pub fn generate() -> Self {
        Self::random(&mut OsRng)
    }

    pub fn from_field(f: Fr) -> Self {
        Self(f)
    }

    pub fn as_field(&self) -> &Fr {
        &self.0
    }

    /// Parse from a decimal string
    pub fn from_decimal(s: &str) -> Result<Self> {
        string_to_fr(s).map(Self)
    }

    /// Render as a decimal string
    pub fn to_decimal(&self) -> String {
        fr_to_string(&self.0)
    }

    /// Render as 32 big-endian hex bytes
    pub fn to_hex(&self) -> String {
        fr_to_hex(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        fr_from_hex(s).map(Self)
    }
}

impl fmt::Debug for BlindingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlindingFactor(<secret>)")
    }
}

/// Public commitment digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitmentDigest(Fr);

impl CommitmentDigest {
    pub fn as_field(&self) -> &Fr {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        fr_to_hex(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        fr_from_hex(s).map(Self)
    }
}

impl fmt::Debug for CommitmentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentDigest(0x{})", self.to_hex())
    }
}

impl fmt::Display for CommitmentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for CommitmentDigest {
    type Err = ProverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for CommitmentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CommitmentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A digest together with the blinding factor that opens it
#[derive(Debug, Clone, Copy)]
pub struct Commitment {
    pub digest: CommitmentDigest,
    pub blinding_factor: BlindingFactor,
}

/// Computes and checks commitments within a numeric domain
#[derive(Clone)]
pub struct Committer {
    hasher: PoseidonHasher,
    domain: Domain,
}

impl Committer {
    pub fn new(domain: Domain) -> Self {
        Self {
            hasher: PoseidonHasher::new(),
            domain,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Commit to `value` under `blinding_factor`
    ///
    /// Deterministic: the same pair always yields the same digest.
    pub fn commit(&self, value: u64, blinding_factor: &BlindingFactor) -> Result<CommitmentDigest> {
        self.domain.check_value(value)?;
        Ok(CommitmentDigest(
            self.hasher.hash_blinded(value, blinding_factor.as_field()),
        ))
    }

    /// Commit to `value` under a freshly drawn blinding factor
    pub fn generate(&self, value: u64) -> Result<Commitment> {
        let blinding_factor = BlindingFactor::generate();
        let digest = self.commit(value, &blinding_factor)?;
        debug!(domain = %self.domain, "generated commitment {}", digest);
        Ok(Commitment {
            digest,
            blinding_factor,
        })
    }

    /// Recompute and compare; out-of-range values never verify
    pub fn verify_commitment(
        &self,
        digest: &CommitmentDigest,
        value: u64,
        blinding_factor: &BlindingFactor,
    ) -> bool {
        match self.commit(value, blinding_factor) {
            Ok(recomputed) => recomputed == *digest,
            Err(_) => false,
        }
    }
}

impl Default for Committer {
    fn default() -> Self {
        Self::new(Domain::default())
    }
}
