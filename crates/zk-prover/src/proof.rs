//! Proof types and serialization

use std::fmt;

use ark_bn254::Bn254;
use ark_ec::AffineRepr;
use ark_groth16::Proof as Groth16Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProverError, Result};
use crate::types::PublicInputs;

/// A Groth16 proof for the BN254 curve
#[derive(Clone, Debug, PartialEq)]
pub struct Proof {
    /// The underlying arkworks proof
    pub inner: Groth16Proof<Bn254>,
}

impl Proof {
    /// Create from arkworks proof
    pub fn new(inner: Groth16Proof<Bn254>) -> Self {
        Self { inner }
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.inner.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    /// Deserialize from bytes, rejecting points at infinity
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = Groth16Proof::<Bn254>::deserialize_compressed(bytes)?;
        if inner.a.is_zero() || inner.b.is_zero() || inner.c.is_zero() {
            return Err(ProverError::InvalidProofFormat {
                reason: "proof contains a point at infinity".into(),
            });
        }
        Ok(Self { inner })
    }
}

/// Opaque proof artifact, base64 on the wire
#[derive(Clone, PartialEq, Eq)]
pub struct ProofBytes(Vec<u8>);

impl ProofBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|e| ProverError::InvalidProofFormat {
                reason: e.to_string(),
            })
    }

    /// Decode into a Groth16 proof
    pub fn decode(&self) -> Result<Proof> {
        Proof::from_bytes(&self.0)
    }
}

impl TryFrom<&Proof> for ProofBytes {
    type Error = ProverError;

    fn try_from(proof: &Proof) -> Result<Self> {
        proof.to_bytes().map(Self)
    }
}

impl fmt::Debug for ProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = hex::encode(&self.0[..8.min(self.0.len())]);
        write!(f, "ProofBytes({} bytes, {prefix}..)", self.0.len())
    }
}

impl Serialize for ProofBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for ProofBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

/// Canonical eligibility proof: the artifact and the statement it proves
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityProof {
    /// The ZK proof
    pub proof: ProofBytes,
    /// Public inputs the proof was generated against
    #[serde(rename = "publicInputs")]
    pub public_inputs: PublicInputs,
}

impl EligibilityProof {
    pub fn new(proof: ProofBytes, public_inputs: PublicInputs) -> Self {
        Self {
            proof,
            public_inputs,
        }
    }

    pub fn required_threshold(&self) -> u64 {
        self.public_inputs.required_threshold
    }
}
