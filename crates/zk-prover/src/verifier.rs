//! Verification gateway for eligibility proofs
//!
//! Pure and deterministic: no I/O, no mutable state. Malformed input is a
//! rejection with a reason, never an error.

use std::fmt;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, PreparedVerifyingKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::circuits::SkillCircuit;
use crate::keys::CircuitKeys;
use crate::proof::ProofBytes;
use crate::types::{Domain, PublicInputs};

/// Why a proof was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The proof could not be decoded
    MalformedProof,
    /// The proof's public inputs differ from the expected statement, or
    /// state a threshold outside the domain
    PublicInputMismatch,
    /// The pairing check failed
    VerificationFailed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedProof => "malformed proof",
            Self::PublicInputMismatch => "public input mismatch",
            Self::VerificationFailed => "verification failed",
        };
        f.write_str(s)
    }
}

/// Outcome of checking one proof
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Accepted,
    Rejected(RejectReason),
}

impl Verification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Anything that can decide whether a proof attests `score >= expected_threshold`
pub trait EligibilityVerifier: Send + Sync {
    fn verify(
        &self,
        proof: &ProofBytes,
        public_inputs: &PublicInputs,
        expected_threshold: u64,
    ) -> Verification;
}

/// Groth16 verifier for the skill circuit
#[derive(Clone)]
pub struct VerificationGateway {
    domain: Domain,
    pvk: PreparedVerifyingKey<Bn254>,
}

impl VerificationGateway {
    /// Create a gateway from a verifying key
    pub fn new(domain: Domain, vk: &VerifyingKey<Bn254>) -> Self {
        Self {
            domain,
            pvk: ark_groth16::prepare_verifying_key(vk),
        }
    }

    pub fn from_keys(keys: &CircuitKeys) -> Self {
        Self::new(keys.domain(), keys.verifying_key())
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Check `proof` for the statement `score >= expected_threshold`
    #[instrument(skip(self, proof))]
    pub fn verify(
        &self,
        proof: &ProofBytes,
        public_inputs: &PublicInputs,
        expected_threshold: u64,
    ) -> Verification {
        // Cheap check first
        if public_inputs.required_threshold != expected_threshold {
            debug!("Rejecting: proof states threshold {}", public_inputs.required_threshold);
            return Verification::Rejected(RejectReason::PublicInputMismatch);
        }
        if !self.domain.contains(expected_threshold) {
            debug!("Rejecting: threshold {} outside {}", expected_threshold, self.domain);
            return Verification::Rejected(RejectReason::PublicInputMismatch);
        }

        let decoded = match proof.decode() {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("Rejecting: {}", e);
                return Verification::Rejected(RejectReason::MalformedProof);
            }
        };

        let inputs = SkillCircuit::public_input_vector(public_inputs);
        match Groth16::<Bn254>::verify_proof(&self.pvk, &decoded.inner, &inputs) {
            Ok(true) => Verification::Accepted,
            Ok(false) => Verification::Rejected(RejectReason::VerificationFailed),
            Err(e) => {
                debug!("Rejecting: {}", e);
                Verification::Rejected(RejectReason::VerificationFailed)
            }
        }
    }

    /// Check many proofs at once; results are in input order
    #[cfg(feature = "parallel")]
    pub fn verify_batch(&self, items: &[(ProofBytes, PublicInputs, u64)]) -> Vec<Verification> {
        use rayon::prelude::*;

        items
            .par_iter()
            .map(|(proof, inputs, expected)| self.verify(proof, inputs, *expected))
            .collect()
    }
}

impl EligibilityVerifier for VerificationGateway {
    fn verify(
        &self,
        proof: &ProofBytes,
        public_inputs: &PublicInputs,
        expected_threshold: u64,
    ) -> Verification {
        VerificationGateway::verify(self, proof, public_inputs, expected_threshold)
    }
}
