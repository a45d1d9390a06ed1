//! # ZK Jobs eligibility prover
//!
//! Confidential eligibility proofs for the ZK Jobs board: an applicant proves
//! `skill_score >= required_threshold` without revealing the score.
//!
//! ## Components
//!
//! - **Commitments**: Poseidon commitments binding private figures to public postings
//! - **Skill circuit**: Groth16 circuit with one private and one public input
//! - **Proof client**: talks to a proving backend and validates what comes back
//! - **Verification gateway**: pure accept/reject check used before state changes
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zkjobs_prover::{CircuitKeys, Domain, EligibilityProver, LocalTransport, ProofClient, VerificationGateway};
//!
//! let keys = Arc::new(CircuitKeys::generate_random(Domain::default())?);
//! let gateway = VerificationGateway::from_keys(&keys);
//! let client = ProofClient::new(LocalTransport::new(EligibilityProver::new(keys)), timeout);
//!
//! let proof = client.generate_eligibility_proof(80, 60).await?;
//! assert!(gateway.verify(&proof.proof, &proof.public_inputs, 60).is_accepted());
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backend;
pub mod circuits;
pub mod client;
pub mod commitment;
pub mod config;
pub mod error;
pub mod keys;
pub mod poseidon;
pub mod proof;
pub mod prover;
pub mod types;
pub mod verifier;

// Re-exports
pub use client::{HttpTransport, LocalTransport, ProofClient, ProofTransport, RetryPolicy};
pub use commitment::{BlindingFactor, Commitment, CommitmentDigest, Committer};
pub use config::ProverConfig;
pub use error::{ErrorKind, ProverError, Result};
pub use keys::CircuitKeys;
pub use proof::{EligibilityProof, ProofBytes};
pub use prover::EligibilityProver;
pub use types::{Domain, PublicInputs, SkillInput, SKILL_CIRCUIT};
pub use verifier::{EligibilityVerifier, RejectReason, Verification, VerificationGateway};
