//! ZK-SNARK proof generation

use std::sync::Arc;
use std::time::Instant;

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::SNARK;
use ark_std::rand::thread_rng;
use tracing::{debug, info, instrument};

use crate::circuits::SkillCircuit;
use crate::error::{ProverError, Result};
use crate::keys::CircuitKeys;
use crate::proof::{EligibilityProof, Proof, ProofBytes};
use crate::types::{Domain, SkillInput};

/// In-process proving backend for the skill circuit
#[derive(Clone)]
pub struct EligibilityProver {
    keys: Arc<CircuitKeys>,
}

impl EligibilityProver {
    /// Create a new prover from circuit keys
    pub fn new(keys: Arc<CircuitKeys>) -> Self {
        Self { keys }
    }

    pub fn domain(&self) -> Domain {
        self.keys.domain()
    }

    pub fn keys(&self) -> &Arc<CircuitKeys> {
        &self.keys
    }

    /// Generate an eligibility proof
    ///
    /// Proves that `skill_score >= required_threshold` without revealing the
    /// score. Inputs that cannot yield an honest proof are refused up front.
    #[instrument(skip(self, input), fields(threshold = input.required_threshold))]
    pub fn prove(&self, input: &SkillInput) -> Result<EligibilityProof> {
        input.validate(&self.domain())?;

        let start = Instant::now();
        let circuit = SkillCircuit::from_input(self.domain(), input);

        let mut rng = thread_rng();
        let proof = Groth16::<Bn254>::prove(self.keys.proving_key(), circuit, &mut rng).map_err(
            |e| ProverError::ArkError(format!("proving failed: {e}")),
        )?;

        let bytes = ProofBytes::try_from(&Proof::new(proof))?;
        info!(
            "Proof generated in {:?} ({} bytes)",
            start.elapsed(),
            bytes.as_bytes().len()
        );

        Ok(EligibilityProof::new(bytes, input.public_inputs()))
    }

    /// Self-check a freshly generated proof against this prover's own keys
    pub fn check(&self, proof: &EligibilityProof) -> Result<bool> {
        let decoded = proof.proof.decode()?;
        let inputs = SkillCircuit::public_input_vector(&proof.public_inputs);
        let ok = Groth16::<Bn254>::verify(self.keys.verifying_key(), &inputs, &decoded.inner)?;
        debug!("Self-check result: {}", ok);
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prover() -> EligibilityProver {
        let keys = CircuitKeys::from_seed(Domain::default(), 42).unwrap();
        EligibilityProver::new(Arc::new(keys))
    }

    #[test]
    fn test_prove_and_self_check() {
        let prover = prover();
        let proof = prover.prove(&SkillInput::new(80, 60)).unwrap();
        assert_eq!(proof.required_threshold(), 60);
        assert!(prover.check(&proof).unwrap());
    }

    #[test]
    fn test_refuses_low_score() {
        let err = prover().prove(&SkillInput::new(50, 60)).unwrap_err();
        assert!(matches!(err, ProverError::ThresholdNotMet { threshold: 60 }));
    }

    #[test]
    fn test_restated_threshold_fails_self_check() {
        let prover = prover();
        let mut proof = prover.prove(&SkillInput::new(80, 60)).unwrap();
        proof.public_inputs.required_threshold = 70;
        assert!(!prover.check(&proof).unwrap());
    }
}
