//! The eligibility circuit
//!
//! `SkillCircuit(private skill_score, public required_threshold)` is satisfiable
//! iff `skill_score >= required_threshold` and both fit in the domain.
//!
//! Non-negativity is enforced by bit decomposition: `threshold`, `score` and
//! `score - threshold` must each recompose from `domain.bits()` boolean
//! witnesses. Over the field, a negative difference wraps to roughly the
//! modulus and has no such decomposition.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::types::{Domain, PublicInputs, SkillInput};

/// Eligibility circuit: proves `score >= threshold` without revealing score
#[derive(Clone)]
pub struct SkillCircuit {
    /// Public: job's required threshold
    pub threshold: Fr,
    /// Private: applicant's skill score
    pub score: Fr,
    /// Width of the range checks
    pub domain: Domain,
}

impl SkillCircuit {
    /// Create a new skill circuit
    pub fn new(domain: Domain, score: u64, threshold: u64) -> Self {
        Self {
            threshold: Fr::from(threshold),
            score: Fr::from(score),
            domain,
        }
    }

    /// Circuit instance for key generation; witness values are irrelevant
    pub fn blank(domain: Domain) -> Self {
        Self::new(domain, 0, 0)
    }

    pub fn from_input(domain: Domain, input: &SkillInput) -> Self {
        Self::new(domain, input.skill_score, input.required_threshold)
    }

    /// Field encoding of the public inputs, in allocation order
    pub fn public_input_vector(inputs: &PublicInputs) -> Vec<Fr> {
        vec![Fr::from(inputs.required_threshold)]
    }
}

/// Constrain `var` to be representable in `bits` bits.
///
/// `value` is the native value of `var`, used only to assign the bit witnesses.
fn enforce_bit_range(
    cs: ConstraintSystemRef<Fr>,
    var: &FpVar<Fr>,
    value: Fr,
    bits: u32,
) -> Result<(), SynthesisError> {
    let repr = value.into_bigint();
    let witness_bits = (0..bits as usize)
        .map(|i| Boolean::new_witness(cs.clone(), || Ok(repr.get_bit(i))))
        .collect::<Result<Vec<_>, _>>()?;

    let recomposed = Boolean::le_bits_to_fp_var(&witness_bits)?;
    recomposed.enforce_equal(var)
}

impl ConstraintSynthesizer<Fr> for SkillCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let bits = self.domain.bits();

        // Exactly one public input, one private witness
        let threshold_var = FpVar::new_input(cs.clone(), || Ok(self.threshold))?;
        let score_var = FpVar::new_witness(cs.clone(), || Ok(self.score))?;

        // Both operands in range, so the difference cannot wrap silently
        enforce_bit_range(cs.clone(), &threshold_var, self.threshold, bits)?;
        enforce_bit_range(cs.clone(), &score_var, self.score, bits)?;

        // score - threshold >= 0
        let diff_var = &score_var - &threshold_var;
        enforce_bit_range(cs, &diff_var, self.score - self.threshold, bits)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;

    fn is_satisfied(circuit: SkillCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_skill_circuit_satisfiable() {
        let domain = Domain::default();
        assert!(is_satisfied(SkillCircuit::new(domain, 80, 60)));
        assert!(is_satisfied(SkillCircuit::new(domain, 60, 60)));
        assert!(is_satisfied(SkillCircuit::new(domain, u64::from(u32::MAX), 0)));
    }

    #[test]
    fn test_skill_circuit_rejects_low_score() {
        let domain = Domain::default();
        assert!(!is_satisfied(SkillCircuit::new(domain, 50, 60)));
        assert!(!is_satisfied(SkillCircuit::new(domain, 0, 1)));
    }

    #[test]
    fn test_skill_circuit_rejects_out_of_domain() {
        let domain = Domain::new(8).unwrap();
        assert!(!is_satisfied(SkillCircuit::new(domain, 300, 10)));
        assert!(!is_satisfied(SkillCircuit::new(domain, 255, 256)));
        assert!(is_satisfied(SkillCircuit::new(domain, 255, 255)));
    }

    #[test]
    fn test_input_layout() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        SkillCircuit::new(Domain::default(), 80, 60)
            .generate_constraints(cs.clone())
            .unwrap();

        // The constant `one` plus the threshold
        assert_eq!(cs.num_instance_variables(), 2);
        assert_eq!(
            SkillCircuit::public_input_vector(&PublicInputs::new(60)),
            vec![Fr::from(60u64)]
        );
    }
}
