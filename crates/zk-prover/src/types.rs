//! Input types for the eligibility circuit

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProverError, Result};

/// Circuit name carried in proof requests
pub const SKILL_CIRCUIT: &str = "SkillCircuit";

/// Default width of the numeric domain, in bits
pub const DEFAULT_DOMAIN_BITS: u32 = 32;

/// Unsigned numeric range `[0, 2^bits - 1]` shared by commitments and the circuit
///
/// Serialized as its bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Domain {
    bits: u32,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            bits: DEFAULT_DOMAIN_BITS,
        }
    }
}

impl Domain {
    /// Create a domain of the given bit width (1-64)
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > 64 {
            return Err(ProverError::InvalidDomain { bits });
        }
        Ok(Self { bits })
    }

    /// Bit width
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Largest representable value
    pub fn max_value(&self) -> u64 {
        if self.bits == 64 {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        }
    }

    /// Whether `value` fits in the domain
    pub fn contains(&self, value: u64) -> bool {
        value <= self.max_value()
    }

    /// Fail with `InvalidRange` if `value` does not fit
    pub fn check_value(&self, value: u64) -> Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(ProverError::InvalidRange {
                value,
                max: self.max_value(),
            })
        }
    }

    /// Fail with `InvalidThreshold` if `threshold` does not fit
    pub fn check_threshold(&self, threshold: u64) -> Result<()> {
        if self.contains(threshold) {
            Ok(())
        } else {
            Err(ProverError::InvalidThreshold {
                threshold,
                max: self.max_value(),
            })
        }
    }
}

impl TryFrom<u32> for Domain {
    type Error = ProverError;

    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<Domain> for u32 {
    fn from(domain: Domain) -> Self {
        domain.bits
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits)
    }
}

/// Public inputs of an eligibility proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// Lower bound the private score was proven against
    #[serde(alias = "requiredThreshold")]
    pub required_threshold: u64,
}

impl PublicInputs {
    pub fn new(required_threshold: u64) -> Self {
        Self { required_threshold }
    }
}

/// Input for an eligibility proof
///
/// Proves: skill_score >= required_threshold
#[derive(Clone, Serialize, Deserialize)]
pub struct SkillInput {
    /// Applicant's actual skill score (private)
    pub skill_score: u64,
    /// Job's required threshold (public)
    pub required_threshold: u64,
}

// Keep the private score out of logs.
impl fmt::Debug for SkillInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillInput")
            .field("skill_score", &"<private>")
            .field("required_threshold", &self.required_threshold)
            .finish()
    }
}

impl SkillInput {
    pub fn new(skill_score: u64, required_threshold: u64) -> Self {
        Self {
            skill_score,
            required_threshold,
        }
    }

    /// Validate input values against the domain
    pub fn validate(&self, domain: &Domain) -> Result<()> {
        domain.check_value(self.skill_score)?;
        domain.check_threshold(self.required_threshold)?;
        if self.skill_score < self.required_threshold {
            return Err(ProverError::ThresholdNotMet {
                threshold: self.required_threshold,
            });
        }
        Ok(())
    }

    /// Public half of the input
    pub fn public_inputs(&self) -> PublicInputs {
        PublicInputs::new(self.required_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_bounds() {
        assert_eq!(Domain::default().max_value(), u64::from(u32::MAX));
        assert_eq!(Domain::new(8).unwrap().max_value(), 255);
        assert_eq!(Domain::new(64).unwrap().max_value(), u64::MAX);
        assert!(Domain::new(0).is_err());
        assert!(Domain::new(65).is_err());
    }

    #[test]
    fn test_domain_serde_checks_width() {
        assert_eq!(serde_json::to_string(&Domain::new(16).unwrap()).unwrap(), "16");
        assert_eq!(serde_json::from_str::<Domain>("16").unwrap().max_value(), 65_535);
        assert!(serde_json::from_str::<Domain>("100").is_err());
        assert!(serde_json::from_str::<Domain>("0").is_err());
    }

    #[test]
    fn test_skill_validation() {
        let domain = Domain::new(8).unwrap();

        assert!(SkillInput::new(80, 60).validate(&domain).is_ok());
        assert!(SkillInput::new(60, 60).validate(&domain).is_ok());

        let below = SkillInput::new(50, 60).validate(&domain);
        assert!(matches!(below, Err(ProverError::ThresholdNotMet { threshold: 60 })));

        let too_big = SkillInput::new(300, 60).validate(&domain);
        assert!(matches!(too_big, Err(ProverError::InvalidRange { value: 300, max: 255 })));

        let bad_threshold = SkillInput::new(80, 256).validate(&domain);
        assert!(matches!(
            bad_threshold,
            Err(ProverError::InvalidThreshold { threshold: 256, max: 255 })
        ));
    }

    #[test]
    fn test_debug_hides_score() {
        let rendered = format!("{:?}", SkillInput::new(4242, 60));
        assert!(!rendered.contains("4242"));
        assert!(rendered.contains("60"));
    }

    #[test]
    fn test_public_inputs_accept_both_spellings() {
        let snake: PublicInputs = serde_json::from_str(r#"{"required_threshold":70}"#).unwrap();
        let camel: PublicInputs = serde_json::from_str(r#"{"requiredThreshold":70}"#).unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.required_threshold, 70);
    }
}
