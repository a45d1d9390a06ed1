//! Error types for the eligibility prover

use std::time::Duration;

use thiserror::Error;

/// Result type alias for prover operations
pub type Result<T> = std::result::Result<T, ProverError>;

/// Coarse error classes shared with the job board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad threshold or value range
    Validation,
    /// Unknown record
    NotFound,
    /// Backend unavailable, malformed response or verification failure
    Proof,
    /// Duplicate or conflicting mutation
    StateConflict,
    /// Local I/O, configuration or serialization trouble
    Internal,
}

/// Errors that can occur during commitment, proof generation and verification
#[derive(Error, Debug)]
pub enum ProverError {
    /// Value does not fit in the configured numeric domain
    #[error("Value {value} out of range [0, {max}]")]
    InvalidRange { value: u64, max: u64 },

    /// Threshold does not fit in the configured numeric domain
    #[error("Invalid threshold {threshold}: must be within [0, {max}]")]
    InvalidThreshold { threshold: u64, max: u64 },

    /// Private score below the public threshold; no honest proof exists
    #[error("Skill score does not meet threshold {threshold}")]
    ThresholdNotMet { threshold: u64 },

    /// Unsupported domain width
    #[error("Invalid domain width {bits} (expected 1-64)")]
    InvalidDomain { bits: u32 },

    /// Proving backend could not be reached
    #[error("Proving backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    /// Proving backend did not answer in time
    #[error("Proving backend timed out after {after:?}")]
    BackendTimeout { after: Duration },

    /// Proving backend answered with a non-success status
    #[error("Proof generation failed ({status}): {message}")]
    ProofGenerationFailed { status: u16, message: String },

    /// Backend body could not be parsed into a proof artifact
    #[error("Malformed proof response: {reason}")]
    MalformedProofResponse { reason: String },

    /// Backend proved a different statement than the one requested
    #[error("Backend echoed threshold {echoed}, requested {requested}")]
    EchoedThresholdMismatch { requested: u64, echoed: u64 },

    /// Invalid proof encoding
    #[error("Invalid proof format: {reason}")]
    InvalidProofFormat { reason: String },

    /// Circuit key material not found
    #[error("Circuit keys not found: {path}")]
    KeysNotFound { path: String },

    /// Key material does not belong to this circuit or domain
    #[error("Key mismatch: {reason}")]
    KeyMismatch { reason: String },

    /// Trusted setup failed
    #[error("Setup error: {reason}")]
    SetupError { reason: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arkworks error
    #[error("Cryptographic error: {0}")]
    ArkError(String),
}

impl ProverError {
    /// Taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange { .. }
            | Self::InvalidThreshold { .. }
            | Self::ThresholdNotMet { .. }
            | Self::InvalidDomain { .. } => ErrorKind::Validation,
            Self::KeysNotFound { .. } => ErrorKind::NotFound,
            Self::BackendUnavailable { .. }
            | Self::BackendTimeout { .. }
            | Self::ProofGenerationFailed { .. }
            | Self::MalformedProofResponse { .. }
            | Self::EchoedThresholdMismatch { .. }
            | Self::InvalidProofFormat { .. } => ErrorKind::Proof,
            Self::KeyMismatch { .. }
            | Self::SetupError { .. }
            | Self::Config(_)
            | Self::Serialization(_)
            | Self::Io(_)
            | Self::ArkError(_) => ErrorKind::Internal,
        }
    }

    /// Whether a retry at the transport boundary could help
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable { .. } | Self::BackendTimeout { .. }
        )
    }
}

impl From<ark_serialize::SerializationError> for ProverError {
    fn from(e: ark_serialize::SerializationError) -> Self {
        Self::ArkError(e.to_string())
    }
}

impl From<ark_relations::r1cs::SynthesisError> for ProverError {
    fn from(e: ark_relations::r1cs::SynthesisError) -> Self {
        Self::ArkError(e.to_string())
    }
}

impl From<toml::de::Error> for ProverError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ProverError::InvalidRange { value: 1, max: 0 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ProverError::ProofGenerationFailed {
                status: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::Proof
        );
    }

    #[test]
    fn test_only_transport_failures_are_transient() {
        assert!(ProverError::BackendUnavailable { reason: "refused".into() }.is_transient());
        assert!(ProverError::BackendTimeout {
            after: Duration::from_secs(1)
        }
        .is_transient());
        assert!(!ProverError::ProofGenerationFailed {
            status: 422,
            message: "unsatisfiable".into()
        }
        .is_transient());
    }

    #[test]
    fn test_backend_failure_is_reported_verbatim() {
        let err = ProverError::ProofGenerationFailed {
            status: 503,
            message: "prover overloaded".into(),
        };
        assert_eq!(err.to_string(), "Proof generation failed (503): prover overloaded");
    }
}
