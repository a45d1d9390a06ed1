//! Job board error types.

use thiserror::Error;

use zkjobs_prover::{ErrorKind, RejectReason};

use crate::types::JobId;

/// Result type for board transitions and queries.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors that can occur in the job board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Threshold does not fit in the board's numeric domain
    #[error("Invalid threshold {threshold}: must be within [0, {max}]")]
    InvalidThreshold { threshold: u64, max: u64 },

    /// Digest is not 32 hex-encoded bytes
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// No job with this id
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// Proof was generated against a different threshold than the job's
    #[error("Threshold mismatch. Job requires {expected}, proof states {got}")]
    ThresholdMismatch { expected: u64, got: u64 },

    /// Verification gateway rejected the proof
    #[error("Invalid proof: {reason}")]
    InvalidProof { reason: RejectReason },

    /// Applicant already holds an application to this job
    #[error("Applicant already applied to job {0}")]
    DuplicateApplication(JobId),

    /// No application from this applicant to this job
    #[error("Application not found for job {0}")]
    ApplicationNotFound(JobId),

    /// Job already accepted a different applicant
    #[error("Job {0} already has an accepted application")]
    PositionFilled(JobId),

    /// Job was posted without a compensation commitment
    #[error("Job {0} has no compensation commitment")]
    NoCompensationCommitment(JobId),

    /// Caller is not the job's employer
    #[error("Not authorized")]
    NotAuthorized,

    /// A writer panicked while holding a board lock
    #[error("Board state poisoned")]
    StatePoisoned,
}

impl BoardError {
    /// Taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidThreshold { .. } | Self::InvalidDigest(_) => ErrorKind::Validation,
            Self::JobNotFound(_)
            | Self::ApplicationNotFound(_)
            | Self::NoCompensationCommitment(_) => ErrorKind::NotFound,
            Self::ThresholdMismatch { .. } | Self::InvalidProof { .. } => ErrorKind::Proof,
            Self::DuplicateApplication(_) | Self::PositionFilled(_) | Self::NotAuthorized => {
                ErrorKind::StateConflict
            }
            Self::StatePoisoned => ErrorKind::Internal,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for BoardError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::StatePoisoned
    }
}
