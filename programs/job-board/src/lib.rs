//! ZK Jobs board state machine.
//!
//! Ledger-side model of jobs and applications:
//!
//! - Jobs with a public skill threshold and an optional compensation commitment
//! - Applications admitted only with an eligibility proof the gateway accepts
//! - Employer-only acceptance
//!
//! # Architecture
//!
//! - `board`: the state machine and its transitions
//! - `queries`: read-only state access
//! - `types`: ledger records and digests
//! - `error`: error types
//!
//! # Example
//!
//! ```ignore
//! use job_board::{JobBoard, JobBoardQuery, DescriptionHash, ApplicantIdHash};
//!
//! let board = JobBoard::from_keys(&keys);
//! let job = board.post_job("E1".into(), 70, DescriptionHash::of(description))?;
//!
//! let proof = client.generate_eligibility_proof(80, 70).await?;
//! board.apply(job.id, ApplicantIdHash::derive("A1", &salt), proof.proof, proof.public_inputs)?;
//! assert_eq!(board.get_applications(job.id)?.len(), 1);
//! ```

pub mod board;
pub mod error;
pub mod queries;
pub mod types;

pub use board::JobBoard;
pub use error::{BoardError, BoardResult};
pub use queries::JobBoardQuery;
pub use types::{Application, ApplicantIdHash, DescriptionHash, EmployerId, Job, JobId, JobStatus};
