//! Read-only access to board state.

use zkjobs_prover::EligibilityVerifier;

use crate::board::JobBoard;
use crate::error::{BoardError, BoardResult};
use crate::types::{Application, ApplicantIdHash, Job, JobId};

/// Read-only views exposed to ledger clients
pub trait JobBoardQuery {
    /// All jobs in id order
    fn list_jobs(&self) -> BoardResult<Vec<Job>>;

    fn get_job(&self, job_id: JobId) -> BoardResult<Job>;

    /// Applications to one job; fails if the job does not exist
    fn get_applications(&self, job_id: JobId) -> BoardResult<Vec<Application>>;
}

impl<V: EligibilityVerifier> JobBoardQuery for JobBoard<V> {
    fn list_jobs(&self) -> BoardResult<Vec<Job>> {
        Ok(self.jobs.read()?.values().cloned().collect())
    }

    fn get_job(&self, job_id: JobId) -> BoardResult<Job> {
        self.jobs
            .read()?
            .get(&job_id)
            .cloned()
            .ok_or(BoardError::JobNotFound(job_id))
    }

    fn get_applications(&self, job_id: JobId) -> BoardResult<Vec<Application>> {
        if !self.jobs.read()?.contains_key(&job_id) {
            return Err(BoardError::JobNotFound(job_id));
        }

        Ok(self
            .applications
            .read()?
            .range((job_id, ApplicantIdHash::MIN)..=(job_id, ApplicantIdHash::MAX))
            .map(|(_, application)| application.clone())
            .collect())
    }
}
