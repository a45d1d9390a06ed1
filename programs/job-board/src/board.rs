//! Job board state machine.
//!
//! Jobs and applications live in two ordered maps behind `RwLock`s. Job ids
//! come from an atomic counter, so `post_job` never serializes on anything
//! wider than the insert itself. Proof verification in `apply` runs without
//! holding any lock; an application is inserted only after it has verified.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tracing::{debug, info, instrument, warn};
use zkjobs_prover::{
    BlindingFactor, CircuitKeys, CommitmentDigest, Committer, Domain, EligibilityVerifier,
    ProofBytes, PublicInputs, Verification, VerificationGateway,
};

use crate::error::{BoardError, BoardResult};
use crate::types::{Application, ApplicantIdHash, DescriptionHash, EmployerId, Job, JobId, JobStatus};

type ApplicationKey = (JobId, ApplicantIdHash);

/// Authoritative store of jobs and applications
pub struct JobBoard<V> {
    verifier: V,
    committer: Committer,
    next_job_id: AtomicU64,
    clock: AtomicU64,
    pub(crate) jobs: RwLock<BTreeMap<JobId, Job>>,
    pub(crate) applications: RwLock<BTreeMap<ApplicationKey, Application>>,
}

impl JobBoard<VerificationGateway> {
    /// Board gated by the Groth16 gateway for `keys`
    pub fn from_keys(keys: &CircuitKeys) -> Self {
        Self::new(VerificationGateway::from_keys(keys), keys.domain())
    }
}

impl<V: EligibilityVerifier> JobBoard<V> {
    pub fn new(verifier: V, domain: Domain) -> Self {
        Self {
            verifier,
            committer: Committer::new(domain),
            next_job_id: AtomicU64::new(0),
            clock: AtomicU64::new(0),
            jobs: RwLock::new(BTreeMap::new()),
            applications: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn domain(&self) -> Domain {
        self.committer.domain()
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Post a job with a public threshold
    #[instrument(skip(self, description_hash))]
    pub fn post_job(
        &self,
        employer_id: EmployerId,
        required_threshold: u64,
        description_hash: DescriptionHash,
    ) -> BoardResult<Job> {
        self.create_job(employer_id, required_threshold, description_hash, None)
    }

    /// Post a job that also commits to its compensation
    #[instrument(skip(self, description_hash, compensation))]
    pub fn post_confidential_job(
        &self,
        employer_id: EmployerId,
        required_threshold: u64,
        description_hash: DescriptionHash,
        compensation: CommitmentDigest,
    ) -> BoardResult<Job> {
        self.create_job(employer_id, required_threshold, description_hash, Some(compensation))
    }

    fn create_job(
        &self,
        employer_id: EmployerId,
        required_threshold: u64,
        description_hash: DescriptionHash,
        compensation_commitment: Option<CommitmentDigest>,
    ) -> BoardResult<Job> {
        let domain = self.domain();
        if !domain.contains(required_threshold) {
            return Err(BoardError::InvalidThreshold {
                threshold: required_threshold,
                max: domain.max_value(),
            });
        }

        let mut jobs = self.jobs.write()?;

        // Allocated only once nothing can fail
        let id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        let job = Job {
            id,
            employer_id,
            required_threshold,
            description_hash,
            created_at: self.tick(),
            status: JobStatus::Open,
            compensation_commitment,
            accepted_applicant: None,
        };
        jobs.insert(id, job.clone());

        info!("Posted job {} with threshold {}", id, required_threshold);
        Ok(job)
    }

    /// Submit an application carrying an eligibility proof
    ///
    /// Either a verified application is stored or nothing is.
    #[instrument(skip(self, proof, public_inputs))]
    pub fn apply(
        &self,
        job_id: JobId,
        applicant_id_hash: ApplicantIdHash,
        proof: ProofBytes,
        public_inputs: PublicInputs,
    ) -> BoardResult<Application> {
        let required_threshold = self
            .jobs
            .read()?
            .get(&job_id)
            .map(|job| job.required_threshold)
            .ok_or(BoardError::JobNotFound(job_id))?;

        if public_inputs.required_threshold != required_threshold {
            return Err(BoardError::ThresholdMismatch {
                expected: required_threshold,
                got: public_inputs.required_threshold,
            });
        }

        let key = (job_id, applicant_id_hash);
        if self.applications.read()?.contains_key(&key) {
            return Err(BoardError::DuplicateApplication(job_id));
        }

        // No lock held here
        if let Verification::Rejected(reason) =
            self.verifier.verify(&proof, &public_inputs, required_threshold)
        {
            warn!("Rejected application to job {}: {}", job_id, reason);
            return Err(BoardError::InvalidProof { reason });
        }

        let mut applications = self.applications.write()?;
        match applications.entry(key) {
            Entry::Occupied(_) => Err(BoardError::DuplicateApplication(job_id)),
            Entry::Vacant(slot) => {
                let application = Application {
                    job_id,
                    applicant_id_hash,
                    proof,
                    public_inputs,
                    accepted: false,
                    applied_at: self.tick(),
                };
                slot.insert(application.clone());
                info!("Stored application to job {}", job_id);
                Ok(application)
            }
        }
    }

    /// Mark an application as accepted; only the job's employer may do this
    #[instrument(skip(self))]
    pub fn accept(
        &self,
        job_id: JobId,
        applicant_id_hash: ApplicantIdHash,
        employer_id: &EmployerId,
    ) -> BoardResult<Application> {
        let mut jobs = self.jobs.write()?;
        let mut applications = self.applications.write()?;

        let job = jobs.get_mut(&job_id).ok_or(BoardError::JobNotFound(job_id))?;
        if &job.employer_id != employer_id {
            return Err(BoardError::NotAuthorized);
        }

        let application = applications
            .get_mut(&(job_id, applicant_id_hash))
            .ok_or(BoardError::ApplicationNotFound(job_id))?;

        match job.accepted_applicant {
            Some(accepted) if accepted == applicant_id_hash => {
                debug!("Application already accepted");
            }
            Some(_) => return Err(BoardError::PositionFilled(job_id)),
            None => {
                job.accepted_applicant = Some(applicant_id_hash);
                application.accepted = true;
                info!("Accepted application to job {}", job_id);
            }
        }

        Ok(application.clone())
    }

    /// Check an opening of a job's compensation commitment
    pub fn verify_compensation(
        &self,
        job_id: JobId,
        value: u64,
        blinding_factor: &BlindingFactor,
    ) -> BoardResult<bool> {
        let jobs = self.jobs.read()?;
        let job = jobs.get(&job_id).ok_or(BoardError::JobNotFound(job_id))?;
        let digest = job
            .compensation_commitment
            .ok_or(BoardError::NoCompensationCommitment(job_id))?;

        Ok(self.committer.verify_commitment(&digest, value, blinding_factor))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst)
    }
}
