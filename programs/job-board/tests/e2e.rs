//! End-to-end flow: employer posts, applicant proves, board verifies.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use job_board::{
    ApplicantIdHash, BoardError, DescriptionHash, EmployerId, JobBoard, JobBoardQuery,
};
use zkjobs_prover::{
    CircuitKeys, Committer, Domain, EligibilityProver, EligibilityVerifier, LocalTransport,
    ProofBytes, ProofClient, ProverError, PublicInputs, RejectReason, Verification,
    VerificationGateway,
};

fn setup() -> (JobBoard<VerificationGateway>, ProofClient<LocalTransport>) {
    let keys = Arc::new(CircuitKeys::from_seed(Domain::default(), 2024).unwrap());
    let board = JobBoard::from_keys(&keys);
    let client = ProofClient::new(
        LocalTransport::new(EligibilityProver::new(keys)),
        Duration::from_secs(60),
    );
    (board, client)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_prove_apply() {
    let (board, client) = setup();
    let description = DescriptionHash::of("ZK Engineer: build privacy-preserving applications");

    let job = board.post_job(EmployerId::new("E1"), 70, description).unwrap();
    assert_eq!(job.id, 0);

    let proof = client.generate_eligibility_proof(80, 70).await.unwrap();
    assert_eq!(proof.public_inputs, PublicInputs::new(70));

    let a1 = ApplicantIdHash::derive("A1", b"applicant salt");
    let application = board
        .apply(0, a1, proof.proof.clone(), PublicInputs::new(70))
        .unwrap();
    assert!(!application.accepted);

    let applications = board.get_applications(0).unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].applicant_id_hash, a1);
    assert!(!applications[0].accepted);

    let accepted = board.accept(0, a1, &EmployerId::new("E1")).unwrap();
    assert!(accepted.accepted);
    assert_eq!(board.get_job(0).unwrap().accepted_applicant, Some(a1));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_low_score_cannot_apply() {
    let (board, client) = setup();
    let job = board
        .post_job(EmployerId::new("E1"), 60, DescriptionHash::of("job"))
        .unwrap();

    // Honest backend refuses to prove a false statement
    let err = client.generate_eligibility_proof(50, 60).await.unwrap_err();
    assert!(matches!(err, ProverError::ProofGenerationFailed { status: 422, .. }));

    // A proof for 50 >= 50 presented against 60 fails verification
    let weak = client.generate_eligibility_proof(50, 50).await.unwrap();
    let err = board
        .apply(job.id, ApplicantIdHash::derive("A2", b"s"), weak.proof, PublicInputs::new(60))
        .unwrap_err();
    assert_eq!(
        err,
        BoardError::InvalidProof { reason: RejectReason::VerificationFailed }
    );
    assert!(board.get_applications(job.id).unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_threshold_mismatch() {
    let (board, client) = setup();
    let job = board
        .post_job(EmployerId::new("E1"), 70, DescriptionHash::of("job"))
        .unwrap();

    let proof = client.generate_eligibility_proof(80, 60).await.unwrap();
    let err = board
        .apply(job.id, ApplicantIdHash::derive("A1", b"s"), proof.proof, proof.public_inputs)
        .unwrap_err();
    assert_eq!(err, BoardError::ThresholdMismatch { expected: 70, got: 60 });
}

#[test]
fn test_confidential_salary() {
    let domain = Domain::new(16).unwrap();
    let board = JobBoard::from_keys(&CircuitKeys::from_seed(domain, 1).unwrap());
    let salary = Committer::new(domain).generate(52_000).unwrap();

    let job = board
        .post_confidential_job(
            EmployerId::new("E1"),
            70,
            DescriptionHash::of("job"),
            salary.digest,
        )
        .unwrap();

    // Only the digest is on the ledger
    let listed = format!("{:?}", board.list_jobs().unwrap());
    assert!(!listed.contains("52000"));

    assert!(board
        .verify_compensation(job.id, 52_000, &salary.blinding_factor)
        .unwrap());
    assert!(!board
        .verify_compensation(job.id, 51_999, &salary.blinding_factor)
        .unwrap());
}

/// Verifier that fails mid-check
struct PanickingVerifier;

impl EligibilityVerifier for PanickingVerifier {
    fn verify(&self, _: &ProofBytes, _: &PublicInputs, _: u64) -> Verification {
        panic!("verifier backend interrupted");
    }
}

#[test]
fn test_interrupted_verification_leaves_no_application() {
    let board = JobBoard::new(PanickingVerifier, Domain::default());
    let job = board
        .post_job(EmployerId::new("E1"), 70, DescriptionHash::of("job"))
        .unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        board.apply(
            job.id,
            ApplicantIdHash::derive("A1", b"s"),
            ProofBytes::new(vec![0; 128]),
            PublicInputs::new(70),
        )
    }));
    assert!(result.is_err());

    // Board remains usable and holds nothing for that call
    assert!(board.get_applications(job.id).unwrap().is_empty());
    assert_eq!(board.list_jobs().unwrap().len(), 1);
}
