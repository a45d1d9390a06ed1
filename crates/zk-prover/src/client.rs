//! Proof client: turns (private score, public threshold) into a validated
//! eligibility proof by asking a proving backend.
//!
//! The client holds no state between calls. Retries are opt-in through
//! [`RetryPolicy`] since proving is expensive.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::backend::{handle_prove_request, BackendReply, ProveRequest};
use crate::config::ProverConfig;
use crate::error::{ProverError, Result};
use crate::proof::{EligibilityProof, ProofBytes};
use crate::prover::EligibilityProver;
use crate::types::PublicInputs;

/// Request/response channel to a proving backend
pub trait ProofTransport: Send + Sync {
    /// Deliver `request` and return the backend's raw answer.
    ///
    /// Fails only when no answer was obtained (`BackendUnavailable`, or
    /// `BackendTimeout` when the transport enforces its own deadline).
    fn send(&self, request: &ProveRequest) -> impl Future<Output = Result<BackendReply>> + Send;
}

/// JSON over HTTP POST
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProverError::Config(format!("HTTP client: {e}")))?;
        Ok(Self::with_client(client, endpoint, timeout))
    }

    /// Use a prebuilt client; `timeout` is the request deadline it was built with
    pub fn with_client(client: reqwest::Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, context: &str, e: &reqwest::Error) -> ProverError {
        if e.is_timeout() {
            ProverError::BackendTimeout {
                after: self.timeout,
            }
        } else {
            ProverError::BackendUnavailable {
                reason: format!("{context}: {e}"),
            }
        }
    }
}

impl ProofTransport for HttpTransport {
    async fn send(&self, request: &ProveRequest) -> Result<BackendReply> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error("sending request", &e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error("reading response body", &e))?;

        Ok(BackendReply::new(status, body))
    }
}

/// In-process backend speaking the same protocol
#[derive(Clone)]
pub struct LocalTransport {
    prover: EligibilityProver,
}

impl LocalTransport {
    pub fn new(prover: EligibilityProver) -> Self {
        Self { prover }
    }
}

impl ProofTransport for LocalTransport {
    async fn send(&self, request: &ProveRequest) -> Result<BackendReply> {
        let prover = self.prover.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || handle_prove_request(&prover, &request))
            .await
            .map_err(|e| ProverError::BackendUnavailable {
                reason: format!("local prover task: {e}"),
            })
    }
}

/// Exponential backoff for transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

#[derive(Deserialize)]
struct ProveResponse {
    proof: Option<ProofBytes>,
    #[serde(rename = "publicInputs")]
    public_inputs: Option<PublicInputs>,
}

/// Client side of the proving backend protocol
pub struct ProofClient<T> {
    transport: T,
    timeout: Duration,
    retry: Option<RetryPolicy>,
}

impl ProofClient<HttpTransport> {
    /// HTTP client for the configured endpoint
    pub fn from_config(config: &ProverConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.prover_url.clone(), config.request_timeout())?;
        Ok(Self::new(transport, config.request_timeout()))
    }
}

impl<T: ProofTransport> ProofClient<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            retry: None,
        }
    }

    /// Retry transport failures with the given policy
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the backend to prove `skill_score >= required_threshold`
    #[instrument(skip(self, skill_score))]
    pub async fn generate_eligibility_proof(
        &self,
        skill_score: u64,
        required_threshold: u64,
    ) -> Result<EligibilityProof> {
        let request = ProveRequest::skill(skill_score, required_threshold);
        let policy = self.retry.unwrap_or(RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        });

        let mut attempt = 0;
        loop {
            match self.request_once(&request).await {
                Err(e) if e.is_transient() && attempt + 1 < policy.max_attempts => {
                    let delay = policy.backoff(attempt);
                    warn!("Proof request attempt {} failed ({}), retrying in {:?}", attempt + 1, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn request_once(&self, request: &ProveRequest) -> Result<EligibilityProof> {
        let reply = tokio::time::timeout(self.timeout, self.transport.send(request))
            .await
            .map_err(|_| ProverError::BackendTimeout {
                after: self.timeout,
            })??;

        let proof = parse_reply(reply, request.required_threshold())?;
        info!("Received eligibility proof for threshold {}", proof.required_threshold());
        Ok(proof)
    }
}

/// Interpret a backend answer for a request made at `requested_threshold`
pub fn parse_reply(reply: BackendReply, requested_threshold: u64) -> Result<EligibilityProof> {
    if !reply.is_success() {
        return Err(ProverError::ProofGenerationFailed {
            status: reply.status,
            message: reply.body,
        });
    }

    let response: ProveResponse =
        serde_json::from_str(&reply.body).map_err(|e| ProverError::MalformedProofResponse {
            reason: e.to_string(),
        })?;

    let proof = response
        .proof
        .ok_or_else(|| ProverError::MalformedProofResponse {
            reason: "missing `proof`".into(),
        })?;
    let public_inputs = response
        .public_inputs
        .ok_or_else(|| ProverError::MalformedProofResponse {
            reason: "missing `publicInputs`".into(),
        })?;

    if public_inputs.required_threshold != requested_threshold {
        return Err(ProverError::EchoedThresholdMismatch {
            requested: requested_threshold,
            echoed: public_inputs.required_threshold,
        });
    }

    debug!("Parsed proof of {} bytes", proof.as_bytes().len());
    Ok(EligibilityProof::new(proof, public_inputs))
}
