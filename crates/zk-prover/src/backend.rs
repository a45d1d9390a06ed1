//! Proving backend protocol: wire types, request handling and HTTP routes
//!
//! Request: `{circuit, inputs: {private: {skill_score}, public: {required_threshold}}}`.
//! Success: `{proof, publicInputs: {required_threshold}}` with status 200.
//! Failure: non-2xx status with a text body.

use std::fmt;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ErrorKind;
use crate::prover::EligibilityProver;
use crate::types::{PublicInputs, SkillInput, SKILL_CIRCUIT};

/// Private half of a proof request
#[derive(Clone, Serialize, Deserialize)]
pub struct PrivateInputs {
    #[serde(alias = "skillScore")]
    pub skill_score: u64,
}

impl fmt::Debug for PrivateInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateInputs(<private>)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProveInputs {
    pub private: PrivateInputs,
    pub public: PublicInputs,
}

/// Body of a proof request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProveRequest {
    pub circuit: String,
    pub inputs: ProveInputs,
}

impl ProveRequest {
    /// Request for the skill circuit
    pub fn skill(skill_score: u64, required_threshold: u64) -> Self {
        Self {
            circuit: SKILL_CIRCUIT.into(),
            inputs: ProveInputs {
                private: PrivateInputs { skill_score },
                public: PublicInputs::new(required_threshold),
            },
        }
    }

    pub fn required_threshold(&self) -> u64 {
        self.inputs.public.required_threshold
    }
}

/// Raw backend answer before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub body: String,
}

impl BackendReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Serve one proof request with the local prover
///
/// Blocks for the duration of proving.
pub fn handle_prove_request(prover: &EligibilityProver, request: &ProveRequest) -> BackendReply {
    if request.circuit != SKILL_CIRCUIT {
        warn!("Unknown circuit requested: {}", request.circuit);
        return BackendReply::new(400, format!("unknown circuit: {}", request.circuit));
    }

    let input = SkillInput::new(
        request.inputs.private.skill_score,
        request.required_threshold(),
    );

    match prover.prove(&input) {
        Ok(proof) => match serde_json::to_string(&proof) {
            Ok(body) => BackendReply::new(200, body),
            Err(e) => {
                error!("Failed to encode proof: {}", e);
                BackendReply::new(500, e.to_string())
            }
        },
        Err(e) if e.kind() == ErrorKind::Validation => {
            info!("Refusing proof request: {}", e);
            BackendReply::new(422, e.to_string())
        }
        Err(e) => {
            error!("Proof generation failed: {}", e);
            BackendReply::new(500, e.to_string())
        }
    }
}

/// Shared state of the HTTP backend
#[derive(Clone)]
pub struct BackendState {
    pub prover: EligibilityProver,
    pub network_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub circuit: String,
    pub network_id: String,
    pub domain_bits: u32,
}

/// HTTP routes of the proving backend
pub fn router(state: BackendState) -> Router {
    Router::new()
        .route("/prove", post(prove))
        .route("/health", get(health))
        .with_state(state)
}

async fn prove(State(state): State<BackendState>, Json(request): Json<ProveRequest>) -> Response {
    let prover = state.prover.clone();
    let reply = match tokio::task::spawn_blocking(move || handle_prove_request(&prover, &request)).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Proving task failed: {}", e);
            BackendReply::new(500, "proving task failed")
        }
    };

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if reply.is_success() {
        (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
    } else {
        (status, reply.body).into_response()
    }
}

async fn health(State(state): State<BackendState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        circuit: SKILL_CIRCUIT.into(),
        network_id: state.network_id.clone(),
        domain_bits: state.prover.domain().bits(),
    })
}
