//! Proving backend for SkillCircuit over HTTP
//!
//! Configuration comes from the environment (see `ProverConfig::from_env`).

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zkjobs_prover::backend::{router, BackendState};
use zkjobs_prover::{CircuitKeys, EligibilityProver, ProverConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ProverConfig::from_env().context("loading configuration")?;
    let domain = config.domain()?;
    info!(
        network = %config.network_id,
        %domain,
        keys_dir = %config.keys_dir.display(),
        "Starting proof server"
    );

    let keys_dir = config.keys_dir.clone();
    let seed = config.setup_seed;
    let keys = tokio::task::spawn_blocking(move || CircuitKeys::load_or_generate(keys_dir, domain, seed))
        .await
        .context("key setup task")?
        .context("loading circuit keys")?;

    let state = BackendState {
        prover: EligibilityProver::new(Arc::new(keys)),
        network_id: config.network_id.clone(),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("Proof server listening on {}", config.bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
