//! Injected configuration for the prover, client and proof server

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ProverError, Result};
use crate::types::{Domain, DEFAULT_DOMAIN_BITS};

const DEFAULT_PROVER_URL: &str = "http://localhost:6300/prove";
const DEFAULT_PORT: u16 = 6300;

/// Configuration recognised by the eligibility components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Proving backend endpoint the client posts requests to
    pub prover_url: Url,
    /// Network the proofs are produced for
    pub network_id: String,
    /// Bit width of the numeric domain
    pub domain_bits: u32,
    /// Upper bound on a single proof request
    pub request_timeout_secs: u64,
    /// Where circuit keys are loaded from and saved to
    pub keys_dir: PathBuf,
    /// Fixed setup seed; development networks only
    pub setup_seed: Option<u64>,
    /// Listen address of the proof server
    pub bind_addr: SocketAddr,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            prover_url: Url::parse(DEFAULT_PROVER_URL).expect("default URL is valid"),
            network_id: "TestNet".into(),
            domain_bits: DEFAULT_DOMAIN_BITS,
            request_timeout_secs: 120,
            keys_dir: PathBuf::from("./keys"),
            setup_seed: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        }
    }
}

impl ProverConfig {
    /// Load from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("PROOF_SERVER_URL") {
            config.prover_url = Url::parse(&url)
                .map_err(|e| ProverError::Config(format!("PROOF_SERVER_URL: {e}")))?;
        }
        if let Some(network) = lookup("NETWORK_ID") {
            config.network_id = network;
        }
        if let Some(bits) = lookup("ELIGIBILITY_DOMAIN_BITS") {
            config.domain_bits = parse_var("ELIGIBILITY_DOMAIN_BITS", &bits)?;
        }
        if let Some(secs) = lookup("PROOF_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("PROOF_TIMEOUT_SECS", &secs)?;
        }
        if let Some(dir) = lookup("ELIGIBILITY_KEYS_DIR") {
            config.keys_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup("ELIGIBILITY_SETUP_SEED") {
            config.setup_seed = Some(parse_var("ELIGIBILITY_SETUP_SEED", &seed)?);
        }
        if let Some(bind) = lookup("PROOF_SERVER_BIND") {
            config.bind_addr = parse_var("PROOF_SERVER_BIND", &bind)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the components cannot run with
    pub fn validate(&self) -> Result<()> {
        self.domain()?;
        if self.request_timeout_secs == 0 {
            return Err(ProverError::Config("request timeout must be positive".into()));
        }
        if !matches!(self.prover_url.scheme(), "http" | "https") {
            return Err(ProverError::Config(format!(
                "unsupported prover URL scheme: {}",
                self.prover_url.scheme()
            )));
        }
        Ok(())
    }

    pub fn domain(&self) -> Result<Domain> {
        Domain::new(self.domain_bits)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ProverError::Config(format!("{name}={value:?}: {e}")))
}
