//! Groth16 key material for the skill circuit

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::circuits::SkillCircuit;
use crate::error::{ProverError, Result};
use crate::types::{Domain, SKILL_CIRCUIT};

const PROVING_KEY_FILE: &str = "proving_key.bin";
const VERIFYING_KEY_FILE: &str = "verifying_key.bin";
const MANIFEST_FILE: &str = "circuit.json";

/// Describes which circuit and domain a key pair belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyManifest {
    pub circuit: String,
    pub domain: Domain,
}

/// Proving and verifying keys for one domain
#[derive(Clone)]
pub struct CircuitKeys {
    domain: Domain,
    proving_key: ProvingKey<Bn254>,
    verifying_key: VerifyingKey<Bn254>,
}

impl fmt::Debug for CircuitKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitKeys")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl CircuitKeys {
    /// Run the circuit-specific setup with the given randomness
    #[instrument(skip(rng))]
    pub fn generate<R: RngCore + CryptoRng>(domain: Domain, rng: &mut R) -> Result<Self> {
        let start = Instant::now();
        let (proving_key, verifying_key) =
            Groth16::<Bn254>::circuit_specific_setup(SkillCircuit::blank(domain), rng)
                .map_err(|e| ProverError::SetupError {
                    reason: e.to_string(),
                })?;

        info!("Circuit setup for {} finished in {:?}", domain, start.elapsed());

        Ok(Self {
            domain,
            proving_key,
            verifying_key,
        })
    }

    /// Setup from OS randomness
    pub fn generate_random(domain: Domain) -> Result<Self> {
        Self::generate(domain, &mut OsRng)
    }

    /// Reproducible setup; anyone knowing the seed can forge proofs, so
    /// this is only for development networks and tests.
    pub fn from_seed(domain: Domain, seed: u64) -> Result<Self> {
        Self::generate(domain, &mut StdRng::seed_from_u64(seed))
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn proving_key(&self) -> &ProvingKey<Bn254> {
        &self.proving_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.verifying_key
    }

    /// Write keys and manifest into `dir`, creating it if needed
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut pk_bytes = Vec::new();
        self.proving_key.serialize_compressed(&mut pk_bytes)?;
        fs::write(dir.join(PROVING_KEY_FILE), pk_bytes)?;

        let mut vk_bytes = Vec::new();
        self.verifying_key.serialize_compressed(&mut vk_bytes)?;
        fs::write(dir.join(VERIFYING_KEY_FILE), vk_bytes)?;

        let manifest = KeyManifest {
            circuit: SKILL_CIRCUIT.into(),
            domain: self.domain,
        };
        fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;

        debug!("Saved circuit keys to {}", dir.display());
        Ok(())
    }

    /// Load keys saved with [`CircuitKeys::save`]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let manifest = Self::load_manifest(dir)?;

        let proving_key =
            ProvingKey::<Bn254>::deserialize_compressed(read_key(dir, PROVING_KEY_FILE)?.as_slice())?;
        let verifying_key = Self::read_verifying_key(dir)?;

        Ok(Self {
            domain: manifest.domain,
            proving_key,
            verifying_key,
        })
    }

    /// Load only the verifying half, as a verifier node would
    pub fn load_verifying_key(dir: impl AsRef<Path>) -> Result<(Domain, VerifyingKey<Bn254>)> {
        let dir = dir.as_ref();
        let manifest = Self::load_manifest(dir)?;
        Ok((manifest.domain, Self::read_verifying_key(dir)?))
    }

    /// Load from `dir` if present, otherwise generate and save
    pub fn load_or_generate(dir: impl AsRef<Path>, domain: Domain, seed: Option<u64>) -> Result<Self> {
        let dir = dir.as_ref();
        if dir.join(MANIFEST_FILE).exists() {
            let keys = Self::load(dir)?;
            if keys.domain != domain {
                return Err(ProverError::KeyMismatch {
                    reason: format!(
                        "keys in {} are for {}, configured domain is {}",
                        dir.display(),
                        keys.domain,
                        domain
                    ),
                });
            }
            info!("Loaded circuit keys from {}", dir.display());
            return Ok(keys);
        }

        let keys = match seed {
            Some(seed) => Self::from_seed(domain, seed)?,
            None => Self::generate_random(domain)?,
        };
        keys.save(dir)?;
        Ok(keys)
    }

    fn load_manifest(dir: &Path) -> Result<KeyManifest> {
        let manifest: KeyManifest = serde_json::from_slice(&read_key(dir, MANIFEST_FILE)?)?;
        if manifest.circuit != SKILL_CIRCUIT {
            return Err(ProverError::KeyMismatch {
                reason: format!("expected {SKILL_CIRCUIT} keys, found {}", manifest.circuit),
            });
        }
        Ok(manifest)
    }

    fn read_verifying_key(dir: &Path) -> Result<VerifyingKey<Bn254>> {
        Ok(VerifyingKey::<Bn254>::deserialize_compressed(
            read_key(dir, VERIFYING_KEY_FILE)?.as_slice(),
        )?)
    }
}

fn read_key(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(ProverError::KeysNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_setup_is_reproducible() {
        let domain = Domain::new(8).unwrap();
        let a = CircuitKeys::from_seed(domain, 11).unwrap();
        let b = CircuitKeys::from_seed(domain, 11).unwrap();
        assert_eq!(a.verifying_key(), b.verifying_key());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let domain = Domain::new(16).unwrap();
        let keys = CircuitKeys::from_seed(domain, 3).unwrap();
        keys.save(dir.path()).unwrap();

        let loaded = CircuitKeys::load(dir.path()).unwrap();
        assert_eq!(loaded.domain(), domain);
        assert_eq!(loaded.verifying_key(), keys.verifying_key());

        let (vk_domain, vk) = CircuitKeys::load_verifying_key(dir.path()).unwrap();
        assert_eq!(vk_domain, domain);
        assert_eq!(&vk, keys.verifying_key());
    }

    #[test]
    fn test_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let err = CircuitKeys::load(dir.path()).unwrap_err();
        assert!(matches!(err, ProverError::KeysNotFound { .. }));
    }

    #[test]
    fn test_manifest_with_invalid_domain_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        CircuitKeys::from_seed(Domain::new(8).unwrap(), 5)
            .unwrap()
            .save(dir.path())
            .unwrap();

        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"circuit":"SkillCircuit","domain":100}"#,
        )
        .unwrap();

        let err = CircuitKeys::load(dir.path()).unwrap_err();
        assert!(matches!(err, ProverError::Serialization(_)));
        assert!(CircuitKeys::load_verifying_key(dir.path()).is_err());
    }

    #[test]
    fn test_load_or_generate_rejects_other_domain() {
        let dir = tempfile::tempdir().unwrap();
        let keys_dir = dir.path().join("keys");

        CircuitKeys::load_or_generate(&keys_dir, Domain::new(8).unwrap(), Some(1)).unwrap();
        assert!(keys_dir.join(MANIFEST_FILE).exists());

        let again = CircuitKeys::load_or_generate(&keys_dir, Domain::new(8).unwrap(), None);
        assert!(again.is_ok());

        let err = CircuitKeys::load_or_generate(&keys_dir, Domain::new(16).unwrap(), None)
            .err()
            .unwrap();
        assert!(matches!(err, ProverError::KeyMismatch { .. }));
    }
}
