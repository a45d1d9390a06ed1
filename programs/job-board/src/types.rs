//! Ledger records of the job board

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use zkjobs_prover::{CommitmentDigest, ProofBytes, PublicInputs};

use crate::error::BoardError;

/// Job identifier, assigned in creation order starting at 0
pub type JobId = u64;

/// Opaque identifier of the posting party
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployerId(String);

impl EmployerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EmployerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for EmployerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, BoardError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(s).map_err(|e| BoardError::InvalidDigest(e.to_string()))?;
                let bytes: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
                    BoardError::InvalidDigest(format!("expected 32 bytes, got {}", v.len()))
                })?;
                Ok(Self(bytes))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = BoardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

digest_type!(
    /// SHA-256 digest of off-ledger job content (title, body)
    DescriptionHash
);

digest_type!(
    /// Salted digest standing in for an applicant's identity on the ledger
    ApplicantIdHash
);

impl DescriptionHash {
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(content.as_ref()).into())
    }
}

impl ApplicantIdHash {
    const TAG: &'static [u8] = b"zkjobs/applicant/v1";

    /// Hash an identity under a salt known only to the applicant
    pub fn derive(identity: impl AsRef<[u8]>, salt: &[u8]) -> Self {
        let identity = identity.as_ref();
        let mut hasher = Sha256::new();
        hasher.update(Self::TAG);
        hasher.update((identity.len() as u64).to_le_bytes());
        hasher.update(identity);
        hasher.update(salt);
        Self(hasher.finalize().into())
    }

    pub(crate) const MIN: Self = Self([0; 32]);
    pub(crate) const MAX: Self = Self([0xff; 32]);
}

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Accepting applications
    Open,
}

/// A posted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer_id: EmployerId,
    /// Public lower bound on the applicant's skill score
    pub required_threshold: u64,
    pub description_hash: DescriptionHash,
    /// Logical ledger time
    pub created_at: u64,
    pub status: JobStatus,
    /// Hiding commitment to the offered compensation
    pub compensation_commitment: Option<CommitmentDigest>,
    pub accepted_applicant: Option<ApplicantIdHash>,
}

/// A proof-gated application to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub job_id: JobId,
    pub applicant_id_hash: ApplicantIdHash,
    pub proof: ProofBytes,
    pub public_inputs: PublicInputs,
    pub accepted: bool,
    /// Logical ledger time
    pub applied_at: u64,
}
