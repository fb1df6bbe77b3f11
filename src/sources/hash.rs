// Hash computation and verification for downloaded packages

use anyhow::Result;
use sha2::{Digest, Sha256, Sha512};

/// Hash algorithm types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Get the algorithm prefix for formatted output
    pub fn prefix(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    fn from_prefix(prefix: &str) -> Result<Self> {
        match prefix {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => anyhow::bail!("Unsupported hash algorithm: {}", other),
        }
    }
}

/// Compute hash of data and return formatted string (e.g., "sha256:abc123...")
pub fn compute_hash(data: &[u8], algorithm: HashAlgorithm) -> String {
    let hash_hex = match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
    };

    format!("{}:{}", algorithm.prefix(), hash_hex)
}

/// Check data against an "algorithm:hex" hash from an add-on file record
pub fn verify_hash(data: &[u8], expected: &str) -> Result<()> {
    let Some((prefix, expected_hex)) = expected.split_once(':') else {
        anyhow::bail!("Invalid hash format: '{}'. Expected 'algorithm:hex'", expected);
    };

    let algorithm = HashAlgorithm::from_prefix(prefix)?;
    let computed = compute_hash(data, algorithm);
    let expected = format!("{}:{}", prefix, expected_hex.to_lowercase());

    if computed != expected {
        anyhow::bail!("Hash mismatch: expected {}, got {}", expected, computed);
    }

    Ok(())
}
