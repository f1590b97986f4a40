//! Cache keying policy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeying {
    /// One endpoint for the process, whatever credential asks.
    #[default]
    Process,
    /// Re-resolve when a different credential asks.
    PerCredential,
}

impl FromStr for CacheKeying {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" | "global" => Ok(CacheKeying::Process),
            "per_credential" | "per-credential" | "credential" => Ok(CacheKeying::PerCredential),
            other => Err(format!("Unknown cache keying: {}", other)),
        }
    }
}

/// Hex SHA-256 of the credential. The raw credential is never stored.
pub fn credential_fingerprint(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keying_from_str() {
        assert_eq!("process".parse::<CacheKeying>().unwrap(), CacheKeying::Process);
        assert_eq!(
            "per-credential".parse::<CacheKeying>().unwrap(),
            CacheKeying::PerCredential
        );
        assert!("sometimes".parse::<CacheKeying>().is_err());
    }

    #[test]
    fn fingerprint_is_stable_and_opaque() {
        let a = credential_fingerprint("secret-key");
        assert_eq!(a, credential_fingerprint("secret-key"));
        assert_ne!(a, credential_fingerprint("other-key"));
        assert_eq!(a.len(), 64);
        assert!(!a.contains("secret"));
    }
}
