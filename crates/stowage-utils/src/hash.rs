use std::{fmt, str::FromStr};

use sha2::{Digest as _, Sha256};

use crate::error::{HashError, HashResult};

/// Algorithm prefix used for every digest stowage produces.
pub const SHA256_PREFIX: &str = "sha256";

/// Length of a hex encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// An algorithm-prefixed SHA-256 digest, rendered as `sha256:<hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Hashes `data` with SHA-256.
    pub fn of(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Parses a bare 64 character lowercase hex string.
    ///
    /// # Errors
    ///
    /// * [`HashError::InvalidDigest`] if the input is not 64 lowercase hex characters.
    pub fn from_hex(hex_str: &str) -> HashResult<Self> {
        if hex_str.len() != SHA256_HEX_LEN {
            return Err(HashError::InvalidDigest {
                input: hex_str.to_string(),
                reason: "expected 64 hex characters",
            });
        }
        if !is_lower_hex(hex_str) {
            return Err(HashError::InvalidDigest {
                input: hex_str.to_string(),
                reason: "expected lowercase hex characters",
            });
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| {
            HashError::InvalidDigest {
                input: hex_str.to_string(),
                reason: "expected lowercase hex characters",
            }
        })?;
        Ok(Self(bytes))
    }

    /// Lowercase hex encoding without the algorithm prefix.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The first `len` hex characters of the digest.
    pub fn short_hex(&self, len: usize) -> String {
        let mut hex = self.hex();
        hex.truncate(len);
        hex
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SHA256_PREFIX}:{}", self.hex())
    }
}

impl FromStr for Sha256Digest {
    type Err = HashError;

    fn from_str(s: &str) -> HashResult<Self> {
        let Some((algorithm, hex)) = s.split_once(':') else {
            return Err(HashError::InvalidDigest {
                input: s.to_string(),
                reason: "missing algorithm prefix",
            });
        };
        if algorithm != SHA256_PREFIX {
            return Err(HashError::InvalidDigest {
                input: s.to_string(),
                reason: "unsupported algorithm",
            });
        }
        Self::from_hex(hex).map_err(|_| {
            HashError::InvalidDigest {
                input: s.to_string(),
                reason: "expected 64 lowercase hex characters",
            }
        })
    }
}

/// Returns `true` when `s` is non-empty and only contains `[0-9a-f]`.
pub fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Verifies that `data` hashes to `expected`.
pub fn verify_digest(data: &[u8], expected: &Sha256Digest) -> bool {
    Sha256Digest::of(data) == *expected
}
