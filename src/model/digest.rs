//! Payload checksum using SHA-256

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Length in bytes of a SHA-256 digest
pub const DIGEST_LEN: usize = 32;

/// Length of a digest encoded as URL-safe base64 without padding
pub const ENCODED_DIGEST_LEN: usize = (DIGEST_LEN * 4).div_ceil(3);

/// A 32-byte SHA-256 digest of a record payload
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Create a digest from raw bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// Hash arbitrary data
    pub fn compute(data: &[u8]) -> Self {
        Digest(Sha256::digest(data).into())
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Encode as URL-safe base64 without padding, the form stored in record headers
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parse the header form. Returns `None` unless the text is canonical
    /// URL-safe base64 of exactly 32 bytes.
    pub fn from_base64(s: &[u8]) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(s).ok()?;
        let arr: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Digest(arr))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get a short prefix for display
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len() {
        assert_eq!(ENCODED_DIGEST_LEN, 43);
        assert_eq!(Digest::compute(b"").to_base64().len(), ENCODED_DIGEST_LEN);
        assert_eq!(
            Digest::compute(&[0xffu8; 4096]).to_base64().len(),
            ENCODED_DIGEST_LEN
        );
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            Digest::compute(b"").to_base64(),
            "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU"
        );
        assert_eq!(
            Digest::compute(b"test").to_base64(),
            "n4bQgYhMfWWaL-qgxVrQFaO_TxsrC4Is0V1sFbDwCgg"
        );
        assert_eq!(
            Digest::compute(b"test").to_hex(),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_from_base64() {
        let d = Digest::compute(b"foobar");
        assert_eq!(Digest::from_base64(d.to_base64().as_bytes()), Some(d));

        // padded, standard alphabet and truncated forms are all rejected
        assert_eq!(Digest::from_base64(b"n4bQgYhMfWWaL-qgxVrQFaO_TxsrC4Is0V1sFbDwCgg="), None);
        assert_eq!(Digest::from_base64(b"n4bQgYhMfWWaL+qgxVrQFaO/TxsrC4Is0V1sFbDwCgg"), None);
        assert_eq!(Digest::from_base64(b"n4bQgYhMfWWaL"), None);
        assert_eq!(Digest::from_base64(b""), None);
    }

    #[test]
    fn test_short() {
        assert_eq!(Digest::compute(b"test").short(), "9f86d08");
    }
}
