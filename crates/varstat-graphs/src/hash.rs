use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of the given bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
