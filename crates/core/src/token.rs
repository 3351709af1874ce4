//! Opaque token generation and storage digests.
//!
//! Access and refresh tokens are 32 cryptographically random bytes, hex
//! encoded. The plaintext goes to the client exactly once; only the SHA-256
//! digest is persisted, so a database leak does not yield usable
//! credentials.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a random opaque token.
///
/// Returns `(plaintext, sha256_hex_digest)`. The plaintext is sent to the
/// client; only the digest should be persisted.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);

    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let digest = hash_token(&plaintext);
    (plaintext, digest)
}

/// Compute the SHA-256 hex digest of a token.
///
/// Use this to compare an incoming token against its stored digest.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
