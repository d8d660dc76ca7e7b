//! Customer identifiers never reach the logs in clear text.

use sha2::{Digest, Sha256};

const EMAIL_HASH_SALT: &[u8] = b"pinsync-customer-email-salt";

/// Stable, non-reversible tag for a customer email, e.g. `email_hash=3f9a…`.
///
/// Comparison is case-insensitive so the same customer always maps to the same
/// tag in log lines.
pub fn redact_email(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(EMAIL_HASH_SALT);
    hasher.update(email.trim().to_ascii_lowercase().as_bytes());
    let digest = hasher.finalize();
    format!("email_hash={}", hex::encode(&digest[..8]))
}
