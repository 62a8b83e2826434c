use sha2::{Digest, Sha256};

fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Compare a presented token with the configured secret.
///
/// Both sides are hashed first so the comparison always covers 32 bytes, and
/// every byte is inspected regardless of where the first mismatch is.
pub fn token_matches(presented: &str, secret: &str) -> bool {
    let presented = hash_token(presented);
    let secret = hash_token(secret);
    presented
        .iter()
        .zip(secret.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
