//! Bearer token digests.
//!
//! Sessions never store the bearer token itself, only its SHA-256 digest.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of a bearer token.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex() {
        let a = token_digest("abc");
        assert_eq!(a.len(), 64);
        assert_eq!(
            a,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(a, token_digest("abd"));
    }
}
