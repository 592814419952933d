//! Password hashing
//!
//! Salted SHA-256 hashes in the format `sha256$<hex salt>$<hex digest>`, with
//! constant-time verification. Malformed stored hashes verify false rather
//! than erroring.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_BYTES: usize = 16;
const ALGO: &str = "sha256";

// == Hash ==
/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_password(&salt, password);
    format!("{}${}${}", ALGO, hex::encode(salt), hex::encode(digest))
}

// == Verify ==
/// Verifies a password against a stored hash in constant time.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (algo, hex_salt, hex_digest) = match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(s), Some(d)) => (a, s, d),
        _ => return false,
    };
    if algo != ALGO {
        return false;
    }
    let salt = match hex::decode(hex_salt) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let expected = match hex::decode(hex_digest) {
        Ok(d) => d,
        Err(_) => return false,
    };
    let actual = digest_password(&salt, password);
    actual.ct_eq(expected.as_slice()).into()
}

fn digest_password(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2");
        assert!(verify_password("hunter2", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("hunter2");
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_distinct_salts() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", "sha256$zz$zz"));
        assert!(!verify_password("pw", "md5$aa$bb"));
    }

    #[test]
    fn test_hash_format() {
        let hash = hash_password("pw");
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "sha256");
        assert_eq!(parts[1].len(), SALT_BYTES * 2);
        assert_eq!(parts[2].len(), 64);
    }
}
