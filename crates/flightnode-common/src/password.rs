//! Password hashing
//!
//! Passwords are stored as a PBKDF2-HMAC-SHA256 derived key. The salt is a
//! random 128-bit value generated per hash; both key and salt are hex
//! encoded so they fit ordinary text columns.

use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// PBKDF2 iteration count applied to every password
pub const HASH_ROUNDS: u32 = 100_000;

const KEY_LEN: usize = 32;

/// Stored form of a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> PasswordHash {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = hash_with_salt(password, &salt);
    PasswordHash { hash, salt }
}

/// Hash a password with a known salt
pub fn hash_with_salt(password: &str, salt: &str) -> String {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), HASH_ROUNDS, &mut key);
    hex::encode(key)
}

/// Check a candidate password against a stored hash and salt
///
/// The comparison runs in constant time over equal-length inputs.
pub fn verify_password(candidate: &str, hash: &str, salt: &str) -> bool {
    let computed = hash_with_salt(candidate, salt);
    computed.as_bytes().ct_eq(hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_hex_encoded_key() {
        let hashed = hash_password("correct horse");
        assert_eq!(hashed.hash.len(), KEY_LEN * 2);
        assert!(hashed.hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hashed.salt.len(), 32);
    }

    #[test]
    fn test_verify_accepts_matching_password() {
        let hashed = hash_password("correct horse");
        assert!(verify_password("correct horse", &hashed.hash, &hashed.salt));
        assert!(!verify_password("battery staple", &hashed.hash, &hashed.salt));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let first = hash_password("same");
        let second = hash_password("same");
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_hash_with_salt_is_deterministic() {
        assert_eq!(hash_with_salt("pw", "salt"), hash_with_salt("pw", "salt"));
    }

    #[test]
    fn test_known_pbkdf2_vector() {
        // RFC 7914 section 11, c = 1
        let mut key = [0u8; 64];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut key);
        assert_eq!(
            hex::encode(&key[..16]),
            "55ac046e56e3089fec1691c22544b605"
        );
    }

    #[test]
    fn test_verify_rejects_truncated_hash() {
        let hashed = hash_password("correct horse");
        assert!(!verify_password("correct horse", &hashed.hash[..32], &hashed.salt));
    }
}
