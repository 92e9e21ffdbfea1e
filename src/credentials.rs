//! Credential hasher: pure digest derivations for passwords and session tokens.
//!
//! Both digests use the same salted construction, `SHA-512(salt || input ||
//! pepper)`, returned as lowercase hex so stored and recomputed values compare
//! by plain string equality. The salt is always the user's `modification`
//! timestamp (the credential epoch); there is no per-user random nonce, so
//! unpredictability rests on epoch resolution and the secret pepper.

use sha2::{Digest, Sha512};

/// Derive the stored password hash for a user.
///
/// The concatenation order is fixed: login recomputes the comparison hash
/// from the *stored* epoch, so create/login/update must agree byte for byte.
#[must_use]
pub fn derive_password_hash(salt: &str, password: &str, pepper: &str) -> String {
    digest(salt, password, pepper)
}

/// Derive the session token for a user.
///
/// Same construction as the password hash with the username in place of the
/// password. Tokens are never persisted; a token is valid exactly as long as
/// the epoch it was derived from is still the user's current `modification`.
#[must_use]
pub fn derive_session_token(salt: &str, username: &str, pepper: &str) -> String {
    digest(salt, username, pepper)
}

/// Produce a fresh credential epoch value.
///
/// Rotating the epoch (and recomputing the hash alongside it) is the sole
/// mechanism that invalidates previously issued tokens.
#[must_use]
pub fn rotate_credential_epoch() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn digest(salt: &str, input: &str, pepper: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(salt.as_bytes());
    hasher.update(input.as_bytes());
    hasher.update(pepper.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_deterministic() {
        let a = derive_password_hash("2026-08-25T00:00:00+00:00", "hunter2", "pepper");
        let b = derive_password_hash("2026-08-25T00:00:00+00:00", "hunter2", "pepper");
        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_inputs_distinct_digests() {
        let base = derive_password_hash("salt", "password", "pepper");
        assert_ne!(base, derive_password_hash("salt2", "password", "pepper"));
        assert_ne!(base, derive_password_hash("salt", "password2", "pepper"));
        assert_ne!(base, derive_password_hash("salt", "password", "pepper2"));
    }

    #[test]
    fn test_token_and_hash_constructions_agree() {
        // Same construction, so identical inputs must collide on purpose.
        assert_eq!(
            derive_password_hash("s", "alice", "p"),
            derive_session_token("s", "alice", "p")
        );
    }

    #[test]
    fn test_known_digest() {
        // SHA-512("abc") — concatenation split across salt/input/pepper.
        let expected = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                        2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";
        assert_eq!(derive_password_hash("a", "b", "c"), expected);
    }

    #[test]
    fn test_rotated_epochs_differ() {
        let a = rotate_credential_epoch();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = rotate_credential_epoch();
        assert_ne!(a, b);
    }
}
