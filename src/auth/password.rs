//! Password hashing with PBKDF2-SHA256.
//!
//! Stored hashes are self-describing strings:
//! `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`. Encoding the
//! iteration count lets the work factor rise later without invalidating
//! existing accounts.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 32;
pub const HASH_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password at the production work factor.
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, PBKDF2_ITERATIONS)
}

/// Hash at an explicit iteration count. Production callers go through
/// [`hash_password`]; tests pass a small count to stay fast.
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut hash);

    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        BASE64.encode(salt),
        BASE64.encode(hash),
    )
}

/// Check a password against a stored hash string.
///
/// Any malformed stored value (wrong scheme, bad base64, missing
/// fields) verifies as `false` rather than erroring: a corrupt hash
/// must behave like a wrong password, not take down the login path.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (scheme, iterations, salt, expected) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(s), Some(i), Some(salt), Some(hash), None) => (s, i, salt, hash),
        _ => return false,
    };
    if scheme != SCHEME {
        return false;
    }
    let iterations: u32 = match iterations.parse() {
        Ok(n) if n > 0 => n,
        _ => return false,
    };
    let salt = match BASE64.decode(salt) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let expected = match BASE64.decode(expected) {
        Ok(h) if h.len() == HASH_LENGTH => h,
        _ => return false,
    };

    let mut computed = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut computed);

    // Constant-time comparison to prevent timing attacks
    computed.ct_eq(&expected).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps these tests fast; the format is identical.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password_with_iterations("patient123", TEST_ITERATIONS);
        assert!(verify_password("patient123", &stored));
    }

    #[test]
    fn wrong_password_rejected() {
        let stored = hash_password_with_iterations("patient123", TEST_ITERATIONS);
        assert!(!verify_password("doctor123", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn same_password_hashes_differently() {
        let h1 = hash_password_with_iterations("patient123", TEST_ITERATIONS);
        let h2 = hash_password_with_iterations("patient123", TEST_ITERATIONS);
        assert_ne!(h1, h2); // Per-hash random salt
        assert!(verify_password("patient123", &h1));
        assert!(verify_password("patient123", &h2));
    }

    #[test]
    fn hash_encodes_iteration_count() {
        let stored = hash_password_with_iterations("pw", TEST_ITERATIONS);
        let mut parts = stored.split('$');
        assert_eq!(parts.next(), Some("pbkdf2-sha256"));
        assert_eq!(parts.next(), Some("1000"));
    }

    #[test]
    fn malformed_stored_hash_rejected() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", "pbkdf2-sha256$1000$onlythreeparts"));
        assert!(!verify_password("pw", "pbkdf2-sha256$1000$a$b$extra"));
        assert!(!verify_password("pw", "pbkdf2-sha256$zero$AAAA$AAAA"));
        assert!(!verify_password("pw", "pbkdf2-sha256$1000$!!notb64!!$AAAA"));
        assert!(!verify_password("pw", "scrypt$1000$AAAA$AAAA"));
    }

    #[test]
    fn truncated_digest_rejected() {
        let stored = hash_password_with_iterations("pw", TEST_ITERATIONS);
        let short = {
            let mut parts: Vec<&str> = stored.split('$').collect();
            parts[3] = "AAAA";
            parts.join("$")
        };
        assert!(!verify_password("pw", &short));
    }
}
