//! Password hashing and verification (bcrypt).

use std::sync::OnceLock;

use crate::error::{AppError, AppResult};

/// Shortest password accepted on signup, password change, and reset.
pub const MIN_PASSWORD_LEN: usize = 8;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// hash_password
///
/// One-way salted bcrypt hash. Two calls with the same plaintext produce different
/// strings that both verify. Plaintexts longer than `MAX_PASSWORD_BYTES` are refused
/// rather than truncated.
pub fn hash_password(plaintext: &str, cost: u32) -> AppResult<String> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::validation(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// compare_passwords
///
/// bcrypt verification. A malformed stored hash or an over-long plaintext counts as a
/// mismatch, so two inputs sharing their first 72 bytes never both verify.
pub fn compare_passwords(plaintext: &str, hash: &str) -> bool {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// Verifies `plaintext` against a throwaway hash of the same `cost` and always reports a
/// mismatch. Lets a lookup miss take as long as a wrong password.
pub fn compare_with_dummy(plaintext: &str, cost: u32) -> bool {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    let hash = DUMMY_HASH
        .get_or_init(|| bcrypt::hash("placeholder-for-unknown-users", cost).unwrap_or_default());
    let _ = compare_passwords(plaintext, hash);
    false
}

/// password_fingerprint
///
/// The salt segment of a bcrypt hash (`$2b$<cost>$<22 salt chars><31 hash chars>`).
/// Every rehash draws a new salt, so the value changes whenever the password does,
/// and it carries nothing of the checksum.
pub fn password_fingerprint(hash: &str) -> String {
    hash.get(7..29).unwrap_or_default().to_string()
}
