// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor for stored hashes.
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password with bcrypt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Compare a plaintext password against a stored bcrypt hash.
///
/// A hash that cannot be parsed counts as a mismatch.
pub fn check_password_hash(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("correct horse", 4).unwrap();
        assert!(check_password_hash("correct horse", &hash));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("correct horse", 4).unwrap();
        assert!(!check_password_hash("battery staple", &hash));
    }

    #[test]
    fn corrupt_hash_is_a_mismatch() {
        assert!(!check_password_hash("anything", "not-a-bcrypt-hash"));
    }
}
