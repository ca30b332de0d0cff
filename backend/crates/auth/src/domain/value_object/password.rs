//! Password Value Objects
//!
//! Domain wrappers around `platform::password`. The hashing primitive is
//! opaque to this crate: `RawPassword` is the clear-text input (zeroized on
//! drop), `PasswordDigest` the stored one-way result.

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::{AuthError, AuthResult};

/// Minimum password length for registration (Unicode code points)
///
/// Enforced only on the registration path; seeded accounts are exempt.
pub const PASSWORD_MIN_LENGTH: usize = 6;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped; Debug output is redacted.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Accept any non-empty password (login, seeding)
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(Self(clear_text))
    }

    /// Accept a password for registration, enforcing the minimum length
    pub fn for_registration(raw: impl Into<String>) -> AuthResult<Self> {
        let password = Self::new(raw)?;

        if password.0.char_count() < PASSWORD_MIN_LENGTH {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters long".into(),
            ));
        }

        Ok(password)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Password Digest (Hashed, for storage)
// ============================================================================

/// One-way password digest for database storage (Argon2id PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(HashedPassword);

impl PasswordDigest {
    /// Compute the digest of a raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let hashed = raw
            .inner()
            .hash(pepper)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(Self(hashed))
    }

    /// Restore from a PHC string loaded from the database
    pub fn from_db(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".into()))?;

        Ok(Self(hashed))
    }

    /// PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this digest (constant-time)
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("hash", &"[HASH]")
            .finish()
    }
}
