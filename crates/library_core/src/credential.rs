//! Credential hashing for the users relation.
//!
//! # Responsibility
//! - Turn a caller secret into an opaque stored credential.
//! - Verify a secret against a stored credential.
//!
//! # Invariants
//! - Plain secrets are never persisted or logged.
//! - Stored credentials are Argon2id PHC strings with a per-credential salt.
//! - Login for an unknown user costs the same hash work as a wrong secret.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DECOY_SECRET: &str = "decoy-secret-never-registered";

/// Hashing backend failure.
#[derive(Debug)]
pub struct CredentialError(String);

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential hashing failed: {}", self.0)
    }
}

impl Error for CredentialError {}

impl From<argon2::password_hash::Error> for CredentialError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self(value.to_string())
    }
}

/// Hashing seam used by the credential store.
pub trait CredentialHasher {
    /// Produces the stored form of `secret`.
    fn hash(&self, secret: &str) -> Result<String, CredentialError>;
    /// Returns whether `secret` matches the `stored` credential.
    ///
    /// Malformed stored values never verify.
    fn verify(&self, secret: &str, stored: &str) -> bool;
    /// Spends the same work as a real `verify` without a stored credential.
    fn verify_decoy(&self, secret: &str);
}

/// Argon2id hasher with the crate's default cost parameters.
#[derive(Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
    decoy: OnceCell<Option<String>>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(secret.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }

    fn verify_decoy(&self, secret: &str) {
        let decoy = self.decoy.get_or_init(|| self.hash(DECOY_SECRET).ok());
        if let Some(decoy) = decoy {
            let _ = self.verify(secret, decoy);
        }
    }
}
