//! Credential store use-cases: registration and login.
//!
//! # Invariants
//! - A duplicate username is an ordinary `false` outcome.
//! - Failed logins are indistinguishable to the caller (unknown user and
//!   wrong secret both yield `None` after the same hash work).

use crate::credential::CredentialHasher;
use crate::model::user::{validate_registration, User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use log::{debug, info};

/// Registration and login over a user repository.
pub struct AuthService<'h, R: UserRepository, H: CredentialHasher> {
    repo: R,
    hasher: &'h H,
}

impl<'h, R: UserRepository, H: CredentialHasher> AuthService<'h, R, H> {
    pub fn new(repo: R, hasher: &'h H) -> Self {
        Self { repo, hasher }
    }

    /// Registers a new user.
    ///
    /// Returns `Ok(false)` when the username is already taken.
    pub fn register(&self, username: &str, secret: &str) -> RepoResult<bool> {
        validate_registration(username, secret)?;

        let credential = self.hasher.hash(secret)?;
        match self.repo.insert_user(username, &credential)? {
            Some(user_id) => {
                info!("event=user_register module=auth status=ok user_id={user_id}");
                Ok(true)
            }
            None => {
                info!("event=user_register module=auth status=duplicate");
                Ok(false)
            }
        }
    }

    /// Returns the user when both username and secret match.
    pub fn login(&self, username: &str, secret: &str) -> RepoResult<Option<User>> {
        let Some(stored) = self.repo.find_by_username(username)? else {
            self.hasher.verify_decoy(secret);
            debug!("event=user_login module=auth status=rejected");
            return Ok(None);
        };

        if !self.hasher.verify(secret, &stored.credential) {
            debug!("event=user_login module=auth status=rejected");
            return Ok(None);
        }

        info!(
            "event=user_login module=auth status=ok user_id={}",
            stored.user.id
        );
        Ok(Some(stored.user))
    }

    pub fn find_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }
}
