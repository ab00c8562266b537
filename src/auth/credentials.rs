use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo::IdentityRepo,
        repo_types::{Identity, NewIdentity},
    },
    error::{AppError, AppResult},
};

/// Owns identity records: uniqueness, hashing, secret checks.
#[derive(Clone)]
pub struct CredentialStore {
    repo: Arc<dyn IdentityRepo>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn IdentityRepo>) -> Self {
        Self { repo }
    }

    /// Creates an identity. The lookups below only give early, friendly errors;
    /// the unique constraints behind `IdentityRepo::insert` decide races.
    pub async fn register(&self, username: &str, email: &str, secret: &str) -> AppResult<Identity> {
        if self.repo.find_by_username(username).await?.is_some() {
            warn!(%username, "username already taken");
            return Err(AppError::DuplicateUsername);
        }
        if self.repo.find_by_email(email).await?.is_some() {
            warn!(%email, "email already taken");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(secret)?;
        let identity = self
            .repo
            .insert(NewIdentity {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(identity_id = %identity.id, username = %identity.username, "user registered");
        Ok(identity)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        self.repo.find_by_username(username).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Identity>> {
        self.repo.find_by_id(id).await
    }

    /// A stored hash that cannot be parsed never verifies.
    pub fn verify_secret(&self, identity: &Identity, secret: &str) -> bool {
        match verify_password(secret, &identity.password_hash) {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, identity_id = %identity.id, "stored password hash unreadable");
                false
            }
        }
    }
}
