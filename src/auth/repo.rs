use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::repo_types::{Identity, NewIdentity},
    error::{AppError, AppResult},
};

pub(crate) const USERNAME_UNIQUE: &str = "identity_username_key";
pub(crate) const EMAIL_UNIQUE: &str = "identity_email_key";

/// Persistence seam for identities.
#[async_trait]
pub trait IdentityRepo: Send + Sync {
    /// Inserts a new identity. Unique violations surface as
    /// `DuplicateUsername` / `DuplicateEmail`.
    async fn insert(&self, new: NewIdentity) -> AppResult<Identity>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Identity>>;
}

#[derive(Clone)]
pub struct PgIdentityRepo {
    db: PgPool,
}

impl PgIdentityRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_UNIQUE) => return AppError::DuplicateUsername,
                Some(EMAIL_UNIQUE) => return AppError::DuplicateEmail,
                _ => {}
            }
        }
    }
    AppError::Storage(e)
}

#[async_trait]
impl IdentityRepo for PgIdentityRepo {
    async fn insert(&self, new: NewIdentity) -> AppResult<Identity> {
        sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO identity (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(new.id)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM identity
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(identity)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM identity
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(identity)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM identity
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(identity)
    }
}
