//! In-memory repositories for tests. They enforce the same unique and
//! foreign-key rules as `migrations/`.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::IdentityRepo,
        repo_types::{Identity, NewIdentity},
    },
    error::{AppError, AppResult},
    records::{
        repo::HealthRecordRepo,
        repo_types::{HealthRecord, NewHealthRecord},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    identities: Mutex<Vec<Identity>>,
    records: Mutex<Vec<HealthRecord>>,
}

impl MemoryStore {
    /// Drops an identity behind the services' backs, as an operator might.
    pub fn remove_identity(&self, id: Uuid) {
        self.identities.lock().unwrap().retain(|i| i.id != id);
    }
}

#[async_trait]
impl IdentityRepo for MemoryStore {
    async fn insert(&self, new: NewIdentity) -> AppResult<Identity> {
        let mut identities = self.identities.lock().unwrap();
        if identities.iter().any(|i| i.username == new.username) {
            return Err(AppError::DuplicateUsername);
        }
        if identities.iter().any(|i| i.email == new.email) {
            return Err(AppError::DuplicateEmail);
        }
        let identity = Identity {
            id: new.id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        identities.push(identity.clone());
        Ok(identity)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Identity>> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.id == id).cloned())
    }
}

#[async_trait]
impl HealthRecordRepo for MemoryStore {
    async fn insert(&self, owner_id: Uuid, new: NewHealthRecord) -> AppResult<HealthRecord> {
        if !self.identities.lock().unwrap().iter().any(|i| i.id == owner_id) {
            return Err(AppError::Storage(sqlx::Error::Protocol(format!(
                "health_record.owner_id {} violates foreign key",
                owner_id
            ))));
        }
        let record = HealthRecord {
            id: Uuid::new_v4(),
            owner_id,
            name: new.name,
            surname: new.surname,
            personal_id_number: new.personal_id_number,
            phone_number: new.phone_number,
            temperature: new.temperature,
            medicine: new.medicine,
            first_issues: new.first_issues,
            second_issues: new.second_issues,
            third_issues: new.third_issues,
            created_at: OffsetDateTime::now_utc(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<HealthRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
