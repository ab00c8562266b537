use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::repo_types::Identity,
    error::{AppError, AppResult},
    records::{dto::HealthRecordFields, repo::HealthRecordRepo, repo_types::HealthRecord},
};

/// Stores health declarations on behalf of an already authenticated identity.
#[derive(Clone)]
pub struct HealthRecordStore {
    repo: Arc<dyn HealthRecordRepo>,
}

impl HealthRecordStore {
    pub fn new(repo: Arc<dyn HealthRecordRepo>) -> Self {
        Self { repo }
    }

    /// Validates first; nothing is persisted for a rejected submission.
    pub async fn submit(&self, owner: &Identity, fields: &HealthRecordFields) -> AppResult<HealthRecord> {
        let new = match fields.validate() {
            Ok(new) => new,
            Err(AppError::Validation(errors)) => {
                warn!(owner_id = %owner.id, ?errors, "health record rejected");
                return Err(AppError::Validation(errors));
            }
            Err(e) => return Err(e),
        };

        let record = self.repo.insert(owner.id, new).await?;
        info!(owner_id = %owner.id, record_id = %record.id, "health record stored");
        Ok(record)
    }

    pub async fn find_records_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<HealthRecord>> {
        self.repo.find_by_owner(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::credentials::CredentialStore, memory::MemoryStore};
    use time::OffsetDateTime;

    async fn setup() -> (HealthRecordStore, Identity) {
        let mem = Arc::new(MemoryStore::default());
        let alice = CredentialStore::new(mem.clone())
            .register("alice", "alice@x.com", "secretpw1")
            .await
            .unwrap();
        (HealthRecordStore::new(mem), alice)
    }

    fn fields(pid: &str) -> HealthRecordFields {
        HealthRecordFields {
            name: Some("A".into()),
            surname: Some("B".into()),
            personal_id_number: Some(pid.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn submit_persists_owned_record() {
        let (store, alice) = setup().await;
        let rec = store.submit(&alice, &fields("123456789012")).await.unwrap();
        assert_eq!(rec.owner_id, alice.id);
        assert!(!rec.temperature && !rec.medicine);
        assert!(!rec.first_issues && !rec.second_issues && !rec.third_issues);

        let all = store.find_records_by_owner(alice.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, rec.id);
    }

    #[tokio::test]
    async fn invalid_personal_id_persists_nothing() {
        let (store, alice) = setup().await;
        store.submit(&alice, &fields("123456789012")).await.unwrap();

        for pid in ["12345678901", "123456789012345678901"] {
            let err = store.submit(&alice, &fields(pid)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!(store.find_records_by_owner(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_owner_is_a_storage_error() {
        let (store, alice) = setup().await;
        let ghost = Identity {
            id: Uuid::new_v4(),
            username: "ghost".into(),
            email: "ghost@x.com".into(),
            created_at: OffsetDateTime::now_utc(),
            ..alice
        };
        let err = store.submit(&ghost, &fields("123456789012")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn records_are_per_owner() {
        let mem = Arc::new(MemoryStore::default());
        let creds = CredentialStore::new(mem.clone());
        let alice = creds.register("alice", "alice@x.com", "secretpw1").await.unwrap();
        let bobby = creds.register("bobby", "bobby@x.com", "secretpw1").await.unwrap();
        let store = HealthRecordStore::new(mem);

        store.submit(&alice, &fields("123456789012")).await.unwrap();
        store.submit(&alice, &fields("123456789013")).await.unwrap();
        store.submit(&bobby, &fields("223456789012")).await.unwrap();

        let alices = store.find_records_by_owner(alice.id).await.unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|r| r.owner_id == alice.id));
        assert_eq!(store.find_records_by_owner(bobby.id).await.unwrap().len(), 1);
    }
}
