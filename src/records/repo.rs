use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    records::repo_types::{HealthRecord, NewHealthRecord},
};

/// Persistence seam for health records. Records are append-only.
#[async_trait]
pub trait HealthRecordRepo: Send + Sync {
    async fn insert(&self, owner_id: Uuid, new: NewHealthRecord) -> AppResult<HealthRecord>;
    /// Newest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<HealthRecord>>;
}

#[derive(Clone)]
pub struct PgHealthRecordRepo {
    db: PgPool,
}

impl PgHealthRecordRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthRecordRepo for PgHealthRecordRepo {
    async fn insert(&self, owner_id: Uuid, new: NewHealthRecord) -> AppResult<HealthRecord> {
        let record = sqlx::query_as::<_, HealthRecord>(
            r#"
            INSERT INTO health_record (
                id, owner_id, name, surname, personal_id_number, phone_number,
                temperature, medicine, first_issues, second_issues, third_issues
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, owner_id, name, surname, personal_id_number, phone_number,
                      temperature, medicine, first_issues, second_issues, third_issues,
                      created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.name)
        .bind(&new.surname)
        .bind(&new.personal_id_number)
        .bind(&new.phone_number) // Option<String> → NULL allowed
        .bind(new.temperature)
        .bind(new.medicine)
        .bind(new.first_issues)
        .bind(new.second_issues)
        .bind(new.third_issues)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<HealthRecord>> {
        let rows = sqlx::query_as::<_, HealthRecord>(
            r#"
            SELECT id, owner_id, name, surname, personal_id_number, phone_number,
                   temperature, medicine, first_issues, second_issues, third_issues,
                   created_at
              FROM health_record
             WHERE owner_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
