use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One immutable health self-declaration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub surname: String,
    pub personal_id_number: String,
    pub phone_number: Option<String>,
    pub temperature: bool,   // fever of 38 °C or more
    pub medicine: bool,      // takes fever-reducing medicine
    pub first_issues: bool,  // cough, diarrhoea, nausea, loss of smell or taste
    pub second_issues: bool, // shortness of breath
    pub third_issues: bool,  // muscle pain, fatigue
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated submission ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHealthRecord {
    pub name: String,
    pub surname: String,
    pub personal_id_number: String,
    pub phone_number: Option<String>,
    pub temperature: bool,
    pub medicine: bool,
    pub first_issues: bool,
    pub second_issues: bool,
    pub third_issues: bool,
}
