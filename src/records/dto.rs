use serde::Deserialize;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    records::repo_types::NewHealthRecord,
    validation::{checkbox, required_len},
};

pub const PHONE_MAX: usize = 30;

/// Body of `POST /covid`. Every field is optional at the wire level so that
/// missing values surface as field errors instead of a rejected body.
#[derive(Debug, Default, Deserialize)]
pub struct HealthRecordFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub personal_id_number: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub temperature: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub medicine: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub first_issues: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub second_issues: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub third_issues: bool,
}

impl HealthRecordFields {
    pub fn validate(&self) -> AppResult<NewHealthRecord> {
        let mut errors = FieldErrors::new();
        let name = required_len(&mut errors, "name", self.name.as_deref(), 1, 25);
        let surname = required_len(&mut errors, "surname", self.surname.as_deref(), 1, 50);
        let personal_id_number = required_len(
            &mut errors,
            "personal_id_number",
            self.personal_id_number.as_deref(),
            12,
            20,
        );

        let phone_number = self
            .phone_number
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        if phone_number
            .as_deref()
            .is_some_and(|p| p.chars().count() > PHONE_MAX)
        {
            errors.add(
                "phone_number",
                format!("Field cannot be longer than {} characters.", PHONE_MAX),
            );
        }

        match (name, surname, personal_id_number) {
            (Some(name), Some(surname), Some(personal_id_number)) if errors.is_empty() => {
                Ok(NewHealthRecord {
                    name,
                    surname,
                    personal_id_number,
                    phone_number,
                    temperature: self.temperature,
                    medicine: self.medicine,
                    first_issues: self.first_issues,
                    second_issues: self.second_issues,
                    third_issues: self.third_issues,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}
