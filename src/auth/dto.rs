use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    validation::{checkbox, is_valid_email, required_len, required_secret},
};

pub const EMAIL_MAX: usize = 50;

/// Body of `POST /signup`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> AppResult<Registration> {
        let mut errors = FieldErrors::new();
        let username = required_len(&mut errors, "username", self.username.as_deref(), 4, 25);
        let email = required_len(&mut errors, "email", self.email.as_deref(), 1, EMAIL_MAX);
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            errors.add("email", "Invalid email");
        }
        let password = required_secret(&mut errors, "password", self.password.as_deref(), 8, 50);

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) if errors.is_empty() => {
                Ok(Registration {
                    username,
                    email,
                    password,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Body of `POST /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn validate(&self) -> AppResult<Credentials> {
        let mut errors = FieldErrors::new();
        let username = required_len(&mut errors, "username", self.username.as_deref(), 4, 25);
        let password = required_secret(&mut errors, "password", self.password.as_deref(), 8, 50);

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => Ok(Credentials {
                username,
                password,
                remember: self.remember,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Identity fields safe to show on the dashboard.
#[derive(Debug, Serialize)]
pub struct PublicIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}
