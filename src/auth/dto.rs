use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::validation::{is_valid_email, Validator};

#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup fields after validation, with the email normalized to lowercase.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupPayload {
    pub fn validate(&self) -> Result<NewUser, ApiError> {
        let mut validator = Validator::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.chars().count() < 2 {
            validator.error("name", "Name must be at least 2 characters");
        }

        let email = normalize_email(self.email.as_deref());
        if !is_valid_email(&email) {
            validator.error("email", "Invalid email");
        }

        let password = self.password.as_deref().unwrap_or_default();
        if password.len() < 6 {
            validator.error("password", "Password must be at least 6 characters");
        }

        validator.finish()?;
        Ok(NewUser {
            name: name.to_string(),
            email,
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    pub fn validate(&self) -> Result<(String, String), ApiError> {
        let mut validator = Validator::new();

        let email = normalize_email(self.email.as_deref());
        if !is_valid_email(&email) {
            validator.error("email", "Invalid email");
        }

        let password = self.password.as_deref().unwrap_or_default();
        if password.is_empty() {
            validator.error("password", "Password is required");
        }

        validator.finish()?;
        Ok((email, password.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    pub refresh_token: Option<String>,
}

impl RefreshPayload {
    pub fn validate(&self) -> Result<&str, ApiError> {
        match self.refresh_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                let mut validator = Validator::new();
                validator.missing("refreshToken");
                Err(validator.finish().unwrap_err())
            }
        }
    }
}

fn normalize_email(email: Option<&str>) -> String {
    email.unwrap_or_default().trim().to_lowercase()
}

/// Public part of the user, embedded in auth responses.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn fields(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn signup_collects_every_failing_field() {
        let payload = SignupPayload {
            name: Some("x".into()),
            email: Some("nope".into()),
            password: Some("short".into()),
        };
        assert_eq!(
            fields(payload.validate().unwrap_err()),
            vec!["name", "email", "password"]
        );
    }

    #[test]
    fn signup_normalizes_email() {
        let payload = SignupPayload {
            name: Some("Ada Lovelace".into()),
            email: Some("  Ada@Example.COM ".into()),
            password: Some("hunter22".into()),
        };
        let new_user = payload.validate().unwrap();
        assert_eq!(new_user.email, "ada@example.com");
        assert_eq!(new_user.name, "Ada Lovelace");
    }

    #[test]
    fn signup_treats_missing_fields_as_invalid() {
        let payload = SignupPayload {
            name: None,
            email: None,
            password: None,
        };
        assert_eq!(
            fields(payload.validate().unwrap_err()),
            vec!["name", "email", "password"]
        );
    }

    #[test]
    fn login_requires_password() {
        let payload = LoginPayload {
            email: Some("user@example.com".into()),
            password: Some("".into()),
        };
        assert_eq!(fields(payload.validate().unwrap_err()), vec!["password"]);
    }

    #[test]
    fn refresh_requires_token() {
        let payload = RefreshPayload {
            refresh_token: None,
        };
        assert_eq!(
            fields(payload.validate().unwrap_err()),
            vec!["refreshToken"]
        );
    }
}
