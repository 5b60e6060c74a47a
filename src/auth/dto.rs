use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim, lowercase and format-check an email from client input.
pub(crate) fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    Ok(email)
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_name(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    if let Some(v) = value {
        if v.chars().count() > 50 {
            return Err(ApiError::Validation(format!(
                "{field} must be at most 50 characters"
            )));
        }
    }
    Ok(())
}

/// Request body for registration. Strict schema: any field beyond these
/// four is rejected, so privilege flags can never be smuggled in.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// OAuth2 password-flow form consumed by /auth/jwt/login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestVerifyTokenRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn email_regex_rejects_garbage() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn register_request_rejects_unknown_fields() {
        let err = serde_json::from_value::<RegisterRequest>(serde_json::json!({
            "email": "user@example.com",
            "password": "longenough",
            "is_superuser": true,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("is_superuser"));
    }

    #[test]
    fn register_request_allows_optional_names() {
        let req = serde_json::from_value::<RegisterRequest>(serde_json::json!({
            "email": "user@example.com",
            "password": "longenough",
        }))
        .unwrap();
        assert!(req.first_name.is_none());
        assert!(req.last_name.is_none());
    }
}
