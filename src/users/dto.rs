use std::fmt;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Request body for user registration. Every field is Option so a missing
/// field surfaces as a field-level validation error rather than a
/// deserializer rejection; the date of birth is parsed during validation.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub login: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
}

// Plaintext passwords must never reach the logs, so Debug redacts them.
impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("login", &self.login)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("date_of_birth", &self.date_of_birth)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for profile update. Login is immutable and deliberately not
/// part of this set.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
}

/// Body of GET /check_token. The Go gateway sends the key capitalized, so
/// both spellings are accepted.
#[derive(Debug, Deserialize)]
pub struct CheckTokenRequest {
    #[serde(alias = "Token")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckTokenResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// The profile view returned to the client. Narrower than the stored row:
/// no user id, no timestamps, no password hash.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub login: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    #[serde(with = "iso_date")]
    pub date_of_birth: Date,
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn profile_serializes_date_as_iso() {
        let profile = ProfileResponse {
            login: "testuser".into(),
            email: "mail@example.com".into(),
            name: "Test".into(),
            surname: "User".into(),
            date_of_birth: date!(1990 - 01 - 01),
            phone_number: "+1234567890".into(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["date_of_birth"], "1990-01-01");
        assert_eq!(json["login"], "testuser");
        assert!(json.get("user_id").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn debug_redacts_passwords() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "login": "testuser",
            "email": "mail@example.com",
            "password": "secret-password",
            "name": "Test",
            "surname": "User",
            "date_of_birth": "1990-01-01",
            "phone_number": "+1234567890",
        }))
        .unwrap();
        let printed = format!("{req:?}");
        assert!(!printed.contains("secret-password"));
        assert!(printed.contains("<redacted>"));

        let login: LoginRequest = serde_json::from_value(serde_json::json!({
            "login": "testuser",
            "password": "secret-password",
        }))
        .unwrap();
        assert!(!format!("{login:?}").contains("secret-password"));
    }

    #[test]
    fn check_token_accepts_capitalized_key() {
        let req: CheckTokenRequest =
            serde_json::from_value(serde_json::json!({ "Token": "abc" })).unwrap();
        assert_eq!(req.token.as_deref(), Some("abc"));
        let req: CheckTokenRequest =
            serde_json::from_value(serde_json::json!({ "token": "abc" })).unwrap();
        assert_eq!(req.token.as_deref(), Some("abc"));
    }
}
