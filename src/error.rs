use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can surface. Low-level sqlx/argon2/jwt errors are
/// translated into exactly one of these before crossing the service boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid field `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    /// Duplicate login or email on registration. Deliberately does not say
    /// which column collided.
    #[error("user already exists")]
    Conflict,

    /// Unknown login and wrong password report identically.
    #[error("invalid login or password")]
    Authentication,

    /// Missing, malformed, tampered and expired tokens report identically,
    /// as does a token whose subject no longer exists.
    #[error("invalid token")]
    Authorization,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Conflict => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Authentication => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Authorization => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_with_field_detail() {
        let resp = ApiError::validation("email", "not a valid email address").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_409() {
        let resp = ApiError::Conflict.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn authentication_and_authorization_map_to_401() {
        assert_eq!(
            ApiError::Authentication.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Authorization.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn internal_hides_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("password_hash leaked detail"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn generic_messages_do_not_distinguish_causes() {
        assert_eq!(ApiError::Authentication.to_string(), "invalid login or password");
        assert_eq!(ApiError::Authorization.to_string(), "invalid token");
        assert_eq!(ApiError::Conflict.to_string(), "user already exists");
    }
}
