use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::identity::errors::AuthError;

pub mod current;
pub mod login;
pub mod logout;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error kinds exposed to clients.
///
/// Token failures collapse to `Unauthorized` except expiry, which clients
/// need to tell apart to trigger a fresh login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    AuthenticationFailed,
    TokenExpired,
    Unauthorized,
    ServiceUnavailable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed | ApiError::TokenExpired | ApiError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::AuthenticationFailed => "authentication_failed",
            ApiError::TokenExpired => "token_expired",
            ApiError::Unauthorized => "unauthorized",
            ApiError::ServiceUnavailable => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ApiErrorBody {
                error: self.code(),
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed => ApiError::AuthenticationFailed,
            AuthError::Expired => ApiError::TokenExpired,
            AuthError::Malformed | AuthError::InvalidSignature | AuthError::Revoked => {
                ApiError::Unauthorized
            }
            AuthError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Authentication infrastructure failure");
                ApiError::ServiceUnavailable
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_are_uniform_except_expiry() {
        for err in [
            AuthError::Malformed,
            AuthError::InvalidSignature,
            AuthError::Revoked,
        ] {
            assert_eq!(ApiError::from(err), ApiError::Unauthorized);
        }
        assert_eq!(ApiError::from(AuthError::Expired), ApiError::TokenExpired);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::AuthenticationFailed).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Infrastructure("db down".to_string())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
