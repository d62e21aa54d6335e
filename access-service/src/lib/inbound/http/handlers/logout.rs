use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Always succeeds, whether or not the token was valid.
///
/// An unreadable body is treated like an invalid token: nothing to revoke.
pub async fn logout(
    State(state): State<AppState>,
    body: Result<Json<LogoutRequestBody>, JsonRejection>,
) -> ApiSuccess<LogoutResponseData> {
    match body {
        Ok(Json(body)) => state.auth_service.logout(&body.token).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Logout ignored: unreadable body");
        }
    }

    ApiSuccess::new(StatusCode::OK, LogoutResponseData {})
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutRequestBody {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {}
