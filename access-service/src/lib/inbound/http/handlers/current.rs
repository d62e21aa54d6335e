use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use crate::identity::models::SanitizedIdentity;
use crate::inbound::http::middleware::AuthenticatedIdentity;

pub async fn current(
    Extension(AuthenticatedIdentity(identity)): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<SanitizedIdentity> {
    ApiSuccess::new(StatusCode::OK, identity)
}
