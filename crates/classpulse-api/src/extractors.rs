//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use classpulse_core::error::AppError;
use classpulse_entity::user::UserRole;
use classpulse_service::context::RequestContext;

use crate::error::ApiError;

/// The caller's resolved identity.
///
/// Authentication happens upstream of this subsystem; the session layer
/// injects `X-User-Id`, `X-User-Role`, and optionally `X-Department-Id`
/// on every proxied request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, "x-user-id")?
            .ok_or_else(|| AppError::validation("Missing X-User-Id header"))?
            .parse::<i64>()
            .map_err(|_| AppError::validation("X-User-Id must be an integer"))?;

        let role = header_value(parts, "x-user-role")?
            .ok_or_else(|| AppError::validation("Missing X-User-Role header"))?
            .parse::<UserRole>()?;

        let department_id = match header_value(parts, "x-department-id")? {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| AppError::validation("X-Department-Id must be an integer"))?,
            ),
            None => None,
        };

        Ok(Self(RequestContext::new(user_id, role, department_id)))
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<Option<String>, ApiError> {
    match parts.headers.get(name) {
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| AppError::validation(format!("Invalid {name} header")))?;
            Ok(Some(value.to_string()))
        }
        None => Ok(None),
    }
}
