mod identity;

pub use identity::{Claims, IdentityClient};

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::{AppError, AppState};

/// The authenticated caller, resolved from the `Authorization` bearer token
/// on every request.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Err(AppError::Unauthorized("No token provided"));
        };

        let claims = state.identity.verify(token).await?;
        Ok(AuthUser(claims))
    }
}
