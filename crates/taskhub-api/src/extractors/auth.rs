//! Authenticated-user extractor.
//!
//! Pulls the bearer token from the `Authorization` header, decodes the
//! JWT, and checks that the session it names is still active. Handlers
//! that take an [`AuthUser`] parameter are therefore authenticated by
//! construction.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use taskhub_core::error::AppError;
use taskhub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated request context, extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthenticated("Invalid authorization header"))?;

        let claims = state.jwt_decoder.decode_token(token)?;
        state.session_manager.validate(&claims).await?;

        Ok(AuthUser(RequestContext::new(
            claims.user_id(),
            claims.session_id(),
            claims.username,
            claims.email,
        )))
    }
}
