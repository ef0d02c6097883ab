use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::token::bearer_token;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// The authenticated user behind a request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRow);

/// Resolves the bearer token in `headers` to a stored user.
///
/// Every failure (missing header, bad scheme, bad signature, expiry, unknown
/// subject) yields the same 401.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserRow, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(AppError::invalid_credentials)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {e}");
        AppError::invalid_credentials()
    })?;

    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(&claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Token subject {} has no user row", claims.sub);
            AppError::invalid_credentials()
        })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let user = CurrentUser(authenticate(state, &parts.headers).await?);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Middleware guarding resource routes when `AUTH_REQUIRED` is set.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
