use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::UserRow;
use crate::state::AppState;

/// Identity already verified by the OAuth provider.
#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub email: String,
    pub name: String,
    pub google_id: String,
    pub avatar_url: Option<String>,
}

impl GoogleAuthRequest {
    fn validate(&self) -> Result<(), AppError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("email is not valid".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
        if self.google_id.trim().is_empty() {
            return Err(AppError::Validation("google_id cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
}

impl From<UserRow> for MeResponse {
    fn from(user: UserRow) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar_url: user.avatar_url,
            is_admin: user.is_admin,
            is_active: user.is_active,
        }
    }
}

/// POST /api/auth/google
///
/// Creates or refreshes the user row for the asserted identity and issues a token.
pub async fn handle_google_auth(
    State(state): State<AppState>,
    AppJson(req): AppJson<GoogleAuthRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate()?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, name, google_id, avatar_url, is_active)
        VALUES ($1, $2, $3, $4, TRUE)
        ON CONFLICT (email) DO UPDATE
        SET name = EXCLUDED.name,
            google_id = EXCLUDED.google_id,
            avatar_url = EXCLUDED.avatar_url,
            is_active = TRUE,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(req.email.trim())
    .bind(req.name.trim())
    .bind(req.google_id.trim())
    .bind(&req.avatar_url)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Provider id is already linked to another user".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    let access_token = state
        .tokens
        .issue(&user.email)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    info!("Issued session token for user {}", user.id);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /api/auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, name: &str, google_id: &str) -> GoogleAuthRequest {
        GoogleAuthRequest {
            email: email.to_string(),
            name: name.to_string(),
            google_id: google_id.to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_identity() {
        assert!(request("kato@example.com", "Kato", "1029").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email_and_blank_fields() {
        assert!(request("not-an-email", "Kato", "1029").validate().is_err());
        assert!(request("kato@example.com", " ", "1029").validate().is_err());
        assert!(request("kato@example.com", "Kato", "").validate().is_err());
    }
}
