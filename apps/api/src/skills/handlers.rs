//! Axum route handlers for the Skill catalogue.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::extract::{check_length, AppJson, AppPath, AppQuery, Pagination};
use crate::models::staff::SkillRow;
use crate::state::AppState;

pub const SKILL_NAME_MAX_LEN: usize = 50;
pub const CATEGORY_MAX_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SkillFilter {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl CreateSkillRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_skill(&self.name, &self.category)
    }
}

impl UpdateSkillRequest {
    fn apply(&self, row: &mut SkillRow) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            row.name = name.trim().to_string();
        }
        if let Some(category) = &self.category {
            row.category = category.trim().to_string();
        }
        validate_skill(&row.name, &row.category)
    }
}

fn validate_skill(name: &str, category: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if category.trim().is_empty() {
        return Err(AppError::Validation("category cannot be empty".to_string()));
    }
    check_length("name", name.trim(), SKILL_NAME_MAX_LEN)?;
    check_length("category", category.trim(), CATEGORY_MAX_LEN)
}

fn duplicate() -> AppError {
    AppError::Conflict("Skill already exists".to_string())
}

fn not_found() -> AppError {
    AppError::NotFound("Skill not found".to_string())
}

/// Maps a racing insert/update that hit the unique index onto the same 400 as the pre-check.
fn map_unique(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        duplicate()
    } else {
        AppError::Database(err)
    }
}

/// GET /api/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
    AppQuery(filter): AppQuery<SkillFilter>,
) -> Result<Json<Vec<SkillRow>>, AppError> {
    page.validate()?;

    let skills = sqlx::query_as::<_, SkillRow>(
        r#"
        SELECT * FROM skills
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY id
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(filter.category.as_deref())
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(skills))
}

/// GET /api/skills/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories =
        sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM skills ORDER BY category")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(categories))
}

/// GET /api/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SkillRow>, AppError> {
    let skill = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(skill))
}

/// POST /api/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateSkillRequest>,
) -> Result<Json<SkillRow>, AppError> {
    req.validate()?;
    let name = req.name.trim();

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM skills WHERE name = $1)")
        .bind(name)
        .fetch_one(&state.db)
        .await?;
    if exists {
        return Err(duplicate());
    }

    let skill = sqlx::query_as::<_, SkillRow>(
        "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(req.category.trim())
    .fetch_one(&state.db)
    .await
    .map_err(map_unique)?;

    info!("Created skill {} ({})", skill.id, skill.name);
    Ok(Json(skill))
}

/// PUT /api/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateSkillRequest>,
) -> Result<Json<SkillRow>, AppError> {
    let mut skill = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(not_found)?;

    req.apply(&mut skill)?;
    let skill = store_skill(&state.db, &skill).await?.ok_or_else(not_found)?;

    info!("Updated skill {id}");
    Ok(Json(skill))
}

/// Writes `skill`'s name and category. `None` when the row no longer exists.
async fn store_skill(pool: &PgPool, skill: &SkillRow) -> Result<Option<SkillRow>, AppError> {
    sqlx::query_as::<_, SkillRow>(
        "UPDATE skills SET name = $2, category = $3 WHERE id = $1 RETURNING *",
    )
    .bind(skill.id)
    .bind(&skill.name)
    .bind(&skill.category)
    .fetch_optional(pool)
    .await
    .map_err(map_unique)
}

/// DELETE /api/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    info!("Deleted skill {id}");
    Ok(Json(json!({ "message": "Skill deleted successfully" })))
}
