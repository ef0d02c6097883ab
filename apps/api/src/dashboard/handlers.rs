//! Read-only aggregate endpoints for the dashboard. Everything is computed per request.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::dashboard::stats::{
    availability_distribution, category_distribution, compute_stats, recent_one_on_ones,
    skill_distribution, CategoryCount, DashboardStats, RecentOneOnOne, SkillCount, StatusCount,
};
use crate::errors::AppError;
use crate::extract::{AppPath, AppQuery, MAX_LIMIT};
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /api/dashboard/stats
pub async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(compute_stats(&state.db, Utc::now().date_naive()).await?))
}

/// GET /api/dashboard/skill-distribution
pub async fn handle_skill_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    Ok(Json(skill_distribution(&state.db).await?))
}

/// GET /api/dashboard/skill-distribution/:category
pub async fn handle_category_distribution(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<Json<Vec<SkillCount>>, AppError> {
    Ok(Json(category_distribution(&state.db, &category).await?))
}

/// GET /api/dashboard/availability-status
pub async fn handle_availability_status(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCount>>, AppError> {
    Ok(Json(availability_distribution(&state.db).await?))
}

/// GET /api/dashboard/recent-one-on-ones
pub async fn handle_recent_one_on_ones(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecentQuery>,
) -> Result<Json<Vec<RecentOneOnOne>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(Json(recent_one_on_ones(&state.db, limit).await?))
}
