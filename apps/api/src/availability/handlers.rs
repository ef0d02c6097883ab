//! Axum route handlers for employee availability. Rows are addressed by employee id:
//! each employee has at most one.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::db::is_unique_violation;
use crate::employees::queries::employee_exists;
use crate::errors::AppError;
use crate::extract::{double_option, AppJson, AppPath, AppQuery, Pagination};
use crate::models::staff::{AvailabilityRow, AvailabilityStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub employee_id: i64,
    pub status: AvailabilityStatus,
    pub available_from: Option<NaiveDate>,
    pub memo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub status: Option<AvailabilityStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub available_from: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub memo: Option<Option<String>>,
}

impl UpdateAvailabilityRequest {
    fn apply(&self, row: &mut AvailabilityRow) {
        if let Some(status) = self.status {
            row.status = status;
        }
        if let Some(from) = self.available_from {
            row.available_from = from;
        }
        if let Some(memo) = &self.memo {
            row.memo = memo.clone();
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Availability not found".to_string())
}

fn already_exists() -> AppError {
    AppError::Conflict("Availability already exists for this employee".to_string())
}

/// GET /api/availability
pub async fn handle_list_availability(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Vec<AvailabilityRow>>, AppError> {
    page.validate()?;

    let rows = sqlx::query_as::<_, AvailabilityRow>(
        "SELECT * FROM availability ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// GET /api/availability/:employee_id
pub async fn handle_get_availability(
    State(state): State<AppState>,
    AppPath(employee_id): AppPath<i64>,
) -> Result<Json<AvailabilityRow>, AppError> {
    let row = sqlx::query_as::<_, AvailabilityRow>(
        "SELECT * FROM availability WHERE employee_id = $1",
    )
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(not_found)?;
    Ok(Json(row))
}

/// POST /api/availability
pub async fn handle_create_availability(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateAvailabilityRequest>,
) -> Result<Json<AvailabilityRow>, AppError> {
    let mut conn = state.db.acquire().await?;
    if !employee_exists(&mut conn, req.employee_id).await? {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let existing: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM availability WHERE employee_id = $1)")
            .bind(req.employee_id)
            .fetch_one(&mut *conn)
            .await?;
    if existing {
        return Err(already_exists());
    }

    let row = sqlx::query_as::<_, AvailabilityRow>(
        r#"
        INSERT INTO availability (employee_id, status, available_from, memo)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.employee_id)
    .bind(req.status)
    .bind(req.available_from)
    .bind(&req.memo)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            already_exists()
        } else {
            AppError::Database(e)
        }
    })?;

    info!(
        "Created availability for employee {} ({})",
        row.employee_id,
        row.status.as_str()
    );
    Ok(Json(row))
}

/// PUT /api/availability/:employee_id
pub async fn handle_update_availability(
    State(state): State<AppState>,
    AppPath(employee_id): AppPath<i64>,
    AppJson(req): AppJson<UpdateAvailabilityRequest>,
) -> Result<Json<AvailabilityRow>, AppError> {
    let mut row = sqlx::query_as::<_, AvailabilityRow>(
        "SELECT * FROM availability WHERE employee_id = $1",
    )
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(not_found)?;

    req.apply(&mut row);

    let row = sqlx::query_as::<_, AvailabilityRow>(
        r#"
        UPDATE availability
        SET status = $2, available_from = $3, memo = $4, updated_at = now()
        WHERE employee_id = $1
        RETURNING *
        "#,
    )
    .bind(employee_id)
    .bind(row.status)
    .bind(row.available_from)
    .bind(&row.memo)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(not_found)?;

    info!("Updated availability for employee {employee_id}");
    Ok(Json(row))
}

/// DELETE /api/availability/:employee_id
pub async fn handle_delete_availability(
    State(state): State<AppState>,
    AppPath(employee_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM availability WHERE employee_id = $1")
        .bind(employee_id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    info!("Deleted availability for employee {employee_id}");
    Ok(Json(json!({ "message": "Availability deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn availability_row() -> AvailabilityRow {
        AvailabilityRow {
            id: 1,
            employee_id: 4,
            status: AvailabilityStatus::Working,
            available_from: NaiveDate::from_ymd_opt(2025, 10, 1),
            memo: Some("extension likely".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_status_only() {
        let req: UpdateAvailabilityRequest =
            serde_json::from_value(json!({ "status": "immediately_available" })).unwrap();
        let mut row = availability_row();
        req.apply(&mut row);

        assert_eq!(row.status, AvailabilityStatus::ImmediatelyAvailable);
        assert_eq!(row.memo.as_deref(), Some("extension likely"));
        assert!(row.available_from.is_some());
    }

    #[test]
    fn test_update_clears_available_from() {
        let req: UpdateAvailabilityRequest =
            serde_json::from_value(json!({ "available_from": null })).unwrap();
        let mut row = availability_row();
        req.apply(&mut row);
        assert_eq!(row.available_from, None);
        assert_eq!(row.status, AvailabilityStatus::Working);
    }

    #[test]
    fn test_unknown_status_rejected_by_deserializer() {
        let result: Result<CreateAvailabilityRequest, _> = serde_json::from_value(json!({
            "employee_id": 1,
            "status": "on_vacation"
        }));
        assert!(result.is_err());
    }
}
