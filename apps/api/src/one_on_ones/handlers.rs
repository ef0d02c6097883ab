//! Axum route handlers for one-on-one review records.

use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use tracing::info;

use crate::employees::queries::employee_exists;
use crate::errors::AppError;
use crate::extract::{double_option, AppJson, AppPath, AppQuery, Pagination};
use crate::models::staff::{OneOnOneRow, OneOnOneStatus};
use crate::one_on_ones::completion::{
    monthly_completion, resolve_period, validate_month, CompletionReport,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OneOnOneFilter {
    pub employee_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// One-on-one record with the employee's name, as shown in list views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OneOnOneListItem {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub memo: Option<String>,
    pub status: OneOnOneStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOneOnOneRequest {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub memo: Option<String>,
    #[serde(default)]
    pub status: OneOnOneStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOneOnOneRequest {
    pub date: Option<NaiveDate>,
    pub status: Option<OneOnOneStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub memo: Option<Option<String>>,
}

impl UpdateOneOnOneRequest {
    fn apply(&self, row: &mut OneOnOneRow) {
        if let Some(date) = self.date {
            row.date = date;
        }
        if let Some(status) = self.status {
            row.status = status;
        }
        if let Some(memo) = &self.memo {
            row.memo = memo.clone();
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("One-on-one record not found".to_string())
}

/// GET /api/one-on-ones
///
/// Newest first. `year` and `month` filter independently.
pub async fn handle_list_one_on_ones(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
    AppQuery(filter): AppQuery<OneOnOneFilter>,
) -> Result<Json<Vec<OneOnOneListItem>>, AppError> {
    page.validate()?;
    if let Some(month) = filter.month {
        validate_month(month)?;
    }

    let items = sqlx::query_as::<_, OneOnOneListItem>(
        r#"
        SELECT o.id, o.employee_id, e.name AS employee_name, o.date, o.memo, o.status,
               o.created_at, o.updated_at
        FROM one_on_ones o
        JOIN employees e ON e.id = o.employee_id
        WHERE ($1::bigint IS NULL OR o.employee_id = $1)
          AND ($2::int IS NULL OR EXTRACT(YEAR FROM o.date)::int = $2)
          AND ($3::int IS NULL OR EXTRACT(MONTH FROM o.date)::int = $3)
        ORDER BY o.date DESC, o.id DESC
        OFFSET $4 LIMIT $5
        "#,
    )
    .bind(filter.employee_id)
    .bind(filter.year)
    .bind(filter.month.map(|m| m as i32))
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(items))
}

/// GET /api/one-on-ones/:id
pub async fn handle_get_one_on_one(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<OneOnOneRow>, AppError> {
    let row = sqlx::query_as::<_, OneOnOneRow>("SELECT * FROM one_on_ones WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(row))
}

/// POST /api/one-on-ones
pub async fn handle_create_one_on_one(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateOneOnOneRequest>,
) -> Result<Json<OneOnOneRow>, AppError> {
    let mut conn = state.db.acquire().await?;
    if !employee_exists(&mut conn, req.employee_id).await? {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let row = sqlx::query_as::<_, OneOnOneRow>(
        r#"
        INSERT INTO one_on_ones (employee_id, date, memo, status)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.employee_id)
    .bind(req.date)
    .bind(&req.memo)
    .bind(req.status)
    .fetch_one(&mut *conn)
    .await?;

    info!("Recorded one-on-one {} for employee {}", row.id, row.employee_id);
    Ok(Json(row))
}

/// PUT /api/one-on-ones/:id
pub async fn handle_update_one_on_one(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateOneOnOneRequest>,
) -> Result<Json<OneOnOneRow>, AppError> {
    let mut row = sqlx::query_as::<_, OneOnOneRow>("SELECT * FROM one_on_ones WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(not_found)?;

    req.apply(&mut row);

    let row = sqlx::query_as::<_, OneOnOneRow>(
        r#"
        UPDATE one_on_ones
        SET date = $2, memo = $3, status = $4, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(row.date)
    .bind(&row.memo)
    .bind(row.status)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(not_found)?;

    info!("Updated one-on-one {id}");
    Ok(Json(row))
}

/// DELETE /api/one-on-ones/:id
pub async fn handle_delete_one_on_one(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM one_on_ones WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    info!("Deleted one-on-one {id}");
    Ok(Json(json!({ "message": "One-on-one record deleted successfully" })))
}

/// GET /api/one-on-ones/stats/completion-rate
pub async fn handle_completion_rate(
    State(state): State<AppState>,
    AppQuery(period): AppQuery<PeriodQuery>,
) -> Result<Json<CompletionReport>, AppError> {
    let (year, month) = resolve_period(period.year, period.month, Utc::now().date_naive())?;
    Ok(Json(monthly_completion(&state.db, year, month).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_defaults_status_to_normal() {
        let req: CreateOneOnOneRequest = serde_json::from_value(json!({
            "employee_id": 2,
            "date": "2025-09-18"
        }))
        .unwrap();
        assert_eq!(req.status, OneOnOneStatus::Normal);
        assert_eq!(req.memo, None);
    }

    #[test]
    fn test_update_applies_supplied_fields() {
        let mut row = OneOnOneRow {
            id: 1,
            employee_id: 2,
            date: NaiveDate::from_ymd_opt(2025, 9, 18).unwrap(),
            memo: Some("struggling with a technical issue".to_string()),
            status: OneOnOneStatus::Attention,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let req: UpdateOneOnOneRequest =
            serde_json::from_value(json!({ "status": "good", "memo": null })).unwrap();
        req.apply(&mut row);

        assert_eq!(row.status, OneOnOneStatus::Good);
        assert_eq!(row.memo, None);
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 9, 18).unwrap());
    }
}
