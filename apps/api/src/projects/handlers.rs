//! Axum route handlers for employee project history.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::employees::queries::employee_exists;
use crate::errors::AppError;
use crate::extract::{check_length, double_option, AppJson, AppPath, AppQuery, Pagination};
use crate::models::staff::ProjectRow;
use crate::state::AppState;

pub const TITLE_MAX_LEN: usize = 200;
pub const ROLE_MAX_LEN: usize = 100;
pub const PHASE_MAX_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ProjectFilter {
    pub employee_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub employee_id: i64,
    pub title: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub tech_tags: Option<String>,
    pub phase_requirements: Option<String>,
    pub phase_design: Option<String>,
    pub phase_implementation: Option<String>,
    pub phase_testing: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub role: Option<String>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tech_tags: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phase_requirements: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phase_design: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phase_implementation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phase_testing: Option<Option<String>>,
}

impl CreateProjectRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_project(&self.title, &self.role, self.start_date, self.end_date)?;
        validate_phases([
            ("phase_requirements", &self.phase_requirements),
            ("phase_design", &self.phase_design),
            ("phase_implementation", &self.phase_implementation),
            ("phase_testing", &self.phase_testing),
        ])
    }
}

impl UpdateProjectRequest {
    fn apply(&self, row: &mut ProjectRow) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            row.title = title.clone();
        }
        if let Some(role) = &self.role {
            row.role = role.clone();
        }
        if let Some(start) = self.start_date {
            row.start_date = start;
        }
        if let Some(end) = self.end_date {
            row.end_date = end;
        }
        let text_fields = [
            (&self.description, &mut row.description),
            (&self.tech_tags, &mut row.tech_tags),
            (&self.phase_requirements, &mut row.phase_requirements),
            (&self.phase_design, &mut row.phase_design),
            (&self.phase_implementation, &mut row.phase_implementation),
            (&self.phase_testing, &mut row.phase_testing),
        ];
        for (patch, column) in text_fields {
            if let Some(value) = patch {
                *column = value.clone();
            }
        }
        validate_project(&row.title, &row.role, row.start_date, row.end_date)?;
        validate_phases([
            ("phase_requirements", &row.phase_requirements),
            ("phase_design", &row.phase_design),
            ("phase_implementation", &row.phase_implementation),
            ("phase_testing", &row.phase_testing),
        ])
    }
}

fn validate_project(
    title: &str,
    role: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    check_length("title", title, TITLE_MAX_LEN)?;
    check_length("role", role, ROLE_MAX_LEN)?;
    if end_date.is_some_and(|end| end < start_date) {
        return Err(AppError::Validation(
            "end_date cannot be before start_date".to_string(),
        ));
    }
    Ok(())
}

fn validate_phases(phases: [(&str, &Option<String>); 4]) -> Result<(), AppError> {
    for (field, value) in phases {
        if let Some(value) = value {
            check_length(field, value, PHASE_MAX_LEN)?;
        }
    }
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
    AppQuery(filter): AppQuery<ProjectFilter>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    page.validate()?;

    let projects = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT * FROM projects
        WHERE ($1::bigint IS NULL OR employee_id = $1)
        ORDER BY id
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(filter.employee_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(projects))
}

/// GET /api/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ProjectRow>, AppError> {
    let project = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProjectRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    req.validate()?;

    let mut conn = state.db.acquire().await?;
    if !employee_exists(&mut conn, req.employee_id).await? {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let project = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects
            (employee_id, title, role, start_date, end_date, description, tech_tags,
             phase_requirements, phase_design, phase_implementation, phase_testing)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(req.employee_id)
    .bind(&req.title)
    .bind(&req.role)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(&req.description)
    .bind(&req.tech_tags)
    .bind(&req.phase_requirements)
    .bind(&req.phase_design)
    .bind(&req.phase_implementation)
    .bind(&req.phase_testing)
    .fetch_one(&mut *conn)
    .await?;

    info!("Created project {} for employee {}", project.id, project.employee_id);
    Ok(Json(project))
}

/// PUT /api/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateProjectRequest>,
) -> Result<Json<ProjectRow>, AppError> {
    let mut project = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(not_found)?;

    req.apply(&mut project)?;

    let project = sqlx::query_as::<_, ProjectRow>(
        r#"
        UPDATE projects
        SET title = $2, role = $3, start_date = $4, end_date = $5, description = $6,
            tech_tags = $7, phase_requirements = $8, phase_design = $9,
            phase_implementation = $10, phase_testing = $11, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&project.title)
    .bind(&project.role)
    .bind(project.start_date)
    .bind(project.end_date)
    .bind(&project.description)
    .bind(&project.tech_tags)
    .bind(&project.phase_requirements)
    .bind(&project.phase_design)
    .bind(&project.phase_implementation)
    .bind(&project.phase_testing)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(not_found)?;

    info!("Updated project {id}");
    Ok(Json(project))
}

/// DELETE /api/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    info!("Deleted project {id}");
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project_row() -> ProjectRow {
        ProjectRow {
            id: 1,
            employee_id: 1,
            title: "Billing revamp".to_string(),
            role: "Lead".to_string(),
            start_date: date(2024, 4, 1),
            end_date: Some(date(2024, 9, 30)),
            description: Some("Migrated invoicing".to_string()),
            tech_tags: Some("Java,PostgreSQL".to_string()),
            phase_requirements: Some("lead".to_string()),
            phase_design: None,
            phase_implementation: Some("member".to_string()),
            phase_testing: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_rejects_end_before_start() {
        let req: CreateProjectRequest = serde_json::from_value(json!({
            "employee_id": 1,
            "title": "Portal",
            "role": "Member",
            "start_date": "2024-05-01",
            "end_date": "2024-04-01"
        }))
        .unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_clears_phase_and_keeps_others() {
        let req: UpdateProjectRequest = serde_json::from_value(json!({
            "phase_requirements": null,
            "phase_design": "lead"
        }))
        .unwrap();
        let mut row = project_row();
        req.apply(&mut row).unwrap();

        assert_eq!(row.phase_requirements, None);
        assert_eq!(row.phase_design.as_deref(), Some("lead"));
        assert_eq!(row.phase_implementation.as_deref(), Some("member"));
        assert_eq!(row.title, "Billing revamp");
    }

    #[test]
    fn test_update_end_date_validated_against_existing_start() {
        let req: UpdateProjectRequest =
            serde_json::from_value(json!({ "end_date": "2023-01-01" })).unwrap();
        let mut row = project_row();
        assert!(req.apply(&mut row).is_err());

        let req: UpdateProjectRequest = serde_json::from_value(json!({ "end_date": null })).unwrap();
        let mut row = project_row();
        req.apply(&mut row).unwrap();
        assert_eq!(row.end_date, None);
    }

    #[test]
    fn test_title_role_and_phase_length_limits() {
        let mut req: CreateProjectRequest = serde_json::from_value(json!({
            "employee_id": 1,
            "title": "t".repeat(TITLE_MAX_LEN),
            "role": "r".repeat(ROLE_MAX_LEN),
            "start_date": "2024-05-01",
            "phase_testing": "p".repeat(PHASE_MAX_LEN)
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        req.title = "t".repeat(TITLE_MAX_LEN + 1);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.title = "Portal".to_string();
        req.role = "r".repeat(ROLE_MAX_LEN + 1);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.role = "Member".to_string();
        req.phase_design = Some("p".repeat(PHASE_MAX_LEN + 1));
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_rejects_overlong_phase() {
        let req: UpdateProjectRequest =
            serde_json::from_value(json!({ "phase_implementation": "x".repeat(51) })).unwrap();
        let mut row = project_row();
        assert!(matches!(req.apply(&mut row), Err(AppError::Validation(_))));
    }
}
