//! Axum route handlers for the Employee API.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::employees::payload::{CreateEmployeeRequest, EmployeeSearchQuery, UpdateEmployeeRequest};
use crate::employees::queries::{
    self, delete_employee, fetch_detail, insert_employee, replace_skills, update_employee,
    EmployeeDetail, NewEmployee,
};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery, Pagination};
use crate::models::staff::{EmployeeRow, EmployeeSummary};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Employee not found".to_string())
}

/// GET /api/employees
pub async fn handle_list_employees(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Vec<EmployeeSummary>>, AppError> {
    page.validate()?;
    Ok(Json(queries::list_summaries(&state.db, page).await?))
}

/// GET /api/employees/search
pub async fn handle_search_employees(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<EmployeeSearchQuery>,
) -> Result<Json<Vec<EmployeeSummary>>, AppError> {
    let filter = query.into_filter()?;
    Ok(Json(queries::search_summaries(&state.db, &filter).await?))
}

/// GET /api/employees/:id
pub async fn handle_get_employee(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<EmployeeDetail>, AppError> {
    let detail = fetch_detail(&state.db, id).await?.ok_or_else(not_found)?;
    Ok(Json(detail))
}

/// POST /api/employees
///
/// Inserts the employee and its skill links in one transaction.
pub async fn handle_create_employee(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateEmployeeRequest>,
) -> Result<Json<EmployeeDetail>, AppError> {
    req.validate()?;

    let mut tx = state.db.begin().await?;
    let employee = insert_employee(
        &mut tx,
        NewEmployee {
            name: req.name.trim(),
            years_experience: req.years_experience,
            main_role: req.main_role.trim(),
            unit_price_min: req.unit_price_min,
            unit_price_max: req.unit_price_max,
            desired_career: req.desired_career.as_deref(),
        },
    )
    .await?;
    replace_skills(&mut tx, employee.id, &req.skills).await?;
    tx.commit().await?;

    info!("Created employee {} with {} skills", employee.id, req.skills.len());

    let detail = fetch_detail(&state.db, employee.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(detail))
}

/// PUT /api/employees/:id
pub async fn handle_update_employee(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeDetail>, AppError> {
    let mut tx = state.db.begin().await?;

    let mut row = sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found)?;

    req.apply(&mut row)?;
    update_employee(&mut tx, &row).await?;
    if let Some(links) = &req.skills {
        replace_skills(&mut tx, id, links).await?;
    }
    tx.commit().await?;

    info!("Updated employee {id}");

    let detail = fetch_detail(&state.db, id).await?.ok_or_else(not_found)?;
    Ok(Json(detail))
}

/// DELETE /api/employees/:id
pub async fn handle_delete_employee(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    if !delete_employee(&state.db, id).await? {
        return Err(not_found());
    }

    info!("Deleted employee {id}");
    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::test_support::{body_json, empty_request, json_request, test_state};

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_employee_is_not_found(pool: PgPool) {
        let app = build_router(test_state(pool, false));

        let response = app
            .oneshot(empty_request("DELETE", "/api/employees/999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Employee not found");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_then_delete_again(pool: PgPool) {
        let app = build_router(test_state(pool, false));

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/employees",
                r#"{"name":"Kato","years_experience":4,"main_role":"Infra"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::OK);
        let id = body_json(created).await["id"].as_i64().unwrap();

        let uri = format!("/api/employees/{id}");
        let first = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_overlong_name_is_validation_error(pool: PgPool) {
        let app = build_router(test_state(pool, false));
        let payload = serde_json::json!({
            "name": "n".repeat(150),
            "years_experience": 2,
            "main_role": "Frontend"
        });

        let response = app
            .oneshot(json_request("POST", "/api/employees", payload.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "VALIDATION_ERROR"
        );
    }
}
