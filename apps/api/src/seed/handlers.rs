use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgConnection;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::seed::data::{AVAILABILITY, DEMO_SKILL_LEVEL, EMPLOYEES, ONE_ON_ONES, SKILLS};
use crate::state::AppState;

const WIPE_SQL: &str = "TRUNCATE one_on_ones, availability, projects, employee_skills, \
                        employees, skills RESTART IDENTITY CASCADE";

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SeedCounts {
    pub employees: usize,
    pub skills: usize,
    pub availability: usize,
    pub one_on_ones: usize,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub data: SeedCounts,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SeedStatus {
    pub employees: i64,
    pub skills: i64,
    pub projects: i64,
    pub availability: i64,
    pub one_on_ones: i64,
    pub has_data: bool,
}

/// POST /api/seed/demo-data
///
/// Wipes the staffing tables and loads the demo dataset in one transaction.
pub async fn handle_demo_data(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let mut tx = state.db.begin().await?;

    match load_demo_data(&mut tx).await {
        Ok(counts) => {
            tx.commit().await?;
            info!(
                "Demo data loaded: {} employees, {} skills",
                counts.employees, counts.skills
            );
            Ok(Json(SeedResponse {
                message: "Demo data loaded".to_string(),
                data: counts,
            }))
        }
        Err(e) => {
            error!("Demo data load failed: {e}");
            if let Err(rb) = tx.rollback().await {
                warn!("Rollback after failed seed also failed: {rb}");
            }
            Err(AppError::Seed(format!("Demo data load failed: {e}")))
        }
    }
}

/// POST /api/seed/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, AppError> {
    let mut tx = state.db.begin().await?;

    match sqlx::query(WIPE_SQL).execute(&mut *tx).await {
        Ok(_) => {
            tx.commit().await?;
            info!("All staffing data cleared");
            Ok(Json(ResetResponse {
                message: "All data cleared".to_string(),
                status: "success",
            }))
        }
        Err(e) => {
            error!("Data reset failed: {e}");
            if let Err(rb) = tx.rollback().await {
                warn!("Rollback after failed reset also failed: {rb}");
            }
            Err(AppError::Seed(format!("Data reset failed: {e}")))
        }
    }
}

/// GET /api/seed/status
pub async fn handle_status(State(state): State<AppState>) -> Result<Json<SeedStatus>, AppError> {
    let (employees, skills, projects, availability, one_on_ones): (i64, i64, i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM employees),
                   (SELECT COUNT(*) FROM skills),
                   (SELECT COUNT(*) FROM projects),
                   (SELECT COUNT(*) FROM availability),
                   (SELECT COUNT(*) FROM one_on_ones)
            "#,
        )
        .fetch_one(&state.db)
        .await?;

    Ok(Json(SeedStatus {
        employees,
        skills,
        projects,
        availability,
        one_on_ones,
        has_data: employees > 0,
    }))
}

async fn load_demo_data(conn: &mut PgConnection) -> Result<SeedCounts, sqlx::Error> {
    sqlx::query(WIPE_SQL).execute(&mut *conn).await?;

    let mut skill_ids: HashMap<&str, i64> = HashMap::with_capacity(SKILLS.len());
    for skill in SKILLS {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING id")
                .bind(skill.name)
                .bind(skill.category)
                .fetch_one(&mut *conn)
                .await?;
        skill_ids.insert(skill.name, id);
    }

    let mut employee_ids = Vec::with_capacity(EMPLOYEES.len());
    for employee in EMPLOYEES {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO employees (name, years_experience, main_role, unit_price_min, unit_price_max)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(employee.name)
        .bind(employee.years_experience)
        .bind(employee.main_role)
        .bind(employee.unit_price_min)
        .bind(employee.unit_price_max)
        .fetch_one(&mut *conn)
        .await?;

        for name in employee.skills {
            let Some(skill_id) = skill_ids.get(name) else {
                continue;
            };
            sqlx::query(
                "INSERT INTO employee_skills (employee_id, skill_id, level, years_experience) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(skill_id)
            .bind(DEMO_SKILL_LEVEL)
            .bind(employee.skill_years())
            .execute(&mut *conn)
            .await?;
        }
        employee_ids.push(id);
    }

    for row in AVAILABILITY {
        sqlx::query("INSERT INTO availability (employee_id, status) VALUES ($1, $2)")
            .bind(employee_ids[row.employee])
            .bind(row.status)
            .execute(&mut *conn)
            .await?;
    }

    for row in ONE_ON_ONES {
        let date = row
            .date()
            .ok_or_else(|| sqlx::Error::Protocol(format!("invalid demo date {:?}", row.date)))?;
        sqlx::query(
            "INSERT INTO one_on_ones (employee_id, date, status, memo) VALUES ($1, $2, $3, $4)",
        )
        .bind(employee_ids[row.employee])
        .bind(date)
        .bind(row.status)
        .bind(row.memo)
        .execute(&mut *conn)
        .await?;
    }

    Ok(SeedCounts {
        employees: employee_ids.len(),
        skills: skill_ids.len(),
        availability: AVAILABILITY.len(),
        one_on_ones: ONE_ON_ONES.len(),
    })
}
