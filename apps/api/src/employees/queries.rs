use std::collections::HashMap;

use serde::Serialize;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::employees::payload::{EmployeeSearchFilter, SkillLink};
use crate::errors::AppError;
use crate::extract::Pagination;
use crate::matching::scoring::MatchCandidate;
use crate::models::staff::{
    AvailabilityRow, EmployeeListRow, EmployeeRow, EmployeeSkillRow, EmployeeSummary,
    OneOnOneRow, ProjectRow,
};

const LIST_COLUMNS: &str = r#"
    SELECT e.id, e.name, e.years_experience, e.main_role,
           e.unit_price_min, e.unit_price_max,
           a.status AS availability_status
    FROM employees e
    LEFT JOIN availability a ON a.employee_id = e.id
"#;

/// Full employee record with every related row.
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: EmployeeRow,
    pub skills: Vec<EmployeeSkillRow>,
    pub projects: Vec<ProjectRow>,
    pub availability: Option<AvailabilityRow>,
    pub one_on_ones: Vec<OneOnOneRow>,
}

pub async fn list_summaries(
    pool: &PgPool,
    page: Pagination,
) -> Result<Vec<EmployeeSummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EmployeeListRow>(&format!(
        "{LIST_COLUMNS} ORDER BY e.id OFFSET $1 LIMIT $2"
    ))
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(pool)
    .await?;

    attach_main_skills(pool, rows).await
}

pub async fn search_summaries(
    pool: &PgPool,
    filter: &EmployeeSearchFilter,
) -> Result<Vec<EmployeeSummary>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(LIST_COLUMNS);
    qb.push(" WHERE TRUE");

    if !filter.skill_names.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM employee_skills es JOIN skills s ON s.id = es.skill_id \
             WHERE es.employee_id = e.id AND s.name = ANY(",
        )
        .push_bind(filter.skill_names.clone())
        .push("))");
    }
    if let Some(min) = filter.years_experience_min {
        qb.push(" AND e.years_experience >= ").push_bind(min);
    }
    if let Some(max) = filter.years_experience_max {
        qb.push(" AND e.years_experience <= ").push_bind(max);
    }
    if let Some(min) = filter.unit_price_min {
        qb.push(" AND e.unit_price_min >= ").push_bind(min);
    }
    if let Some(max) = filter.unit_price_max {
        qb.push(" AND e.unit_price_max <= ").push_bind(max);
    }
    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        qb.push(" AND a.status::text = ANY(")
            .push_bind(statuses)
            .push(")");
    }
    qb.push(" ORDER BY e.id");

    let rows = qb
        .build_query_as::<EmployeeListRow>()
        .fetch_all(pool)
        .await?;

    attach_main_skills(pool, rows).await
}

async fn attach_main_skills(
    pool: &PgPool,
    rows: Vec<EmployeeListRow>,
) -> Result<Vec<EmployeeSummary>, sqlx::Error> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let skills = skill_names_by_employee(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let names = skills.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);
            EmployeeSummary::from_row(row, names)
        })
        .collect())
}

/// Skill names per employee, ordered by skill id.
async fn skill_names_by_employee(
    pool: &PgPool,
    employee_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
    let pairs: Vec<(i64, String)> = sqlx::query_as(
        r#"
        SELECT es.employee_id, s.name
        FROM employee_skills es
        JOIN skills s ON s.id = es.skill_id
        WHERE es.employee_id = ANY($1)
        ORDER BY es.employee_id, es.skill_id
        "#,
    )
    .bind(employee_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for (employee_id, name) in pairs {
        grouped.entry(employee_id).or_default().push(name);
    }
    Ok(grouped)
}

pub async fn fetch_employee(pool: &PgPool, id: i64) -> Result<Option<EmployeeRow>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn employee_exists(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await
}

pub async fn fetch_detail(pool: &PgPool, id: i64) -> Result<Option<EmployeeDetail>, sqlx::Error> {
    let Some(employee) = fetch_employee(pool, id).await? else {
        return Ok(None);
    };

    let skills = sqlx::query_as::<_, EmployeeSkillRow>(
        r#"
        SELECT es.skill_id, s.name AS skill_name, s.category AS skill_category,
               es.level, es.years_experience
        FROM employee_skills es
        JOIN skills s ON s.id = es.skill_id
        WHERE es.employee_id = $1
        ORDER BY es.skill_id
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let projects =
        sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE employee_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await?;

    let availability =
        sqlx::query_as::<_, AvailabilityRow>("SELECT * FROM availability WHERE employee_id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    let one_on_ones = sqlx::query_as::<_, OneOnOneRow>(
        "SELECT * FROM one_on_ones WHERE employee_id = $1 ORDER BY date DESC, id DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(EmployeeDetail {
        employee,
        skills,
        projects,
        availability,
        one_on_ones,
    }))
}

pub struct NewEmployee<'a> {
    pub name: &'a str,
    pub years_experience: i32,
    pub main_role: &'a str,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
    pub desired_career: Option<&'a str>,
}

pub async fn insert_employee(
    conn: &mut PgConnection,
    new: NewEmployee<'_>,
) -> Result<EmployeeRow, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>(
        r#"
        INSERT INTO employees
            (name, years_experience, main_role, unit_price_min, unit_price_max, desired_career)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(new.name)
    .bind(new.years_experience)
    .bind(new.main_role)
    .bind(new.unit_price_min)
    .bind(new.unit_price_max)
    .bind(new.desired_career)
    .fetch_one(conn)
    .await
}

pub async fn update_employee(
    conn: &mut PgConnection,
    row: &EmployeeRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE employees
        SET name = $2, years_experience = $3, main_role = $4,
            unit_price_min = $5, unit_price_max = $6, desired_career = $7,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(row.years_experience)
    .bind(&row.main_role)
    .bind(row.unit_price_min)
    .bind(row.unit_price_max)
    .bind(&row.desired_career)
    .execute(conn)
    .await?;
    Ok(())
}

/// Replaces the employee's skill links. Every referenced skill must exist.
pub async fn replace_skills(
    conn: &mut PgConnection,
    employee_id: i64,
    links: &[SkillLink],
) -> Result<(), AppError> {
    let skill_ids: Vec<i64> = links.iter().map(|l| l.skill_id).collect();
    if !skill_ids.is_empty() {
        let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills WHERE id = ANY($1)")
            .bind(&skill_ids)
            .fetch_one(&mut *conn)
            .await?;
        if known != skill_ids.len() as i64 {
            return Err(AppError::NotFound("Skill not found".to_string()));
        }
    }

    sqlx::query("DELETE FROM employee_skills WHERE employee_id = $1")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    for link in links {
        sqlx::query(
            "INSERT INTO employee_skills (employee_id, skill_id, level, years_experience) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(employee_id)
        .bind(link.skill_id)
        .bind(link.level)
        .bind(link.years_experience)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn delete_employee(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Loads every employee with the skill names and project titles the matcher needs,
/// in employee-id order.
pub async fn load_match_candidates(pool: &PgPool) -> Result<Vec<MatchCandidate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EmployeeListRow>(&format!("{LIST_COLUMNS} ORDER BY e.id"))
        .fetch_all(pool)
        .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut skills = skill_names_by_employee(pool, &ids).await?;

    let titles: Vec<(i64, String)> =
        sqlx::query_as("SELECT employee_id, title FROM projects ORDER BY id")
            .fetch_all(pool)
            .await?;
    let mut projects: HashMap<i64, Vec<String>> = HashMap::new();
    for (employee_id, title) in titles {
        projects.entry(employee_id).or_default().push(title);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let skill_names = skills.remove(&row.id).unwrap_or_default();
            let project_titles = projects.remove(&row.id).unwrap_or_default();
            MatchCandidate {
                employee: EmployeeSummary::from_row(row, &skill_names),
                skill_names,
                project_titles,
            }
        })
        .collect())
}
