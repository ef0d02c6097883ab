use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::staff::{AvailabilityStatus, OneOnOneStatus};
use crate::one_on_ones::completion::{month_bounds, monthly_completion};

pub const NO_STATUS: &str = "no_status";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub next_month_available: i64,
    pub one_on_one_completion_rate: f64,
    pub attention_employees: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SkillCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentOneOnOne {
    pub id: i64,
    pub employee_name: String,
    pub date: NaiveDate,
    pub status: OneOnOneStatus,
    pub memo: Option<String>,
}

/// Headline numbers for the month containing `today`.
pub async fn compute_stats(pool: &PgPool, today: NaiveDate) -> Result<DashboardStats, AppError> {
    let completion = monthly_completion(pool, today.year(), today.month()).await?;
    let (start, end) = month_bounds(today.year(), today.month())?;

    let next_month_available: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM availability WHERE status IN ($1, $2)",
    )
    .bind(AvailabilityStatus::AvailableNextMonth)
    .bind(AvailabilityStatus::ImmediatelyAvailable)
    .fetch_one(pool)
    .await?;

    let attention_employees: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM one_on_ones WHERE status = $1 AND date >= $2 AND date < $3",
    )
    .bind(OneOnOneStatus::Attention)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_employees: completion.total_employees,
        next_month_available,
        one_on_one_completion_rate: completion.completion_rate,
        attention_employees,
    })
}

/// Employee-skill links per category.
pub async fn skill_distribution(pool: &PgPool) -> Result<Vec<CategoryCount>, AppError> {
    Ok(sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT s.category, COUNT(es.employee_id) AS count
        FROM skills s
        JOIN employee_skills es ON es.skill_id = s.id
        GROUP BY s.category
        ORDER BY s.category
        "#,
    )
    .fetch_all(pool)
    .await?)
}

pub async fn category_distribution(
    pool: &PgPool,
    category: &str,
) -> Result<Vec<SkillCount>, AppError> {
    Ok(sqlx::query_as::<_, SkillCount>(
        r#"
        SELECT s.name, COUNT(es.employee_id) AS count
        FROM skills s
        JOIN employee_skills es ON es.skill_id = s.id
        WHERE s.category = $1
        GROUP BY s.name
        ORDER BY s.name
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?)
}

pub async fn availability_distribution(pool: &PgPool) -> Result<Vec<StatusCount>, AppError> {
    let counts: Vec<(AvailabilityStatus, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM availability GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    Ok(availability_buckets(&counts, total_employees))
}

/// Turns per-status counts into response buckets, adding [`NO_STATUS`] for employees
/// without an availability row.
pub fn availability_buckets(
    counts: &[(AvailabilityStatus, i64)],
    total_employees: i64,
) -> Vec<StatusCount> {
    let mut buckets: Vec<StatusCount> = counts
        .iter()
        .map(|(status, count)| StatusCount {
            status: status.as_str().to_string(),
            count: *count,
        })
        .collect();

    let with_status: i64 = counts.iter().map(|(_, count)| count).sum();
    let without = total_employees - with_status;
    if without > 0 {
        buckets.push(StatusCount {
            status: NO_STATUS.to_string(),
            count: without,
        });
    }
    buckets
}

pub async fn recent_one_on_ones(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<RecentOneOnOne>, AppError> {
    Ok(sqlx::query_as::<_, RecentOneOnOne>(
        r#"
        SELECT o.id, e.name AS employee_name, o.date, o.status, o.memo
        FROM one_on_ones o
        JOIN employees e ON e.id = o.employee_id
        ORDER BY o.date DESC, o.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_add_no_status_remainder() {
        let counts = vec![
            (AvailabilityStatus::Working, 3),
            (AvailabilityStatus::AvailableNextMonth, 3),
            (AvailabilityStatus::ImmediatelyAvailable, 2),
        ];
        let buckets = availability_buckets(&counts, 10);

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].status, "working");
        assert_eq!(
            buckets[3],
            StatusCount {
                status: NO_STATUS.to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_buckets_omit_no_status_when_everyone_has_a_row() {
        let counts = vec![(AvailabilityStatus::Working, 4)];
        let buckets = availability_buckets(&counts, 4);
        assert_eq!(buckets.len(), 1);
        assert!(buckets.iter().all(|b| b.status != NO_STATUS));
    }

    #[test]
    fn test_buckets_all_missing() {
        let buckets = availability_buckets(&[], 5);
        assert_eq!(
            buckets,
            vec![StatusCount {
                status: NO_STATUS.to_string(),
                count: 5
            }]
        );
    }
}
