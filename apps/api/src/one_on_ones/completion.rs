use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// Share of employees who had at least one one-on-one in a calendar month.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionReport {
    pub year: i32,
    pub month: u32,
    pub total_employees: i64,
    pub completed_one_on_ones: i64,
    pub completion_rate: f64,
}

/// `completed / total × 100`, rounded to two decimals; 0 when there are no employees.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(completed as f64 / total as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate_month(month: u32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(
            "month must be between 1 and 12".to_string(),
        ));
    }
    Ok(())
}

/// Fills in missing year/month from `today`.
pub fn resolve_period(
    year: Option<i32>,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<(i32, u32), AppError> {
    let month = month.unwrap_or_else(|| today.month());
    validate_month(month)?;
    Ok((year.unwrap_or_else(|| today.year()), month))
}

/// Half-open `[first day, first day of next month)` range for a month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    validate_month(month)?;
    let invalid = || AppError::Validation(format!("invalid period {year}-{month:02}"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((start, end))
}

pub async fn monthly_completion(
    pool: &PgPool,
    year: i32,
    month: u32,
) -> Result<CompletionReport, AppError> {
    let (start, end) = month_bounds(year, month)?;

    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    let completed_one_on_ones: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT employee_id) FROM one_on_ones WHERE date >= $1 AND date < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(CompletionReport {
        year,
        month,
        total_employees,
        completed_one_on_ones,
        completion_rate: completion_rate(completed_one_on_ones, total_employees),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rate_zero_without_employees() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(3, 0), 0.0);
    }

    #[test]
    fn test_rate_rounded_to_two_decimals() {
        assert_eq!(completion_rate(1, 3), 33.33);
        assert_eq!(completion_rate(2, 3), 66.67);
        assert_eq!(completion_rate(4, 10), 40.0);
        assert_eq!(completion_rate(10, 10), 100.0);
    }

    #[test]
    fn test_resolve_period_defaults_to_today() {
        let today = date(2025, 9, 18);
        assert_eq!(resolve_period(None, None, today).unwrap(), (2025, 9));
        assert_eq!(resolve_period(Some(2024), None, today).unwrap(), (2024, 9));
        assert_eq!(resolve_period(None, Some(2), today).unwrap(), (2025, 2));
    }

    #[test]
    fn test_resolve_period_rejects_bad_month() {
        assert!(resolve_period(None, Some(13), date(2025, 1, 1)).is_err());
        assert!(resolve_period(None, Some(0), date(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_month_bounds_wrap_december() {
        assert_eq!(
            month_bounds(2024, 12).unwrap(),
            (date(2024, 12, 1), date(2025, 1, 1))
        );
        assert_eq!(
            month_bounds(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 3, 1))
        );
    }
}
