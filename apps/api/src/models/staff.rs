use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "availability_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Working,
    AvailableNextMonth,
    ImmediatelyAvailable,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Working => "working",
            AvailabilityStatus::AvailableNextMonth => "available_next_month",
            AvailabilityStatus::ImmediatelyAvailable => "immediately_available",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "working" => Some(AvailabilityStatus::Working),
            "available_next_month" => Some(AvailabilityStatus::AvailableNextMonth),
            "immediately_available" => Some(AvailabilityStatus::ImmediatelyAvailable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "one_on_one_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OneOnOneStatus {
    Good,
    #[default]
    Normal,
    Attention,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub years_experience: i32,
    pub main_role: String,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
    pub desired_career: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// A skill as held by one employee: the junction row joined with the skill itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeSkillRow {
    pub skill_id: i64,
    pub skill_name: String,
    pub skill_category: String,
    pub level: i32,
    pub years_experience: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AvailabilityRow {
    pub id: i64,
    pub employee_id: i64,
    pub status: AvailabilityStatus,
    pub available_from: Option<NaiveDate>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OneOnOneRow {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub memo: Option<String>,
    pub status: OneOnOneStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of the employee list view, as read from the database.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeListRow {
    pub id: i64,
    pub name: String,
    pub years_experience: i32,
    pub main_role: String,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
    pub availability_status: Option<AvailabilityStatus>,
}

/// Employee list view: identity, price range, current availability and up to
/// [`MAIN_SKILL_COUNT`] skill names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeSummary {
    pub id: i64,
    pub name: String,
    pub years_experience: i32,
    pub main_role: String,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
    pub availability_status: Option<AvailabilityStatus>,
    pub main_skills: Vec<String>,
}

pub const MAIN_SKILL_COUNT: usize = 3;

impl EmployeeSummary {
    pub fn from_row(row: EmployeeListRow, skill_names: &[String]) -> Self {
        Self {
            id: row.id,
            name: row.name,
            years_experience: row.years_experience,
            main_role: row.main_role,
            unit_price_min: row.unit_price_min,
            unit_price_max: row.unit_price_max,
            availability_status: row.availability_status,
            main_skills: skill_names.iter().take(MAIN_SKILL_COUNT).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_status_parse_round_trips_wire_names() {
        for status in [
            AvailabilityStatus::Working,
            AvailabilityStatus::AvailableNextMonth,
            AvailabilityStatus::ImmediatelyAvailable,
        ] {
            assert_eq!(AvailabilityStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AvailabilityStatus::parse(" WORKING "), Some(AvailabilityStatus::Working));
        assert_eq!(AvailabilityStatus::parse("on_leave"), None);
    }

    #[test]
    fn test_summary_keeps_first_three_skills_and_null_status() {
        let row = EmployeeListRow {
            id: 7,
            name: "Sato".to_string(),
            years_experience: 4,
            main_role: "Backend".to_string(),
            unit_price_min: None,
            unit_price_max: Some(700_000),
            availability_status: None,
        };
        let skills: Vec<String> = ["Rust", "Go", "SQL", "AWS"].iter().map(|s| s.to_string()).collect();

        let summary = EmployeeSummary::from_row(row, &skills);
        assert_eq!(summary.main_skills, vec!["Rust", "Go", "SQL"]);
        assert_eq!(summary.availability_status, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["availability_status"].is_null());
    }

    #[test]
    fn test_one_on_one_status_defaults_to_normal() {
        assert_eq!(OneOnOneStatus::default(), OneOnOneStatus::Normal);
        let json = serde_json::to_string(&OneOnOneStatus::Attention).unwrap();
        assert_eq!(json, "\"attention\"");
    }
}
