use std::collections::HashSet;

use serde::Deserialize;

use crate::config::split_list;
use crate::errors::AppError;
use crate::extract::{check_length, double_option};
use crate::models::staff::{AvailabilityStatus, EmployeeRow};

pub const MIN_SKILL_LEVEL: i32 = 1;
pub const MAX_SKILL_LEVEL: i32 = 5;
pub const NAME_MAX_LEN: usize = 100;
pub const ROLE_MAX_LEN: usize = 100;

/// An employee's claim on a skill, as sent by clients.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SkillLink {
    pub skill_id: i64,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub years_experience: i32,
}

fn default_level() -> i32 {
    MIN_SKILL_LEVEL
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub years_experience: i32,
    pub main_role: String,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
    pub desired_career: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillLink>,
}

impl CreateEmployeeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(
            &self.name,
            self.years_experience,
            &self.main_role,
            self.unit_price_min,
            self.unit_price_max,
        )?;
        validate_skill_links(&self.skills)
    }
}

/// Partial update. Absent fields are left alone; `null` clears nullable columns.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub years_experience: Option<i32>,
    pub main_role: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub unit_price_min: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub unit_price_max: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub desired_career: Option<Option<String>>,
    /// Replaces the employee's whole skill set when present.
    pub skills: Option<Vec<SkillLink>>,
}

impl UpdateEmployeeRequest {
    /// Merges the supplied fields into `row` and re-validates the result.
    pub fn apply(&self, row: &mut EmployeeRow) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            row.name = name.trim().to_string();
        }
        if let Some(years) = self.years_experience {
            row.years_experience = years;
        }
        if let Some(role) = &self.main_role {
            row.main_role = role.trim().to_string();
        }
        if let Some(min) = self.unit_price_min {
            row.unit_price_min = min;
        }
        if let Some(max) = self.unit_price_max {
            row.unit_price_max = max;
        }
        if let Some(career) = &self.desired_career {
            row.desired_career = career.clone();
        }

        validate_fields(
            &row.name,
            row.years_experience,
            &row.main_role,
            row.unit_price_min,
            row.unit_price_max,
        )?;
        if let Some(links) = &self.skills {
            validate_skill_links(links)?;
        }
        Ok(())
    }
}

fn validate_fields(
    name: &str,
    years_experience: i32,
    main_role: &str,
    unit_price_min: Option<i32>,
    unit_price_max: Option<i32>,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if main_role.trim().is_empty() {
        return Err(AppError::Validation("main_role cannot be empty".to_string()));
    }
    check_length("name", name.trim(), NAME_MAX_LEN)?;
    check_length("main_role", main_role.trim(), ROLE_MAX_LEN)?;
    if years_experience < 0 {
        return Err(AppError::Validation(
            "years_experience must be >= 0".to_string(),
        ));
    }
    validate_price_range(unit_price_min, unit_price_max)
}

/// Shared by employee payloads and matching requests.
pub fn validate_price_range(min: Option<i32>, max: Option<i32>) -> Result<(), AppError> {
    if min.is_some_and(|v| v < 0) || max.is_some_and(|v| v < 0) {
        return Err(AppError::Validation(
            "unit prices must be >= 0".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::Validation(format!(
                "unit_price_min ({min}) exceeds unit_price_max ({max})"
            )));
        }
    }
    Ok(())
}

fn validate_skill_links(links: &[SkillLink]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for link in links {
        if !seen.insert(link.skill_id) {
            return Err(AppError::Validation(format!(
                "skill {} listed more than once",
                link.skill_id
            )));
        }
        if !(MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&link.level) {
            return Err(AppError::Validation(format!(
                "skill level must be between {MIN_SKILL_LEVEL} and {MAX_SKILL_LEVEL}"
            )));
        }
        if link.years_experience < 0 {
            return Err(AppError::Validation(
                "skill years_experience must be >= 0".to_string(),
            ));
        }
    }
    Ok(())
}

/// Raw `/api/employees/search` query string. List-valued filters are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeSearchQuery {
    pub skill_tags: Option<String>,
    pub years_experience_min: Option<i32>,
    pub years_experience_max: Option<i32>,
    pub availability_status: Option<String>,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
}

#[derive(Debug, Default, PartialEq)]
pub struct EmployeeSearchFilter {
    pub skill_names: Vec<String>,
    pub years_experience_min: Option<i32>,
    pub years_experience_max: Option<i32>,
    pub statuses: Vec<AvailabilityStatus>,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
}

impl EmployeeSearchQuery {
    pub fn into_filter(self) -> Result<EmployeeSearchFilter, AppError> {
        let statuses = self
            .availability_status
            .as_deref()
            .map(split_list)
            .unwrap_or_default()
            .iter()
            .map(|raw| {
                AvailabilityStatus::parse(raw).ok_or_else(|| {
                    AppError::Validation(format!("unknown availability status '{raw}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EmployeeSearchFilter {
            skill_names: self.skill_tags.as_deref().map(split_list).unwrap_or_default(),
            years_experience_min: self.years_experience_min,
            years_experience_max: self.years_experience_max,
            statuses,
            unit_price_min: self.unit_price_min,
            unit_price_max: self.unit_price_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn employee_row() -> EmployeeRow {
        EmployeeRow {
            id: 1,
            name: "Tanaka".to_string(),
            years_experience: 5,
            main_role: "Frontend".to_string(),
            unit_price_min: Some(600_000),
            unit_price_max: Some(800_000),
            desired_career: Some("Tech lead".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let patch: UpdateEmployeeRequest =
            serde_json::from_value(json!({ "years_experience": 6 })).unwrap();
        let mut row = employee_row();
        patch.apply(&mut row).unwrap();

        assert_eq!(row.years_experience, 6);
        assert_eq!(row.name, "Tanaka");
        assert_eq!(row.desired_career.as_deref(), Some("Tech lead"));
        assert_eq!(row.unit_price_min, Some(600_000));
    }

    #[test]
    fn test_apply_null_clears_nullable_column() {
        let patch: UpdateEmployeeRequest =
            serde_json::from_value(json!({ "desired_career": null, "unit_price_max": null }))
                .unwrap();
        let mut row = employee_row();
        patch.apply(&mut row).unwrap();

        assert_eq!(row.desired_career, None);
        assert_eq!(row.unit_price_max, None);
        assert_eq!(row.unit_price_min, Some(600_000));
    }

    #[test]
    fn test_apply_rejects_inverted_price_range() {
        let patch: UpdateEmployeeRequest =
            serde_json::from_value(json!({ "unit_price_min": 900_000 })).unwrap();
        let mut row = employee_row();
        assert!(matches!(
            patch.apply(&mut row),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_apply_trims_name_and_role() {
        let patch: UpdateEmployeeRequest =
            serde_json::from_value(json!({ "name": "  Sato ", "main_role": " Backend  " }))
                .unwrap();
        let mut row = employee_row();
        patch.apply(&mut row).unwrap();

        assert_eq!(row.name, "Sato");
        assert_eq!(row.main_role, "Backend");
    }

    #[test]
    fn test_name_and_role_length_limits() {
        let mut req: CreateEmployeeRequest = serde_json::from_value(json!({
            "name": "a".repeat(NAME_MAX_LEN),
            "years_experience": 3,
            "main_role": "r".repeat(ROLE_MAX_LEN)
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        req.name = "a".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.name = "Kato".to_string();
        req.main_role = "r".repeat(ROLE_MAX_LEN + 1);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_apply_rejects_overlong_name() {
        let patch: UpdateEmployeeRequest =
            serde_json::from_value(json!({ "name": "x".repeat(150) })).unwrap();
        let mut row = employee_row();
        assert!(matches!(
            patch.apply(&mut row),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_create_rejects_blank_name_and_negative_years() {
        let mut req: CreateEmployeeRequest = serde_json::from_value(json!({
            "name": "  ",
            "years_experience": 3,
            "main_role": "Infra"
        }))
        .unwrap();
        assert!(req.validate().is_err());

        req.name = "Kato".to_string();
        req.years_experience = -1;
        assert!(req.validate().is_err());

        req.years_experience = 0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_skill_links_default_level_and_reject_duplicates() {
        let req: CreateEmployeeRequest = serde_json::from_value(json!({
            "name": "Suzuki",
            "years_experience": 3,
            "main_role": "Fullstack",
            "skills": [{ "skill_id": 4 }]
        }))
        .unwrap();
        assert_eq!(req.skills[0].level, MIN_SKILL_LEVEL);
        assert_eq!(req.skills[0].years_experience, 0);
        assert!(req.validate().is_ok());

        let dup = vec![
            SkillLink { skill_id: 4, level: 2, years_experience: 1 },
            SkillLink { skill_id: 4, level: 3, years_experience: 1 },
        ];
        assert!(validate_skill_links(&dup).is_err());

        let bad_level = vec![SkillLink { skill_id: 1, level: 6, years_experience: 0 }];
        assert!(validate_skill_links(&bad_level).is_err());
    }

    #[test]
    fn test_search_query_splits_lists_and_parses_statuses() {
        let query = EmployeeSearchQuery {
            skill_tags: Some("React, TypeScript,".to_string()),
            availability_status: Some("working,immediately_available".to_string()),
            years_experience_min: Some(3),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();

        assert_eq!(filter.skill_names, vec!["React", "TypeScript"]);
        assert_eq!(
            filter.statuses,
            vec![
                AvailabilityStatus::Working,
                AvailabilityStatus::ImmediatelyAvailable
            ]
        );
        assert_eq!(filter.years_experience_min, Some(3));
    }

    #[test]
    fn test_search_query_rejects_unknown_status() {
        let query = EmployeeSearchQuery {
            availability_status: Some("vacation".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }
}
