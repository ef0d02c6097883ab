//! Request extractors whose rejections are rendered through [`AppError`], so malformed
//! bodies, query strings and path segments all get the same JSON error envelope.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `?skip=&limit=` paging shared by every list endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.skip < 0 {
            return Err(AppError::Validation("skip must be >= 0".to_string()));
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Rejects `value` when it is longer than the `VARCHAR(max)` column it is stored in.
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Deserializes a field that must tell "absent" apart from an explicit `null`.
///
/// Use together with `#[serde(default)]`: a missing key yields `None`, `null` yields
/// `Some(None)` and a value yields `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        memo: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_value(json!({})).unwrap();
        let null: Patch = serde_json::from_value(json!({ "memo": null })).unwrap();
        let set: Patch = serde_json::from_value(json!({ "memo": "hello" })).unwrap();

        assert_eq!(absent.memo, None);
        assert_eq!(null.memo, Some(None));
        assert_eq!(set.memo, Some(Some("hello".to_string())));
    }

    #[test]
    fn test_check_length_counts_characters_not_bytes() {
        // 5 characters, 15 bytes
        assert!(check_length("name", "田中太郎様", 5).is_ok());
        assert!(check_length("name", "田中太郎様!", 5).is_err());
        assert!(check_length("name", "", 0).is_ok());
    }

    #[test]
    fn test_pagination_defaults_are_valid() {
        let page = Pagination::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, DEFAULT_LIMIT);
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_pagination_rejects_negative_skip() {
        let page = Pagination { skip: -1, limit: 10 };
        assert!(matches!(page.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_pagination_rejects_out_of_range_limit() {
        assert!(Pagination { skip: 0, limit: 0 }.validate().is_err());
        assert!(Pagination { skip: 0, limit: MAX_LIMIT + 1 }.validate().is_err());
        assert!(Pagination { skip: 0, limit: MAX_LIMIT }.validate().is_ok());
    }
}
