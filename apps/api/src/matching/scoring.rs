//! Project matching: ranks employees against a requested skill and price profile.
//!
//! Default: `SkillMatchScorer`, a fixed-weight linear score:
//!
//! * +3.0 per required skill the employee holds
//! * +1.0 per preferred skill the employee holds
//! * +0.5 when the employee's minimum price is at or above the requested minimum
//! * +0.5 when the employee's maximum price is at or below the requested maximum
//!
//! Price bonuses need both bounds present. Zero scores are dropped, the rest are
//! sorted by descending score (stable, so ties keep candidate order) and cut to
//! [`MAX_RESULTS`].
//!
//! `AppState` holds an `Arc<dyn MatchScorer>` so the ranking can be swapped at startup.

use serde::{Deserialize, Serialize};

use crate::employees::payload::validate_price_range;
use crate::errors::AppError;
use crate::models::staff::EmployeeSummary;

pub const REQUIRED_SKILL_POINTS: f64 = 3.0;
pub const PREFERRED_SKILL_POINTS: f64 = 1.0;
pub const PRICE_FIT_POINTS: f64 = 0.5;
pub const MAX_RESULTS: usize = 10;
pub const RECENT_PROJECT_COUNT: usize = 2;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingRequest {
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Option<Vec<String>>,
    pub unit_price_min: Option<i32>,
    pub unit_price_max: Option<i32>,
}

impl MatchingRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_price_range(self.unit_price_min, self.unit_price_max)
    }

    fn preferred(&self) -> &[String] {
        self.preferred_skills.as_deref().unwrap_or(&[])
    }
}

/// Everything the scorer knows about one employee.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub employee: EmployeeSummary,
    /// All skill names the employee holds.
    pub skill_names: Vec<String>,
    /// Project titles in storage order.
    pub project_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub employee: EmployeeSummary,
    pub score: f64,
    pub matching_skills: Vec<String>,
    pub recent_projects: Vec<String>,
}

/// The match scorer trait. Implement this to swap ranking strategies without
/// touching the endpoint or the candidate loading.
pub trait MatchScorer: Send + Sync {
    fn rank(&self, candidates: Vec<MatchCandidate>, request: &MatchingRequest) -> Vec<MatchResult>;

    fn backend(&self) -> &'static str;
}

pub struct SkillMatchScorer;

impl MatchScorer for SkillMatchScorer {
    fn rank(&self, candidates: Vec<MatchCandidate>, request: &MatchingRequest) -> Vec<MatchResult> {
        rank_candidates(candidates, request)
    }

    fn backend(&self) -> &'static str {
        "skill"
    }
}

/// Scores one candidate. Returns the score and the matched skills: required
/// matches first, then preferred matches, each in request order.
pub fn score_candidate(candidate: &MatchCandidate, request: &MatchingRequest) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut matching_skills = Vec::new();

    for skill in &request.required_skills {
        if candidate.skill_names.contains(skill) {
            score += REQUIRED_SKILL_POINTS;
            matching_skills.push(skill.clone());
        }
    }

    for skill in request.preferred() {
        if candidate.skill_names.contains(skill) {
            score += PREFERRED_SKILL_POINTS;
            matching_skills.push(skill.clone());
        }
    }

    if let (Some(wanted), Some(own)) = (request.unit_price_min, candidate.employee.unit_price_min) {
        if own >= wanted {
            score += PRICE_FIT_POINTS;
        }
    }

    if let (Some(wanted), Some(own)) = (request.unit_price_max, candidate.employee.unit_price_max) {
        if own <= wanted {
            score += PRICE_FIT_POINTS;
        }
    }

    (score, matching_skills)
}

fn rank_candidates(candidates: Vec<MatchCandidate>, request: &MatchingRequest) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let (score, matching_skills) = score_candidate(&candidate, request);
            if score <= 0.0 {
                return None;
            }
            let skip = candidate
                .project_titles
                .len()
                .saturating_sub(RECENT_PROJECT_COUNT);
            let recent_projects = candidate.project_titles[skip..].to_vec();
            Some(MatchResult {
                employee: candidate.employee,
                score,
                matching_skills,
                recent_projects,
            })
        })
        .collect();

    // stable: equal scores keep candidate order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(MAX_RESULTS);
    results
}
