use axum::{extract::State, Json};
use tracing::debug;

use crate::employees::queries::load_match_candidates;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::matching::scoring::{MatchResult, MatchingRequest};
use crate::state::AppState;

/// POST /api/employees/matching
///
/// Scores every employee against the requested profile and returns the top matches.
pub async fn handle_matching(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchingRequest>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    request.validate()?;

    let candidates = load_match_candidates(&state.db).await?;
    let total = candidates.len();
    let results = state.match_scorer.rank(candidates, &request);

    debug!(
        backend = state.match_scorer.backend(),
        candidates = total,
        matched = results.len(),
        "Ranked employees for matching request"
    );

    Ok(Json(results))
}
