//! Read-only projections for the admin dashboard.

use axum::extract::State;

use super::{success, ApiResult, AppQuery};
use crate::models::Person;
use crate::roster::{filter, flatten, summarize, FilterCriteria, Stats};
use crate::AppState;

/// GET /api/admin/people - Flattened people matching the query criteria.
pub async fn list_people(
    State(state): State<AppState>,
    AppQuery(criteria): AppQuery<FilterCriteria>,
) -> ApiResult<Vec<Person>> {
    let teams = state.repo.list_teams().await?;
    let people = flatten(&teams);

    if criteria.is_unconstrained() {
        return success(people);
    }
    success(filter(&people, &criteria))
}

/// GET /api/admin/stats - Counters over every registration.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Stats> {
    let teams = state.repo.list_teams().await?;
    let people = flatten(&teams);
    success(summarize(&people, &teams))
}
