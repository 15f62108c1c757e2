//! CSV downloads.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use super::registrations::canonical_room;
use super::AppQuery;
use crate::errors::AppError;
use crate::roster::{filter, flatten, people_csv, sort_for_judging, teams_csv, FilterCriteria};
use crate::AppState;

/// Query parameters for the judging sheet.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamExportQuery {
    /// Only teams seated in this room
    #[serde(default)]
    pub room: Option<String>,
    /// Only teams that have a problem statement
    #[serde(default)]
    pub submitted_only: Option<bool>,
}

/// GET /api/admin/export/individuals - One row per person.
pub async fn export_individuals(
    State(state): State<AppState>,
    AppQuery(criteria): AppQuery<FilterCriteria>,
) -> Result<Response, AppError> {
    let teams = state.repo.list_teams().await?;
    let people = flatten(&teams);
    let people = if criteria.is_unconstrained() {
        people
    } else {
        filter(&people, &criteria)
    };

    tracing::info!("Exporting {} individuals", people.len());
    Ok(csv_attachment("individuals", people_csv(&people)))
}

/// GET /api/admin/export/teams - Judging sheet, sorted by room and board.
pub async fn export_teams(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TeamExportQuery>,
) -> Result<Response, AppError> {
    let mut teams = state.repo.list_teams().await?;

    if query.submitted_only.unwrap_or(false) {
        teams.retain(|t| t.has_submission());
    }

    if let Some(room) = query.room.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        let room = canonical_room(room);
        teams.retain(|t| t.room_number.as_deref() == Some(room.as_str()));
    }

    sort_for_judging(&mut teams);

    tracing::info!("Exporting {} teams", teams.len());
    Ok(csv_attachment("teams", teams_csv(&teams)))
}

fn csv_attachment(prefix: &str, body: String) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}_{}.csv\"",
        prefix,
        Utc::now().timestamp_millis()
    );

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}
