//! Admin actions on individual teams.

use axum::extract::{Path, State};
use serde::Serialize;

use super::registrations::canonical_room;
use super::{success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{
    CheckInRequest, ExtensionBoardRequest, ProblemStatementRequest, SwapMembersRequest, Team,
};
use crate::AppState;

/// GET /api/admin/registrations - All teams, oldest first.
pub async fn list_registrations(State(state): State<AppState>) -> ApiResult<Vec<Team>> {
    let teams = state.repo.list_teams().await?;
    success(teams)
}

/// PUT /api/admin/teams/{id}/check-in - Check a team in or out.
///
/// An omitted room or board keeps the stored value, an empty string clears it.
pub async fn check_in_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CheckInRequest>,
) -> ApiResult<Team> {
    let current = state
        .repo
        .get_team(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;

    let room_number = match request.room_number.as_deref().map(str::trim) {
        None => current.room_number.clone(),
        Some("") => None,
        Some(room) => Some(canonical_room(room)),
    };

    let allocated_team_id = match request.allocated_team_id.as_deref().map(str::trim) {
        None => current.allocated_team_id.clone(),
        Some("") => None,
        Some(board) => Some(board.to_string()),
    };

    if let Some(board) = &allocated_team_id {
        if let Some(holder) = state.repo.board_holder(board, Some(&id)).await? {
            return Err(AppError::validation(format!(
                "Board {} is already allocated to team {}",
                board, holder
            )));
        }
    }

    let team = state
        .repo
        .set_check_in(
            &id,
            request.is_checked_in,
            room_number.as_deref(),
            allocated_team_id.as_deref(),
        )
        .await?;

    tracing::info!(
        "Team {} {} (room {:?}, board {:?})",
        team.id,
        if team.is_checked_in { "checked in" } else { "checked out" },
        team.room_number,
        team.allocated_team_id
    );

    success(team)
}

/// PUT /api/admin/teams/{id}/extension-board - Record an extension board handout.
pub async fn set_extension_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<ExtensionBoardRequest>,
) -> ApiResult<Team> {
    let team = state
        .repo
        .set_extension_board(&id, request.extension_board_given)
        .await?;
    tracing::info!(
        "Team {} extension board given: {}",
        team.id,
        team.extension_board_given
    );

    success(team)
}

/// PUT /api/admin/teams/{id}/problem-statement - Record the team's submission.
pub async fn set_problem_statement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<ProblemStatementRequest>,
) -> ApiResult<Team> {
    let statement = request.problem_statement.trim();
    if statement.is_empty() {
        return Err(AppError::validation("Problem statement is required"));
    }

    let repo = request
        .github_repo
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let team = state
        .repo
        .set_problem_statement(&id, statement, repo)
        .await?;
    tracing::info!("Team {} submitted a problem statement", team.id);

    success(team)
}

/// Both teams after a swap.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
    pub team_a: Team,
    pub team_b: Team,
}

/// POST /api/admin/teams/swap - Exchange one member between two teams.
pub async fn swap_members(
    State(state): State<AppState>,
    AppJson(request): AppJson<SwapMembersRequest>,
) -> ApiResult<SwapResult> {
    let (team_a, team_b) = state.repo.swap_members(&request).await?;
    tracing::info!(
        "Swapped {} ({}) with {} ({})",
        request.member_a_email.trim(),
        team_a.id,
        request.member_b_email.trim(),
        team_b.id
    );

    success(SwapResult { team_a, team_b })
}
