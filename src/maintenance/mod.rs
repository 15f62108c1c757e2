//! Data reconciliation for registrations entered by hand during the event.
//!
//! Planning is pure over the current teams; the repository applies a plan
//! in a single transaction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::Team;
use crate::roster::normalize_room;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub team_id: String,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomFix {
    pub team_id: String,
    pub team_name: String,
    pub old: String,
    pub new: String,
}

/// Changes needed to bring the stored teams into a consistent state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilePlan {
    /// Teams that submitted a problem statement but were never checked in
    pub check_ins: Vec<TeamRef>,
    /// Room numbers that parse but are not in canonical form
    pub room_fixes: Vec<RoomFix>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.check_ins.is_empty() && self.room_fixes.is_empty()
    }

    /// The teams as they will look once the plan is applied.
    pub fn applied_to(&self, teams: &[Team]) -> Vec<Team> {
        let mut teams = teams.to_vec();
        for team in &mut teams {
            if self.check_ins.iter().any(|c| c.team_id == team.id) {
                team.is_checked_in = true;
            }
            if let Some(fix) = self.room_fixes.iter().find(|f| f.team_id == team.id) {
                team.room_number = Some(fix.new.clone());
            }
        }
        teams
    }
}

/// Result of a reconcile run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub checked_in: Vec<String>,
    pub rooms_fixed: Vec<RoomFix>,
    /// Distinct rooms among teams with a submission, sorted
    pub rooms: Vec<String>,
    pub total_teams: usize,
    pub total_checked_in: usize,
    pub total_submissions: usize,
}

/// Work out which teams need checking in and which rooms need rewriting.
pub fn plan_reconcile(teams: &[Team]) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    for team in teams {
        if team.has_submission() && !team.is_checked_in {
            plan.check_ins.push(TeamRef {
                team_id: team.id.clone(),
                team_name: team.team_name.clone(),
            });
        }

        let Some(old) = team.room_number.as_deref().filter(|r| !r.is_empty()) else {
            continue;
        };
        if let Some(new) = normalize_room(old) {
            if new != old {
                plan.room_fixes.push(RoomFix {
                    team_id: team.id.clone(),
                    team_name: team.team_name.clone(),
                    old: old.to_string(),
                    new,
                });
            }
        }
    }

    plan
}

/// Summarize the final state after applying `plan`.
pub fn report(plan: ReconcilePlan, teams_after: &[Team]) -> ReconcileReport {
    let rooms: BTreeSet<String> = teams_after
        .iter()
        .filter(|t| t.has_submission())
        .filter_map(|t| t.room_number.clone())
        .filter(|r| !r.is_empty())
        .collect();

    ReconcileReport {
        checked_in: plan.check_ins.into_iter().map(|c| c.team_name).collect(),
        rooms_fixed: plan.room_fixes,
        rooms: rooms.into_iter().collect(),
        total_teams: teams_after.len(),
        total_checked_in: teams_after.iter().filter(|t| t.is_checked_in).count(),
        total_submissions: teams_after.iter().filter(|t| t.has_submission()).count(),
    }
}

/// Plan, apply and report in one go.
pub async fn reconcile(repo: &Repository) -> Result<ReconcileReport, AppError> {
    let teams = repo.list_teams().await?;
    let plan = plan_reconcile(&teams);

    if plan.is_empty() {
        tracing::info!("Reconcile found nothing to fix across {} teams", teams.len());
    } else {
        repo.apply_reconcile(&plan).await?;
        tracing::info!(
            "Reconcile checked in {} teams and fixed {} room numbers",
            plan.check_ins.len(),
            plan.room_fixes.len()
        );
    }

    let after = plan.applied_to(&teams);
    Ok(report(plan, &after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fixtures::SAMPLE;

    fn teams() -> Vec<Team> {
        let mut teams = (*SAMPLE).clone();
        // submitted, not checked in, sloppy room
        teams[0].problem_statement = Some("Smart irrigation".to_string());
        teams[0].room_number = Some("eb02-205".to_string());
        // checked in, canonical room, no submission
        teams[1].problem_statement = Some("   ".to_string());
        // unparseable room stays as is
        teams[2].room_number = Some("Seminar Hall".to_string());
        teams[2].problem_statement = Some("Campus maps".to_string());
        teams[2].is_checked_in = true;
        teams
    }

    #[test]
    fn test_plan_reconcile() {
        let plan = plan_reconcile(&teams());

        assert_eq!(
            plan.check_ins,
            vec![TeamRef {
                team_id: "t-alpha".to_string(),
                team_name: "Alpha".to_string()
            }]
        );
        assert_eq!(plan.room_fixes.len(), 1);
        assert_eq!(plan.room_fixes[0].old, "eb02-205");
        assert_eq!(plan.room_fixes[0].new, "EB2 - 205");
    }

    #[test]
    fn test_report_after_apply() {
        let teams = teams();
        let plan = plan_reconcile(&teams);
        let after = plan.applied_to(&teams);
        let report = report(plan, &after);

        assert_eq!(report.checked_in, vec!["Alpha".to_string()]);
        assert_eq!(report.rooms, vec!["EB2 - 205".to_string(), "Seminar Hall".to_string()]);
        assert_eq!(report.total_teams, 3);
        assert_eq!(report.total_checked_in, 3);
        assert_eq!(report.total_submissions, 2);

        assert!(plan_reconcile(&after).is_empty());
    }
}
