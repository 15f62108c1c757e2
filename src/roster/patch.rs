//! Reversible single-team patches for optimistic updates.

use serde::{Deserialize, Serialize};

use crate::models::Team;

/// A tentative change to one team's operational fields.
///
/// [`TeamPatch::apply`] returns the inverse patch, so a failed server call
/// can be undone by applying what `apply` returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TeamPatch {
    #[serde(rename_all = "camelCase")]
    CheckIn {
        is_checked_in: bool,
        room_number: Option<String>,
        allocated_team_id: Option<String>,
    },
    ExtensionBoard { given: bool },
}

impl TeamPatch {
    /// Check-in toggle that keeps room and board unless new ones are given.
    pub fn check_in(
        team: &Team,
        is_checked_in: bool,
        room_number: Option<String>,
        allocated_team_id: Option<String>,
    ) -> Self {
        TeamPatch::CheckIn {
            is_checked_in,
            room_number: room_number.or_else(|| team.room_number.clone()),
            allocated_team_id: allocated_team_id.or_else(|| team.allocated_team_id.clone()),
        }
    }

    /// Apply to `team` and return the patch that restores the previous state.
    pub fn apply(&self, team: &mut Team) -> TeamPatch {
        match self {
            TeamPatch::CheckIn {
                is_checked_in,
                room_number,
                allocated_team_id,
            } => {
                let inverse = TeamPatch::CheckIn {
                    is_checked_in: team.is_checked_in,
                    room_number: team.room_number.clone(),
                    allocated_team_id: team.allocated_team_id.clone(),
                };
                team.is_checked_in = *is_checked_in;
                team.room_number = room_number.clone();
                team.allocated_team_id = allocated_team_id.clone();
                inverse
            }
            TeamPatch::ExtensionBoard { given } => {
                let inverse = TeamPatch::ExtensionBoard {
                    given: team.extension_board_given,
                };
                team.extension_board_given = *given;
                inverse
            }
        }
    }
}
