//! Request bodies accepted by the HTTP API.

use serde::{Deserialize, Serialize};

use super::{lenient_course, Course, Member, Residency};

/// One member as submitted on the registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub whats_app: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub residency: Option<Residency>,
    #[serde(default)]
    pub mess_food: Option<bool>,
    #[serde(default, deserialize_with = "lenient_course")]
    pub course: Option<Course>,
    #[serde(default)]
    pub batch: Option<String>,
}

impl MemberInput {
    /// Trimmed member record; hostellers never carry a mess-food opt-in.
    pub fn into_member(self) -> Member {
        let residency = self.residency.unwrap_or_default();
        Member {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            whats_app: self.whats_app.trim().to_string(),
            roll_number: self.roll_number.trim().to_string(),
            residency,
            mess_food: match residency {
                Residency::DayScholar => Some(self.mess_food.unwrap_or(false)),
                Residency::Hosteller => None,
            },
            course: self.course,
            batch: self
                .batch
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
        }
    }
}

/// Request body for `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTeamRequest {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub leader_name: String,
    #[serde(default)]
    pub leader_email: String,
    #[serde(default)]
    pub leader_whats_app: String,
    #[serde(default)]
    pub leader_roll_number: String,
    #[serde(default)]
    pub leader_residency: Option<Residency>,
    #[serde(default)]
    pub leader_mess_food: Option<bool>,
    #[serde(default, deserialize_with = "lenient_course")]
    pub leader_course: Option<Course>,
    #[serde(default)]
    pub leader_batch: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberInput>,
}

impl RegisterTeamRequest {
    /// The leader's fields in member-input shape, for shared validation.
    pub fn leader_input(&self) -> MemberInput {
        MemberInput {
            name: self.leader_name.clone(),
            email: self.leader_email.clone(),
            whats_app: self.leader_whats_app.clone(),
            roll_number: self.leader_roll_number.clone(),
            residency: self.leader_residency,
            mess_food: self.leader_mess_food,
            course: self.leader_course,
            batch: self.leader_batch.clone(),
        }
    }
}

/// Request body for `POST /api/admin/teams` (walk-in registration at the venue).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OnSpotRegistrationRequest {
    #[serde(flatten)]
    pub team: RegisterTeamRequest,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub allocated_team_id: Option<String>,
}

/// Request body for `PUT /api/admin/teams/{id}/check-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub is_checked_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_team_id: Option<String>,
}

/// Request body for `PUT /api/admin/teams/{id}/extension-board`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionBoardRequest {
    pub extension_board_given: bool,
}

/// Request body for `PUT /api/admin/teams/{id}/problem-statement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatementRequest {
    pub problem_statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
}

/// Request body for `POST /api/admin/teams/swap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapMembersRequest {
    pub team_a_id: String,
    pub member_a_email: String,
    pub team_b_id: String,
    pub member_b_email: String,
}

/// Request body for `POST /api/admin/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
