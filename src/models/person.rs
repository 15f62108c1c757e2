//! Denormalized per-person view built from teams; never persisted.

use serde::{Deserialize, Serialize};

use super::Residency;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Leader,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "Leader",
            Role::Member => "Member",
        }
    }
}

/// One leader or member with the team context copied in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub email: String,
    pub whats_app: String,
    pub roll_number: String,
    pub course: String,
    pub batch: String,
    pub residency: Residency,
    pub mess_food: bool,
    pub role: Role,
    /// Position inside the team: 0 for the leader, members from 1
    pub index: usize,
    pub team_name: String,
    pub team_id: String,
    pub is_checked_in: bool,
    pub room_number: String,
    pub extension_board_given: bool,
}

impl Person {
    /// Stable list key, unique across one flattened collection.
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.team_id, self.role.as_str(), self.index)
    }
}
