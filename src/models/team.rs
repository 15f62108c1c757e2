//! Team and member records as stored for each registration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Where a participant lives during the semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Residency {
    #[default]
    Hosteller,
    DayScholar,
}

impl Residency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Residency::Hosteller => "Hosteller",
            Residency::DayScholar => "Day Scholar",
        }
    }

    /// Accepts `Hosteller`, `DayScholar` and `Day Scholar`, ignoring case and spacing.
    pub fn parse(s: &str) -> Option<Self> {
        let folded: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "hosteller" | "hostel" => Some(Residency::Hosteller),
            "dayscholar" => Some(Residency::DayScholar),
            _ => None,
        }
    }
}

impl Serialize for Residency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Residency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Residency::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown residency {:?}", raw)))
    }
}

/// Degree programme.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Course {
    BTech,
    BBA,
    BDes,
    HSB,
}

impl Course {
    pub fn as_str(&self) -> &'static str {
        match self {
            Course::BTech => "BTech",
            Course::BBA => "BBA",
            Course::BDes => "BDes",
            Course::HSB => "HSB",
        }
    }

    /// Case-insensitive lookup; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        [Course::BTech, Course::BBA, Course::BDes, Course::HSB]
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl Serialize for Course {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Course {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Course::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown course {:?}", raw)))
    }
}

/// Optional course field: `null`, blank and unknown values read as `None`.
pub fn lenient_course<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Course>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Course::parse))
}

/// A team member embedded in a [`Team`].
///
/// Members have no identity of their own; within a team they are addressed
/// by position or by email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub whats_app: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub residency: Residency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess_food: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_course",
        skip_serializing_if = "Option::is_none"
    )]
    pub course: Option<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

impl Member {
    /// Mess food only counts for day scholars.
    pub fn opted_mess_food(&self) -> bool {
        self.residency == Residency::DayScholar && self.mess_food.unwrap_or(false)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// One registered team: a leader, up to the configured number of members,
/// and the operational fields admins change during the event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(alias = "_id")]
    pub id: String,
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
    pub leader_residency: Residency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_mess_food: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_course",
        skip_serializing_if = "Option::is_none"
    )]
    pub leader_course: Option<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_batch: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub is_checked_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    /// Board/table number shown to participants; not the database id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(default)]
    pub extension_board_given: bool,
    #[serde(default)]
    pub created_at: String,
}

impl Team {
    /// The leader's fields in member shape.
    pub fn leader(&self) -> Member {
        Member {
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

    /// Whether a non-blank problem statement has been recorded.
    pub fn has_submission(&self) -> bool {
        self.problem_statement
            .as_deref()
            .is_some_and(|ps| !ps.trim().is_empty())
    }

    pub fn member_position(&self, email: &str) -> Option<usize> {
        self.members.iter().position(|m| m.has_email(email))
    }
}
