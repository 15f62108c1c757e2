//! Registration endpoints: the public form and on-spot registration by admins.

use std::collections::HashSet;

use axum::extract::State;

use super::{success, ApiResult, AppJson};
use crate::config::Config;
use crate::errors::{AppError, FieldErrors};
use crate::models::{MemberInput, OnSpotRegistrationRequest, RegisterTeamRequest, Team};
use crate::roster::normalize_room;
use crate::AppState;

/// POST /api/register - Public team registration.
pub async fn register_team(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterTeamRequest>,
) -> ApiResult<Team> {
    validate_registration(&request, &state.config, MemberCount::Exact)?;
    ensure_name_free(&state, &request.team_name).await?;

    let team = state.repo.create_team(build_team(request)).await?;
    tracing::info!("Registered team {} ({})", team.team_name, team.id);

    success(team)
}

/// POST /api/admin/teams - Register a walk-in team, already checked in.
pub async fn register_on_spot(
    State(state): State<AppState>,
    AppJson(request): AppJson<OnSpotRegistrationRequest>,
) -> ApiResult<Team> {
    validate_registration(&request.team, &state.config, MemberCount::AtMost)?;
    ensure_name_free(&state, &request.team.team_name).await?;

    let board = non_blank(request.allocated_team_id);
    if let Some(board) = &board {
        if let Some(holder) = state.repo.board_holder(board, None).await? {
            return Err(AppError::validation(format!(
                "Board {} is already allocated to team {}",
                board, holder
            )));
        }
    }

    let mut team = build_team(request.team);
    team.is_checked_in = true;
    team.room_number = non_blank(request.room_number).map(|r| canonical_room(&r));
    team.allocated_team_id = board;

    let team = state.repo.create_team(team).await?;
    tracing::info!("On-spot registration of team {} ({})", team.team_name, team.id);

    success(team)
}

async fn ensure_name_free(state: &AppState, team_name: &str) -> Result<(), AppError> {
    if state.repo.team_name_taken(team_name).await? {
        return Err(AppError::Conflict(format!(
            "Team name {} is already registered",
            team_name.trim()
        )));
    }
    Ok(())
}

/// How strictly the member list length is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberCount {
    /// Exactly the configured team size (public form)
    Exact,
    /// Anywhere up to the configured team size (walk-ins)
    AtMost,
}

/// Check a registration and collect every field problem.
pub fn validate_registration(
    request: &RegisterTeamRequest,
    config: &Config,
    count: MemberCount,
) -> Result<(), AppError> {
    let mut fields = FieldErrors::new();

    if request.team_name.trim().is_empty() {
        fields.insert("teamName".into(), "Team name is required".into());
    }

    check_person(&request.leader_input(), "leader", config, &mut fields);
    for (i, member) in request.members.iter().enumerate() {
        check_person(member, &format!("member{}.", i), config, &mut fields);
    }

    let size = config.team_size;
    let n = request.members.len();
    match count {
        MemberCount::Exact if n != size => {
            fields.insert(
                "members".into(),
                format!("A team needs exactly {} members besides the leader", size),
            );
        }
        MemberCount::AtMost if n > size => {
            fields.insert(
                "members".into(),
                format!("A team can have at most {} members besides the leader", size),
            );
        }
        _ => {}
    }

    // Leader first, so a repeated email is reported on the later entry
    let mut seen = HashSet::new();
    let emails = std::iter::once(&request.leader_email)
        .chain(request.members.iter().map(|m| &m.email));
    for (idx, email) in emails.enumerate() {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            continue;
        }
        if !seen.insert(email) {
            let key = if idx == 0 {
                "leaderEmail".to_string()
            } else {
                format!("member{}.email", idx - 1)
            };
            fields.insert(key, "Duplicate email".into());
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation {
            message: format!("Registration has {} invalid field(s)", fields.len()),
            fields,
        })
    }
}

/// Field keys are `leaderName`, `leaderEmail`, … for the leader and
/// `member0.name`, `member0.email`, … for members.
fn check_person(person: &MemberInput, prefix: &str, config: &Config, fields: &mut FieldErrors) {
    let key = |field: &str| {
        if prefix == "leader" {
            let mut chars = field.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase());
            format!("leader{}{}", first.map(String::from).unwrap_or_default(), chars.as_str())
        } else {
            format!("{}{}", prefix, field)
        }
    };

    if person.name.trim().is_empty() {
        fields.insert(key("name"), "Name is required".into());
    }

    if person.email.trim().is_empty() {
        fields.insert(key("email"), "Email is required".into());
    } else if !email_allowed(&person.email, &config.email_domain) {
        let message = if config.email_domain.is_empty() {
            "Enter a valid email".to_string()
        } else {
            format!("Must be a @{} email", config.email_domain)
        };
        fields.insert(key("email"), message);
    }

    if person.whats_app.trim().is_empty() {
        fields.insert(key("whatsApp"), "WhatsApp number is required".into());
    } else if !whatsapp_valid(&person.whats_app) {
        fields.insert(key("whatsApp"), "Enter a valid 10-digit number".into());
    }

    if person.roll_number.trim().is_empty() {
        fields.insert(key("rollNumber"), "Roll number is required".into());
    }
}

/// `local@domain` with no whitespace, and the configured domain when one is set.
pub fn email_allowed(email: &str, domain: &str) -> bool {
    let email = email.trim();
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || host.is_empty() || host.contains('@') {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    domain.is_empty() || host.eq_ignore_ascii_case(domain)
}

/// Valid when the last ten characters, after dropping spaces, `-` and `+`,
/// are all digits.
pub fn whatsapp_valid(number: &str) -> bool {
    let cleaned: Vec<char> = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '+')
        .collect();
    cleaned.len() >= 10 && cleaned[cleaned.len() - 10..].iter().all(|c| c.is_ascii_digit())
}

fn build_team(request: RegisterTeamRequest) -> Team {
    let leader = request.leader_input().into_member();
    Team {
        id: String::new(),
        team_name: request.team_name.trim().to_string(),
        leader_name: leader.name,
        leader_email: leader.email,
        leader_whats_app: leader.whats_app,
        leader_roll_number: leader.roll_number,
        leader_residency: leader.residency,
        leader_mess_food: leader.mess_food,
        leader_course: leader.course,
        leader_batch: leader.batch,
        members: request
            .members
            .into_iter()
            .map(MemberInput::into_member)
            .collect(),
        is_checked_in: false,
        room_number: None,
        allocated_team_id: None,
        problem_statement: None,
        github_repo: None,
        extension_board_given: false,
        created_at: String::new(),
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Canonical room spelling when it parses, otherwise the trimmed input.
pub(crate) fn canonical_room(room: &str) -> String {
    normalize_room(room).unwrap_or_else(|| room.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Residency;

    fn config() -> Config {
        Config {
            db_path: "unused.sqlite".into(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            admin_email: None,
            admin_password: None,
            session_ttl_hours: 1,
            email_domain: "jklu.edu.in".to_string(),
            team_size: 3,
        }
    }

    fn member(name: &str) -> MemberInput {
        MemberInput {
            name: name.to_string(),
            email: format!("{}@jklu.edu.in", name),
            whats_app: "+91 98765-43210".to_string(),
            roll_number: format!("2024btech0{}", name.len()),
            ..MemberInput::default()
        }
    }

    fn request() -> RegisterTeamRequest {
        RegisterTeamRequest {
            team_name: "Alpha".to_string(),
            leader_name: "asha".to_string(),
            leader_email: "asha@jklu.edu.in".to_string(),
            leader_whats_app: "9876543210".to_string(),
            leader_roll_number: "2024btech001".to_string(),
            members: vec![member("ravi"), member("meera"), member("kabir")],
            ..RegisterTeamRequest::default()
        }
    }

    fn field_errors(result: Result<(), AppError>) -> FieldErrors {
        match result {
            Err(AppError::Validation { fields, .. }) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request(), &config(), MemberCount::Exact).is_ok());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let mut req = request();
        req.team_name = "  ".to_string();
        req.leader_email = String::new();
        req.members[1].roll_number = String::new();
        req.members[2].whats_app = "12345".to_string();

        let fields = field_errors(validate_registration(&req, &config(), MemberCount::Exact));
        assert_eq!(fields["teamName"], "Team name is required");
        assert_eq!(fields["leaderEmail"], "Email is required");
        assert_eq!(fields["member1.rollNumber"], "Roll number is required");
        assert_eq!(fields["member2.whatsApp"], "Enter a valid 10-digit number");
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_email_domain_and_duplicates() {
        let mut req = request();
        req.members[0].email = "ravi@gmail.com".to_string();
        req.members[2].email = "ASHA@jklu.edu.in".to_string();

        let fields = field_errors(validate_registration(&req, &config(), MemberCount::Exact));
        assert_eq!(fields["member0.email"], "Must be a @jklu.edu.in email");
        assert_eq!(fields["member2.email"], "Duplicate email");
    }

    #[test]
    fn test_member_count_rules() {
        let mut req = request();
        req.members.pop();

        let fields = field_errors(validate_registration(&req, &config(), MemberCount::Exact));
        assert!(fields.contains_key("members"));
        assert!(validate_registration(&req, &config(), MemberCount::AtMost).is_ok());

        req.members = vec![member("a1"), member("b22"), member("c333"), member("d4444")];
        let fields = field_errors(validate_registration(&req, &config(), MemberCount::AtMost));
        assert!(fields.contains_key("members"));
    }

    #[test]
    fn test_email_and_whatsapp_rules() {
        assert!(email_allowed("x@JKLU.edu.in", "jklu.edu.in"));
        assert!(!email_allowed("x y@jklu.edu.in", "jklu.edu.in"));
        assert!(!email_allowed("@jklu.edu.in", "jklu.edu.in"));
        assert!(!email_allowed("x@a@jklu.edu.in", "jklu.edu.in"));
        assert!(email_allowed("x@example.org", ""));

        assert!(whatsapp_valid("+91 98765 43210"));
        assert!(whatsapp_valid("98765-43210"));
        assert!(!whatsapp_valid("98765"));
        assert!(!whatsapp_valid("98765x3210"));
    }

    #[test]
    fn test_build_team_drops_hosteller_mess_food() {
        let mut req = request();
        req.leader_mess_food = Some(true);
        req.members[0].residency = Some(Residency::DayScholar);
        req.members[0].mess_food = Some(true);

        let team = build_team(req);
        assert_eq!(team.leader_mess_food, None);
        assert_eq!(team.members[0].mess_food, Some(true));
        assert_eq!(team.members[1].residency, Residency::Hosteller);
    }

    #[test]
    fn test_canonical_room_falls_back_to_input() {
        assert_eq!(canonical_room("eb2-104"), "EB2 - 104");
        assert_eq!(canonical_room(" Seminar Hall "), "Seminar Hall");
    }
}
