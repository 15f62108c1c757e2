//! CSV export of people and teams.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::models::{Person, Team};

/// One output column: a header and how to render a record.
pub struct Column<T> {
    pub header: &'static str,
    pub value: fn(&T) -> String,
}

/// Quote a field if it contains a comma, double quote, or newline.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Render a header row and one row per record, joined by `\n`.
pub fn to_csv<T>(records: &[T], columns: &[Column<T>]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);

    lines.push(
        columns
            .iter()
            .map(|c| escape_field(c.header))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| escape_field(&(c.value)(record)).into_owned())
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

fn blank<T>(_: &T) -> String {
    String::new()
}

/// Columns of the "Individuals CSV".
pub fn person_columns() -> Vec<Column<Person>> {
    vec![
        Column {
            header: "Name",
            value: |p| p.name.clone(),
        },
        Column {
            header: "Email",
            value: |p| p.email.clone(),
        },
        Column {
            header: "WhatsApp",
            value: |p| p.whats_app.clone(),
        },
        Column {
            header: "Roll Number",
            value: |p| p.roll_number.clone(),
        },
        Column {
            header: "Course",
            value: |p| p.course.clone(),
        },
        Column {
            header: "Batch",
            value: |p| p.batch.clone(),
        },
        Column {
            header: "Residency",
            value: |p| p.residency.as_str().to_string(),
        },
        Column {
            header: "Mess Food",
            value: |p| yes_no(p.mess_food),
        },
        Column {
            header: "Role",
            value: |p| p.role.as_str().to_string(),
        },
        Column {
            header: "Team Name",
            value: |p| p.team_name.clone(),
        },
    ]
}

/// One line of the judging sheet: a team and its number within its room.
pub struct JudgingRow<'a> {
    pub serial: usize,
    pub team: &'a Team,
}

/// Number teams from 1, restarting whenever the room changes.
///
/// Expects teams already grouped by room, as [`sort_for_judging`] leaves them.
pub fn judging_rows(teams: &[Team]) -> Vec<JudgingRow<'_>> {
    let mut rows = Vec::with_capacity(teams.len());
    let mut current_room = None;
    let mut serial = 0;

    for (i, team) in teams.iter().enumerate() {
        let room = team
            .room_number
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        if i == 0 || room != current_room {
            current_room = room;
            serial = 0;
        }
        serial += 1;
        rows.push(JudgingRow { serial, team });
    }

    rows
}

/// Columns of the "Teams CSV", laid out as a judging sheet with blank score cells.
pub fn team_columns<'a>() -> Vec<Column<JudgingRow<'a>>> {
    vec![
        Column {
            header: "S.No",
            value: |r| r.serial.to_string(),
        },
        Column {
            header: "Team ID",
            value: |r| board_label(r.team),
        },
        Column {
            header: "Team Name",
            value: |r| r.team.team_name.clone(),
        },
        Column {
            header: "Leader Name",
            value: |r| r.team.leader_name.clone(),
        },
        Column {
            header: "Problem Statement",
            value: |r| r.team.problem_statement.clone().unwrap_or_default(),
        },
        Column {
            header: "GitHub Repo",
            value: |r| r.team.github_repo.clone().unwrap_or_default(),
        },
        Column {
            header: "Problem Understanding (10)",
            value: blank,
        },
        Column {
            header: "Proposed Solution (10)",
            value: blank,
        },
        Column {
            header: "Tech Stack (10)",
            value: blank,
        },
        Column {
            header: "Expected Features (10)",
            value: blank,
        },
        Column {
            header: "Impact on India/Bharat (10)",
            value: blank,
        },
        Column {
            header: "Total (50)",
            value: blank,
        },
        Column {
            header: "Remarks",
            value: blank,
        },
    ]
}

/// `T-<board>` when a board is allocated, otherwise empty.
pub fn board_label(team: &Team) -> String {
    match team.allocated_team_id.as_deref().map(str::trim) {
        Some(board) if !board.is_empty() => format!("T-{}", board),
        _ => String::new(),
    }
}

pub fn people_csv(people: &[Person]) -> String {
    to_csv(people, &person_columns())
}

/// Judging sheet; serial numbers restart for each room.
pub fn teams_csv(teams: &[Team]) -> String {
    to_csv(&judging_rows(teams), &team_columns())
}

/// Sort teams by room, then board number (numerically when both parse).
/// Teams without a room sort last.
pub fn sort_for_judging(teams: &mut [Team]) {
    fn board_cmp(a: &Team, b: &Team) -> Ordering {
        let a = a.allocated_team_id.as_deref().unwrap_or("");
        let b = b.allocated_team_id.as_deref().unwrap_or("");
        match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        }
    }

    teams.sort_by(|a, b| {
        let room_a = a.room_number.as_deref().filter(|r| !r.is_empty());
        let room_b = b.room_number.as_deref().filter(|r| !r.is_empty());
        match (room_a, room_b) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| board_cmp(a, b))
    });
}
