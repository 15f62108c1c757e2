//! Database repository for team and session operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::maintenance::ReconcilePlan;
use crate::models::{Course, Member, Residency, SwapMembersRequest, Team};

const TEAM_COLUMNS: &str = r#"id, team_name, leader_name, leader_email, leader_whats_app,
    leader_roll_number, leader_residency, leader_mess_food, leader_course, leader_batch,
    members, is_checked_in, room_number, allocated_team_id, problem_statement, github_repo,
    extension_board_given, created_at"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== TEAM OPERATIONS ====================

    /// List all teams in registration order.
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM teams ORDER BY created_at, rowid",
            TEAM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(team_from_row).collect())
    }

    /// Get a team by ID.
    pub async fn get_team(&self, id: &str) -> Result<Option<Team>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = ?", TEAM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(team_from_row))
    }

    async fn require_team(&self, id: &str) -> Result<Team, AppError> {
        self.get_team(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
    }

    /// Whether a team with this name exists, ignoring case and surrounding spaces.
    pub async fn team_name_taken(&self, team_name: &str) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM teams WHERE lower(trim(team_name)) = lower(trim(?))",
        )
        .bind(team_name)
        .fetch_one(&self.pool)
        .await?;
        let n: i64 = row.get("n");
        Ok(n > 0)
    }

    /// Name of the team, other than `exclude_id`, that holds `board`.
    pub async fn board_holder(
        &self,
        board: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        let row = sqlx::query(
            "SELECT team_name FROM teams WHERE trim(allocated_team_id) = trim(?) AND id != ? LIMIT 1",
        )
        .bind(board)
        .bind(exclude_id.unwrap_or(""))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("team_name")))
    }

    /// Insert a new team; the id and creation time are assigned here.
    pub async fn create_team(&self, mut team: Team) -> Result<Team, AppError> {
        team.id = uuid::Uuid::new_v4().to_string();
        team.created_at = Utc::now().to_rfc3339();
        let members_json = serde_json::to_string(&team.members)?;

        sqlx::query(&format!(
            "INSERT INTO teams ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TEAM_COLUMNS
        ))
        .bind(&team.id)
        .bind(&team.team_name)
        .bind(&team.leader_name)
        .bind(&team.leader_email)
        .bind(&team.leader_whats_app)
        .bind(&team.leader_roll_number)
        .bind(team.leader_residency.as_str())
        .bind(team.leader_mess_food.map(|b| b as i32))
        .bind(team.leader_course.map(|c| c.as_str()))
        .bind(&team.leader_batch)
        .bind(&members_json)
        .bind(team.is_checked_in as i32)
        .bind(&team.room_number)
        .bind(&team.allocated_team_id)
        .bind(&team.problem_statement)
        .bind(&team.github_repo)
        .bind(team.extension_board_given as i32)
        .bind(&team.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| board_write_error(e, team.allocated_team_id.as_deref()))?;

        Ok(team)
    }

    /// Set check-in status together with room and board assignment.
    pub async fn set_check_in(
        &self,
        id: &str,
        is_checked_in: bool,
        room_number: Option<&str>,
        allocated_team_id: Option<&str>,
    ) -> Result<Team, AppError> {
        let result = sqlx::query(
            "UPDATE teams SET is_checked_in = ?, room_number = ?, allocated_team_id = ? WHERE id = ?",
        )
        .bind(is_checked_in as i32)
        .bind(room_number)
        .bind(allocated_team_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| board_write_error(e, allocated_team_id))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }
        self.require_team(id).await
    }

    /// Record whether an extension board was handed out.
    pub async fn set_extension_board(&self, id: &str, given: bool) -> Result<Team, AppError> {
        let result = sqlx::query("UPDATE teams SET extension_board_given = ? WHERE id = ?")
            .bind(given as i32)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }
        self.require_team(id).await
    }

    /// Assign a problem statement, keeping the repo link unless a new one is given.
    pub async fn set_problem_statement(
        &self,
        id: &str,
        problem_statement: &str,
        github_repo: Option<&str>,
    ) -> Result<Team, AppError> {
        let result = sqlx::query(
            "UPDATE teams SET problem_statement = ?, github_repo = COALESCE(?, github_repo) WHERE id = ?",
        )
        .bind(problem_statement)
        .bind(github_repo)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }
        self.require_team(id).await
    }

    /// Exchange one member of each team, identified by email. Both teams are
    /// written in one transaction.
    pub async fn swap_members(&self, request: &SwapMembersRequest) -> Result<(Team, Team), AppError> {
        if request.team_a_id == request.team_b_id {
            return Err(AppError::validation("Cannot swap members within the same team"));
        }

        let mut tx = self.pool.begin().await?;

        let mut team_a = fetch_team_in(&mut tx, &request.team_a_id).await?;
        let mut team_b = fetch_team_in(&mut tx, &request.team_b_id).await?;

        let pos_a = member_position(&team_a, &request.member_a_email)?;
        let pos_b = member_position(&team_b, &request.member_b_email)?;

        std::mem::swap(&mut team_a.members[pos_a], &mut team_b.members[pos_b]);

        for team in [&team_a, &team_b] {
            sqlx::query("UPDATE teams SET members = ? WHERE id = ?")
                .bind(serde_json::to_string(&team.members)?)
                .bind(&team.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok((team_a, team_b))
    }

    /// Apply a reconcile plan in one transaction.
    pub async fn apply_reconcile(&self, plan: &ReconcilePlan) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for team in &plan.check_ins {
            sqlx::query("UPDATE teams SET is_checked_in = 1 WHERE id = ?")
                .bind(&team.team_id)
                .execute(&mut *tx)
                .await?;
        }

        for fix in &plan.room_fixes {
            sqlx::query("UPDATE teams SET room_number = ? WHERE id = ? AND room_number = ?")
                .bind(&fix.new)
                .bind(&fix.team_id)
                .bind(&fix.old)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // ==================== SESSION OPERATIONS ====================

    /// Create an admin session and return its token.
    pub async fn create_session(&self, email: &str, ttl_hours: i64) -> Result<String, AppError> {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = Duration::try_hours(ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("Session lifetime of {} hours is out of range", ttl_hours))
            })?;

        sqlx::query(
            "INSERT INTO sessions (token, email, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(email)
        .bind(session_timestamp(now))
        .bind(session_timestamp(expires_at))
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    /// Whether `token` names a live session. Expired sessions are purged first.
    pub async fn session_valid(&self, token: &str) -> Result<bool, AppError> {
        let now = session_timestamp(Utc::now());
        sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT token FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Delete a session.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

async fn fetch_team_in(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: &str,
) -> Result<Team, AppError> {
    let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = ?", TEAM_COLUMNS))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    row.as_ref()
        .map(team_from_row)
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
}

/// Fixed-width so that session times compare correctly as text.
fn session_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn member_position(team: &Team, email: &str) -> Result<usize, AppError> {
    team.member_position(email).ok_or_else(|| {
        AppError::validation(format!(
            "No member with email {} in team {}",
            email.trim(),
            team.team_name
        ))
    })
}

// Helper functions for row conversion

fn team_from_row(row: &sqlx::sqlite::SqliteRow) -> Team {
    let residency: String = row.get("leader_residency");
    let leader_mess_food: Option<i32> = row.get("leader_mess_food");
    let leader_course: Option<String> = row.get("leader_course");
    let members: String = row.get("members");
    let is_checked_in: i32 = row.get("is_checked_in");
    let extension_board_given: i32 = row.get("extension_board_given");

    Team {
        id: row.get("id"),
        team_name: row.get("team_name"),
        leader_name: row.get("leader_name"),
        leader_email: row.get("leader_email"),
        leader_whats_app: row.get("leader_whats_app"),
        leader_roll_number: row.get("leader_roll_number"),
        leader_residency: Residency::parse(&residency).unwrap_or_default(),
        leader_mess_food: leader_mess_food.map(|v| v != 0),
        leader_course: leader_course.as_deref().and_then(Course::parse),
        leader_batch: row.get("leader_batch"),
        members: parse_members(&members),
        is_checked_in: is_checked_in != 0,
        room_number: row.get("room_number"),
        allocated_team_id: row.get("allocated_team_id"),
        problem_statement: row.get("problem_statement"),
        github_repo: row.get("github_repo"),
        extension_board_given: extension_board_given != 0,
        created_at: row.get("created_at"),
    }
}

fn parse_members(s: &str) -> Vec<Member> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Map a write that hit the unique board index to a validation error.
fn board_write_error(err: sqlx::Error, board: Option<&str>) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::validation(format!(
            "Board {} is already allocated to another team",
            board.unwrap_or_default().trim()
        )),
        _ => err.into(),
    }
}
