//! Admin dashboard client.
//!
//! [`AdminClient`] talks to the admin API with an explicit
//! [`SessionContext`]; [`Dashboard`] keeps the fetched teams in memory,
//! applies toggles optimistically and rolls them back when the server
//! refuses. Views and exports are computed from the held copy.

use std::fmt;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::LoginResponse;
use crate::models::{CheckInRequest, ExtensionBoardRequest, LoginRequest, Person, Team};
use crate::roster::{
    filter, flatten, people_csv, sort_for_judging, summarize, teams_csv, FilterCriteria, Stats,
    TeamPatch,
};

/// Where the API lives and the admin token, if logged in.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub base_url: String,
    pub token: Option<String>,
}

impl SessionContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Failure of a dashboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The server could not be reached or answered with garbage
    Connectivity,
    /// The session is missing or expired; the held token has been cleared
    Unauthorized,
    /// The server refused the request with this message
    Rejected(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connectivity => write!(f, "Could not reach the server, try again"),
            ClientError::Unauthorized => write!(f, "Session expired, please log in again"),
            ClientError::Rejected(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Thin typed wrapper over the admin API.
pub struct AdminClient {
    http: reqwest::Client,
    session: SessionContext,
}

impl AdminClient {
    pub fn new(session: SessionContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.session.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Exchange credentials for a session token and keep it.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let request = self.http.post(self.url("/api/admin/login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Login request failed: {}", e);
            ClientError::Connectivity
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Rejected(error_message(response).await));
        }
        let login: LoginResponse = read_body(response).await?;
        self.session.token = Some(login.token);
        Ok(())
    }

    /// Close the session on the server and forget the token.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if self.session.token.is_none() {
            return Ok(());
        }
        let request = self.authorized(self.http.post(self.url("/api/admin/logout")));
        let result: Result<serde_json::Value, _> = self.send_raw(request).await;
        self.session.token = None;
        result.map(|_| ())
    }

    pub async fn registrations(&mut self) -> Result<Vec<Team>, ClientError> {
        let request = self.authorized(self.http.get(self.url("/api/admin/registrations")));
        self.send(request).await
    }

    pub async fn check_in(&mut self, id: &str, body: &CheckInRequest) -> Result<Team, ClientError> {
        let path = format!("/api/admin/teams/{}/check-in", id);
        let request = self.authorized(self.http.put(self.url(&path)).json(body));
        self.send(request).await
    }

    pub async fn extension_board(&mut self, id: &str, given: bool) -> Result<Team, ClientError> {
        let path = format!("/api/admin/teams/{}/extension-board", id);
        let body = ExtensionBoardRequest {
            extension_board_given: given,
        };
        let request = self.authorized(self.http.put(self.url(&path)).json(&body));
        self.send(request).await
    }

    /// Send and unwrap the `data` of a success envelope.
    async fn send<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T, ClientError> {
        let envelope: Envelope<T> = self.send_raw(request).await?;
        Ok(envelope.data)
    }

    async fn send_raw<T: DeserializeOwned>(
        &mut self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Dashboard request failed: {}", e);
            ClientError::Connectivity
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.token = None;
            return Err(ClientError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClientError::Rejected(error_message(response).await));
        }
        read_body(response).await
    }
}

async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    response.json::<T>().await.map_err(|e| {
        tracing::warn!("Unreadable response body: {}", e);
        ClientError::Connectivity
    })
}

/// The `message` of an error envelope, or the status line when absent.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

/// Client-held team collection with optimistic toggles.
pub struct Dashboard {
    client: AdminClient,
    teams: Vec<Team>,
}

impl Dashboard {
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            teams: Vec::new(),
        }
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut AdminClient {
        &mut self.client
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Replace the held teams with the server's; on failure the old copy stays.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.teams = self.client.registrations().await?;
        Ok(())
    }

    /// Flip a team's check-in state, optionally assigning room and board.
    pub async fn toggle_check_in(
        &mut self,
        id: &str,
        room_number: Option<String>,
        allocated_team_id: Option<String>,
    ) -> Result<(), ClientError> {
        let idx = self.position(id)?;
        let team = &self.teams[idx];
        let patch = TeamPatch::check_in(team, !team.is_checked_in, room_number, allocated_team_id);
        let undo = patch.apply(&mut self.teams[idx]);

        let tentative = &self.teams[idx];
        let body = CheckInRequest {
            is_checked_in: tentative.is_checked_in,
            room_number: tentative.room_number.clone(),
            allocated_team_id: tentative.allocated_team_id.clone(),
        };
        let result = self.client.check_in(id, &body).await;
        self.settle(idx, undo, result)
    }

    /// Flip whether a team has received its extension board.
    pub async fn toggle_extension_board(&mut self, id: &str) -> Result<(), ClientError> {
        let idx = self.position(id)?;
        let given = !self.teams[idx].extension_board_given;

        let undo = TeamPatch::ExtensionBoard { given }.apply(&mut self.teams[idx]);
        let result = self.client.extension_board(id, given).await;
        self.settle(idx, undo, result)
    }

    fn position(&self, id: &str) -> Result<usize, ClientError> {
        self.teams
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ClientError::Rejected(format!("Team {} not found", id)))
    }

    /// Keep the server's team on success, undo the local change otherwise.
    fn settle(
        &mut self,
        idx: usize,
        undo: TeamPatch,
        result: Result<Team, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(team) => {
                self.teams[idx] = team;
                Ok(())
            }
            Err(e) => {
                undo.apply(&mut self.teams[idx]);
                Err(e)
            }
        }
    }

    pub fn people(&self, criteria: &FilterCriteria) -> Vec<Person> {
        filter(&flatten(&self.teams), criteria)
    }

    pub fn stats(&self) -> Stats {
        summarize(&flatten(&self.teams), &self.teams)
    }

    /// Individuals CSV of everyone matching `criteria`.
    pub fn export_individuals(&self, criteria: &FilterCriteria) -> String {
        people_csv(&self.people(criteria))
    }

    /// Judging sheet of the held teams.
    pub fn export_teams(&self) -> String {
        let mut teams = self.teams.clone();
        sort_for_judging(&mut teams);
        teams_csv(&teams)
    }
}
