//! Search workflow: player lookup → profile refresh → vehicle stats.
//!
//! This module is runtime-agnostic. The HTTP adapter lives in
//! `runtime::native::data` and is reached only through [`StatsApi`], so the
//! workflow and its error-message rules are testable with a fake API.

use crate::app_core::normalize::normalize;
use crate::model::{Player, UserId, VehicleRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

/// The site only ever looks at the best match.
pub const SEARCH_LIMIT: u32 = 1;

pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required";
pub const NOT_FOUND_MESSAGE: &str = "No player with this name was found.";
pub const REFRESH_PENDING_MESSAGE: &str = "Player data update requested, try again later.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// Failure of a single call to the statistics API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, url: String },
    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("Network error: {0}")]
    Transport(String),
    /// The response body did not match the expected schema.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Malformed(_) => None,
        }
    }
}

/// The three calls the workflow makes against the statistics API.
pub trait StatsApi {
    /// `GET /players/search`; `None` when nobody matches.
    fn search_player(&self, name: &str, limit: u32) -> Result<Option<Player>, ApiError>;

    /// `GET /players/update/{id}`; asks the server to refresh its copy of the profile.
    fn request_profile_refresh(&self, user_id: &UserId) -> Result<(), ApiError>;

    /// `GET /players/vehicleStats/{id}`; empty when the server has no data yet.
    fn fetch_vehicle_stats(&self, user_id: &UserId) -> Result<Vec<VehicleRecord>, ApiError>;
}

/// Intermediate step reported while a search is still running.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchProgress {
    PlayerResolved(Player),
}

/// Final result of one search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Deduplicated and sorted vehicle list (never empty).
    Found(Vec<VehicleRecord>),
    NotFound,
    /// The player exists but the server has no vehicle data yet.
    RefreshPending,
    /// User-facing message for a failed call.
    Failed(String),
}

/// Runs one complete search for `name`.
///
/// `on_progress` is called once the player is resolved, before the vehicle
/// list is requested. Never panics on API failures; they become
/// [`SearchOutcome::Failed`].
pub fn run_search<A, F>(api: &A, name: &str, mut on_progress: F) -> SearchOutcome
where
    A: StatsApi + ?Sized,
    F: FnMut(SearchProgress),
{
    match search_steps(api, name, &mut on_progress) {
        Ok(outcome) => outcome,
        Err(err) => {
            info!(error = %err, "search failed");
            SearchOutcome::Failed(error_message(&err))
        }
    }
}

fn search_steps<A, F>(api: &A, name: &str, on_progress: &mut F) -> Result<SearchOutcome, ApiError>
where
    A: StatsApi + ?Sized,
    F: FnMut(SearchProgress),
{
    let Some(player) = api.search_player(name, SEARCH_LIMIT)? else {
        info!(name, "no player found");
        return Ok(SearchOutcome::NotFound);
    };
    info!(user_id = %player.user_id, "player resolved");
    on_progress(SearchProgress::PlayerResolved(player.clone()));

    // Best-effort: the vehicle list is still worth fetching if this fails.
    if let Err(err) = api.request_profile_refresh(&player.user_id) {
        warn!(user_id = %player.user_id, error = %err, "profile refresh request failed");
    }

    let records = api.fetch_vehicle_stats(&player.user_id)?;
    if records.is_empty() {
        info!(user_id = %player.user_id, "vehicle stats not available yet");
        return Ok(SearchOutcome::RefreshPending);
    }

    let raw_count = records.len();
    let records = normalize(records);
    debug!(raw_count, unique = records.len(), "vehicle stats normalized");
    Ok(SearchOutcome::Found(records))
}

/// Builds the banner text for a failed call.
///
/// `"<message> (<reason phrase>)."` when the error carries an HTTP status with
/// a known reason phrase, otherwise [`GENERIC_FAILURE_MESSAGE`]. The reason the
/// detailed form could not be built goes to the log only.
pub fn error_message(err: &ApiError) -> String {
    match reason_phrase(err) {
        Ok(phrase) => format!("{err} ({phrase})."),
        Err(cause) => {
            warn!("An error occurred while processing your request: {cause}");
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

fn reason_phrase(err: &ApiError) -> Result<&'static str, String> {
    let status = err
        .status()
        .ok_or_else(|| format!("no HTTP status on error: {err}"))?;
    let code = http::StatusCode::from_u16(status).map_err(|e| e.to_string())?;
    code.canonical_reason()
        .ok_or_else(|| format!("no reason phrase for status {status}"))
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;

    /// Scripted [`StatsApi`] that records every call it receives.
    pub struct FakeApi {
        pub search: Result<Option<Player>, ApiError>,
        pub refresh: Result<(), ApiError>,
        pub vehicles: Result<Vec<VehicleRecord>, ApiError>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        pub fn new(
            search: Result<Option<Player>, ApiError>,
            vehicles: Result<Vec<VehicleRecord>, ApiError>,
        ) -> Self {
            Self {
                search,
                refresh: Ok(()),
                vehicles,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl StatsApi for FakeApi {
        fn search_player(&self, name: &str, limit: u32) -> Result<Option<Player>, ApiError> {
            self.calls.borrow_mut().push(format!("search:{name}:{limit}"));
            self.search.clone()
        }

        fn request_profile_refresh(&self, user_id: &UserId) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("update:{user_id}"));
            self.refresh.clone()
        }

        fn fetch_vehicle_stats(&self, user_id: &UserId) -> Result<Vec<VehicleRecord>, ApiError> {
            self.calls.borrow_mut().push(format!("vehicles:{user_id}"));
            self.vehicles.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeApi;
    use super::*;
    use crate::model::fixtures::{player, vehicle};

    fn status_error(status: u16) -> ApiError {
        ApiError::Status {
            status,
            url: "https://example.invalid/".to_string(),
        }
    }

    #[test]
    fn test_run_search_success_normalizes_and_reports_player() {
        let api = FakeApi::new(
            Ok(Some(player("42", "pilot"))),
            Ok(vec![
                vehicle("a", "A", 1, 1.0),
                vehicle("b", "B", 5, 7.7),
                vehicle("a", "A", 1, 1.0),
            ]),
        );
        let mut progress = Vec::new();

        let outcome = run_search(&api, "pilot", |p| progress.push(p));

        let SearchOutcome::Found(records) = outcome else {
            panic!("expected Found");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vehicle_id.0, "b");
        assert_eq!(
            progress,
            vec![SearchProgress::PlayerResolved(player("42", "pilot"))]
        );
        assert_eq!(
            api.calls(),
            vec!["search:pilot:1", "update:42", "vehicles:42"]
        );
    }

    #[test]
    fn test_run_search_not_found_skips_vehicle_call() {
        let api = FakeApi::new(Ok(None), Ok(vec![vehicle("a", "A", 1, 1.0)]));

        let outcome = run_search(&api, "nobody", |_| {});

        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(api.calls(), vec!["search:nobody:1"]);
    }

    #[test]
    fn test_run_search_empty_vehicle_list_is_refresh_pending() {
        let api = FakeApi::new(Ok(Some(player("7", "new"))), Ok(Vec::new()));

        let outcome = run_search(&api, "new", |_| {});

        assert_eq!(outcome, SearchOutcome::RefreshPending);
    }

    #[test]
    fn test_run_search_ignores_refresh_failure() {
        let mut api = FakeApi::new(
            Ok(Some(player("7", "p"))),
            Ok(vec![vehicle("a", "A", 1, 1.0)]),
        );
        api.refresh = Err(status_error(500));

        let outcome = run_search(&api, "p", |_| {});

        assert!(matches!(outcome, SearchOutcome::Found(ref r) if r.len() == 1));
        assert_eq!(api.calls().len(), 3);
    }

    #[test]
    fn test_run_search_status_error_message() {
        let api = FakeApi::new(Err(status_error(404)), Ok(Vec::new()));

        let outcome = run_search(&api, "x", |_| {});

        assert_eq!(
            outcome,
            SearchOutcome::Failed("Request failed with status code 404 (Not Found).".to_string())
        );
    }

    #[test]
    fn test_error_message_uses_canonical_reason() {
        assert_eq!(
            error_message(&status_error(503)),
            "Request failed with status code 503 (Service Unavailable)."
        );
    }

    #[test]
    fn test_run_search_vehicle_error_after_player_found() {
        let api = FakeApi::new(Ok(Some(player("1", "p"))), Err(status_error(503)));

        let outcome = run_search(&api, "p", |_| {});

        let SearchOutcome::Failed(message) = outcome else {
            panic!("expected Failed");
        };
        assert!(message.ends_with("(Service Unavailable)."));
    }

    #[test]
    fn test_error_message_without_status_falls_back() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(error_message(&err), GENERIC_FAILURE_MESSAGE);

        let err = ApiError::Malformed("expected an array".to_string());
        assert_eq!(error_message(&err), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_error_message_unknown_status_falls_back() {
        assert_eq!(error_message(&status_error(599)), GENERIC_FAILURE_MESSAGE);
        assert_eq!(error_message(&status_error(42)), GENERIC_FAILURE_MESSAGE);
    }
}
