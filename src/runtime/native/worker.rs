//! Background search workers.
//!
//! Each submission runs on its own thread and reports back over a channel.
//! Every event carries the generation it was started for; the UI thread drops
//! events from superseded searches in `AppState::apply_search_event`.

use crate::app_core::state::SearchEvent;
use crate::app_core::workflow::{SearchOutcome, StatsApi, run_search};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Starts a search for `name` on a new thread.
pub fn spawn_search<A>(
    api: Arc<A>,
    name: String,
    generation: u64,
    tx: Sender<SearchEvent>,
) -> std::io::Result<JoinHandle<()>>
where
    A: StatsApi + Send + Sync + 'static,
{
    thread::Builder::new()
        .name(format!("search-{generation}"))
        .spawn(move || {
            info!(generation, name = %name, "search started");
            let progress_tx = tx.clone();
            let outcome = run_search(api.as_ref(), &name, |progress| {
                let _ = progress_tx.send(SearchEvent::Progress {
                    generation,
                    progress,
                });
            });
            info!(generation, outcome = outcome_label(&outcome), "search finished");

            if tx
                .send(SearchEvent::Completed {
                    generation,
                    outcome,
                })
                .is_err()
            {
                debug!(generation, "UI loop gone, dropping search result");
            }
        })
}

fn outcome_label(outcome: &SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Found(_) => "found",
        SearchOutcome::NotFound => "not_found",
        SearchOutcome::RefreshPending => "refresh_pending",
        SearchOutcome::Failed(_) => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::workflow::{ApiError, SearchProgress};
    use crate::model::fixtures::{player, vehicle};
    use crate::model::{Player, UserId, VehicleRecord};
    use std::sync::mpsc;
    use std::time::Duration;

    struct StaticApi {
        player: Option<Player>,
        vehicles: Vec<VehicleRecord>,
    }

    impl StatsApi for StaticApi {
        fn search_player(&self, _name: &str, _limit: u32) -> Result<Option<Player>, ApiError> {
            Ok(self.player.clone())
        }

        fn request_profile_refresh(&self, _user_id: &UserId) -> Result<(), ApiError> {
            Ok(())
        }

        fn fetch_vehicle_stats(&self, _user_id: &UserId) -> Result<Vec<VehicleRecord>, ApiError> {
            Ok(self.vehicles.clone())
        }
    }

    #[test]
    fn test_spawn_search_reports_progress_then_completion() {
        let api = Arc::new(StaticApi {
            player: Some(player("5", "pilot")),
            vehicles: vec![vehicle("a", "A", 1, 1.0)],
        });
        let (tx, rx) = mpsc::channel();

        let handle = spawn_search(api, "pilot".to_string(), 3, tx).unwrap();
        handle.join().unwrap();

        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(
            first,
            SearchEvent::Progress {
                generation: 3,
                progress: SearchProgress::PlayerResolved(player("5", "pilot")),
            }
        );
        let second = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            second,
            SearchEvent::Completed {
                generation: 3,
                outcome: SearchOutcome::Found(_)
            }
        ));
    }

    #[test]
    fn test_spawn_search_survives_dropped_receiver() {
        let api = Arc::new(StaticApi {
            player: None,
            vehicles: Vec::new(),
        });
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let handle = spawn_search(api, "nobody".to_string(), 1, tx).unwrap();
        assert!(handle.join().is_ok());
    }
}
