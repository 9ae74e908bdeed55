//! Blocking HTTP adapter for the statistics API and its image assets.

use crate::app_core::workflow::{ApiError, StatsApi};
use crate::model::{Player, UserId, VehicleRecord, is_empty_payload};
use crate::runtime::native::export::AssetSource;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://thunderinsights.dk";
const API_PREFIX: [&str; 3] = ["api", "v1", "players"];

/// [`StatsApi`] over `reqwest::blocking`.
///
/// Cheap to share between worker threads behind an `Arc`; the inner client
/// pools connections.
pub struct HttpStatsApi {
    client: reqwest::blocking::Client,
    base: Url,
}

impl HttpStatsApi {
    /// `timeout` of `None` disables the request timeout.
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base =
            Url::parse(base).with_context(|| format!("Invalid API base URL: {base}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {base}");
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        // `None` lifts the blocking client's default 30s timeout.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/api/v1/players/{segments...}`
    pub fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    /// Resolves a site-relative asset path such as `images/flags/x.avif`.
    pub fn asset_url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid asset path {path}: {e}")))
    }

    fn get_bytes(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response
            .bytes()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }

    /// Fetches `url` and decodes it, mapping `null`, `[]` and `{}` to `None`.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ApiError> {
        let body = self.get_bytes(url)?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;
        if is_empty_payload(&value) {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

impl StatsApi for HttpStatsApi {
    fn search_player(&self, name: &str, limit: u32) -> Result<Option<Player>, ApiError> {
        let mut url = self.api_url(&["search"]);
        url.query_pairs_mut()
            .append_pair("userToSearchFor", name)
            .append_pair("limit", &limit.to_string());
        let players: Option<Vec<Player>> = self.get_json(url)?;
        Ok(players.and_then(|players| players.into_iter().next()))
    }

    fn request_profile_refresh(&self, user_id: &UserId) -> Result<(), ApiError> {
        self.get_bytes(self.api_url(&["update", &user_id.0]))
            .map(|_| ())
    }

    fn fetch_vehicle_stats(&self, user_id: &UserId) -> Result<Vec<VehicleRecord>, ApiError> {
        let records: Option<Vec<VehicleRecord>> =
            self.get_json(self.api_url(&["vehicleStats", &user_id.0]))?;
        Ok(records.unwrap_or_default())
    }
}

impl AssetSource for HttpStatsApi {
    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(self.asset_url(path)?)
    }
}

pub fn get_data_dir() -> Result<std::path::PathBuf> {
    let project_dirs = directories::ProjectDirs::from("dk", "thunderinsights", "thunder-lineup")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = project_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}
