//! HTTP client for the public MLB stats API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Player, ProjectedStats, Team};

/// Public stats API root.
pub const DEFAULT_BASE_URL: &str = "https://statsapi.mlb.com/api/v1";

/// Thin wrapper over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct StatsService {
    client: Client,
    base_url: String,
}

impl StatsService {
    /// Build a client for `base_url`; trailing slashes are ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("career-curve/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Root every endpoint is built from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for a single player.
    pub fn player_url(&self, id: u64) -> String {
        format!("{}/people/{id}", self.base_url)
    }

    /// Endpoint for a single club.
    pub fn team_url(&self, id: u32) -> String {
        format!("{}/teams/{id}", self.base_url)
    }

    /// Decode one player from the people endpoint.
    pub async fn fetch_player(&self, id: u64) -> Result<Player> {
        self.get_json(&self.player_url(id)).await
    }

    /// Decode one club from the teams endpoint.
    pub async fn fetch_team(&self, id: u32) -> Result<Team> {
        self.get_json(&self.team_url(id)).await
    }

    /// Projection for `player`.
    ///
    /// No prediction model is wired in yet, so every player receives the same
    /// placeholder projection.
    pub async fn fetch_prospect_prediction(&self, player: &Player) -> Result<ProjectedStats> {
        debug!(player_id = player.id(), "serving placeholder projection");
        Ok(placeholder_projection())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode response from {url}"))
    }
}

/// Projection returned while no real model backs the service.
pub fn placeholder_projection() -> ProjectedStats {
    ProjectedStats::new(
        0.85,
        4.2,
        vec!["Mike Trout".to_string(), "Ronald Acuña Jr.".to_string()],
        "2025",
    )
}
