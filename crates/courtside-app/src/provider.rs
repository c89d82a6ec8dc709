// Roster and season-history providers.
//
// The session talks to one `RosterProvider`. The HTTP provider reads the
// stats backend's JSON envelopes; the CSV provider serves the same data from
// a local export.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use courtside_stats::player::{
    load_roster_from_reader, records_from_json_values, DataError, PlayerSeasonRecord,
};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ApiConfig, Config};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("backend reported failure for {url}: {message}")]
    Backend { url: String, message: String },

    #[error("invalid endpoint URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error(transparent)]
    Data(#[from] DataError),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Source of season records.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Current roster snapshot: one record per player season.
    async fn fetch_roster(&self) -> Result<Vec<PlayerSeasonRecord>, ProviderError>;

    /// Every season of `player_name` from `start_year` on, in whatever order
    /// the source returns them.
    async fn fetch_history(
        &self,
        player_name: &str,
        start_year: i32,
    ) -> Result<Vec<PlayerSeasonRecord>, ProviderError>;
}

/// Pick the provider the config asks for: CSV when `[data] roster_csv` is
/// set, the HTTP backend otherwise.
pub fn from_config(config: &Config) -> Result<Box<dyn RosterProvider>, ProviderError> {
    match &config.data.roster_csv {
        Some(path) => {
            info!("using CSV roster provider: {}", path);
            let mut provider = CsvProvider::new(path);
            if let Some(season) = config.data.season {
                provider = provider.with_season(season);
            }
            Ok(Box::new(provider))
        }
        None => {
            info!("using HTTP roster provider: {}", config.api.base_url);
            Ok(Box::new(HttpProvider::from_config(&config.api)?))
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP provider
// ---------------------------------------------------------------------------

// Records stay as raw values so one bad record is skipped rather than
// failing the whole envelope.
#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    players: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProgressionEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    progression: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpProvider {
    client: Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ProviderError> {
        Self::new(api.base_url.clone(), Duration::from_secs(api.timeout_secs))
    }

    /// `{base_url}/{segments...}` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let invalid = |message: String| ProviderError::InvalidUrl {
            url: self.base_url.clone(),
            message,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn roster_url(&self) -> Result<Url, ProviderError> {
        self.endpoint(&["basketball-stats"])
    }

    pub fn history_url(&self, player_name: &str, start_year: i32) -> Result<Url, ProviderError> {
        let mut url = self.endpoint(&["player-progression", player_name])?;
        url.query_pairs_mut()
            .append_pair("startYear", &start_year.to_string());
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, ProviderError> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RosterProvider for HttpProvider {
    async fn fetch_roster(&self) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
        let url = self.roster_url()?;
        let body = self.get_text(url.clone()).await?;
        let players = parse_roster_body(url.as_str(), &body)?;
        info!("fetched {} player seasons from {}", players.len(), url);
        Ok(players)
    }

    async fn fetch_history(
        &self,
        player_name: &str,
        start_year: i32,
    ) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
        let url = self.history_url(player_name, start_year)?;
        let body = self.get_text(url.clone()).await?;
        parse_history_body(url.as_str(), &body)
    }
}

/// Decode a `/basketball-stats` response body.
pub fn parse_roster_body(url: &str, body: &str) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
    let envelope: StatsEnvelope = serde_json::from_str(body).map_err(|e| ProviderError::Decode {
        url: url.to_string(),
        source: e,
    })?;
    Ok(records_from_json_values(envelope.players))
}

/// Decode a `/player-progression/{name}` response body. A `success: false`
/// envelope is an error.
pub fn parse_history_body(url: &str, body: &str) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
    let envelope: ProgressionEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode {
            url: url.to_string(),
            source: e,
        })?;
    if !envelope.success {
        return Err(ProviderError::Backend {
            url: url.to_string(),
            message: envelope
                .error
                .unwrap_or_else(|| "request was not successful".into()),
        });
    }
    Ok(records_from_json_values(envelope.progression))
}

// ---------------------------------------------------------------------------
// CSV provider
// ---------------------------------------------------------------------------

/// Serves roster and history from a local CSV export. The file is re-read on
/// every call.
///
/// An export usually spans several seasons. The roster is one season's
/// player pool: the configured season, or the latest year in the file.
/// History reads every season.
pub struct CsvProvider {
    path: PathBuf,
    season: Option<i32>,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            season: None,
        }
    }

    pub fn with_season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    async fn load(&self) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
        let display = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DataError::Io {
                path: display.clone(),
                source: e,
            })?;
        let players = load_roster_from_reader(bytes.as_slice()).map_err(|e| DataError::Csv {
            path: display,
            source: e,
        })?;
        Ok(players)
    }
}

#[async_trait]
impl RosterProvider for CsvProvider {
    async fn fetch_roster(&self) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
        let players = self.load().await?;
        let Some(season) = self.season.or_else(|| players.iter().map(|p| p.year).max()) else {
            return Ok(players);
        };
        let roster: Vec<PlayerSeasonRecord> =
            players.into_iter().filter(|p| p.year == season).collect();
        debug!("{} player seasons in the {} roster", roster.len(), season);
        Ok(roster)
    }

    async fn fetch_history(
        &self,
        player_name: &str,
        start_year: i32,
    ) -> Result<Vec<PlayerSeasonRecord>, ProviderError> {
        let players = self.load().await?;
        Ok(players
            .into_iter()
            .filter(|p| p.player_name == player_name && p.year >= start_year)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base: &str) -> HttpProvider {
        HttpProvider::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn roster_url_joins_base_path() {
        let p = provider("http://localhost:5000");
        assert_eq!(
            p.roster_url().unwrap().as_str(),
            "http://localhost:5000/basketball-stats"
        );
        let p = provider("http://stats.local/api/");
        assert_eq!(
            p.roster_url().unwrap().as_str(),
            "http://stats.local/api/basketball-stats"
        );
    }

    #[test]
    fn history_url_encodes_name_and_year() {
        let p = provider("http://localhost:5000");
        let url = p.history_url("Bruce Thornton", 2022).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/player-progression/Bruce%20Thornton?startYear=2022"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let p = provider("not a url");
        assert!(matches!(
            p.roster_url(),
            Err(ProviderError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn roster_body_reads_players_and_ignores_extras() {
        let body = r#"{
            "message": "Data fetched and converted successfully",
            "totalPlayers": 1,
            "sampleData": [],
            "players": [{"pid": 1, "player_name": "A", "year": 2024, "role": "C", "GP": 30}]
        }"#;
        let players = parse_roster_body("u", body).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].games, 30);
    }

    #[test]
    fn roster_body_skips_bad_records_and_keeps_the_rest() {
        let body = r#"{"players": [
            {"player_name": "A", "year": 2024, "role": "C", "GP": null},
            {"player_name": "B", "year": 2024, "role": "C", "GP": 30.0},
            {"player_name": "C", "year": "twenty", "role": "C"}
        ]}"#;
        let players = parse_roster_body("u", body).unwrap();
        let games: Vec<(&str, u32)> = players
            .iter()
            .map(|p| (p.player_name.as_str(), p.games))
            .collect();
        assert_eq!(games, vec![("A", 0), ("B", 30)]);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        assert!(matches!(
            parse_roster_body("u", "<html>"),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[test]
    fn history_body_success_and_failure() {
        let ok = r#"{"success": true, "playerName": "A", "totalYears": 1,
                     "progression": [{"player_name": "A", "year": 2023}]}"#;
        assert_eq!(parse_history_body("u", ok).unwrap().len(), 1);

        let failed = r#"{"success": false, "error": "Failed to fetch player progression", "progression": []}"#;
        match parse_history_body("u", failed) {
            Err(ProviderError::Backend { message, .. }) => {
                assert_eq!(message, "Failed to fetch player progression")
            }
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    fn write_csv(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(
            &path,
            "player_name,year,role,GP\n\
             Bruce Thornton,2021,Combo G,28\n\
             Bruce Thornton,2022,Combo G,30\n\
             Bruce Thornton,2024,Combo G,33\n\
             Bruce Thorntonn,2024,Combo G,1\n\
             Zach Edey,2024,C,35\n",
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn csv_roster_is_latest_season_only() {
        let path = write_csv("courtside_provider_roster.csv");
        let roster = CsvProvider::new(&path).fetch_roster().await.unwrap();
        let rows: Vec<(&str, i32)> = roster
            .iter()
            .map(|p| (p.player_name.as_str(), p.year))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Bruce Thornton", 2024),
                ("Bruce Thorntonn", 2024),
                ("Zach Edey", 2024)
            ]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn csv_roster_honors_configured_season() {
        let path = write_csv("courtside_provider_season.csv");
        let roster = CsvProvider::new(&path)
            .with_season(2022)
            .fetch_roster()
            .await
            .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].games, 30);

        let empty = CsvProvider::new(&path)
            .with_season(2019)
            .fetch_roster()
            .await
            .unwrap();
        assert!(empty.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn csv_history_filters_exact_name_and_start_year() {
        let path = write_csv("courtside_provider_history.csv");
        let history = CsvProvider::new(&path)
            .fetch_history("Bruce Thornton", 2022)
            .await
            .unwrap();
        let years: Vec<i32> = history.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2022, 2024]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn csv_missing_file_is_data_error() {
        let err = CsvProvider::new("/definitely/missing.csv")
            .fetch_roster()
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Data(DataError::Io { .. })));
    }
}
