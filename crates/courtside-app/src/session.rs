// Analysis session: fetch a roster snapshot, run the analysis engine on it.
//
// Every call re-fetches from the provider and recomputes; nothing derived
// from a roster is kept between calls. Provider failures are logged and
// turned into empty inputs so callers always get a (possibly empty) result.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use courtside_stats::analysis::averages::{compare_domain, compute_all, AllPositionAverages, DomainComparison};
use courtside_stats::analysis::comparison::{classify, StrengthReport};
use courtside_stats::analysis::progression::{build_progression, ProgressionOutcome};
use courtside_stats::dashboard::{sort_by_name, FilterOptions, RosterFilter};
use courtside_stats::player::PlayerSeasonRecord;
use courtside_stats::position::Position;
use serde::Serialize;
use tracing::{info, warn};

use crate::image::ImageCache;
use crate::provider::RosterProvider;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One roster fetch.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSnapshot {
    pub players: Vec<PlayerSeasonRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// A player's domain comparisons and strength/weakness report.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerAnalysis {
    pub player: PlayerSeasonRecord,
    pub position: Option<Position>,
    /// Shooting, defensive, playmaking, offensive; empty for unknown roles.
    pub domains: Vec<DomainComparison>,
    pub report: StrengthReport,
    pub image_url: Option<String>,
}

/// Filtered, name-sorted roster plus the choices available for filtering.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub players: Vec<PlayerSeasonRecord>,
    pub total: usize,
    pub active_filters: usize,
    pub options: FilterOptions,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct AnalysisSession {
    provider: Arc<dyn RosterProvider>,
    images: ImageCache,
    default_start_year: i32,
}

impl AnalysisSession {
    pub fn new(provider: Arc<dyn RosterProvider>, images: ImageCache, default_start_year: i32) -> Self {
        Self {
            provider,
            images,
            default_start_year,
        }
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Fetch the roster. A provider failure yields an empty snapshot.
    pub async fn snapshot(&self) -> RosterSnapshot {
        let players = match self.provider.fetch_roster().await {
            Ok(players) => players,
            Err(e) => {
                warn!("roster fetch failed, continuing with an empty roster: {}", e);
                Vec::new()
            }
        };
        RosterSnapshot {
            players,
            fetched_at: Utc::now(),
        }
    }

    /// Position averages for all four domains over a fresh snapshot.
    pub async fn position_averages(&self) -> AllPositionAverages {
        let snapshot = self.snapshot().await;
        compute_all(&snapshot.players)
    }

    /// Compare a player with their position averages.
    ///
    /// Uses the player's most recent season in the snapshot. `None` when the
    /// name is not on the roster.
    pub async fn analyze_player(&self, player_name: &str) -> Option<PlayerAnalysis> {
        let snapshot = self.snapshot().await;
        let player = snapshot
            .players
            .iter()
            .filter(|p| p.player_name == player_name)
            .max_by_key(|p| p.year)?
            .clone();
        Some(self.analyze(player, &snapshot.players).await)
    }

    /// Same as [`analyze_player`](Self::analyze_player), keyed by `pid`.
    /// With `year`, only that season matches; otherwise the most recent one.
    pub async fn analyze_pid(&self, pid: i64, year: Option<i32>) -> Option<PlayerAnalysis> {
        let snapshot = self.snapshot().await;
        let player = snapshot
            .players
            .iter()
            .filter(|p| p.pid == pid && year.map_or(true, |y| p.year == y))
            .max_by_key(|p| p.year)?
            .clone();
        Some(self.analyze(player, &snapshot.players).await)
    }

    async fn analyze(&self, player: PlayerSeasonRecord, roster: &[PlayerSeasonRecord]) -> PlayerAnalysis {
        let averages = compute_all(roster);
        let domains = [
            compare_domain(&player, &averages.shooting),
            compare_domain(&player, &averages.defensive),
            compare_domain(&player, &averages.playmaking),
            compare_domain(&player, &averages.offensive),
        ]
        .into_iter()
        .flatten()
        .collect();
        let report = classify(&player, &averages);
        let image_url = self.images.get_or_fetch(&player.player_name).await;

        info!(
            player = %player.player_name,
            pid = player.pid,
            year = player.year,
            strengths = report.strengths.len(),
            weaknesses = report.weaknesses.len(),
            "analyzed player"
        );

        PlayerAnalysis {
            position: player.position(),
            player,
            domains,
            report,
            image_url,
        }
    }

    /// Season-by-season progression from `start_year` (or the configured
    /// default) on. A provider failure reads as no history.
    pub async fn progression(&self, player_name: &str, start_year: Option<i32>) -> ProgressionOutcome {
        let start_year = start_year.unwrap_or(self.default_start_year);
        let history = match self.provider.fetch_history(player_name, start_year).await {
            Ok(history) => history,
            Err(e) => {
                warn!(player = player_name, "history fetch failed: {}", e);
                Vec::new()
            }
        };
        build_progression(&history)
    }

    /// Filtered roster sorted by name.
    pub async fn dashboard(&self, filter: &RosterFilter) -> DashboardView {
        let mut snapshot = self.snapshot().await;
        sort_by_name(&mut snapshot.players);
        let options = FilterOptions::from_roster(&snapshot.players);
        let players: Vec<PlayerSeasonRecord> = filter
            .apply(&snapshot.players)
            .into_iter()
            .cloned()
            .collect();
        DashboardView {
            total: snapshot.players.len(),
            active_filters: filter.active_count(),
            players,
            options,
        }
    }

    /// Cached image URL for a player.
    pub async fn image(&self, player_name: &str) -> Option<String> {
        self.images.get_or_fetch(player_name).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
