// Multi-season progression tables with year-over-year trend detection.
//
// Seasons are ordered chronologically, the displayed metric set is picked from
// the most recent season's position, and every metric in every season after
// the first gets a trend against the season before it.

use crate::player::{PlayerSeasonRecord, Polarity, StatField};
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Relative change below which a season-over-season move is not a trend.
pub const TREND_THRESHOLD: f64 = 0.02;

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Improvement,
    Decline,
    Neutral,
}

impl Trend {
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Improvement => "↑",
            Trend::Decline => "↓",
            Trend::Neutral => "-",
        }
    }
}

/// Classify the move from `previous` to `current`.
///
/// Neutral when there is no previous season, when `previous` is exactly 0
/// (the relative change is undefined), or when `|current - previous| / previous`
/// is under [`TREND_THRESHOLD`]. Note the ratio is signed by `previous`, so a
/// negative previous value (BPM can be negative) always reads as Neutral.
pub fn trend(current: f64, previous: Option<f64>, polarity: Polarity) -> Trend {
    let Some(previous) = previous else {
        return Trend::Neutral;
    };
    if previous == 0.0 {
        return Trend::Neutral;
    }
    let relative = (current - previous).abs() / previous;
    if relative < TREND_THRESHOLD {
        return Trend::Neutral;
    }
    let improved = match polarity {
        Polarity::HigherIsBetter => current > previous,
        Polarity::LowerIsBetter => current < previous,
    };
    if improved {
        Trend::Improvement
    } else {
        Trend::Decline
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A column of the progression table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendMetric {
    MinutesPct,
    PointsPerGame,
    TrueShooting,
    EffectiveFg,
    ThreePoint,
    TwoPoint,
    FreeThrow,
    AssistRate,
    TurnoverRate,
    AssistToTurnover,
    StealRate,
    BlockRate,
    OffensiveRebound,
    DefensiveRebound,
    FreeThrowRate,
    BoxPlusMinus,
    Usage,
}

impl TrendMetric {
    pub fn label(&self) -> &'static str {
        match self {
            TrendMetric::MinutesPct => "Min%",
            TrendMetric::PointsPerGame => "PPG",
            TrendMetric::TrueShooting => "TS%",
            TrendMetric::EffectiveFg => "eFG%",
            TrendMetric::ThreePoint => "3P%",
            TrendMetric::TwoPoint => "2P%",
            TrendMetric::FreeThrow => "FT%",
            TrendMetric::AssistRate => "AST%",
            TrendMetric::TurnoverRate => "TO%",
            TrendMetric::AssistToTurnover => "AST/TO",
            TrendMetric::StealRate => "STL%",
            TrendMetric::BlockRate => "BLK%",
            TrendMetric::OffensiveRebound => "ORB%",
            TrendMetric::DefensiveRebound => "DRB%",
            TrendMetric::FreeThrowRate => "FTr",
            TrendMetric::BoxPlusMinus => "BPM",
            TrendMetric::Usage => "USG%",
        }
    }

    /// Underlying record field. Points per game is read from `pts`.
    pub fn field(&self) -> StatField {
        match self {
            TrendMetric::MinutesPct => StatField::MinPer,
            TrendMetric::PointsPerGame => StatField::Pts,
            TrendMetric::TrueShooting => StatField::TsPer,
            TrendMetric::EffectiveFg => StatField::Efg,
            TrendMetric::ThreePoint => StatField::TpPer,
            TrendMetric::TwoPoint => StatField::TwoPPer,
            TrendMetric::FreeThrow => StatField::FtPer,
            TrendMetric::AssistRate => StatField::AstPer,
            TrendMetric::TurnoverRate => StatField::ToPer,
            TrendMetric::AssistToTurnover => StatField::AstTov,
            TrendMetric::StealRate => StatField::StlPer,
            TrendMetric::BlockRate => StatField::BlkPer,
            TrendMetric::OffensiveRebound => StatField::OrbPer,
            TrendMetric::DefensiveRebound => StatField::DrbPer,
            TrendMetric::FreeThrowRate => StatField::Ftr,
            TrendMetric::BoxPlusMinus => StatField::Bpm,
            TrendMetric::Usage => StatField::Usg,
        }
    }

    /// Only turnover rate improves by going down.
    pub fn polarity(&self) -> Polarity {
        match self {
            TrendMetric::TurnoverRate => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }

    /// Value shown in the table.
    pub fn value(&self, season: &PlayerSeasonRecord) -> f64 {
        self.field().value(season)
    }

    /// Value compared between seasons. PPG trends on `pts / GP`; every other
    /// metric trends on its displayed value.
    pub fn trend_value(&self, season: &PlayerSeasonRecord) -> f64 {
        match self {
            TrendMetric::PointsPerGame if season.games == 0 => 0.0,
            TrendMetric::PointsPerGame => season.pts / f64::from(season.games),
            _ => self.value(season),
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            // Stored 0-100.
            TrendMetric::TrueShooting | TrendMetric::EffectiveFg => fraction_pct(value / 100.0),
            // Stored 0-1.
            TrendMetric::ThreePoint | TrendMetric::TwoPoint | TrendMetric::FreeThrow => {
                fraction_pct(value)
            }
            TrendMetric::AssistRate
            | TrendMetric::TurnoverRate
            | TrendMetric::StealRate
            | TrendMetric::BlockRate
            | TrendMetric::OffensiveRebound
            | TrendMetric::DefensiveRebound
            | TrendMetric::Usage => format!("{value:.1}%"),
            TrendMetric::MinutesPct
            | TrendMetric::PointsPerGame
            | TrendMetric::AssistToTurnover
            | TrendMetric::FreeThrowRate
            | TrendMetric::BoxPlusMinus => format!("{value:.1}"),
        }
    }
}

fn fraction_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Columns shown for a position. Guards lean on playmaking, forwards on a
/// two-way mix, centers on interior play; an unknown position gets a
/// generic set.
pub fn metrics_for(position: Option<Position>) -> Vec<TrendMetric> {
    use TrendMetric::*;

    let specific: &[TrendMetric] = match position {
        Some(Position::Guard) => &[
            TrueShooting,
            ThreePoint,
            FreeThrow,
            AssistRate,
            TurnoverRate,
            AssistToTurnover,
            StealRate,
        ],
        Some(Position::Forward) => &[
            EffectiveFg,
            ThreePoint,
            TwoPoint,
            OffensiveRebound,
            DefensiveRebound,
            StealRate,
            BlockRate,
        ],
        Some(Position::Center) => &[
            EffectiveFg,
            TwoPoint,
            FreeThrow,
            FreeThrowRate,
            OffensiveRebound,
            DefensiveRebound,
            BlockRate,
        ],
        None => &[EffectiveFg, ThreePoint, FreeThrow, AssistRate, TurnoverRate],
    };

    let mut metrics = vec![MinutesPct, PointsPerGame];
    metrics.extend_from_slice(specific);
    metrics.extend_from_slice(&[BoxPlusMinus, Usage]);
    metrics
}

// ---------------------------------------------------------------------------
// Progression table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCell {
    pub metric: TrendMetric,
    pub value: f64,
    pub display: String,
    pub trend: Trend,
}

/// One season's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRow {
    pub year: i32,
    /// Academic-year label, e.g. "2023-24" for the 2024 season.
    pub season_label: String,
    pub team: String,
    pub games: u32,
    pub cells: Vec<MetricCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Position of the most recent season, if it classifies.
    pub position: Option<Position>,
    pub metrics: Vec<TrendMetric>,
    /// Oldest season first.
    pub rows: Vec<SeasonRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressionOutcome {
    NoHistoricalData,
    Available(Progression),
}

/// "2023-24" for 2024.
pub fn season_label(year: i32) -> String {
    format!("{}-{:02}", year - 1, year.rem_euclid(100))
}

/// Seasons in ascending year order. Stable, so equal years keep input order.
pub fn order_seasons(seasons: &[PlayerSeasonRecord]) -> Vec<&PlayerSeasonRecord> {
    let mut ordered: Vec<&PlayerSeasonRecord> = seasons.iter().collect();
    ordered.sort_by_key(|s| s.year);
    ordered
}

/// Build the progression table for one player's season history.
pub fn build_progression(seasons: &[PlayerSeasonRecord]) -> ProgressionOutcome {
    let ordered = order_seasons(seasons);
    let Some(latest) = ordered.last() else {
        return ProgressionOutcome::NoHistoricalData;
    };

    let position = latest.position();
    let metrics = metrics_for(position);

    let rows = ordered
        .iter()
        .enumerate()
        .map(|(idx, season)| {
            let previous = idx.checked_sub(1).map(|i| ordered[i]);
            let cells = metrics
                .iter()
                .map(|&metric| {
                    let value = metric.value(season);
                    MetricCell {
                        metric,
                        value,
                        display: metric.format(value),
                        trend: trend(
                            metric.trend_value(season),
                            previous.map(|p| metric.trend_value(p)),
                            metric.polarity(),
                        ),
                    }
                })
                .collect();
            SeasonRow {
                year: season.year,
                season_label: season_label(season.year),
                team: season.team.clone(),
                games: season.games,
                cells,
            }
        })
        .collect();

    ProgressionOutcome::Available(Progression {
        position,
        metrics,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
