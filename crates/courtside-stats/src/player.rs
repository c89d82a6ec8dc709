// Per-season player statistics and dataset loading.
//
// Records arrive either as JSON from the stats backend or as a local CSV
// export. Both use the source's column names (GP, Min_per, TS_per, ...).
// Missing or null numeric values become 0, matching how the dashboard
// consumed the dataset.

use crate::position::Position;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One player's statistics for one season.
///
/// `pid` is not stable across seasons in the source data; `(pid, year)` is
/// the real key. Percentage scales differ by field and are kept as delivered:
/// `eFG` and `TS_per` are 0-100, `TP_per`, `twoP_per` and `FT_per` are 0-1
/// fractions, the rate stats (`stl_per`, `AST_per`, ...) are 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonRecord {
    #[serde(default, deserialize_with = "whole_or_zero")]
    pub pid: i64,
    pub player_name: String,
    #[serde(default, deserialize_with = "whole_or_zero")]
    pub year: i32,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub team: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub conf: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub role: String,
    #[serde(rename = "yr", default, deserialize_with = "empty_if_null")]
    pub class_year: String,
    #[serde(rename = "ht", default, deserialize_with = "empty_if_null")]
    pub height: String,

    #[serde(rename = "GP", default, deserialize_with = "whole_or_zero")]
    pub games: u32,
    #[serde(rename = "Min_per", default, deserialize_with = "zero_if_null")]
    pub min_per: f64,

    // Shooting
    #[serde(rename = "eFG", default, deserialize_with = "zero_if_null")]
    pub efg: f64,
    #[serde(rename = "TS_per", default, deserialize_with = "zero_if_null")]
    pub ts_per: f64,
    #[serde(rename = "TP_per", default, deserialize_with = "zero_if_null")]
    pub tp_per: f64,
    #[serde(rename = "twoP_per", default, deserialize_with = "zero_if_null")]
    pub two_p_per: f64,
    #[serde(rename = "FT_per", default, deserialize_with = "zero_if_null")]
    pub ft_per: f64,

    // Defense
    #[serde(default, deserialize_with = "zero_if_null")]
    pub stl_per: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub blk_per: f64,
    #[serde(rename = "DRB_per", default, deserialize_with = "zero_if_null")]
    pub drb_per: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub drtg: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub dbpm: f64,

    // Playmaking
    #[serde(rename = "AST_per", default, deserialize_with = "zero_if_null")]
    pub ast_per: f64,
    #[serde(rename = "TO_per", default, deserialize_with = "zero_if_null")]
    pub to_per: f64,
    #[serde(rename = "astTov", default, deserialize_with = "zero_if_null")]
    pub ast_tov: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub usg: f64,

    // Offense
    #[serde(rename = "ORtg", default, deserialize_with = "zero_if_null")]
    pub ortg: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub bpm: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub pts: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ftr: f64,
    #[serde(rename = "ORB_per", default, deserialize_with = "zero_if_null")]
    pub orb_per: f64,

    // Per-game counting stats
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ast: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub treb: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub stl: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub blk: f64,
}

impl PlayerSeasonRecord {
    /// Coarse position derived from `role`, if the role is known.
    pub fn position(&self) -> Option<Position> {
        Position::from_role(&self.role)
    }
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Integer column that may arrive as null, empty, or a float like `30.0`.
/// Fractional or out-of-range values reject the record.
fn whole_or_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(T::default());
    };
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(D::Error::custom(format!("expected a whole number, got {value}")));
    }
    T::try_from(value as i64)
        .map_err(|_| D::Error::custom(format!("{value} is out of range")))
}

fn empty_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Stat fields
// ---------------------------------------------------------------------------

/// Whether a larger value of a metric is better or worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

/// A numeric field of [`PlayerSeasonRecord`], addressable by name.
///
/// Averagers, the comparator and the leaderboard all read record values
/// through this enum so a field's name, scale and polarity live in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    MinPer,
    Efg,
    TsPer,
    TpPer,
    TwoPPer,
    FtPer,
    StlPer,
    BlkPer,
    DrbPer,
    Drtg,
    Dbpm,
    AstPer,
    ToPer,
    AstTov,
    Usg,
    Ortg,
    Bpm,
    Pts,
    Ftr,
    OrbPer,
    Ast,
    Treb,
    Stl,
    Blk,
}

impl StatField {
    pub const ALL: [StatField; 24] = [
        StatField::MinPer,
        StatField::Efg,
        StatField::TsPer,
        StatField::TpPer,
        StatField::TwoPPer,
        StatField::FtPer,
        StatField::StlPer,
        StatField::BlkPer,
        StatField::DrbPer,
        StatField::Drtg,
        StatField::Dbpm,
        StatField::AstPer,
        StatField::ToPer,
        StatField::AstTov,
        StatField::Usg,
        StatField::Ortg,
        StatField::Bpm,
        StatField::Pts,
        StatField::Ftr,
        StatField::OrbPer,
        StatField::Ast,
        StatField::Treb,
        StatField::Stl,
        StatField::Blk,
    ];

    /// Read this field from a record.
    pub fn value(&self, record: &PlayerSeasonRecord) -> f64 {
        match self {
            StatField::MinPer => record.min_per,
            StatField::Efg => record.efg,
            StatField::TsPer => record.ts_per,
            StatField::TpPer => record.tp_per,
            StatField::TwoPPer => record.two_p_per,
            StatField::FtPer => record.ft_per,
            StatField::StlPer => record.stl_per,
            StatField::BlkPer => record.blk_per,
            StatField::DrbPer => record.drb_per,
            StatField::Drtg => record.drtg,
            StatField::Dbpm => record.dbpm,
            StatField::AstPer => record.ast_per,
            StatField::ToPer => record.to_per,
            StatField::AstTov => record.ast_tov,
            StatField::Usg => record.usg,
            StatField::Ortg => record.ortg,
            StatField::Bpm => record.bpm,
            StatField::Pts => record.pts,
            StatField::Ftr => record.ftr,
            StatField::OrbPer => record.orb_per,
            StatField::Ast => record.ast,
            StatField::Treb => record.treb,
            StatField::Stl => record.stl,
            StatField::Blk => record.blk,
        }
    }

    /// Column name in the source dataset.
    pub fn column(&self) -> &'static str {
        match self {
            StatField::MinPer => "Min_per",
            StatField::Efg => "eFG",
            StatField::TsPer => "TS_per",
            StatField::TpPer => "TP_per",
            StatField::TwoPPer => "twoP_per",
            StatField::FtPer => "FT_per",
            StatField::StlPer => "stl_per",
            StatField::BlkPer => "blk_per",
            StatField::DrbPer => "DRB_per",
            StatField::Drtg => "drtg",
            StatField::Dbpm => "dbpm",
            StatField::AstPer => "AST_per",
            StatField::ToPer => "TO_per",
            StatField::AstTov => "astTov",
            StatField::Usg => "usg",
            StatField::Ortg => "ORtg",
            StatField::Bpm => "bpm",
            StatField::Pts => "pts",
            StatField::Ftr => "ftr",
            StatField::OrbPer => "ORB_per",
            StatField::Ast => "ast",
            StatField::Treb => "treb",
            StatField::Stl => "stl",
            StatField::Blk => "blk",
        }
    }

    /// Look up a field by its source column name (exact match).
    pub fn from_column(name: &str) -> Option<Self> {
        StatField::ALL.into_iter().find(|f| f.column() == name)
    }

    /// Turnover rate and defensive rating are the only fields where a smaller
    /// number is the better one.
    pub fn polarity(&self) -> Polarity {
        match self {
            StatField::ToPer | StatField::Drtg => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }
}

impl std::str::FromStr for StatField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatField::from_column(s).ok_or_else(|| format!("unknown stat column '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid JSON roster: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Trim the name and drop the record if nothing is left.
fn accept_record(idx: usize, mut record: PlayerSeasonRecord) -> Option<PlayerSeasonRecord> {
    record.player_name = record.player_name.trim().to_string();
    if record.player_name.is_empty() {
        warn!("skipping roster row {}: missing player_name", idx + 1);
        return None;
    }
    Some(record)
}

/// Read season records from CSV. Rows that fail to deserialize or have no
/// player name are skipped with a warning.
pub fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerSeasonRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for (idx, result) in reader.deserialize::<PlayerSeasonRecord>().enumerate() {
        match result {
            Ok(record) => players.extend(accept_record(idx, record)),
            Err(e) => {
                warn!("skipping malformed roster row {}: {}", idx + 1, e);
            }
        }
    }
    Ok(players)
}

/// Decode already-parsed JSON records one at a time. A record that does not
/// fit is skipped with a warning instead of failing the batch.
pub fn records_from_json_values(values: Vec<serde_json::Value>) -> Vec<PlayerSeasonRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match PlayerSeasonRecord::deserialize(value) {
            Ok(record) => accept_record(idx, record),
            Err(e) => {
                warn!("skipping malformed roster record {}: {}", idx + 1, e);
                None
            }
        })
        .collect()
}

/// Load season records from a CSV file.
pub fn load_roster_csv(path: &Path) -> Result<Vec<PlayerSeasonRecord>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_roster_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse a JSON array of season records. Only a body that is not a JSON
/// array is an error; individual bad records are skipped.
pub fn parse_records_json(text: &str) -> Result<Vec<PlayerSeasonRecord>, DataError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text)?;
    Ok(records_from_json_values(values))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_parse_with_source_column_names() {
        let csv_data = "\
pid,player_name,year,team,conf,role,yr,ht,GP,Min_per,eFG,TS_per,TP_per,twoP_per,FT_per,ORtg,usg,drtg,TO_per,AST_per
101,Bruce Thornton,2024,Ohio St.,B10,Combo G,So,6'2,33,85.1,52.3,56.0,0.376,0.512,0.801,115.2,22.4,104.1,14.2,21.5";

        let players = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.pid, 101);
        assert_eq!(p.player_name, "Bruce Thornton");
        assert_eq!(p.class_year, "So");
        assert_eq!(p.height, "6'2");
        assert_eq!(p.games, 33);
        assert!((p.tp_per - 0.376).abs() < f64::EPSILON);
        assert!((p.efg - 52.3).abs() < f64::EPSILON);
        assert_eq!(p.position(), Some(Position::Guard));
        // Columns absent from the file default to zero.
        assert_eq!(p.bpm, 0.0);
        assert_eq!(p.blk, 0.0);
    }

    #[test]
    fn csv_empty_numeric_cell_is_zero() {
        let csv_data = "\
player_name,role,TP_per,FT_per
Empty Shooter,C,,0.55";

        let players = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players[0].tp_per, 0.0);
        assert!((players[0].ft_per - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn csv_malformed_and_nameless_rows_are_skipped() {
        let csv_data = "\
player_name,role,GP
Good Player,C,30
Bad Games,C,lots
,C,12";

        let players = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player_name, "Good Player");
    }

    #[test]
    fn json_nulls_become_defaults() {
        let json = r#"[{
            "pid": 7, "player_name": "Null Stats", "year": 2023,
            "team": null, "role": "Wing F", "GP": 12,
            "eFG": null, "bpm": -2.5, "astTov": 1.4
        }]"#;

        let players = parse_records_json(json).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].team, "");
        assert_eq!(players[0].efg, 0.0);
        assert_eq!(players[0].bpm, -2.5);
        assert!((players[0].ast_tov - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn json_games_tolerate_null_and_whole_floats() {
        let json = r#"[
            {"player_name": "Null Games", "role": "C", "GP": null},
            {"player_name": "Int Games", "role": "C", "GP": 30},
            {"player_name": "Float Games", "role": "C", "GP": 30.0, "year": 2024.0, "pid": null}
        ]"#;

        let players = parse_records_json(json).unwrap();
        let games: Vec<u32> = players.iter().map(|p| p.games).collect();
        assert_eq!(games, vec![0, 30, 30]);
        assert_eq!(players[2].year, 2024);
        assert_eq!(players[2].pid, 0);
    }

    #[test]
    fn json_bad_record_is_skipped_not_fatal() {
        let json = r#"[
            {"player_name": "Half Game", "GP": 12.5},
            {"GP": 10},
            {"player_name": "Negative", "GP": -3},
            {"player_name": "Kept", "GP": 20}
        ]"#;

        let players = parse_records_json(json).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player_name, "Kept");
        assert!(parse_records_json(r#"{"players": []}"#).is_err());
    }

    #[test]
    fn csv_empty_games_cell_keeps_the_row() {
        let csv_data = "\
player_name,role,GP,TP_per
A,C,,0.3
B,C,31.0,0.4";

        let players = load_roster_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].games, 0);
        assert_eq!(players[1].games, 31);
    }

    #[test]
    fn json_serializes_back_to_source_names() {
        let record = PlayerSeasonRecord {
            player_name: "X".into(),
            tp_per: 0.4,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["TP_per"], 0.4);
        assert!(value.get("tp_per").is_none());
        assert_eq!(value["yr"], "");
    }

    #[test]
    fn stat_field_columns_are_unique_and_resolvable() {
        for field in StatField::ALL {
            assert_eq!(StatField::from_column(field.column()), Some(field));
        }
        assert_eq!("ORtg".parse::<StatField>().unwrap(), StatField::Ortg);
        assert!("ortg".parse::<StatField>().is_err());
    }

    #[test]
    fn only_turnovers_and_drtg_are_lower_is_better() {
        let lower: Vec<StatField> = StatField::ALL
            .into_iter()
            .filter(|f| f.polarity() == Polarity::LowerIsBetter)
            .collect();
        assert_eq!(lower, vec![StatField::Drtg, StatField::ToPer]);
    }

    #[test]
    fn field_value_reads_the_matching_member() {
        let record = PlayerSeasonRecord {
            drtg: 98.5,
            orb_per: 7.25,
            ..Default::default()
        };
        assert_eq!(StatField::Drtg.value(&record), 98.5);
        assert_eq!(StatField::OrbPer.value(&record), 7.25);
        assert_eq!(StatField::Usg.value(&record), 0.0);
    }

    #[test]
    fn missing_csv_file_is_io_error() {
        let err = load_roster_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
