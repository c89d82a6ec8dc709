// Roster browsing helpers: filtering, filter options, ordering, leaderboards,
// and height parsing.

use crate::player::{PlayerSeasonRecord, Polarity, StatField};
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Height used when a height string is missing or unreadable (6'0").
pub const DEFAULT_HEIGHT_INCHES: u32 = 72;

// ---------------------------------------------------------------------------
// Player type
// ---------------------------------------------------------------------------

/// Playing-time tier derived from minutes percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// Min% >= 25.
    Starter,
    /// 5 <= Min% < 25.
    Bench,
    /// Min% < 5.
    Limited,
}

impl PlayerType {
    pub fn of(min_per: f64) -> Self {
        if min_per >= 25.0 {
            PlayerType::Starter
        } else if min_per >= 5.0 {
            PlayerType::Bench
        } else {
            PlayerType::Limited
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerType::Starter => "Starters (25+ min)",
            PlayerType::Bench => "Bench (5-25 min)",
            PlayerType::Limited => "Limited Role (<5 min)",
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayerType::Starter => "starter",
            PlayerType::Bench => "bench",
            PlayerType::Limited => "limited",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starter" => Ok(PlayerType::Starter),
            "bench" => Ok(PlayerType::Bench),
            "limited" => Ok(PlayerType::Limited),
            other => Err(format!("unknown player type '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        StatRange { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const DEFAULT_PPG_RANGE: StatRange = StatRange::new(0.0, 30.0);
pub const DEFAULT_EFG_RANGE: StatRange = StatRange::new(0.0, 80.0);
pub const DEFAULT_BPM_RANGE: StatRange = StatRange::new(-20.0, 20.0);
/// 5'8" to 7'2".
pub const DEFAULT_HEIGHT_RANGE: StatRange = StatRange::new(68.0, 86.0);

/// Roster filter criteria. `None` and default ranges mean "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterFilter {
    /// Case-insensitive substring of "name team conf".
    pub search: String,
    pub position: Option<Position>,
    pub conference: Option<String>,
    pub team: Option<String>,
    pub class_year: Option<String>,
    pub player_type: Option<PlayerType>,
    pub ppg: StatRange,
    pub efg: StatRange,
    pub bpm: StatRange,
    pub height: StatRange,
}

impl Default for RosterFilter {
    fn default() -> Self {
        RosterFilter {
            search: String::new(),
            position: None,
            conference: None,
            team: None,
            class_year: None,
            player_type: None,
            ppg: DEFAULT_PPG_RANGE,
            efg: DEFAULT_EFG_RANGE,
            bpm: DEFAULT_BPM_RANGE,
            height: DEFAULT_HEIGHT_RANGE,
        }
    }
}

impl RosterFilter {
    /// Number of active criteria, not counting the search text.
    pub fn active_count(&self) -> usize {
        [
            self.position.is_some(),
            self.conference.is_some(),
            self.team.is_some(),
            self.class_year.is_some(),
            self.player_type.is_some(),
            self.ppg != DEFAULT_PPG_RANGE,
            self.efg != DEFAULT_EFG_RANGE,
            self.bpm != DEFAULT_BPM_RANGE,
            self.height != DEFAULT_HEIGHT_RANGE,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn matches(&self, player: &PlayerSeasonRecord) -> bool {
        if !self.search.is_empty() {
            let haystack =
                format!("{} {} {}", player.player_name, player.team, player.conf).to_lowercase();
            if !haystack.contains(&self.search.to_lowercase()) {
                return false;
            }
        }
        if let Some(pos) = self.position {
            if player.position() != Some(pos) {
                return false;
            }
        }
        if self.conference.as_ref().is_some_and(|c| *c != player.conf) {
            return false;
        }
        if self.team.as_ref().is_some_and(|t| *t != player.team) {
            return false;
        }
        if self.class_year.as_ref().is_some_and(|y| *y != player.class_year) {
            return false;
        }
        if self
            .player_type
            .is_some_and(|t| PlayerType::of(player.min_per) != t)
        {
            return false;
        }

        // Ranges at their default are not applied.
        if self.ppg != DEFAULT_PPG_RANGE && !self.ppg.contains(player.pts) {
            return false;
        }
        if self.efg != DEFAULT_EFG_RANGE && !self.efg.contains(player.efg) {
            return false;
        }
        if self.bpm != DEFAULT_BPM_RANGE && !self.bpm.contains(player.bpm) {
            return false;
        }
        if self.height != DEFAULT_HEIGHT_RANGE
            && !self.height.contains(f64::from(height_to_inches(&player.height)))
        {
            return false;
        }
        true
    }

    /// Players matching every criterion, in input order.
    pub fn apply<'a>(&self, players: &'a [PlayerSeasonRecord]) -> Vec<&'a PlayerSeasonRecord> {
        players.iter().filter(|p| self.matches(p)).collect()
    }
}

// ---------------------------------------------------------------------------
// Filter options
// ---------------------------------------------------------------------------

/// Distinct values present in a roster, sorted, for building filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub conferences: Vec<String>,
    pub teams: Vec<String>,
    pub class_years: Vec<String>,
}

impl FilterOptions {
    pub fn from_roster(players: &[PlayerSeasonRecord]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
            values.collect::<BTreeSet<_>>().into_iter().cloned().collect()
        }
        FilterOptions {
            conferences: distinct(players.iter().map(|p| &p.conf)),
            teams: distinct(players.iter().map(|p| &p.team)),
            class_years: distinct(players.iter().map(|p| &p.class_year)),
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort ascending by player name (stable).
pub fn sort_by_name(players: &mut [PlayerSeasonRecord]) {
    players.sort_by(|a, b| a.player_name.cmp(&b.player_name));
}

/// Top `limit` players by `field`, best first according to the field's
/// polarity. Ties keep input order.
pub fn leaderboard<'a>(
    players: &'a [PlayerSeasonRecord],
    field: StatField,
    limit: usize,
) -> Vec<&'a PlayerSeasonRecord> {
    let mut ranked: Vec<&PlayerSeasonRecord> = players.iter().collect();
    ranked.sort_by(|a, b| {
        let (va, vb) = (field.value(a), field.value(b));
        match field.polarity() {
            Polarity::HigherIsBetter => vb.total_cmp(&va),
            Polarity::LowerIsBetter => va.total_cmp(&vb),
        }
    });
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------------
// Height
// ---------------------------------------------------------------------------

/// Parse a height string into inches.
///
/// Accepts `6'5"`, `6'5`, `6’5`, `6-5`, `6 5` and `6.5` (the part after the
/// dot is inches). A lone number is feet. Empty, "N/A" and strings with no
/// digits fall back to [`DEFAULT_HEIGHT_INCHES`].
pub fn height_to_inches(height: &str) -> u32 {
    let height = height.trim();
    if height.is_empty() || height == "N/A" {
        return DEFAULT_HEIGHT_INCHES;
    }

    let Some(start) = height.find(|c: char| c.is_ascii_digit()) else {
        return DEFAULT_HEIGHT_INCHES;
    };
    let rest = &height[start..];
    let (feet, rest) = split_number(rest);
    let Some(feet) = feet else {
        return DEFAULT_HEIGHT_INCHES;
    };

    let mut chars = rest.chars();
    let after_sep = match chars.next() {
        Some('\'' | '’' | '-' | '.') => Some(chars.as_str()),
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        _ => None,
    };
    let inches = after_sep.and_then(|s| split_number(s).0).unwrap_or(0);

    feet.checked_mul(12)
        .and_then(|f| f.checked_add(inches))
        .unwrap_or(DEFAULT_HEIGHT_INCHES)
}

/// Leading run of ASCII digits parsed as a number, and what follows it.
fn split_number(s: &str) -> (Option<u32>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (s[..end].parse().ok(), &s[end..])
}

/// Format inches as feet and inches, e.g. 77 -> `6'5"`.
pub fn format_height(inches: u32) -> String {
    format!("{}'{}\"", inches / 12, inches % 12)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, team: &str, conf: &str, role: &str) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            player_name: name.into(),
            team: team.into(),
            conf: conf.into(),
            role: role.into(),
            class_year: "Jr".into(),
            height: "6'5\"".into(),
            min_per: 30.0,
            pts: 12.0,
            efg: 50.0,
            ..Default::default()
        }
    }

    fn roster() -> Vec<PlayerSeasonRecord> {
        let mut bench = player("Ben Chen", "Duke", "ACC", "Wing F");
        bench.min_per = 12.0;
        bench.class_year = "Fr".into();
        bench.height = "6-9".into();
        let mut big = player("Carl Ortiz", "Kansas", "B12", "C");
        big.min_per = 3.0;
        big.pts = 2.0;
        big.height = "7'1\"".into();
        vec![player("Andre Brooks", "Duke", "ACC", "Pure PG"), bench, big]
    }

    fn names(players: &[&PlayerSeasonRecord]) -> Vec<String> {
        players.iter().map(|p| p.player_name.clone()).collect()
    }

    #[test]
    fn default_filter_keeps_everyone() {
        let players = roster();
        let filter = RosterFilter::default();
        assert_eq!(filter.active_count(), 0);
        assert_eq!(filter.apply(&players).len(), players.len());
    }

    #[test]
    fn search_is_case_insensitive_over_name_team_conf() {
        let players = roster();
        let mut filter = RosterFilter {
            search: "DUKE".into(),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&players)), vec!["Andre Brooks", "Ben Chen"]);

        filter.search = "b12".into();
        assert_eq!(names(&filter.apply(&players)), vec!["Carl Ortiz"]);
        // Search text is not counted as an active filter.
        assert_eq!(filter.active_count(), 0);
    }

    #[test]
    fn dropdown_criteria_narrow() {
        let players = roster();
        let filter = RosterFilter {
            position: Some(Position::Forward),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&players)), vec!["Ben Chen"]);

        let filter = RosterFilter {
            conference: Some("ACC".into()),
            class_year: Some("Jr".into()),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&players)), vec!["Andre Brooks"]);
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn player_type_tiers() {
        assert_eq!(PlayerType::of(25.0), PlayerType::Starter);
        assert_eq!(PlayerType::of(24.9), PlayerType::Bench);
        assert_eq!(PlayerType::of(5.0), PlayerType::Bench);
        assert_eq!(PlayerType::of(4.9), PlayerType::Limited);

        let players = roster();
        let filter = RosterFilter {
            player_type: Some(PlayerType::Limited),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&players)), vec!["Carl Ortiz"]);
        assert_eq!("bench".parse::<PlayerType>(), Ok(PlayerType::Bench));
    }

    #[test]
    fn ranges_apply_only_when_changed() {
        let mut players = roster();
        // Outside the default PPG range, still kept while the range is default.
        players[0].pts = 35.0;
        let filter = RosterFilter::default();
        assert_eq!(filter.apply(&players).len(), 3);

        let filter = RosterFilter {
            ppg: StatRange::new(10.0, 40.0),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(&players)), vec!["Andre Brooks", "Ben Chen"]);
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn height_range_uses_parsed_inches() {
        let players = roster();
        let filter = RosterFilter {
            height: StatRange::new(80.0, 90.0),
            ..Default::default()
        };
        // 6'5" = 77, 6-9 = 81, 7'1" = 85.
        assert_eq!(names(&filter.apply(&players)), vec!["Ben Chen", "Carl Ortiz"]);
    }

    #[test]
    fn filter_options_are_distinct_and_sorted() {
        let options = FilterOptions::from_roster(&roster());
        assert_eq!(options.conferences, vec!["ACC", "B12"]);
        assert_eq!(options.teams, vec!["Duke", "Kansas"]);
        assert_eq!(options.class_years, vec!["Fr", "Jr"]);
    }

    #[test]
    fn sorts_by_name() {
        let mut players = roster();
        players.reverse();
        sort_by_name(&mut players);
        let sorted: Vec<&str> = players.iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(sorted, vec!["Andre Brooks", "Ben Chen", "Carl Ortiz"]);
    }

    #[test]
    fn leaderboard_honors_polarity() {
        let mut players = roster();
        players[0].to_per = 18.0;
        players[1].to_per = 9.0;
        players[2].to_per = 14.0;

        let fewest_turnovers = leaderboard(&players, StatField::ToPer, 2);
        assert_eq!(names(&fewest_turnovers), vec!["Ben Chen", "Carl Ortiz"]);

        let scorers = leaderboard(&players, StatField::Pts, 10);
        assert_eq!(scorers.len(), 3);
        assert_eq!(scorers[2].player_name, "Carl Ortiz");
    }

    #[test]
    fn heights_parse_across_formats() {
        assert_eq!(height_to_inches("6'5\""), 77);
        assert_eq!(height_to_inches("6'5"), 77);
        assert_eq!(height_to_inches("6’5"), 77);
        assert_eq!(height_to_inches("6-5"), 77);
        assert_eq!(height_to_inches("6 5"), 77);
        assert_eq!(height_to_inches("6.5"), 77);
        assert_eq!(height_to_inches("7'0\""), 84);
        assert_eq!(height_to_inches("6"), 72);
        assert_eq!(height_to_inches("7"), 84);
    }

    #[test]
    fn unreadable_heights_fall_back() {
        assert_eq!(height_to_inches(""), DEFAULT_HEIGHT_INCHES);
        assert_eq!(height_to_inches("N/A"), DEFAULT_HEIGHT_INCHES);
        assert_eq!(height_to_inches("tall"), DEFAULT_HEIGHT_INCHES);
    }

    #[test]
    fn formats_height() {
        assert_eq!(format_height(77), "6'5\"");
        assert_eq!(format_height(84), "7'0\"");
    }
}
