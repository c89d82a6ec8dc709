// End-to-end tests over the fixture roster: load, group, average, classify,
// build progression, and browse.

use std::path::Path;

use courtside_stats::analysis::averages::{compute_all, compare_domain};
use courtside_stats::analysis::comparison::{classify, FindingPolarity};
use courtside_stats::analysis::progression::{build_progression, ProgressionOutcome, Trend, TrendMetric};
use courtside_stats::analysis::roster::group;
use courtside_stats::dashboard::{leaderboard, FilterOptions, RosterFilter};
use courtside_stats::player::{load_roster_csv, PlayerSeasonRecord, StatField};
use courtside_stats::position::Position;

const FIXTURES: &str = "tests/fixtures";

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn fixture_roster() -> Vec<PlayerSeasonRecord> {
    load_roster_csv(&Path::new(FIXTURES).join("roster.csv")).expect("fixture roster loads")
}

fn season(players: &[PlayerSeasonRecord], year: i32) -> Vec<PlayerSeasonRecord> {
    players.iter().filter(|p| p.year == year).cloned().collect()
}

fn find<'a>(players: &'a [PlayerSeasonRecord], name: &str) -> &'a PlayerSeasonRecord {
    players
        .iter()
        .find(|p| p.player_name == name)
        .expect("player present")
}

#[test]
fn fixture_loads_every_row() {
    let roster = fixture_roster();
    assert_eq!(roster.len(), 10);
    assert_eq!(season(&roster, 2024).len(), 8);
}

#[test]
fn unknown_roles_are_excluded_from_groups() {
    let current = season(&fixture_roster(), 2024);
    let groups = group(&current);
    assert_eq!(groups[Position::Guard].len(), 3);
    assert_eq!(groups[Position::Forward].len(), 2);
    assert_eq!(groups[Position::Center].len(), 2);
}

#[test]
fn guard_averages_are_arithmetic_means() {
    let current = season(&fixture_roster(), 2024);
    let averages = compute_all(&current);
    let guard = &averages.shooting[Position::Guard];
    assert!(approx_eq(guard.tp_per, 0.35));
    assert!(approx_eq(averages.playmaking[Position::Guard].to_per, 15.0));
    assert!(approx_eq(averages.offensive[Position::Guard].ortg, 110.0));
    assert!(approx_eq(averages.defensive[Position::Center].drtg, 101.0));
}

#[test]
fn guard_strengths_against_current_season() {
    let current = season(&fixture_roster(), 2024);
    let averages = compute_all(&current);
    let report = classify(find(&current, "Bruce Thornton"), &averages);

    assert_eq!(report.position, Some(Position::Guard));
    let metrics: Vec<StatField> = report.strengths.iter().map(|f| f.metric).collect();
    assert_eq!(
        metrics,
        vec![
            StatField::TpPer,
            StatField::FtPer,
            StatField::StlPer,
            StatField::ToPer,
            StatField::Usg,
        ]
    );
    assert!(report.weaknesses.is_empty());
    assert!(report
        .strengths
        .iter()
        .all(|f| f.polarity == FindingPolarity::Strength));
    assert_eq!(report.strengths[0].observed, "40.0%");
    assert_eq!(report.strengths[0].reference, "Position Avg: 35.0%");
}

#[test]
fn unknown_role_has_no_findings() {
    let current = season(&fixture_roster(), 2024);
    let averages = compute_all(&current);
    let report = classify(find(&current, "Mystery Player"), &averages);
    assert_eq!(report.position, None);
    assert!(report.is_empty());
}

#[test]
fn domain_comparison_differences() {
    let current = season(&fixture_roster(), 2024);
    let averages = compute_all(&current);
    let cmp = compare_domain(find(&current, "Bruce Thornton"), &averages.offensive)
        .expect("guard classifies");
    assert_eq!(cmp.position, Position::Guard);
    let ortg = cmp
        .fields
        .iter()
        .find(|f| f.field == StatField::Ortg)
        .expect("ortg tracked");
    assert!(approx_eq(ortg.difference, 8.0));
}

#[test]
fn history_progression_tracks_development() {
    let roster = fixture_roster();
    let history: Vec<PlayerSeasonRecord> = roster
        .iter()
        .filter(|p| p.player_name == "Bruce Thornton")
        .cloned()
        .rev()
        .collect();

    let ProgressionOutcome::Available(prog) = build_progression(&history) else {
        panic!("history present");
    };
    assert_eq!(prog.position, Some(Position::Guard));
    let years: Vec<i32> = prog.rows.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2022, 2023, 2024]);

    let latest = &prog.rows[2];
    assert_eq!(latest.season_label, "2023-24");
    let trend_of = |metric: TrendMetric| {
        latest
            .cells
            .iter()
            .find(|c| c.metric == metric)
            .map(|c| c.trend)
    };
    assert_eq!(trend_of(TrendMetric::PointsPerGame), Some(Trend::Improvement));
    assert_eq!(trend_of(TrendMetric::TurnoverRate), Some(Trend::Improvement));
    assert_eq!(trend_of(TrendMetric::AssistToTurnover), Some(Trend::Improvement));
    assert_eq!(trend_of(TrendMetric::BlockRate), None);
}

#[test]
fn dashboard_browsing() {
    let current = season(&fixture_roster(), 2024);

    let options = FilterOptions::from_roster(&current);
    assert_eq!(options.conferences, vec!["ACC", "B10", "B12"]);

    let filter = RosterFilter {
        conference: Some("B10".into()),
        ..Default::default()
    };
    let names: Vec<&str> = filter
        .apply(&current)
        .iter()
        .map(|p| p.player_name.as_str())
        .collect();
    assert_eq!(names, vec!["Bruce Thornton", "Tyler Boone", "Zach Edey"]);

    let scorers = leaderboard(&current, StatField::Pts, 3);
    assert_eq!(scorers[0].player_name, "Zach Edey");
    assert_eq!(scorers[1].player_name, "Bruce Thornton");
}
