use courtside_stats::dashboard::{
    format_height, height_to_inches, leaderboard, PlayerType, RosterFilter, StatRange,
    DEFAULT_BPM_RANGE, DEFAULT_EFG_RANGE, DEFAULT_HEIGHT_RANGE, DEFAULT_PPG_RANGE,
};
use courtside_stats::player::StatField;
use courtside_stats::position::Position;

use super::Output;
use crate::session::{AnalysisSession, DashboardView};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DashboardArg {
    /// Case-insensitive search over name, team and conference
    #[arg(long, default_value = "")]
    search: String,
    /// Position (G, F or C)
    #[arg(long)]
    position: Option<Position>,
    #[arg(long)]
    conference: Option<String>,
    #[arg(long)]
    team: Option<String>,
    /// Class year (Fr, So, Jr, Sr)
    #[arg(long)]
    class_year: Option<String>,
    /// starter, bench or limited
    #[arg(long)]
    player_type: Option<PlayerType>,
    #[arg(long)]
    ppg_min: Option<f64>,
    #[arg(long)]
    ppg_max: Option<f64>,
    #[arg(long)]
    efg_min: Option<f64>,
    #[arg(long)]
    efg_max: Option<f64>,
    #[arg(long)]
    bpm_min: Option<f64>,
    #[arg(long)]
    bpm_max: Option<f64>,
    /// Minimum height in inches
    #[arg(long)]
    height_min: Option<f64>,
    /// Maximum height in inches
    #[arg(long)]
    height_max: Option<f64>,
    /// Rank matching players by this column (e.g. pts, TO_per) instead of by name
    #[arg(long)]
    top: Option<StatField>,
    /// Maximum number of players to print
    #[arg(long, default_value_t = 25)]
    limit: usize,
}

fn range(default: StatRange, min: Option<f64>, max: Option<f64>) -> StatRange {
    StatRange::new(min.unwrap_or(default.min), max.unwrap_or(default.max))
}

impl DashboardArg {
    fn filter(&self) -> RosterFilter {
        RosterFilter {
            search: self.search.clone(),
            position: self.position,
            conference: self.conference.clone(),
            team: self.team.clone(),
            class_year: self.class_year.clone(),
            player_type: self.player_type,
            ppg: range(DEFAULT_PPG_RANGE, self.ppg_min, self.ppg_max),
            efg: range(DEFAULT_EFG_RANGE, self.efg_min, self.efg_max),
            bpm: range(DEFAULT_BPM_RANGE, self.bpm_min, self.bpm_max),
            height: range(DEFAULT_HEIGHT_RANGE, self.height_min, self.height_max),
        }
    }
}

pub(crate) async fn run(
    arg: &DashboardArg,
    session: &AnalysisSession,
    out: Output,
) -> anyhow::Result<()> {
    let mut view: DashboardView = session.dashboard(&arg.filter()).await;
    view.players = match arg.top {
        Some(field) => leaderboard(&view.players, field, arg.limit)
            .into_iter()
            .cloned()
            .collect(),
        None => view.players.into_iter().take(arg.limit).collect(),
    };

    out.emit(&view, |view| {
        println!(
            "{} of {} players ({} active filters)",
            view.players.len(),
            view.total,
            view.active_filters
        );
        println!(
            "{:<24}{:<18}{:<6}{:<10}{:<4}{:>6}{:>7}{:>7}{:>7}{:>7}",
            "Player", "Team", "Conf", "Role", "Yr", "Ht", "PPG", "eFG", "BPM", "Min%"
        );
        for p in &view.players {
            println!(
                "{:<24}{:<18}{:<6}{:<10}{:<4}{:>6}{:>7.1}{:>7.1}{:>7.1}{:>7.1}",
                p.player_name,
                p.team,
                p.conf,
                p.role,
                p.class_year,
                format_height(height_to_inches(&p.height)),
                p.pts,
                p.efg,
                p.bpm,
                p.min_per
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_bounds_keep_default_ranges() {
        let arg = DashboardArg {
            ppg_min: Some(10.0),
            ..Default::default()
        };
        let filter = arg.filter();
        assert_eq!(filter.ppg, StatRange::new(10.0, 30.0));
        assert_eq!(filter.efg, DEFAULT_EFG_RANGE);
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn empty_args_are_an_inactive_filter() {
        assert_eq!(DashboardArg::default().filter(), RosterFilter::default());
    }
}
