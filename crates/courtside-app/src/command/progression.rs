use courtside_stats::analysis::progression::ProgressionOutcome;

use super::Output;
use crate::session::AnalysisSession;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ProgressionArg {
    /// Player name, exactly as it appears in the dataset
    name: String,
    /// First season year to include (defaults to the configured start year)
    #[arg(long)]
    start_year: Option<i32>,
}

pub(crate) async fn run(
    arg: &ProgressionArg,
    session: &AnalysisSession,
    out: Output,
) -> anyhow::Result<()> {
    let outcome = session.progression(&arg.name, arg.start_year).await;

    out.emit(&outcome, |outcome| {
        let prog = match outcome {
            ProgressionOutcome::NoHistoricalData => {
                println!("No historical data available for {}", arg.name);
                return;
            }
            ProgressionOutcome::Available(prog) => prog,
        };

        let position = prog.position.map_or("Unknown", |p| p.label());
        println!("{} progression ({})", arg.name, position);

        let mut header = format!("{:<9}{:<18}{:>4}", "Season", "Team", "GP");
        for metric in &prog.metrics {
            header.push_str(&format!("{:>10}", metric.label()));
        }
        println!("{header}");

        for row in &prog.rows {
            let mut line = format!("{:<9}{:<18}{:>4}", row.season_label, row.team, row.games);
            for cell in &row.cells {
                line.push_str(&format!("{:>10}", format!("{} {}", cell.display, cell.trend.symbol())));
            }
            println!("{line}");
        }
    })
}
