use anyhow::bail;
use courtside_stats::analysis::comparison::ComparisonFinding;

use super::Output;
use crate::session::AnalysisSession;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Player name, exactly as it appears in the dataset
    #[arg(required_unless_present = "pid", conflicts_with = "pid")]
    pub(crate) name: Option<String>,
    /// Look the player up by dataset id instead of name
    #[arg(long)]
    pub(crate) pid: Option<i64>,
    /// Season year to use with --pid (defaults to the most recent)
    #[arg(long, requires = "pid")]
    pub(crate) year: Option<i32>,
}

fn print_findings(title: &str, findings: &[ComparisonFinding]) {
    println!("{title}:");
    if findings.is_empty() {
        println!("  (none)");
    }
    for f in findings {
        println!("  {:<36} {:<16} {}", f.label, f.observed, f.reference);
    }
}

pub(crate) async fn run(arg: &AnalyzeArg, session: &AnalysisSession, out: Output) -> anyhow::Result<()> {
    let found = match (&arg.name, arg.pid) {
        (_, Some(pid)) => session.analyze_pid(pid, arg.year).await,
        (Some(name), None) => session.analyze_player(name).await,
        (None, None) => bail!("a player name or --pid is required"),
    };
    let Some(analysis) = found else {
        match (&arg.name, arg.pid, arg.year) {
            (_, Some(pid), Some(year)) => bail!("no roster entry with pid {pid} in {year}"),
            (_, Some(pid), None) => bail!("no roster entry with pid {pid}"),
            (name, None, _) => bail!("player '{}' not found in the roster", name.as_deref().unwrap_or_default()),
        }
    };

    out.emit(&analysis, |a| {
        let p = &a.player;
        println!("{} ({}, {}) {}", p.player_name, p.team, p.conf, p.year);
        match a.position {
            Some(pos) => println!("Role: {} ({})", p.role, pos.label()),
            None => println!("Role: {} (no position mapping; comparison skipped)", p.role),
        }
        if let Some(url) = &a.image_url {
            println!("Image: {url}");
        }

        for domain in &a.domains {
            println!();
            println!("{} vs {} average", domain.domain, domain.position.label());
            for f in &domain.fields {
                println!(
                    "  {:<10}{:>10.3}{:>10.3}{:>+10.3}",
                    f.field.column(),
                    f.player,
                    f.average,
                    f.difference
                );
            }
        }

        println!();
        print_findings("Strengths", &a.report.strengths);
        print_findings("Weaknesses", &a.report.weaknesses);
    })
}
