use courtside_stats::analysis::averages::Domain;
use courtside_stats::player::StatField;
use courtside_stats::position::Position;
use serde::Serialize;

use super::Output;
use crate::session::AnalysisSession;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AveragesArg {
    /// Only show one position (G, F or C)
    #[arg(long)]
    position: Option<Position>,
    /// Only show one domain (shooting, defensive, playmaking, offensive)
    #[arg(long)]
    domain: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct FieldValue {
    field: StatField,
    value: f64,
}

#[derive(Debug, Clone, Serialize)]
struct AverageRow {
    domain: Domain,
    position: Position,
    values: Vec<FieldValue>,
}

fn parse_domain(name: &str) -> anyhow::Result<Domain> {
    Domain::ALL
        .into_iter()
        .find(|d| d.label().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow::anyhow!("unknown domain '{name}'"))
}

pub(crate) async fn run(arg: &AveragesArg, session: &AnalysisSession, out: Output) -> anyhow::Result<()> {
    let domains = match &arg.domain {
        Some(name) => vec![parse_domain(name)?],
        None => Domain::ALL.to_vec(),
    };
    let positions = match arg.position {
        Some(pos) => vec![pos],
        None => Position::ALL.to_vec(),
    };

    let averages = &session.position_averages().await;
    let rows: Vec<AverageRow> = domains
        .iter()
        .flat_map(|&domain| {
            positions.iter().map(move |&position| AverageRow {
                domain,
                position,
                values: domain
                    .fields()
                    .iter()
                    .map(|&field| FieldValue {
                        field,
                        value: averages.reference(position, domain, field).unwrap_or(0.0),
                    })
                    .collect(),
            })
        })
        .collect();

    out.emit(&rows, |rows| {
        let mut current: Option<Domain> = None;
        for row in rows {
            if current != Some(row.domain) {
                current = Some(row.domain);
                println!();
                println!("{}", row.domain);
                let header: Vec<String> = row
                    .domain
                    .fields()
                    .iter()
                    .map(|f| format!("{:>9}", f.column()))
                    .collect();
                println!("{:<9}{}", "Position", header.join(""));
            }
            let cells: Vec<String> = row
                .values
                .iter()
                .map(|v| format!("{:>9.3}", v.value))
                .collect();
            println!("{:<9}{}", row.position.label(), cells.join(""));
        }
    })
}
