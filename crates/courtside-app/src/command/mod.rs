// Command-line front end: one subcommand per analysis view.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::{self, Config};
use crate::image::{ImageCache, SportsReferenceLookup};
use crate::provider;
use crate::session::AnalysisSession;

use self::{
    analyze::AnalyzeArg, averages::AveragesArg, dashboard::DashboardArg, image::ImageArg,
    progression::ProgressionArg,
};

mod analyze;
mod averages;
mod dashboard;
mod image;
mod progression;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding config/ and defaults/ (defaults to the working directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Position averages for every statistical domain
    Averages(#[clap(flatten)] AveragesArg),
    /// Compare a player with their position's averages
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Season-by-season progression with trends
    Progression(#[clap(flatten)] ProgressionArg),
    /// Filter, sort and rank the roster
    Dashboard(#[clap(flatten)] DashboardArg),
    /// Resolve player headshot URLs
    Image(#[clap(flatten)] ImageArg),
}

/// Where command output goes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    /// Print `value` as JSON in JSON mode, otherwise run `text`.
    pub(crate) fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            let rendered =
                serde_json::to_string_pretty(value).context("failed to serialize output")?;
            println!("{rendered}");
        } else {
            text(value);
        }
        Ok(())
    }
}

pub fn build_session(config: &Config) -> anyhow::Result<AnalysisSession> {
    let provider = provider::from_config(config).context("failed to build roster provider")?;
    let lookup = SportsReferenceLookup::from_config(&config.images)
        .context("failed to build image client")?;
    let images = ImageCache::new(Arc::new(lookup), config.images.cache_capacity);
    Ok(AnalysisSession::new(
        Arc::from(provider),
        images,
        config.progression.default_start_year,
    ))
}

pub async fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let base_dir = match args.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read working directory")?,
    };
    let config = config::load_config_in(&base_dir).context("failed to load configuration")?;
    info!("config loaded from {}", base_dir.display());

    let session = build_session(&config)?;
    let out = Output { json: args.json };

    match args.mode {
        Mode::Averages(arg) => averages::run(&arg, &session, out).await?,
        Mode::Analyze(arg) => analyze::run(&arg, &session, out).await?,
        Mode::Progression(arg) => progression::run(&arg, &session, out).await?,
        Mode::Dashboard(arg) => dashboard::run(&arg, &session, out).await?,
        Mode::Image(arg) => image::run(&arg, &session, out).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args =
            CommandArgs::try_parse_from(["courtside", "progression", "Bruce Thornton", "--json"])
                .unwrap();
        assert!(args.json);
        assert!(matches!(args.mode, Mode::Progression(_)));
    }

    #[test]
    fn analyze_takes_a_name_or_a_pid() {
        let args = CommandArgs::try_parse_from(["courtside", "analyze", "--pid", "318", "--year", "2024"])
            .unwrap();
        match args.mode {
            Mode::Analyze(arg) => {
                assert_eq!(arg.pid, Some(318));
                assert_eq!(arg.year, Some(2024));
                assert!(arg.name.is_none());
            }
            other => panic!("expected analyze, got {other:?}"),
        }

        assert!(CommandArgs::try_parse_from(["courtside", "analyze", "Zach Edey"]).is_ok());
        assert!(CommandArgs::try_parse_from(["courtside", "analyze"]).is_err());
        assert!(CommandArgs::try_parse_from(["courtside", "analyze", "Zach Edey", "--pid", "360"]).is_err());
        assert!(CommandArgs::try_parse_from(["courtside", "analyze", "Zach Edey", "--year", "2024"]).is_err());
    }
}
