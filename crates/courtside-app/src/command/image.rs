use serde::Serialize;

use super::Output;
use crate::session::AnalysisSession;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ImageArg {
    /// One or more player names
    #[arg(required = true)]
    names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ImageResult {
    player_name: String,
    image_url: Option<String>,
}

pub(crate) async fn run(arg: &ImageArg, session: &AnalysisSession, out: Output) -> anyhow::Result<()> {
    let results: Vec<ImageResult> = session
        .images()
        .get_many(&arg.names)
        .await
        .into_iter()
        .map(|(player_name, image_url)| ImageResult {
            player_name,
            image_url,
        })
        .collect();

    out.emit(&results, |results| {
        for r in results {
            match &r.image_url {
                Some(url) => println!("{}: {}", r.player_name, url),
                None => println!("{}: not found", r.player_name),
            }
        }
    })
}
