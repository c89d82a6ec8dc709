// Courtside entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries command output)
// 2. Parse arguments, load config, build the analysis session
// 3. Run the requested subcommand

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("courtside starting up");

    courtside_app::command::run().await
}

/// Initialize tracing to stderr with an `EnvFilter` (override with RUST_LOG).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
