use anyhow::{Context, Result};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audiomixer_core::mixer;

mod config;

use config::{Command, Config};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    tracing::debug!(command = ?cli.command, "dispatching verb");

    // Forward the verb to the media session daemon
    let result = match &cli.command {
        Command::Volume { role, value } => mixer::volume(role, *value)
            .map(|v| json!({ "volume": v }))
            .with_context(|| format!("volume request for role {role:?} failed"))?,
        Command::Mute { role, value } => mixer::mute(role, *value)
            .map(|v| json!({ "mute": v }))
            .with_context(|| format!("mute request for role {role:?} failed"))?,
        Command::Zone { role, value } => mixer::zone(role, *value)
            .map(|v| json!({ "zone": v }))
            .with_context(|| format!("zone request for role {role:?} failed"))?,
    };

    println!("{result}");
    Ok(())
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("audiomixer=debug,audiomixer_core=debug")
    } else {
        EnvFilter::new("audiomixer=info,audiomixer_core=info")
    };

    // Results go to stdout; keep log lines off it
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
