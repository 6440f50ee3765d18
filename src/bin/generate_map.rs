//! Build a friends map for one account without starting the web server.
//!
//! Credentials come from the `twitter.credentials` configuration section
//! (e.g. `FRIENDMAP__TWITTER__CREDENTIALS__CONSUMER_KEY`).

use clap::Parser;
use friend_map::config::Settings;
use friend_map::services::NominatimClient;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Twitter screen name, without the leading `@`
    screen_name: String,

    /// Where to write the HTML map
    #[arg(short, long, default_value = "map.html")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&settings.logging.level))
        .with_target(false)
        .init();

    let Some(credentials) = settings.twitter.credentials.clone() else {
        error!("twitter.credentials is not configured");
        return Err("missing Twitter credentials".into());
    };

    let geocoder = NominatimClient::from_settings(&settings.geocoder)?;
    let screen_name = args.screen_name.trim_start_matches('@');

    let map = friend_map::generate_map(&settings, &geocoder, screen_name, credentials).await?;
    tokio::fs::write(&args.output, map.render()).await?;

    info!(
        "Wrote {} markers for @{} to {}",
        map.markers.len(),
        screen_name,
        args.output.display()
    );

    Ok(())
}
