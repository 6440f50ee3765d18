use actix_web::{middleware, web, App, HttpServer};
use friend_map::config::Settings;
use friend_map::routes::{self, AppState};
use friend_map::services::NominatimClient;
use friend_map::Pipeline;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialise tracing from `RUST_LOG`, falling back to the configured level
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Friend Map service...");

    let geocoder = NominatimClient::from_settings(&settings.geocoder).map_err(|e| {
        error!("Failed to create geocoder client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Geocoder: {} (User-Agent {:?})", settings.geocoder.endpoint, settings.geocoder.user_agent);
    info!(
        "Twitter API: {} (friend threshold {})",
        settings.twitter.api_base, settings.locator.friend_threshold
    );

    // Build application state
    let app_state = AppState {
        pipeline: Pipeline::from_settings(&settings),
        geocoder: Arc::new(geocoder),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
