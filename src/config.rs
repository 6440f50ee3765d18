use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::Credentials;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub twitter: TwitterSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub locator: LocatorSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterSettings {
    #[serde(default = "default_twitter_api_base")]
    pub api_base: String,
    #[serde(default = "default_friends_page_size")]
    pub friends_page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Only read by the standalone `generate-map` binary; the web form
    /// always supplies its own.
    pub credentials: Option<Credentials>,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            api_base: default_twitter_api_base(),
            friends_page_size: default_friends_page_size(),
            timeout_secs: default_timeout_secs(),
            credentials: None,
        }
    }
}

fn default_twitter_api_base() -> String { "https://api.twitter.com".to_string() }
fn default_friends_page_size() -> u32 { 20 }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_geocoder_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { concat!("friend-map/", env!("CARGO_PKG_VERSION")).to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LocatorSettings {
    /// Collection stops once the sample holds *more* than this many friends,
    /// so a full sample has `friend_threshold + 1` entries.
    #[serde(default = "default_friend_threshold")]
    pub friend_threshold: usize,
    /// Most friend pages requested per sample
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            friend_threshold: default_friend_threshold(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_friend_threshold() -> usize { 7 }
fn default_max_pages() -> usize { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_zoom_start")]
    pub zoom_start: u8,
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom_start: default_zoom_start(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
        }
    }
}

fn default_zoom_start() -> u8 { 5 }
fn default_tile_url() -> String { "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string() }
fn default_attribution() -> String {
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        .to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FRIENDMAP)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FRIENDMAP__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("FRIENDMAP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
