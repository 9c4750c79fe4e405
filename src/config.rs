//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the site's JSON endpoints live
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Content overlay behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    /// Exit animation length; the overlay is removed after this delay
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,

    /// Retry failed case studies against the posts endpoint
    #[serde(default = "default_case_study_fallback")]
    pub case_study_fallback: bool,

    #[serde(default = "default_root_path")]
    pub root_path: String,
}

fn default_animation_ms() -> u64 {
    300
}

fn default_case_study_fallback() -> bool {
    true
}

fn default_root_path() -> String {
    "/".to_string()
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            animation_ms: default_animation_ms(),
            case_study_fallback: default_case_study_fallback(),
            root_path: default_root_path(),
        }
    }
}

/// Chat widget copy
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_chat_error")]
    pub error_message: String,
}

fn default_greeting() -> String {
    "Hi! I'm Bryce AI. How can I help you today?".to_string()
}

fn default_chat_error() -> String {
    "Sorry, I encountered an error. Please try again.".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            error_message: default_chat_error(),
        }
    }
}

/// Forecast provider settings (OpenWeatherMap)
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_lat")]
    pub lat: f64,

    #[serde(default = "default_lon")]
    pub lon: f64,

    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default = "default_location_label")]
    pub location_label: String,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_lat() -> f64 {
    30.2672
}

fn default_lon() -> f64 {
    -97.7431
}

fn default_units() -> String {
    "imperial".to_string()
}

fn default_location_label() -> String {
    "Austin, Texas".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: String::new(),
            lat: default_lat(),
            lon: default_lon(),
            units: default_units(),
            location_label: default_location_label(),
        }
    }
}

/// Booking page embedded in the schedule view
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_booking_url")]
    pub booking_url: String,
}

fn default_booking_url() -> String {
    "https://cal.com/brycethompson/30min".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            booking_url: default_booking_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    #[cfg(feature = "native")]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    #[cfg(feature = "native")]
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    #[cfg(feature = "native")]
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    #[cfg(feature = "native")]
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("folio").join("config.toml")),
            Some(PathBuf::from("./folio.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FOLIO_BASE_URL") {
            self.site.base_url = url;
        }

        if let Ok(key) = std::env::var("FOLIO_WEATHER_API_KEY") {
            self.weather.api_key = key;
        }
        if let Ok(lat) = std::env::var("FOLIO_WEATHER_LAT") {
            if let Ok(v) = lat.parse() {
                self.weather.lat = v;
            }
        }
        if let Ok(lon) = std::env::var("FOLIO_WEATHER_LON") {
            if let Ok(v) = lon.parse() {
                self.weather.lon = v;
            }
        }

        if let Ok(url) = std::env::var("FOLIO_BOOKING_URL") {
            self.schedule.booking_url = url;
        }

        if let Ok(level) = std::env::var("FOLIO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FOLIO_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Folio Configuration
#
# Environment variables override these settings:
# - FOLIO_BASE_URL
# - FOLIO_WEATHER_API_KEY
# - FOLIO_WEATHER_LAT / FOLIO_WEATHER_LON
# - FOLIO_BOOKING_URL
# - FOLIO_LOG_LEVEL
# - FOLIO_LOG_FORMAT

[site]
# Origin serving /api/posts, /api/case-studies and /api/chat
base_url = "http://localhost:8080"

# Request timeout in seconds
request_timeout_secs = 15

[overlay]
# Exit animation length in milliseconds
animation_ms = 300

# Retry failed case studies against the posts endpoint
case_study_fallback = true

# Page the overlay returns to when closed
root_path = "/"

[chat]
greeting = "Hi! I'm Bryce AI. How can I help you today?"
error_message = "Sorry, I encountered an error. Please try again."

[weather]
# OpenWeatherMap API
base_url = "https://api.openweathermap.org/data/2.5"
api_key = ""
lat = 30.2672
lon = -97.7431
units = "imperial"
location_label = "Austin, Texas"

[schedule]
# Booking page shown in the schedule view
booking_url = "https://cal.com/brycethompson/30min"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
