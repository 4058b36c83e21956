use crate::core::{ScoringWeights, TimezonePolicy};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub notifier: NotifierSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_n")]
    pub default_top_n: u16,
    #[serde(default = "default_max_top_n")]
    pub max_top_n: u16,
    #[serde(default = "default_min_score")]
    pub default_min_score: f64,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            default_min_score: default_min_score(),
            parallel: false,
        }
    }
}

fn default_top_n() -> u16 { 3 }
fn default_max_top_n() -> u16 { 5 }
fn default_min_score() -> f64 { 40.0 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub timezone: TimezonePolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_sector_expertise_weight")]
    pub sector_expertise: f64,
    #[serde(default = "default_language_weight")]
    pub language: f64,
    #[serde(default = "default_format_weight")]
    pub format: f64,
    #[serde(default = "default_timezone_weight")]
    pub timezone: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
    #[serde(default = "default_functions_weight")]
    pub functions: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            sector_expertise: default_sector_expertise_weight(),
            language: default_language_weight(),
            format: default_format_weight(),
            timezone: default_timezone_weight(),
            availability: default_availability_weight(),
            functions: default_functions_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            sector_expertise: config.sector_expertise,
            language: config.language,
            format: config.format,
            timezone: config.timezone,
            availability: config.availability,
            functions: config.functions,
        }
    }
}

fn default_sector_expertise_weight() -> f64 { 0.30 }
fn default_language_weight() -> f64 { 0.20 }
fn default_format_weight() -> f64 { 0.15 }
fn default_timezone_weight() -> f64 { 0.10 }
fn default_availability_weight() -> f64 { 0.15 }
fn default_functions_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSettings {
    /// Dispatch is disabled when unset
    pub webhook_url: Option<String>,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            from_address: default_from_address(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_from_address() -> String { "mentoring@localhost".to_string() }
fn default_max_retries() -> u32 { 3 }
fn default_backoff_ms() -> u64 { 500 }
fn default_timeout_secs() -> u64 { 10 }
fn default_queue_capacity() -> usize { 256 }

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
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENTOR_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENTOR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MENTOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MENTOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables that do not follow the
/// `MENTOR__SECTION__KEY` scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = std::env::var("MENTOR_WEBHOOK_URL") {
        if !url.trim().is_empty() {
            builder = builder.set_override("notifier.webhook_url", url)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_parse_toml_settings() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [matching]
            default_top_n = 4
            parallel = true

            [scoring.weights]
            language = 0.25
            functions = 0.05

            [scoring.timezone]
            mode = "utc_offset"
            tolerance_hours = 1.0

            [notifier]
            webhook_url = "http://relay.local/notify"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.matching.default_top_n, 4);
        assert_eq!(settings.matching.max_top_n, 5);
        assert!(settings.matching.parallel);
        assert_eq!(settings.scoring.weights.language, 0.25);
        assert!(ScoringWeights::from(&settings.scoring.weights).validate().is_ok());
        assert_eq!(
            settings.scoring.timezone,
            TimezonePolicy::UtcOffset { tolerance_hours: 1.0 }
        );
        assert_eq!(settings.notifier.webhook_url.as_deref(), Some("http://relay.local/notify"));
        assert_eq!(settings.notifier.max_retries, 3);
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str("[server]\nhost = \"localhost\"\nport = 8080", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.matching.default_min_score, 40.0);
        assert_eq!(settings.scoring.timezone, TimezonePolicy::ExactLabel);
        assert!(settings.notifier.webhook_url.is_none());
    }
}
