//! Configuration for the Kursziel extractor.

use serde::{Deserialize, Serialize};

use crate::scrape::DEFAULT_USER_AGENT;

/// Input workbook layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Worksheet holding the URL list
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// Column with one URL per row
    #[serde(default = "default_url_column")]
    pub url_column: String,
    /// Header keyword that identifies the price-target column
    #[serde(default = "default_keyword")]
    pub keyword: String,
}

fn default_sheet() -> String {
    "Kursziele_Input".to_string()
}

fn default_url_column() -> String {
    "Url".to_string()
}

fn default_keyword() -> String {
    "kursziel".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            url_column: default_url_column(),
            keyword: default_keyword(),
        }
    }
}

/// HTTP fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Pause between successive page fetches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
}

fn default_delay_secs() -> f64 {
    1.0
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub rate: RateConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `kursziel` config file,
    /// and `KURSZIEL_*` environment variables, in that order.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("kursziel").required(false))
            .add_source(
                config::Environment::with_prefix("KURSZIEL")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
