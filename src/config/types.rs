use serde::Deserialize;

/// Main configuration structure for Coin-Ledger
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub account: Option<AccountConfig>,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Base URL of the per-year catalog pages
    #[serde(rename = "primary-base-url", default = "default_primary_base_url")]
    pub primary_base_url: String,

    /// Base URL of the per-country pages used for prices and pictures
    #[serde(rename = "secondary-base-url", default = "default_secondary_base_url")]
    pub secondary_base_url: String,

    /// Whether the per-country source is scraped and merged at all
    #[serde(rename = "secondary-enabled", default = "default_true")]
    pub secondary_enabled: bool,

    /// First year fetched from the primary source (inclusive)
    #[serde(rename = "first-year")]
    pub first_year: i32,

    /// Last year fetched from the primary source (inclusive)
    #[serde(rename = "last-year")]
    pub last_year: i32,

    /// Fixed delay between two requests (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Country slugs fetched from the secondary source
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            primary_base_url: default_primary_base_url(),
            secondary_base_url: default_secondary_base_url(),
            secondary_enabled: true,
            first_year: 2004,
            last_year: 2024,
            request_delay: 1000,
            request_timeout: 30,
            user_agent: default_user_agent(),
            countries: default_countries(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on
    #[serde(rename = "bind-address")]
    pub bind_address: String,

    /// Allowed CORS origins ("*" allows any)
    #[serde(rename = "cors-origins", default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Collector account created at startup when missing
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
}

fn default_primary_base_url() -> String {
    "https://www.ecb.europa.eu".to_string()
}

fn default_secondary_base_url() -> String {
    "https://www.2euros.org".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// Euro-area issuers, as slugs of the per-country pages
pub fn default_countries() -> Vec<String> {
    [
        "andorra",
        "austria",
        "belgium",
        "croatia",
        "cyprus",
        "estonia",
        "finland",
        "france",
        "germany",
        "greece",
        "ireland",
        "italy",
        "latvia",
        "lithuania",
        "luxembourg",
        "malta",
        "monaco",
        "netherlands",
        "portugal",
        "san-marino",
        "slovakia",
        "slovenia",
        "spain",
        "vatican",
    ]
    .iter()
    .map(|slug| slug.to_string())
    .collect()
}
