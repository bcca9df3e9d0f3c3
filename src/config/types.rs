/// Main configuration structure for one sync run
#[derive(Debug, Clone)]
pub struct Config {
    pub ads: AdsConfig,
    pub newsletter: NewsletterConfig,
    pub database: DatabaseConfig,
}

/// Ad-platform API credentials and harvest window
#[derive(Debug, Clone)]
pub struct AdsConfig {
    /// Application id registered with the ad platform
    pub app_id: String,

    /// Application secret
    pub app_secret: String,

    /// Access token sent as a query parameter on every request
    pub access_token: String,

    /// Business node that owns the ad accounts
    pub business_id: String,

    /// API base URL, overridable for tests
    pub api_base: String,

    /// Inclusive start date (YYYY-MM-DD) of the insights time range;
    /// the range always ends at "today"
    pub since_date: String,

    /// Campaign effective-status filter (default: ACTIVE only)
    pub effective_status: Vec<String>,
}

/// Newsletter API credentials
#[derive(Debug, Clone)]
pub struct NewsletterConfig {
    /// Bearer token for the newsletter API
    pub api_key: String,

    /// API base URL, overridable for tests
    pub api_base: String,
}

/// Postgres connection parameters
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}
