//! Configuration loaded from process environment
//!
//! The job is triggered by a host scheduler with no arguments, so all
//! connection parameters and credentials come from environment variables.

mod types;

pub use types::{AdsConfig, Config, DatabaseConfig, NewsletterConfig};

use crate::ConfigError;

/// Default ad-platform API base URL (Graph API v20.0)
pub const DEFAULT_ADS_API_BASE: &str = "https://graph.facebook.com/v20.0";

/// Default newsletter API base URL
pub const DEFAULT_NEWSLETTER_API_BASE: &str = "https://api.beehiiv.com/v2";

/// Inclusive start of the insights window when `ADS_SINCE_DATE` is unset
pub const DEFAULT_SINCE_DATE: &str = "2024-01-01";

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Reads and validates the full job configuration from the environment.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - All required variables present and parseable
    /// * `Err(ConfigError)` - A variable is missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        let ads = AdsConfig {
            app_id: required("ADS_APP_ID")?,
            app_secret: required("ADS_APP_SECRET")?,
            access_token: required("ADS_ACCESS_TOKEN")?,
            business_id: required("ADS_BUSINESS_ID")?,
            api_base: optional("ADS_API_BASE", DEFAULT_ADS_API_BASE),
            since_date: optional("ADS_SINCE_DATE", DEFAULT_SINCE_DATE),
            effective_status: optional("ADS_EFFECTIVE_STATUS", "ACTIVE")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        let newsletter = NewsletterConfig {
            api_key: required("NEWSLETTER_API_KEY")?,
            api_base: optional("NEWSLETTER_API_BASE", DEFAULT_NEWSLETTER_API_BASE),
        };

        let port_raw = required("DB_PORT")?;
        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            dbname: required("DB_DATABASE")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            port: port_raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Validation(format!("DB_PORT is not a port: {port_raw}")))?,
        };

        let config = Config {
            ads,
            newsletter,
            database,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that `from_env` cannot express alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.ads.api_base).is_err() {
            return Err(ConfigError::InvalidUrl(self.ads.api_base.clone()));
        }
        if url::Url::parse(&self.newsletter.api_base).is_err() {
            return Err(ConfigError::InvalidUrl(self.newsletter.api_base.clone()));
        }
        if chrono::NaiveDate::parse_from_str(&self.ads.since_date, "%Y-%m-%d").is_err() {
            return Err(ConfigError::Validation(format!(
                "ADS_SINCE_DATE is not a YYYY-MM-DD date: {}",
                self.ads.since_date
            )));
        }
        if self.ads.effective_status.is_empty() {
            return Err(ConfigError::Validation(
                "ADS_EFFECTIVE_STATUS must name at least one status".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            ads: AdsConfig {
                app_id: "app".into(),
                app_secret: "secret".into(),
                access_token: "token".into(),
                business_id: "biz".into(),
                api_base: DEFAULT_ADS_API_BASE.into(),
                since_date: "2024-01-01".into(),
                effective_status: vec!["ACTIVE".into()],
            },
            newsletter: NewsletterConfig {
                api_key: "key".into(),
                api_base: DEFAULT_NEWSLETTER_API_BASE.into(),
            },
            database: DatabaseConfig {
                host: "localhost".into(),
                dbname: "analytics".into(),
                user: "loader".into(),
                password: "pw".into(),
                port: 5432,
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn bad_since_date_is_rejected() {
        let mut config = test_config();
        config.ads.since_date = "January 1st".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = test_config();
        config.ads.api_base = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn empty_status_filter_is_rejected() {
        let mut config = test_config();
        config.ads.effective_status.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }
}
