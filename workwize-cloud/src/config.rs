//! Server configuration

use std::str::FromStr;
use std::time::Duration;

use crate::error::BoxError;

pub const DEFAULT_WORKWIZE_BASE_URL: &str = "https://prod-back.goworkwize.com/api/public";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Workwize public API bearer token
    pub workwize_key: String,
    pub workwize_base_url: String,
    pub azure_openai_endpoint: String,
    pub azure_openai_api_key: String,
    pub azure_openai_deployment: String,
    pub azure_openai_api_version: String,
    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
    /// Timeout for every outbound request
    pub upstream_timeout: Duration,
    /// Pause between per-employee address lookups
    pub address_fetch_delay: Duration,
    /// Hard cap on pages fetched per collection
    pub max_pages: u32,
    /// Global per-IP request budget per window
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    /// Sample rows handed to the assistant
    pub assistant_sample_limit: i64,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let require_secret = |name: &str| -> Result<String, BoxError> {
            let val = match lookup(name) {
                Some(v) => v,
                None => {
                    if environment != "development" {
                        return Err(
                            format!("{name} must be set in {environment} environment").into()
                        );
                    }
                    format!("dev-{name}-not-for-production")
                }
            };
            if val.is_empty() && environment != "development" {
                return Err(format!("{name} must not be empty in {environment} environment").into());
            }
            Ok(val)
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(format!("LOG_FORMAT must be text or json, got {other}").into()),
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port: parse_var(&lookup, "HTTP_PORT", 3001)?,
            workwize_key: require_secret("WORKWIZE_KEY")?,
            workwize_base_url: lookup("WORKWIZE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WORKWIZE_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            azure_openai_endpoint: require_secret("AZURE_OPENAI_ENDPOINT")?,
            azure_openai_api_key: require_secret("AZURE_OPENAI_API_KEY")?,
            azure_openai_deployment: lookup("AZURE_OPENAI_DEPLOYMENT")
                .unwrap_or_else(|| "gpt-4o-mini".into()),
            azure_openai_api_version: lookup("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|| "2024-06-01".into()),
            cors_origins,
            upstream_timeout: Duration::from_secs(parse_var(&lookup, "UPSTREAM_TIMEOUT_SECS", 30)?),
            address_fetch_delay: Duration::from_millis(parse_var(
                &lookup,
                "ADDRESS_FETCH_DELAY_MS",
                100,
            )?),
            max_pages: parse_var(&lookup, "MAX_PAGES", 500)?,
            rate_limit_max: parse_var(&lookup, "RATE_LIMIT_MAX", 100)?,
            rate_limit_window_secs: parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", 900)?,
            assistant_sample_limit: parse_var(&lookup, "ASSISTANT_SAMPLE_LIMIT", 25)?,
            log_format,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Parse an optional numeric variable; a present but malformed value is an error.
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, BoxError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{name} has an invalid value: {raw}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_in_development() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/workwize")]).unwrap();
        assert_eq!(config.http_port, 3001);
        assert_eq!(config.environment, "development");
        assert_eq!(config.workwize_base_url, DEFAULT_WORKWIZE_BASE_URL);
        assert_eq!(config.azure_openai_deployment, "gpt-4o-mini");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.address_fetch_delay, Duration::from_millis(100));
        assert_eq!(config.max_pages, 500);
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window_secs, 900);
        assert_eq!(config.assistant_sample_limit, 25);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.workwize_key.starts_with("dev-"));
        assert!(!config.is_production());
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_secrets_required_outside_development() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db/workwize"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("WORKWIZE_KEY"));

        let config = load(&[
            ("DATABASE_URL", "postgres://db/workwize"),
            ("ENVIRONMENT", "production"),
            ("WORKWIZE_KEY", "wk"),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "ak"),
        ])
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.workwize_key, "wk");
    }

    #[test]
    fn test_empty_secret_rejected_outside_development() {
        let result = load(&[
            ("DATABASE_URL", "postgres://db/workwize"),
            ("ENVIRONMENT", "staging"),
            ("WORKWIZE_KEY", ""),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "ak"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("HTTP_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("HTTP_PORT"));
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("MAX_PAGES", "-1")]).is_err());
    }

    #[test]
    fn test_cors_list_and_base_url_trimmed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("WORKWIZE_BASE_URL", "http://localhost:9000/api/"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.workwize_base_url, "http://localhost:9000/api");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
