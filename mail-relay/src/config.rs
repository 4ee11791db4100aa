//! Configuration module for environment variable parsing.
//!
//! Every value has a default so the relay can boot in development without any
//! environment set. Invalid values are logged and replaced by the default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use url::Url;

/// MailChannels transactional send endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.mailchannels.net/tx/v1/send";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret expected in the `Authorization: Bearer` header
    pub auth_secret: Option<String>,

    /// Outbound provider endpoint
    pub provider_url: Url,

    /// Optional provider API key, sent as `X-Api-Key`
    pub provider_api_key: Option<String>,

    /// Upper bound on a single outbound provider call
    pub dispatch_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_number("PORT", 8080),

            auth_secret: parse_secret("AUTH_SECRET"),

            provider_url: parse_url("MAIL_PROVIDER_URL", DEFAULT_PROVIDER_URL),

            provider_api_key: parse_secret("MAIL_PROVIDER_API_KEY"),

            dispatch_timeout: Duration::from_millis(parse_number("DISPATCH_TIMEOUT_MS", 10_000)),
        }
    }

    /// Whether a non-empty bearer secret is configured.
    pub fn auth_configured(&self) -> bool {
        self.auth_secret.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            auth_secret: None,
            // Constant is a valid absolute URL.
            provider_url: Url::parse(DEFAULT_PROVIDER_URL).expect("default provider url"),
            provider_api_key: None,
            dispatch_timeout: Duration::from_millis(10_000),
        }
    }
}

// Secrets stay out of Debug output; only their presence is shown.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("auth_secret_set", &self.auth_secret.is_some())
            .field("provider_url", &self.provider_url.as_str())
            .field("provider_api_key_set", &self.provider_api_key.is_some())
            .field("dispatch_timeout", &self.dispatch_timeout)
            .finish()
    }
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_number<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Read an optional secret, treating blank values as unset.
fn parse_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an absolute http(s) URL, falling back to `default` when invalid.
fn parse_url(name: &str, default: &str) -> Url {
    let fallback = || Url::parse(default).expect("default url must parse");

    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return fallback(),
    };

    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        Ok(url) => {
            warn!(env_var = name, scheme = url.scheme(), "Unsupported URL scheme, using default");
            fallback()
        }
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "Invalid URL, using default");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secret_trims_and_drops_blank() {
        env::set_var("TEST_SECRET_SET", "  s3cret  ");
        env::set_var("TEST_SECRET_BLANK", "   ");
        assert_eq!(parse_secret("TEST_SECRET_SET"), Some("s3cret".to_string()));
        assert_eq!(parse_secret("TEST_SECRET_BLANK"), None);
        assert_eq!(parse_secret("TEST_SECRET_MISSING"), None);
        env::remove_var("TEST_SECRET_SET");
        env::remove_var("TEST_SECRET_BLANK");
    }

    #[test]
    fn test_parse_url_valid() {
        env::set_var("TEST_URL_VALID", "http://127.0.0.1:9000/tx/v1/send");
        let url = parse_url("TEST_URL_VALID", DEFAULT_PROVIDER_URL);
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/tx/v1/send");
        env::remove_var("TEST_URL_VALID");
    }

    #[test]
    fn test_parse_url_falls_back() {
        env::set_var("TEST_URL_BAD", "not a url");
        env::set_var("TEST_URL_FTP", "ftp://example.com/send");
        assert_eq!(
            parse_url("TEST_URL_BAD", DEFAULT_PROVIDER_URL).as_str(),
            DEFAULT_PROVIDER_URL
        );
        assert_eq!(
            parse_url("TEST_URL_FTP", DEFAULT_PROVIDER_URL).as_str(),
            DEFAULT_PROVIDER_URL
        );
        assert_eq!(
            parse_url("TEST_URL_MISSING", DEFAULT_PROVIDER_URL).as_str(),
            DEFAULT_PROVIDER_URL
        );
        env::remove_var("TEST_URL_BAD");
        env::remove_var("TEST_URL_FTP");
    }

    #[test]
    fn test_parse_number_valid() {
        env::set_var("TEST_NUMBER_VALID", " 2500 ");
        assert_eq!(parse_number::<u64>("TEST_NUMBER_VALID", 10_000), 2500);
        env::remove_var("TEST_NUMBER_VALID");
    }

    #[test]
    fn test_parse_number_falls_back() {
        env::set_var("TEST_NUMBER_BAD", "abc");
        env::set_var("TEST_PORT_OVERFLOW", "70000");
        assert_eq!(parse_number::<u64>("TEST_NUMBER_BAD", 10_000), 10_000);
        assert_eq!(parse_number::<u16>("TEST_PORT_OVERFLOW", 8080), 8080);
        assert_eq!(parse_number::<u64>("TEST_NUMBER_MISSING", 7), 7);
        env::remove_var("TEST_NUMBER_BAD");
        env::remove_var("TEST_PORT_OVERFLOW");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = Config {
            auth_secret: Some("top-secret".to_string()),
            provider_api_key: Some("api-key".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("api-key"));
        assert!(debug.contains("auth_secret_set: true"));
    }
}
