//! Configuration module
//!
//! Client configuration for reaching the catalog store: base URL,
//! credentials, transport timeout, backend selection and upload limits.
//! Values come from the environment (optionally a `.env` file).

use std::env;
use std::time::Duration;

use crate::models::is_fetchable_url;
use crate::store_types::StoreBackend;
use crate::validation::UploadLimits;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const HTTP_TIMEOUT_SECS: u64 = 60;
const BYTES_PER_MB: usize = 1024 * 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    /// Sent as `X-API-Key` when set.
    pub api_key: Option<String>,
    /// Sent as `Authorization: Bearer` when set and no API key is configured.
    pub bearer_token: Option<String>,
    pub http_timeout_secs: u64,
    pub store_backend: StoreBackend,
    pub upload_limits: UploadLimits,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            bearer_token: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            store_backend: StoreBackend::Http,
            upload_limits: UploadLimits::default(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_url = lookup("COURSEDESK_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or(defaults.api_url);

        let http_timeout_secs = match lookup("COURSEDESK_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("COURSEDESK_HTTP_TIMEOUT_SECS must be a number, got '{}'", raw)
            })?,
            None => defaults.http_timeout_secs,
        };

        let store_backend = match lookup("COURSEDESK_STORE") {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };

        let upload_limits = UploadLimits {
            max_video_bytes: size_limit_bytes(
                &lookup,
                "MAX_VIDEO_SIZE_MB",
                defaults.upload_limits.max_video_bytes,
            )?,
            max_notes_bytes: size_limit_bytes(
                &lookup,
                "MAX_NOTES_SIZE_MB",
                defaults.upload_limits.max_notes_bytes,
            )?,
        };

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        Ok(Config {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            api_key: lookup("COURSEDESK_API_KEY").filter(|s| !s.is_empty()),
            bearer_token: lookup("COURSEDESK_BEARER_TOKEN").filter(|s| !s.is_empty()),
            http_timeout_secs,
            store_backend,
            upload_limits,
            environment,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_backend == StoreBackend::Http && !is_fetchable_url(&self.api_url) {
            return Err(anyhow::anyhow!(
                "COURSEDESK_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "COURSEDESK_HTTP_TIMEOUT_SECS must be greater than zero"
            ));
        }
        if self.upload_limits.max_video_bytes == 0 || self.upload_limits.max_notes_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Read a megabyte limit from `key` and convert it to bytes.
fn size_limit_bytes<F>(lookup: &F, key: &str, default_bytes: usize) -> Result<usize, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default_bytes);
    };
    let mb: usize = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a number, got '{}'", key, raw))?;
    mb.checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", key, mb))
}
