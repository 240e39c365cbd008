//! Portal configuration parsed from environment variables.

pub const BASE_URL_ENV: &str = "VMS_API_BASE_URL";
pub const HISTORY_LIMIT_ENV: &str = "VMS_HISTORY_LIMIT";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {HISTORY_LIMIT_ENV} '{raw}': expected a positive integer")]
    InvalidHistoryLimit { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub base_url: String,
    pub history_limit: usize,
}

impl PortalConfig {
    /// Build typed portal config from environment variables.
    ///
    /// Optional:
    /// - `VMS_API_BASE_URL`: gateway base URL, default `http://127.0.0.1:3000`
    /// - `VMS_HISTORY_LIMIT`: recent-validation rows to request, default 20
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHistoryLimit` when the limit is set but is
    /// not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None, None)
    }

    /// [`from_env`](Self::from_env) with explicit overrides taking precedence,
    /// for callers that expose the same knobs as command-line flags. A blank
    /// base URL override is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHistoryLimit` when the limit, from either
    /// source, is not a positive integer.
    pub fn resolve(
        base_url: Option<&str>,
        history_limit: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let base_url = match base_url.map(str::trim) {
            Some(value) if !value.is_empty() => value.trim_end_matches('/').to_string(),
            _ => resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref()),
        };
        let history_limit = match history_limit {
            Some(limit) if limit > 0 => limit,
            Some(limit) => {
                return Err(ConfigError::InvalidHistoryLimit { raw: limit.to_string() });
            }
            None => parse_history_limit(std::env::var(HISTORY_LIMIT_ENV).ok().as_deref())?,
        };
        tracing::info!(%base_url, history_limit, "portal configuration loaded");
        Ok(Self { base_url, history_limit })
    }
}

fn resolve_base_url(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.trim_end_matches('/').to_string(),
        _ => {
            tracing::warn!("{BASE_URL_ENV} is not set, falling back to {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        }
    }
}

fn parse_history_limit(raw: Option<&str>) -> Result<usize, ConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_HISTORY_LIMIT);
    };
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidHistoryLimit { raw: value.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
