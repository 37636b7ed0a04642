//! Runtime settings, read from the environment (and `.env` when present).

use std::time::Duration;

use anyhow::{Context, Result};

use crate::client::{RetryOn, RetryPolicy};
use crate::constants::{NWS_API_BASE, USER_AGENT};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the NWS API
    pub api_base: String,
    pub user_agent: String,
    pub retry: RetryPolicy,
    /// Per-request timeout; `None` keeps the HTTP client default
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: NWS_API_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = lookup("NWS_API_BASE") {
            config.api_base = base;
        }
        if let Some(agent) = lookup("NWS_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(attempts) = lookup("NWS_MAX_ATTEMPTS") {
            config.retry.max_attempts = attempts
                .parse()
                .with_context(|| format!("NWS_MAX_ATTEMPTS must be a positive integer, got '{}'", attempts))?;
        }
        if let Some(backoff) = lookup("NWS_RETRY_BACKOFF_MS") {
            let millis: u64 = backoff
                .parse()
                .with_context(|| format!("NWS_RETRY_BACKOFF_MS must be an integer, got '{}'", backoff))?;
            config.retry.backoff = Duration::from_millis(millis);
        }
        if let Some(mode) = lookup("NWS_RETRY_ON") {
            config.retry.retry_on = mode.parse::<RetryOn>().context("NWS_RETRY_ON")?;
        }
        if let Some(timeout) = lookup("NWS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .with_context(|| format!("NWS_REQUEST_TIMEOUT_SECS must be an integer, got '{}'", timeout))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if config.retry.max_attempts == 0 {
            anyhow::bail!("NWS_MAX_ATTEMPTS must be at least 1");
        }

        Ok(config)
    }
}
