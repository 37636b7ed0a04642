//! Upstream HTTP access with a fixed, bounded retry policy.
//!
//! A [`Transport`] performs exactly one GET per call. [`RetryingClient`] wraps
//! it with a [`RetryPolicy`] and collapses exhausted retries to `None`; the
//! failure detail only ever reaches the log.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::constants::{GEO_JSON, MAX_ATTEMPTS};

/// Why a single attempt failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Network faults, server errors and throttling
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::Network(_) => true,
            Self::Decode(_) => false,
        }
    }
}

/// Which failures earn another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    AnyFailure,
    TransientOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub retry_on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff: Duration::ZERO,
            retry_on: RetryOn::AnyFailure,
        }
    }
}

impl std::str::FromStr for RetryOn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::AnyFailure),
            "transient" => Ok(Self::TransientOnly),
            other => anyhow::bail!("unknown retry mode '{}', expected 'any' or 'transient'", other),
        }
    }
}

impl RetryPolicy {
    fn should_retry(&self, error: &FetchError) -> bool {
        match self.retry_on {
            RetryOn::AnyFailure => true,
            RetryOn::TransientOnly => error.is_transient(),
        }
    }
}

/// One GET, decoded as JSON
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// [`Transport`] backed by reqwest, sending the NWS headers on every request
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetches `url`, retrying per the policy. `None` means every allowed
    /// attempt failed.
    pub async fn fetch_json(&self, url: &str) -> Option<Value> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            tracing::debug!("Requesting {} (attempt {}/{})", url, attempt, max_attempts);

            match self.transport.get_json(url).await {
                Ok(value) => return Some(value),
                Err(e) => {
                    tracing::warn!(attempt, url, "Attempt {} failed: {}", attempt, e);

                    if attempt == max_attempts || !self.policy.should_retry(&e) {
                        break;
                    }
                    if !self.policy.backoff.is_zero() {
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        tracing::error!("Request to {} failed after all retry attempts", url);
        None
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use super::*;

    /// In-memory transport replaying scripted results per URL. Once a URL's
    /// script runs out, its last result repeats.
    #[derive(Default)]
    pub struct ScriptedTransport {
        scripts: Mutex<HashMap<String, VecDeque<Result<Value, u16>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, url: &str, value: Value) -> Self {
            self.push(url, Ok(value))
        }

        pub fn fail(self, url: &str, status: u16) -> Self {
            self.push(url, Err(status))
        }

        fn push(self, url: &str, result: Result<Value, u16>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(result);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == url).count()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());

            let mut scripts = self.scripts.lock().unwrap();
            let Some(script) = scripts.get_mut(url) else {
                return Err(FetchError::Status(404));
            };
            let next = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            match next {
                Some(Ok(value)) => Ok(value),
                Some(Err(status)) => Err(FetchError::Status(status)),
                None => Err(FetchError::Network("no scripted response".into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::ScriptedTransport;
    use super::*;

    const URL: &str = "https://example.test/alerts?area=CA";

    fn client(transport: &Arc<ScriptedTransport>, policy: RetryPolicy) -> RetryingClient {
        RetryingClient::new(transport.clone(), policy)
    }

    #[test]
    fn default_policy_is_three_immediate_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert!(policy.backoff.is_zero());
        assert_eq!(policy.retry_on, RetryOn::AnyFailure);
    }

    #[tokio::test]
    async fn gives_up_after_three_attempts() {
        let transport = Arc::new(ScriptedTransport::new().fail(URL, 503));
        let result = client(&transport, RetryPolicy::default()).fetch_json(URL).await;

        assert!(result.is_none());
        assert_eq!(transport.calls_to(URL), 3);
    }

    #[tokio::test]
    async fn returns_first_success_without_extra_attempts() {
        let transport = Arc::new(ScriptedTransport::new().respond(URL, json!({"features": []})));
        let result = client(&transport, RetryPolicy::default()).fetch_json(URL).await;

        assert_eq!(result, Some(json!({"features": []})));
        assert_eq!(transport.calls_to(URL), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .fail(URL, 500)
                .fail(URL, 502)
                .respond(URL, json!({"ok": true})),
        );
        let result = client(&transport, RetryPolicy::default()).fetch_json(URL).await;

        assert_eq!(result, Some(json!({"ok": true})));
        assert_eq!(transport.calls_to(URL), 3);
    }

    #[tokio::test]
    async fn client_errors_are_retried_under_default_policy() {
        let transport = Arc::new(ScriptedTransport::new().fail(URL, 404));
        assert!(client(&transport, RetryPolicy::default()).fetch_json(URL).await.is_none());
        assert_eq!(transport.calls_to(URL), 3);
    }

    #[tokio::test]
    async fn transient_only_policy_stops_on_client_error() {
        let policy = RetryPolicy {
            retry_on: RetryOn::TransientOnly,
            ..RetryPolicy::default()
        };
        let transport = Arc::new(ScriptedTransport::new().fail(URL, 404));
        assert!(client(&transport, policy).fetch_json(URL).await.is_none());
        assert_eq!(transport.calls_to(URL), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let transport = Arc::new(ScriptedTransport::new().fail(URL, 500));
        assert!(client(&transport, policy).fetch_json(URL).await.is_none());
        assert_eq!(transport.calls_to(URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_waits_between_attempts_only() {
        let policy = RetryPolicy {
            backoff: Duration::from_secs(1),
            ..RetryPolicy::default()
        };
        let transport = Arc::new(ScriptedTransport::new().fail(URL, 503));
        let started = tokio::time::Instant::now();

        assert!(client(&transport, policy).fetch_json(URL).await.is_none());

        assert_eq!(transport.calls_to(URL), 3);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(2), "waited {waited:?}");
        assert!(waited < Duration::from_secs(3), "slept after the last attempt: {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_skipped_after_success() {
        let policy = RetryPolicy {
            backoff: Duration::from_secs(1),
            ..RetryPolicy::default()
        };
        let transport = Arc::new(
            ScriptedTransport::new()
                .fail(URL, 500)
                .respond(URL, json!({"ok": true})),
        );
        let started = tokio::time::Instant::now();

        assert!(client(&transport, policy).fetch_json(URL).await.is_some());
        assert_eq!(transport.calls_to(URL), 2);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn retry_mode_parses() {
        assert_eq!("any".parse::<RetryOn>().unwrap(), RetryOn::AnyFailure);
        assert_eq!("transient".parse::<RetryOn>().unwrap(), RetryOn::TransientOnly);
        assert!("never".parse::<RetryOn>().is_err());
    }

    #[test]
    fn transient_classification() {
        assert!(FetchError::Status(503).is_transient());
        assert!(FetchError::Status(429).is_transient());
        assert!(FetchError::Network("reset".into()).is_transient());
        assert!(!FetchError::Status(404).is_transient());
        assert!(!FetchError::Decode("eof".into()).is_transient());
    }
}
