//! Timeout and bounded retry around an [`LlmProvider`].
//!
//! Every attempt runs under `policy.timeout`. A failed attempt is retried
//! only when the error is transient (see [`LlmError::is_transient`]) and the
//! retry budget is not spent. A timed-out attempt counts as transient.

use std::time::Duration;

use tracing::{debug, warn};

use hxai_types::config::LlmConfig;
use hxai_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

/// Upper bound on a provider-requested `retry-after` wait.
const MAX_RETRY_WAIT: Duration = Duration::from_secs(10);

/// Timeout and retry budget for model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Wait between attempts (unless the provider asked for longer).
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Whether another attempt should follow failed attempt number `attempt`
    /// (1-based).
    pub fn should_retry(&self, attempt: u32, error: &LlmError) -> bool {
        attempt <= self.max_retries && error.is_transient()
    }

    /// How long to wait before retrying after `error`.
    pub fn delay_for(&self, error: &LlmError) -> Duration {
        match error {
            LlmError::RateLimited {
                retry_after_ms: Some(ms),
            } => Duration::from_millis(*ms).clamp(self.backoff, MAX_RETRY_WAIT.max(self.backoff)),
            _ => self.backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default())
    }
}

/// Provider wrapper that applies a [`RetryPolicy`] to every call.
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: LlmProvider> RetryingProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        match tokio::time::timeout(self.policy.timeout, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                after_ms: self.policy.timeout.as_millis() as u64,
            }),
        }
    }
}

impl<P: LlmProvider> LlmProvider for RetryingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn default_model(&self) -> &str {
        self.inner.default_model()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.attempt(request).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(provider = self.inner.name(), attempt, "Model call recovered after retry");
                    }
                    return Ok(response);
                }
                Err(err) if self.policy.should_retry(attempt, &err) => {
                    let delay = self.policy.delay_for(&err);
                    warn!(
                        provider = self.inner.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient model failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use hxai_types::llm::{Message, Usage};

    use super::*;

    /// Provider that replays a script of results, one per call.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
        calls: AtomicU32,
        delay: Duration,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<CompletionResponse, LlmError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
                delay: Duration::ZERO,
            }
        }

        fn slow(delay: Duration) -> Self {
            let mut provider = Self::new(vec![]);
            provider.delay = delay;
            provider
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(ok_response("default")))
        }
    }

    fn ok_response(content: &str) -> CompletionResponse {
        CompletionResponse {
            id: "resp-1".to_string(),
            content: content.to_string(),
            model: "scripted-model".to_string(),
            finish_reason: Some("stop".to_string()),
            usage: Usage::default(),
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(5),
            max_retries,
            backoff: Duration::from_millis(1),
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("hi")],
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_makes_one_call() {
        let provider = RetryingProvider::new(
            ScriptedProvider::new(vec![Ok(ok_response("first"))]),
            fast_policy(1),
        );
        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.content, "first");
        assert_eq!(provider.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_then_success() {
        let provider = RetryingProvider::new(
            ScriptedProvider::new(vec![
                Err(LlmError::Transport("connection reset".into())),
                Ok(ok_response("second")),
            ]),
            fast_policy(1),
        );
        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.content, "second");
        assert_eq!(provider.inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_budget_is_bounded() {
        let provider = RetryingProvider::new(
            ScriptedProvider::new(vec![
                Err(LlmError::Overloaded("busy".into())),
                Err(LlmError::Overloaded("busy".into())),
                Err(LlmError::Overloaded("busy".into())),
            ]),
            fast_policy(1),
        );
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(_)));
        assert_eq!(provider.inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_failure_is_not_retried() {
        let provider = RetryingProvider::new(
            ScriptedProvider::new(vec![Err(LlmError::AuthenticationFailed)]),
            fast_policy(3),
        );
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
        assert_eq!(provider.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_transient_and_retried() {
        let policy = RetryPolicy {
            timeout: Duration::from_millis(20),
            max_retries: 1,
            backoff: Duration::from_millis(1),
        };
        let provider = RetryingProvider::new(ScriptedProvider::slow(Duration::from_secs(5)), policy);
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout { after_ms: 20 }));
        assert_eq!(provider.inner.calls(), 2);
    }

    #[test]
    fn test_should_retry_counts_attempts() {
        let policy = fast_policy(1);
        let err = LlmError::Transport("x".into());
        assert!(policy.should_retry(1, &err));
        assert!(!policy.should_retry(2, &err));
        assert!(!fast_policy(0).should_retry(1, &err));
    }

    #[test]
    fn test_rate_limit_delay_is_capped() {
        let policy = fast_policy(1);
        let delay = policy.delay_for(&LlmError::RateLimited {
            retry_after_ms: Some(60_000),
        });
        assert_eq!(delay, MAX_RETRY_WAIT);
        let delay = policy.delay_for(&LlmError::RateLimited {
            retry_after_ms: Some(200),
        });
        assert_eq!(delay, Duration::from_millis(200));
        assert_eq!(policy.delay_for(&LlmError::EmptyResponse), policy.backoff);
    }

    #[test]
    fn test_policy_from_default_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(120));
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.backoff, Duration::from_millis(500));
    }
}
