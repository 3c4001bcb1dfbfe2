//! Language-model assistance.
//!
//! The library never talks to a network itself. Callers inject a
//! [`TextCompletion`] implementation (prompt in, text out) and this module
//! wraps it with a retry policy, turns replies into typed values and falls
//! back to deterministic output when a reply cannot be used.

mod generate;
mod metadata;

pub use generate::{
    generate, ConceptGraph, Generated, Generation, GenerationKind, GraphCategory, GraphLink,
    GraphNode, MindmapNode, PaperInfo, TimelineEvent,
};
pub use metadata::{metadata_prompt, request_metadata, AssistedMetadata, MAX_ASSISTED_KEYWORDS};

use std::time::Duration;

use crate::error::{Error, Result};

/// Timeout and retry settings for a completion collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionPolicy {
    /// Per-request timeout, enforced by the implementation
    pub timeout: Duration,

    /// Total attempts, including the first (minimum 1)
    pub max_attempts: u32,

    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl CompletionPolicy {
    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::default().with_max_attempts(1)
    }
}

/// A text-completion capability: one prompt in, one reply out.
///
/// Implementations are expected to honour [`CompletionPolicy::timeout`]
/// from their [`policy`](TextCompletion::policy).
pub trait TextCompletion: Send + Sync {
    /// Send `prompt` and return the model's reply.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Timeout and retry settings for this collaborator.
    fn policy(&self) -> CompletionPolicy {
        CompletionPolicy::default()
    }
}

/// Call `client` until it returns a non-blank reply or the policy's
/// attempts run out. The last error is returned on exhaustion.
pub fn complete_with_retry(client: &dyn TextCompletion, prompt: &str) -> Result<String> {
    let policy = client.policy();
    let attempts = policy.max_attempts.max(1);
    let mut last_error = Error::Completion("no attempts made".to_string());

    for attempt in 1..=attempts {
        match client.complete(prompt) {
            Ok(reply) if !reply.trim().is_empty() => return Ok(reply),
            Ok(_) => last_error = Error::Completion("empty reply".to_string()),
            Err(e) => last_error = e,
        }

        log::warn!(
            "Completion attempt {}/{} failed: {}",
            attempt,
            attempts,
            last_error
        );
        if attempt < attempts && !policy.retry_delay.is_zero() {
            std::thread::sleep(policy.retry_delay);
        }
    }

    Err(last_error)
}

/// Extract the JSON payload from a model reply.
///
/// Replies often wrap JSON in a Markdown code fence or surround it with
/// prose; the fenced block wins, otherwise the outermost `{...}` or
/// `[...]` span is taken.
pub fn strip_code_fence(reply: &str) -> &str {
    if let Some((_, rest)) = reply.split_once("```json") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some((_, rest)) = reply.split_once("```") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }

    let trimmed = reply.trim();
    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl TextCompletion for Flaky {
        fn complete(&self, _prompt: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(Error::Completion(format!("call {} failed", call)))
            } else {
                Ok("reply".to_string())
            }
        }

        fn policy(&self) -> CompletionPolicy {
            CompletionPolicy::default().with_retry_delay(Duration::ZERO)
        }
    }

    #[test]
    fn test_retry_until_success() {
        let client = Flaky {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        assert_eq!(complete_with_retry(&client, "p").unwrap(), "reply");
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retry_exhausted_returns_last_error() {
        let client = Flaky {
            failures: 5,
            calls: AtomicU32::new(0),
        };
        let err = complete_with_retry(&client, "p").unwrap_err();
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert!(err.to_string().contains("call 3 failed"));
    }

    #[test]
    fn test_policy_builder() {
        let policy = CompletionPolicy::default()
            .with_timeout(Duration::from_secs(5))
            .with_max_attempts(0);
        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(CompletionPolicy::once().max_attempts, 1);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("Here:\n```\n[1, 2]\n```\nDone"), "[1, 2]");
        assert_eq!(strip_code_fence("Sure! {\"a\": 1} hope that helps"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  plain  "), "plain");
    }
}
