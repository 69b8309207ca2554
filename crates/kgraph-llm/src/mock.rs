//! Scripted provider for tests and offline runs

use crate::LlmError;
use kgraph_domain::traits::LlmProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// No network calls. Rules are checked in insertion order and the first rule
/// whose fragment occurs in the prompt decides the reply; otherwise the
/// default response is returned. Clones share rules and the call counter.
///
/// # Examples
///
/// ```
/// use kgraph_llm::MockProvider;
/// use kgraph_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate(None, "any prompt").unwrap(), "Fixed response");
///
/// let mut provider = MockProvider::default();
/// provider.add_response("steam", "response1");
/// provider.add_response("railway", "response2");
/// assert_eq!(provider.generate(None, "about the steam engine").unwrap(), "response1");
/// assert_eq!(provider.generate(None, "railway history").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, Reply)>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a provider answering every prompt with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Respond with `response` to any prompt containing `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.rules()
            .push((fragment.into(), Reply::Text(response.into())));
    }

    /// Fail any prompt containing `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.rules().push((fragment.into(), Reply::Fail));
    }

    /// Number of `generate` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    // A panicking test thread cannot leave the rule list half-written
    fn rules(&self) -> MutexGuard<'_, Vec<(String, Reply)>> {
        self.rules.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, _system: Option<&str>, prompt: &str) -> Result<String, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let rules = self.rules();
        match rules.iter().find(|(fragment, _)| prompt.contains(fragment.as_str())) {
            Some((_, Reply::Text(text))) => Ok(text.clone()),
            Some((fragment, Reply::Fail)) => Err(LlmError::Other(format!(
                "mock failure for prompt containing '{}'",
                fragment
            ))),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reply() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate(None, "any prompt").unwrap(), "Test response");
        assert_eq!(MockProvider::default().generate(None, "x").unwrap(), "[]");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("engine", "first");
        provider.add_response("steam engine", "second");
        assert_eq!(provider.generate(Some("system"), "steam engine").unwrap(), "first");
        assert_eq!(provider.generate(None, "unknown").unwrap(), "[]");
    }

    #[test]
    fn test_error_rule() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let err = provider.generate(None, "a bad prompt").unwrap_err();
        assert!(matches!(err, LlmError::Other(ref m) if m.contains("bad prompt")));
    }

    #[test]
    fn test_clones_share_call_count() {
        let provider = MockProvider::new("test");
        let clone = provider.clone();

        provider.generate(None, "one").unwrap();
        clone.generate(None, "two").unwrap();
        assert_eq!(provider.call_count(), 2);

        clone.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }
}
