//! Recording transport for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{DeliveryTarget, DeliveryTransport, TransportError};

/// Records every delivery and fails those whose descriptor contains one of
/// the configured patterns
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    calls: Mutex<Vec<(String, String)>>,
    failing: Vec<String>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(patterns: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// `(descriptor, message)` pairs in delivery order
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, message)| message).collect()
    }
}

#[async_trait]
impl DeliveryTransport for MockTransport {
    async fn deliver(&self, target: &DeliveryTarget, message: &str) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.as_str().to_string(), message.to_string()));

        if self.failing.iter().any(|p| target.as_str().contains(p.as_str())) {
            return Err(TransportError::other("connection refused"));
        }
        Ok(())
    }
}
