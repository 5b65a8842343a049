//! Parse-error counter handed to the event parser at construction time

use std::sync::atomic::{AtomicU64, Ordering};

/// Increment-only counter observed by external monitoring.
///
/// Implementations must tolerate concurrent `inc` calls from every
/// partition worker.
pub trait ParseErrorCounter: Send + Sync {
    fn inc(&self, n: u64);

    fn name(&self) -> String;
}

/// In-process counter backed by an atomic
#[derive(Debug)]
pub struct AtomicCounter {
    namespace: String,
    name: String,
    value: AtomicU64,
}

impl AtomicCounter {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            value: AtomicU64::new(0),
        }
    }

    /// The counter the game programs register: `main.ParseErrors`
    pub fn parse_errors() -> Self {
        Self::new("main", "ParseErrors")
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl ParseErrorCounter for AtomicCounter {
    fn inc(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    fn name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}
