//! Search input debouncing
//!
//! ```no_run
//! # async fn demo() {
//! use std::time::Duration;
//! use bistro_client::debounce::Debouncer;
//!
//! let debouncer = Debouncer::new(Duration::from_millis(500));
//! // Only the last keystroke inside the window comes back as `Some`.
//! let (a, b) = tokio::join!(debouncer.submit("ph"), debouncer.submit("phở"));
//! assert_eq!((a, b), (None, Some("phở")));
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Releases a value only if nothing newer was submitted within the delay
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay; `None` if a newer value arrived meanwhile
    pub async fn submit<T>(&self, value: T) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        tokio::time::sleep(self.delay).await;
        (self.latest.load(Ordering::Acquire) == ticket).then_some(value)
    }

    /// Drop whatever is pending
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}
