//! Refresh scheduling with retry-on-failure.
//!
//! Content is stale when it has never been rendered, when it was
//! invalidated, or when the interval has elapsed since the last successful
//! render. A failed render leaves the timestamp alone, so the frame stays
//! due and the loop retries after its own short delay.

/// Decides when a new frame must be produced.
#[derive(Debug)]
pub struct RefreshScheduler {
    last_refresh_ms: Option<u64>,
    interval_ms: u64,
}

impl RefreshScheduler {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            last_refresh_ms: None,
            interval_ms,
        }
    }

    /// True if the content is stale at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_refresh_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.interval_ms,
        }
    }

    /// Record the outcome of a render attempt started at `now_ms`.
    pub fn record_result(&mut self, now_ms: u64, success: bool) {
        if success {
            self.last_refresh_ms = Some(now_ms);
        }
    }

    /// Force the next check to report the content as stale.
    pub fn invalidate(&mut self) {
        self.last_refresh_ms = None;
    }

    pub fn last_refresh(&self) -> Option<u64> {
        self.last_refresh_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }
}
