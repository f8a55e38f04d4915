//! Per-provider request budget.
//!
//! Each external provider carries its own limit; exceeding it is treated
//! like any other provider failure and triggers fallback to the next one.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding one-minute request budget for a single provider
#[derive(Debug)]
pub struct RateBudget {
    max_requests_per_minute: u32,
    state: Mutex<BudgetState>,
}

#[derive(Debug)]
struct BudgetState {
    request_times: Vec<Instant>,
    last_cleanup: Instant,
}

impl RateBudget {
    /// Create a new budget
    #[must_use]
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self {
            max_requests_per_minute,
            state: Mutex::new(BudgetState {
                request_times: Vec::new(),
                last_cleanup: Instant::now(),
            }),
        }
    }

    /// Check if a request is allowed and record it
    pub fn allow_request(&self) -> bool {
        let mut state = self.state.lock().expect("rate budget lock poisoned");
        state.cleanup_old_requests();

        if state.request_times.len() >= self.max_requests_per_minute as usize {
            false
        } else {
            state.request_times.push(Instant::now());
            true
        }
    }

}

impl BudgetState {
    /// Remove requests older than 1 minute
    fn cleanup_old_requests(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_cleanup) >= Duration::from_secs(10) {
            let cutoff = now - Duration::from_secs(60);
            self.request_times.retain(|&time| time > cutoff);
            self.last_cleanup = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_limits_requests() {
        let budget = RateBudget::new(2);

        // Should allow first 2 requests
        assert!(budget.allow_request());
        assert!(budget.allow_request());

        // Should deny 3rd request
        assert!(!budget.allow_request());
    }
}
