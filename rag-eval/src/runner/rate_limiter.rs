//! Request rate limiter using a sliding one-minute window

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const WINDOW: Duration = Duration::from_secs(60);

/// Caps the number of requests started in any 60 second window
pub struct RateLimiter {
    requests_per_minute: u32,
    last_requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter; 0 disables limiting
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            last_requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a request may be sent, then record it
    pub async fn acquire(&self) -> RateLimitGuard {
        loop {
            if let Some(wait) = self.check_request_limit().await {
                tracing::debug!("Rate limit reached, waiting {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
                continue;
            }

            let mut last = self.last_requests.lock().await;
            last.push_back(Instant::now());
            return RateLimitGuard { _private: () };
        }
    }

    /// Check if we can make a request, returns wait time if we need to wait
    async fn check_request_limit(&self) -> Option<Duration> {
        if self.requests_per_minute == 0 {
            return None;
        }

        let mut last = self.last_requests.lock().await;
        let now = Instant::now();

        // Remove requests older than 1 minute
        while let Some(&front) = last.front() {
            if now.duration_since(front) > WINDOW {
                last.pop_front();
            } else {
                break;
            }
        }

        if last.len() >= self.requests_per_minute as usize {
            if let Some(&oldest) = last.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < WINDOW {
                    return Some(WINDOW - elapsed + Duration::from_millis(10));
                }
            }
        }

        None
    }

    /// Requests recorded in the current window
    pub async fn requests_in_window(&self) -> usize {
        let last = self.last_requests.lock().await;
        let now = Instant::now();
        last.iter().filter(|t| now.duration_since(**t) <= WINDOW).count()
    }
}

/// Guard returned when rate limit permission is acquired
pub struct RateLimitGuard {
    _private: (),
}
