//! Pacing between page fetches.
//!
//! The batch runner takes the limiter as a value, so the pause policy is
//! decided at construction: a fixed delay for production (matching the
//! original one-second pause between requests), a token bucket for callers
//! that think in requests per minute, or no pause at all for tests.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Bounds the outbound request rate between successive fetches.
pub struct RateLimiter {
    policy: Policy,
}

enum Policy {
    Unlimited,
    Fixed(Duration),
    TokenBucket(Mutex<BucketState>),
}

struct BucketState {
    tokens: f64,
    last_update: Instant,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    min_delay: Duration,
}

impl RateLimiter {
    /// No pause between requests. Keeps tests free of real-time waits.
    pub fn unlimited() -> Self {
        Self {
            policy: Policy::Unlimited,
        }
    }

    /// Sleep a fixed duration on every acquire.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            policy: Policy::Fixed(delay),
        }
    }

    /// Token bucket: at most `requests_per_minute` requests, never closer
    /// together than `min_delay`.
    pub fn token_bucket(requests_per_minute: u32, min_delay: Duration) -> Self {
        let max_tokens = requests_per_minute as f64;
        Self {
            policy: Policy::TokenBucket(Mutex::new(BucketState {
                tokens: max_tokens,
                last_update: Instant::now(),
                max_tokens,
                refill_rate: max_tokens / 60.0,
                min_delay,
            })),
        }
    }

    /// Wait until the next request may go out.
    pub async fn acquire(&self) {
        match &self.policy {
            Policy::Unlimited => {}
            Policy::Fixed(delay) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
            }
            Policy::TokenBucket(state) => {
                let delay = {
                    let mut state = state.lock().await;

                    let now = Instant::now();
                    let elapsed = now.duration_since(state.last_update).as_secs_f64();
                    state.tokens =
                        (state.tokens + elapsed * state.refill_rate).min(state.max_tokens);
                    state.last_update = now;

                    if state.tokens >= 1.0 {
                        state.tokens -= 1.0;
                        state.min_delay
                    } else {
                        let wait = (1.0 - state.tokens) / state.refill_rate;
                        state.tokens = 0.0;
                        Duration::from_secs_f64(wait) + state.min_delay
                    }
                };

                tokio::time::sleep(delay).await;
            }
        }
    }
}
