use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Fixed-window request counter keyed by client address.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request from `client` and reports whether it is within budget.
    pub fn admit(&self, client: &str, now: Instant) -> bool {
        let span = self.config.window();
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() > 10_000 {
            windows.retain(|_, w| now.duration_since(w.started) < span);
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(window.started) >= span {
            *window = Window {
                started: now,
                hits: 0,
            };
        }

        window.hits = window.hits.saturating_add(1);
        window.hits <= self.config.max_requests
    }
}

/// Request guard that spends one unit of the caller's budget.
pub struct Admitted;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Admitted {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(limiter) = req.rocket().state::<RateLimiter>() else {
            return Outcome::Success(Admitted);
        };

        let client = req
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        if limiter.admit(&client, Instant::now()) {
            Outcome::Success(Admitted)
        } else {
            tracing::warn!("rate limit exceeded");
            Outcome::Error((Status::TooManyRequests, ()))
        }
    }
}
