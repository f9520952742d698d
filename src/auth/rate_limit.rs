use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_ATTEMPTS: usize = 5;
const WINDOW: Duration = Duration::from_secs(900);

/// Sliding-window limiter for failed login attempts, keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    attempts: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// True when `ip` has used up its attempts inside the window.
    /// Stale timestamps for `ip` are dropped on the way.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let Some(cutoff) = Instant::now().checked_sub(self.window) else {
            return map.get(&ip).is_some_and(|t| t.len() >= self.max_attempts);
        };
        match map.get_mut(&ip) {
            Some(timestamps) => {
                timestamps.retain(|t| *t > cutoff);
                if timestamps.is_empty() {
                    map.remove(&ip);
                    false
                } else {
                    timestamps.len() >= self.max_attempts
                }
            }
            None => false,
        }
    }

    pub fn record_failure(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(ip).or_default().push(Instant::now());
    }

    /// Forget `ip` after a successful login.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }
}
