use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window attempt counter keyed by client address.
///
/// State is process-local; a multi-instance deployment would need a shared
/// counter store instead.
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// 10 attempts per 15 minutes, matching the login endpoint policy.
    pub fn for_login() -> Self {
        Self::new(10, Duration::from_secs(15 * 60))
    }

    /// Records an attempt and reports whether it is allowed. Attempts older
    /// than the window are dropped first, so the limit slides rather than
    /// resetting on a fixed schedule.
    pub fn check(&self, addr: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap();
        let attempts = hits.entry(addr).or_default();
        attempts.retain(|t| now.duration_since(*t) < self.window);
        if attempts.len() >= self.max_attempts {
            return false;
        }
        attempts.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_the_cap_then_rejects() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        for _ in 0..10 {
            assert!(limiter.check(ip(1)));
        }
        assert!(!limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn addresses_are_counted_independently() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        assert!(limiter.check(ip(2)));
    }

    #[test]
    fn window_slides_and_old_attempts_expire() {
        let limiter = RateLimiter::new(2, Duration::from_millis(40));
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        std::thread::sleep(Duration::from_millis(50));
        assert!(limiter.check(ip(1)));
    }

    #[test]
    fn rejected_attempts_do_not_extend_the_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(40));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        std::thread::sleep(Duration::from_millis(50));
        // The rejected attempt above was not recorded, so the window is clear.
        assert!(limiter.check(ip(1)));
    }
}
