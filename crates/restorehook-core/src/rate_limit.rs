use crate::config::RateLimitConfig;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Window {
    start: Instant,
    count: u32,
}

/// Fixed-window trigger limiter
///
/// Counts grants in non-overlapping windows of `window` length. The window is
/// reset lazily on the first acquisition after it has expired, so up to twice
/// `max_per_window` grants can land close together around a boundary.
///
/// The expiry check, capacity check and increment happen under one lock, so
/// concurrent callers never see more than `max_per_window` grants per window.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_per_window: u32,
    state: Mutex<Window>,
}

impl RateLimiter {
    /// Create a limiter whose first window starts now
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    /// Create a limiter whose first window starts at `start`
    pub fn starting_at(config: &RateLimitConfig, start: Instant) -> Self {
        Self {
            window: config.window(),
            max_per_window: config.max_per_window,
            state: Mutex::new(Window { start, count: 0 }),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_per_window(&self) -> u32 {
        self.max_per_window
    }

    /// Try to take a slot in the current window
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Try to take a slot as of `now`
    ///
    /// Returns `false` without counting when the window is full.
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut state = self.lock();

        if now.saturating_duration_since(state.start) > self.window {
            state.start = now;
            state.count = 0;
        }

        if state.count >= self.max_per_window {
            return false;
        }

        state.count += 1;
        true
    }

    /// Grants taken in the current window, as last recorded
    pub fn used(&self) -> u32 {
        self.lock().count
    }

    fn lock(&self) -> MutexGuard<'_, Window> {
        // The critical section cannot panic midway, so a poisoned lock still
        // holds a consistent window.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Barrier;

    fn config(window_ms: u64, max_per_window: u32) -> RateLimitConfig {
        RateLimitConfig {
            window_ms,
            max_per_window,
        }
    }

    #[test]
    fn test_grants_up_to_max_then_denies() {
        let start = Instant::now();
        let limiter = RateLimiter::starting_at(&config(60_000, 3), start);

        assert!(limiter.try_acquire_at(start));
        assert!(limiter.try_acquire_at(start + Duration::from_secs(1)));
        assert!(limiter.try_acquire_at(start + Duration::from_secs(2)));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(3)));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(59)));
        assert_eq!(limiter.used(), 3);
    }

    #[test]
    fn test_denial_does_not_count() {
        let start = Instant::now();
        let limiter = RateLimiter::starting_at(&config(60_000, 1), start);

        assert!(limiter.try_acquire_at(start));
        for _ in 0..10 {
            assert!(!limiter.try_acquire_at(start));
        }
        assert_eq!(limiter.used(), 1);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let start = Instant::now();
        let limiter = RateLimiter::starting_at(&config(60_000, 3), start);

        for _ in 0..3 {
            assert!(limiter.try_acquire_at(start));
        }
        assert!(!limiter.try_acquire_at(start + Duration::from_millis(60_000)));

        let later = start + Duration::from_millis(60_001);
        assert!(limiter.try_acquire_at(later));
        assert_eq!(limiter.used(), 1);

        // The new window starts at the reset, not at the old boundary.
        assert!(limiter.try_acquire_at(later + Duration::from_secs(30)));
        assert!(limiter.try_acquire_at(later + Duration::from_secs(59)));
        assert!(!limiter.try_acquire_at(later + Duration::from_secs(60)));
    }

    #[test]
    fn test_boundary_allows_double_burst() {
        let start = Instant::now();
        let limiter = RateLimiter::starting_at(&config(1_000, 2), start);

        let before = start + Duration::from_millis(999);
        assert!(limiter.try_acquire_at(before));
        assert!(limiter.try_acquire_at(before));

        let after = start + Duration::from_millis(1_001);
        assert!(limiter.try_acquire_at(after));
        assert!(limiter.try_acquire_at(after));
        assert!(!limiter.try_acquire_at(after));
    }

    #[test]
    fn test_earlier_timestamp_does_not_reset() {
        let start = Instant::now() + Duration::from_secs(10);
        let limiter = RateLimiter::starting_at(&config(1_000, 1), start);

        assert!(limiter.try_acquire_at(start));
        assert!(!limiter.try_acquire_at(start - Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_max_denies_everything() {
        let limiter = RateLimiter::new(&config(60_000, 0));
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.used(), 0);
    }

    #[test]
    fn test_concurrent_acquire_never_exceeds_max() {
        const MAX: u32 = 3;
        const EXTRA: u32 = 29;

        let limiter = RateLimiter::new(&config(60_000, MAX));
        let barrier = Barrier::new((MAX + EXTRA) as usize);
        let granted = AtomicU32::new(0);
        let denied = AtomicU32::new(0);

        std::thread::scope(|s| {
            for _ in 0..(MAX + EXTRA) {
                s.spawn(|| {
                    barrier.wait();
                    if limiter.try_acquire() {
                        granted.fetch_add(1, Ordering::SeqCst);
                    } else {
                        denied.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(granted.load(Ordering::SeqCst), MAX);
        assert_eq!(denied.load(Ordering::SeqCst), EXTRA);
    }

    #[test]
    fn test_default_limiter() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.window(), Duration::from_secs(60));
        assert_eq!(limiter.max_per_window(), 3);
    }
}
