//! Fixed-window flood control for outgoing lines.
//!
//! The writer may send `throughput` lines, then must wait until `window`
//! has passed since the window opened. Windows do not slide: the count
//! resets to zero at the boundary.

use std::time::Duration;
use tokio::time::Instant;

/// Shortest window accepted; anything below is raised to this.
pub const MIN_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FloodWindow {
    throughput: u32,
    window: Duration,
    sent: u32,
    started: Instant,
}

impl FloodWindow {
    pub fn new(throughput: u32, window: Duration, now: Instant) -> Self {
        Self {
            throughput: throughput.max(1),
            window: window.max(MIN_WINDOW),
            sent: 0,
            started: now,
        }
    }

    /// Open a fresh window if the current one has elapsed.
    pub fn roll(&mut self, now: Instant) {
        if now.saturating_duration_since(self.started) >= self.window {
            self.sent = 0;
            self.started = now;
        }
    }

    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.sent < self.throughput
    }

    /// Count one line against the current window.
    pub fn record(&mut self) {
        self.sent += 1;
    }

    /// When the current window closes.
    pub fn resets_at(&self) -> Instant {
        self.started + self.window
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exhausts_at_throughput() {
        let t0 = Instant::now();
        let mut window = FloodWindow::new(3, Duration::from_secs(20), t0);

        for _ in 0..3 {
            window.roll(t0);
            assert!(window.has_capacity());
            window.record();
        }
        window.roll(t0 + Duration::from_secs(19));
        assert!(!window.has_capacity());
        assert_eq!(window.resets_at(), t0 + Duration::from_secs(20));
    }

    #[test]
    fn test_resets_at_boundary() {
        let t0 = Instant::now();
        let mut window = FloodWindow::new(2, Duration::from_secs(20), t0);
        window.record();
        window.record();

        let later = t0 + Duration::from_secs(20);
        window.roll(later);
        assert!(window.has_capacity());
        assert_eq!(window.sent(), 0);
        assert_eq!(window.resets_at(), later + Duration::from_secs(20));
    }

    #[test]
    fn test_window_is_fixed_not_sliding() {
        let t0 = Instant::now();
        let mut window = FloodWindow::new(2, Duration::from_secs(10), t0);

        // One early, one late in the first window.
        window.record();
        window.roll(t0 + Duration::from_secs(9));
        window.record();
        assert!(!window.has_capacity());

        // Boundary resets both, even though the second was sent 1s ago.
        window.roll(t0 + Duration::from_secs(10));
        assert!(window.has_capacity());
    }

    #[test]
    fn test_zero_window_clamped() {
        let t0 = Instant::now();
        let mut window = FloodWindow::new(1, Duration::ZERO, t0);
        window.record();

        // Still limited within the minimum window.
        window.roll(t0 + Duration::from_millis(500));
        assert!(!window.has_capacity());
        assert_eq!(window.resets_at(), t0 + MIN_WINDOW);

        window.roll(t0 + MIN_WINDOW);
        assert!(window.has_capacity());
    }

    #[test]
    fn test_zero_throughput_clamped() {
        let t0 = Instant::now();
        let window = FloodWindow::new(0, Duration::from_secs(1), t0);
        assert!(window.has_capacity());
    }
}
