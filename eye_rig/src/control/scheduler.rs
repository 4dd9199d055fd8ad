//! Auto-blink scheduler.
//!
//! Polls on a short fixed period and requests a blink once the time since
//! the last blink exceeds a randomly drawn interval. A fresh interval is
//! drawn right after every request.

use crate::control::controller::EyeController;
use crate::control::request::{BlinkRequester, BlinkSource};
use eye_common::rig::config::BlinkConfig;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Randomized blink timer.
pub struct AutoBlinkScheduler<R: Rng> {
    rng: R,
    interval: Duration,
    min_s: f64,
    max_s: f64,
}

impl<R: Rng> AutoBlinkScheduler<R> {
    /// Draw the first interval from the initial range.
    pub fn new(config: &BlinkConfig, mut rng: R) -> Self {
        let interval = draw(
            &mut rng,
            config.initial_interval_min_s,
            config.initial_interval_max_s,
        );
        Self {
            rng,
            interval,
            min_s: config.interval_min_s,
            max_s: config.interval_max_s,
        }
    }

    /// Interval currently being waited out.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether to fire at `now`.
    ///
    /// Time is measured from the last completed blink only. A request that
    /// the rig rejects leaves that reference unchanged, so the next poll past
    /// the fresh interval fires again. Firing draws the next interval.
    pub fn tick(&mut self, now: Instant, last_completed: Instant) -> bool {
        if now.saturating_duration_since(last_completed) <= self.interval {
            return false;
        }
        self.interval = draw(&mut self.rng, self.min_s, self.max_s);
        debug!("Next auto-blink interval {:.2}s", self.interval.as_secs_f64());
        true
    }

    /// Poll until `running` clears.
    pub fn run(
        mut self,
        controller: EyeController,
        requester: BlinkRequester,
        running: Arc<AtomicBool>,
        poll: Duration,
    ) {
        info!(
            "Auto-blink scheduler started (first blink in {:.2}s)",
            self.interval.as_secs_f64()
        );
        while running.load(Ordering::SeqCst) {
            if self.tick(Instant::now(), controller.last_blink_completed()) {
                requester.request(BlinkSource::Auto);
            }
            std::thread::sleep(poll);
        }
        info!("Auto-blink scheduler stopped");
    }
}

fn draw<R: Rng>(rng: &mut R, min_s: f64, max_s: f64) -> Duration {
    if min_s >= max_s {
        return Duration::from_secs_f64(min_s);
    }
    Duration::from_secs_f64(rng.gen_range(min_s..=max_s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scheduler(seed: u64) -> AutoBlinkScheduler<StdRng> {
        AutoBlinkScheduler::new(&BlinkConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn first_interval_in_initial_range() {
        for seed in 0..50 {
            let s = scheduler(seed);
            let secs = s.interval().as_secs_f64();
            assert!((4.0..=9.0).contains(&secs), "seed {seed}: {secs}");
        }
    }

    #[test]
    fn fires_only_after_interval_and_redraws() {
        let mut s = scheduler(7);
        let start = Instant::now();
        let first = s.interval();
        assert!(!s.tick(start + first / 2, start));
        assert!(!s.tick(start + first, start));
        assert!(s.tick(start + first + Duration::from_millis(1), start));
        let next = s.interval().as_secs_f64();
        assert!((3.0..=8.0).contains(&next));
    }

    #[test]
    fn rejected_fire_is_retried_on_next_poll() {
        let mut s = scheduler(3);
        let start = Instant::now();
        let fire_at = start + Duration::from_secs(10);
        assert!(s.tick(fire_at, start));
        // Trigger held: blink rejected, last_completed unchanged.
        assert!(s.tick(fire_at + Duration::from_millis(400), start));
        assert!(s.tick(fire_at + Duration::from_millis(800), start));
    }

    #[test]
    fn completed_blink_after_retry_waits_a_full_interval() {
        let mut s = scheduler(5);
        let start = Instant::now();
        assert!(s.tick(start + Duration::from_secs(10), start));
        let blink_done = start + Duration::from_secs(10) + Duration::from_millis(300);
        assert!(!s.tick(blink_done + Duration::from_millis(400), blink_done));
        assert!(s.tick(blink_done + s.interval() + Duration::from_millis(1), blink_done));
    }

    #[test]
    fn completed_blink_resets_reference() {
        let mut s = scheduler(11);
        let start = Instant::now();
        let blink_done = start + Duration::from_secs(20);
        assert!(!s.tick(blink_done + Duration::from_millis(500), blink_done));
    }
}
