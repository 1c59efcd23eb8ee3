//! Frame clock for the animation.
//!
//! Elapsed time drives sway, bob and twinkle; delta drives the camera spin.
//! Pausing freezes both. The transition itself advances per frame, not per
//! second, so it keeps running while the clock is paused.

use std::time::{Duration, Instant};

/// Longest step a single frame may advance the clock, in seconds. Stalls such
/// as a window drag would otherwise make every animation jump.
pub const MAX_DELTA: f32 = 0.25;

#[derive(Debug)]
struct FpsCounter {
    window_start: Instant,
    frames: u32,
    value: f32,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_millis(500);

    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            value: 0.0,
        }
    }

    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let span = now.duration_since(self.window_start);
        if span >= Self::WINDOW {
            self.value = self.frames as f32 / span.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
    }
}

#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    /// Animation seconds, accumulated only while running.
    elapsed: f32,
    delta: f32,
    frames: u64,
    paused: bool,
    fps: FpsCounter,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            elapsed: 0.0,
            delta: 0.0,
            frames: 0,
            paused: false,
            fps: FpsCounter::new(now),
        }
    }

    /// Advance to now and return `(elapsed, delta)`. Call once per rendered frame.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let step = now.duration_since(self.last_tick).as_secs_f32().min(MAX_DELTA);
        self.last_tick = now;
        self.frames += 1;
        self.fps.record(now);

        self.delta = if self.paused { 0.0 } else { step };
        self.elapsed += self.delta;
        (self.elapsed, self.delta)
    }

    /// Animation time in seconds, excluding pauses.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Frames rendered, paused or not.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Frame rate over the last half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps.value
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            // Time spent paused is not animation time
            self.last_tick = Instant::now();
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
        log::debug!("Clock {}", if self.paused { "paused" } else { "resumed" });
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_clock() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_tick_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.tick();

        assert!(delta > 0.0);
        assert_eq!(elapsed, delta);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.toggle_pause();

        let before = clock.elapsed();
        thread::sleep(Duration::from_millis(10));
        clock.tick();

        assert_eq!(clock.elapsed(), before);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_resume_skips_paused_span() {
        let mut clock = FrameClock::new();
        clock.set_paused(true);
        thread::sleep(Duration::from_millis(50));
        clock.set_paused(false);
        let (elapsed, _) = clock.tick();
        assert!(elapsed < 0.04, "elapsed {elapsed}");
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(300));
        let (_, delta) = clock.tick();
        assert_eq!(delta, MAX_DELTA);
    }
}
