//! Fixed-timestep clock
//!
//! Real frame time is accumulated and converted into whole simulation
//! ticks at `TICK_RATE`. A long stall runs at most `MAX_SUBSTEPS` ticks and
//! drops the rest, so the game slows down instead of spiralling.

use std::time::{Duration, Instant};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame time fed into the accumulator
const MAX_FRAME_TIME: f32 = 0.1;

#[derive(Debug)]
pub struct FrameClock {
    accumulator: f32,
    last: Instant,
    frame_budget: Duration,
    // FPS tracking
    frames: u32,
    window_start: Instant,
    fps: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            accumulator: 0.0,
            last: now,
            frame_budget: Duration::from_secs_f32(SIM_DT),
            frames: 0,
            window_start: now,
            fps: 0,
        }
    }

    /// Ticks owed for the time since the previous call
    pub fn tick_count(&mut self) -> u32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.count_frame(now);
        self.advance(dt)
    }

    /// Ticks owed for `dt` seconds of frame time
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Drop any owed time (after menus or pauses)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last = Instant::now();
    }

    /// Sleep off whatever is left of this frame's budget
    pub fn pace(&self, frame_start: Instant) {
        let elapsed = frame_start.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    fn count_frame(&mut self, now: Instant) {
        self.frames += 1;
        let window = now.duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = (self.frames as f32 / window.as_secs_f32()).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
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

    #[test]
    fn test_exact_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert_eq!(clock.advance(SIM_DT * 2.0), 2);
    }

    #[test]
    fn test_stall_is_bounded() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        // The backlog was dropped, not carried over
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_negative_time_ignored() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
        clock.reset();
        assert_eq!(clock.advance(0.0), 0);
    }
}
