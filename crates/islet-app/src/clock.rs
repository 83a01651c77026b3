//! Pausable simulation clock.

use tracing::warn;

/// Largest frame time accepted in one step, in seconds.
///
/// Longer stalls (debugger breaks, window drags) are clamped so actors do
/// not jump across their orbits.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulates frame time into simulation time unless paused.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    sim_time: f64,
    paused: bool,
    frame_count: u64,
}

impl SimClock {
    pub fn new(paused: bool) -> Self {
        Self {
            paused,
            ..Default::default()
        }
    }

    /// Count a frame and, unless paused, add `frame_time` seconds.
    pub fn advance(&mut self, frame_time: f64) {
        self.frame_count += 1;
        if self.paused || frame_time <= 0.0 {
            return;
        }
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time
        };
        self.sim_time += frame_time;
    }

    pub fn sim_time(&self) -> f32 {
        self.sim_time as f32
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
