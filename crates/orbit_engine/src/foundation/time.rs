//! Time management utilities
//!
//! The host hands the engine a timestamp in milliseconds each frame (the value a
//! browser passes to `requestAnimationFrame`, or elapsed wall time on native hosts).
//! [`SimClock`] turns those into monotonic simulation seconds, and [`FrameStats`]
//! keeps the running frame-rate figures that used to live in a stats overlay.

/// Monotonic simulation clock driven by host timestamps
#[derive(Debug, Clone)]
pub struct SimClock {
    time_scale: f32,
    last_host_ms: Option<f64>,
    elapsed: f32,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SimClock {
    /// Create a clock that advances `time_scale` simulation seconds per host second
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale,
            last_host_ms: None,
            elapsed: 0.0,
        }
    }

    /// Advance to a host timestamp and return the elapsed simulation time in seconds
    ///
    /// The first timestamp is read as time since the host's origin, like a
    /// `requestAnimationFrame` timestamp. A timestamp earlier than the previous one
    /// (host clock reset, tab restore) leaves the clock where it is.
    pub fn advance_to(&mut self, host_ms: f64) -> f32 {
        if let Some(last) = self.last_host_ms {
            let delta_ms = host_ms - last;
            if delta_ms > 0.0 {
                self.elapsed += (delta_ms * 0.001) as f32 * self.time_scale;
                self.last_host_ms = Some(host_ms);
            } else if delta_ms < 0.0 {
                log::debug!("Host clock went backwards by {:.3}ms, holding simulation time", -delta_ms);
                self.last_host_ms = Some(host_ms);
            }
        } else {
            self.elapsed = (host_ms.max(0.0) * 0.001) as f32 * self.time_scale;
            self.last_host_ms = Some(host_ms);
        }
        self.elapsed
    }

    /// Elapsed simulation time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Simulation seconds per host second
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Change the time scale; already elapsed time is kept
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    /// Forget the previous timestamp so the next one is read as absolute again
    pub fn reset(&mut self) {
        self.last_host_ms = None;
        self.elapsed = 0.0;
    }
}

/// Running frame statistics
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_count: u64,
    last_host_ms: Option<f64>,
    last_frame_ms: f64,
    smoothed_fps: f64,
}

impl FrameStats {
    /// Smoothing factor for the exponential FPS average
    const SMOOTHING: f64 = 0.1;

    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame presented at `host_ms`
    pub fn record(&mut self, host_ms: f64) {
        if let Some(last) = self.last_host_ms {
            let frame_ms = host_ms - last;
            if frame_ms > 0.0 {
                self.last_frame_ms = frame_ms;
                let fps = 1000.0 / frame_ms;
                self.smoothed_fps = if self.smoothed_fps == 0.0 {
                    fps
                } else {
                    self.smoothed_fps + (fps - self.smoothed_fps) * Self::SMOOTHING
                };
            }
        }
        self.last_host_ms = Some(host_ms);
        self.frame_count += 1;
    }

    /// Number of frames recorded
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Duration of the last frame in milliseconds
    pub fn last_frame_ms(&self) -> f64 {
        self.last_frame_ms
    }

    /// Exponentially smoothed frames per second
    pub fn fps(&self) -> f64 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_converts_milliseconds() {
        let mut clock = SimClock::default();
        assert_relative_eq!(clock.advance_to(1500.0), 1.5);
        assert_relative_eq!(clock.advance_to(2000.0), 2.0);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut clock = SimClock::default();
        clock.advance_to(1000.0);
        clock.advance_to(3000.0);
        assert_relative_eq!(clock.advance_to(500.0), 3.0);
        // Progress resumes relative to the new host epoch
        assert_relative_eq!(clock.advance_to(1500.0), 4.0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = SimClock::new(0.5);
        clock.advance_to(0.0);
        assert_relative_eq!(clock.advance_to(2000.0), 1.0);
    }

    #[test]
    fn test_frame_stats() {
        let mut stats = FrameStats::new();
        stats.record(0.0);
        stats.record(16.0);
        assert_eq!(stats.frame_count(), 2);
        assert_relative_eq!(stats.last_frame_ms(), 16.0);
        assert_relative_eq!(stats.fps(), 62.5);
    }
}
